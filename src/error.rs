//! Error types for docs-assist.

/// Top-level error type for the assistant.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Input rejected: {0}")]
    Input(#[from] InputError),

    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Outcome of a failed backend call.
///
/// Every variant is a value handed back to the caller; the gateway never
/// panics or retries.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The request never produced a response (unreachable host, refused
    /// connection, transport timeout).
    #[error("Request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },

    /// Non-success status with a JSON body.
    #[error("HTTP error! status: {status} - {detail}")]
    Backend { status: u16, detail: String },

    /// Non-success status whose body could not be parsed.
    #[error("HTTP error! status: {status} - {reason}")]
    BackendStatus { status: u16, reason: String },

    /// Success status, but the body is not the expected JSON shape.
    #[error("Invalid response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    #[error("Failed to encode request for {endpoint}: {reason}")]
    Encode { endpoint: String, reason: String },
}

impl GatewayError {
    /// The HTTP status for backend-reported failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } | Self::BackendStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

/// Locally refused input. Never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Message text is empty")]
    EmptyText,

    #[error("Content for {skill} is empty")]
    EmptyContent { skill: String },

    #[error("Nothing to translate")]
    NothingToTranslate,

    #[error("{component} is busy with a previous request")]
    Busy { component: String },
}

/// Errors raised by an injected translator.
#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("Translation to {language} failed: {reason}")]
    Failed { language: String, reason: String },

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// Result type alias for the assistant.
pub type Result<T> = std::result::Result<T, Error>;
