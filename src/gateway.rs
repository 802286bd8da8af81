//! Backend gateway: one HTTP attempt per user action, outcome normalized.
//!
//! Components talk to the backend through the [`Gateway`] trait so the
//! transport can be swapped out. [`HttpGateway`] is the reqwest-backed
//! implementation. There is no retry and no backoff: a failure is returned to
//! the caller as a [`GatewayError`] and the caller decides what to show.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::AssistConfig;
use crate::error::{ConfigError, GatewayError};

/// Transport boundary to the AI backend.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// POST `payload` as JSON to `endpoint` and return the parsed body.
    async fn send(
        &self,
        endpoint: &str,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError>;
}

/// Serialize `payload`, send it, and decode the response into `Resp`.
///
/// A body that parses as JSON but lacks the fields of `Resp` is reported as
/// [`GatewayError::MalformedResponse`].
pub async fn call<Req, Resp>(
    gateway: &dyn Gateway,
    endpoint: &str,
    payload: &Req,
) -> Result<Resp, GatewayError>
where
    Req: Serialize + ?Sized,
    Resp: DeserializeOwned,
{
    let body = serde_json::to_value(payload).map_err(|e| GatewayError::Encode {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;
    let value = gateway.send(endpoint, body).await?;
    serde_json::from_value(value).map_err(|e| GatewayError::MalformedResponse {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })
}

/// Gateway over a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Build a client honoring the configured transport timeout.
    pub fn from_config(config: &AssistConfig) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Default for HttpGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn send(
        &self,
        endpoint: &str,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError> {
        debug!(endpoint, "Sending backend request");

        let resp = self
            .client
            .post(endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                warn!(endpoint, error = %e, "Backend request could not be sent");
                GatewayError::Transport {
                    endpoint: endpoint.to_string(),
                    reason: e.to_string(),
                }
            })?;

        let status = resp.status();
        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) if status.is_success() => {
                return Err(GatewayError::Transport {
                    endpoint: endpoint.to_string(),
                    reason: e.to_string(),
                });
            }
            // The error body is only diagnostic; an unreadable one is treated
            // like an unparseable one.
            Err(_) => String::new(),
        };

        debug!(endpoint, status = status.as_u16(), "Backend responded");
        interpret_response(endpoint, status, &body)
    }
}

/// Map a status and raw body to the gateway outcome.
pub(crate) fn interpret_response(
    endpoint: &str,
    status: StatusCode,
    body: &str,
) -> Result<serde_json::Value, GatewayError> {
    if !status.is_success() {
        return Err(match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => GatewayError::Backend {
                status: status.as_u16(),
                detail: error_detail(&value),
            },
            Err(_) => GatewayError::BackendStatus {
                status: status.as_u16(),
                reason: status
                    .canonical_reason()
                    .unwrap_or("Unknown Status")
                    .to_string(),
            },
        });
    }

    serde_json::from_str(body).map_err(|e| GatewayError::MalformedResponse {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })
}

/// Human-readable detail from an error body: the `detail` field when it is
/// set, otherwise the whole body.
fn error_detail(value: &serde_json::Value) -> String {
    match value.get("detail") {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
        Some(detail) if !detail.is_null() => detail.to_string(),
        _ => value.to_string(),
    }
}
