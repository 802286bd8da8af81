//! Configuration types.

use std::time::Duration;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Greeting shown as the first assistant message of every conversation.
pub const DEFAULT_GREETING: &str = "Hello! I'm your AI assistant. How can I help you with the AI-native systems content today?";

/// Endpoint paths, relative to the backend base URL.
pub const CHAT_PATH: &str = "/v1/rag/query";
pub const GLOSSARY_PATH: &str = "/v1/skills/glossary";
pub const SUMMARIZE_PATH: &str = "/v1/skills/summarize";
pub const TUTOR_PATH: &str = "/v1/skills/tutor";

/// Assistant configuration.
#[derive(Debug, Clone)]
pub struct AssistConfig {
    /// Backend base URL, without trailing slash.
    pub base_url: String,
    /// Optional transport-level timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
    /// First assistant message in a new conversation.
    pub greeting: String,
    /// Route path of the current page, used to derive skill context.
    pub page_path: Option<String>,
    /// Translation service path for the terminal front end.
    pub translate_path: Option<String>,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
            greeting: DEFAULT_GREETING.to_string(),
            page_path: None,
            translate_path: None,
        }
    }
}

impl AssistConfig {
    /// Load configuration from `DOCS_ASSIST_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Unparseable or empty values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = lookup("DOCS_ASSIST_BASE_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.base_url);

        let request_timeout = lookup("DOCS_ASSIST_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let greeting = lookup("DOCS_ASSIST_GREETING")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.greeting);

        let page_path = lookup("DOCS_ASSIST_PAGE").filter(|s| !s.trim().is_empty());

        let translate_path = lookup("DOCS_ASSIST_TRANSLATE_PATH").filter(|s| !s.trim().is_empty());

        Self {
            base_url,
            request_timeout,
            greeting,
            page_path,
            translate_path,
        }
    }

    /// Full URL for an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn chat_endpoint(&self) -> String {
        self.endpoint(CHAT_PATH)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = AssistConfig::from_lookup(|_| None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.greeting, DEFAULT_GREETING);
        assert!(config.page_path.is_none());
        assert!(config.translate_path.is_none());
    }

    #[test]
    fn reads_overrides_and_strips_trailing_slash() {
        let config = AssistConfig::from_lookup(lookup_from(&[
            ("DOCS_ASSIST_BASE_URL", "https://assist.example.com/"),
            ("DOCS_ASSIST_TIMEOUT_SECS", "30"),
            ("DOCS_ASSIST_PAGE", "/docs/kinematics/intro"),
        ]));
        assert_eq!(config.base_url, "https://assist.example.com");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.page_path.as_deref(), Some("/docs/kinematics/intro"));
        assert_eq!(
            config.chat_endpoint(),
            "https://assist.example.com/v1/rag/query"
        );
    }

    #[test]
    fn bad_timeout_falls_back_to_none() {
        let config =
            AssistConfig::from_lookup(lookup_from(&[("DOCS_ASSIST_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.request_timeout, None);

        let config = AssistConfig::from_lookup(lookup_from(&[("DOCS_ASSIST_TIMEOUT_SECS", "0")]));
        assert_eq!(config.request_timeout, None);
    }
}
