//! # Advisor Configuration
//!
//! ## Environment
//! ```text
//! GEMINI_API_KEY            API key (falls back to API_KEY)
//! APPLEMAR_AI_MODEL         model name        (default gemini-3-flash-preview)
//! APPLEMAR_AI_ENDPOINT      API base URL      (default Google Generative Language)
//! APPLEMAR_AI_TIMEOUT_SECS  request timeout   (default 30)
//! ```

use std::env;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// `None` means every call answers with the offline fallback.
    pub api_key: Option<String>,
    pub model: String,
    /// Base URL, without trailing slash.
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        AdvisorConfig {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl AdvisorConfig {
    /// Reads the configuration from the environment.
    pub fn from_env() -> Self {
        let mut config = AdvisorConfig {
            api_key: non_empty_var("GEMINI_API_KEY").or_else(|| non_empty_var("API_KEY")),
            ..AdvisorConfig::default()
        };

        if let Some(model) = non_empty_var("APPLEMAR_AI_MODEL") {
            config.model = model;
        }

        if let Some(endpoint) = non_empty_var("APPLEMAR_AI_ENDPOINT") {
            config = config.with_endpoint(endpoint);
        }

        if let Some(raw) = non_empty_var("APPLEMAR_AI_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => warn!(value = %raw, "Ignoring invalid APPLEMAR_AI_TIMEOUT_SECS"),
            }
        }

        config
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `{endpoint}/v1beta/models/{model}:generateContent`
    pub fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AdvisorConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, "gemini-3-flash-preview");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_generate_url_trims_trailing_slash() {
        let config = AdvisorConfig::default().with_endpoint("http://localhost:8080/");
        assert_eq!(
            config.generate_url(),
            "http://localhost:8080/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }
}
