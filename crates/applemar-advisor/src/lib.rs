//! # applemar-advisor: AI Financial Advisory
//!
//! Asks a generative-text model for CFO-style advice built from the
//! current figures. This is the only network call in the system.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Advisor::insights                               │
//! │                                                                         │
//! │  AdvisorSnapshot ──► build_prompt ──► GenerativeClient::generate       │
//! │                                              │                          │
//! │                  ┌───────────────────────────┼──────────────────┐       │
//! │                  ▼                           ▼                  ▼       │
//! │            text (non-empty)            text empty         any error    │
//! │                  │                           │                  │       │
//! │                  ▼                           ▼                  ▼       │
//! │            returned as-is            FALLBACK_EMPTY    WARN log +       │
//! │                                                        FALLBACK_OFFLINE │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `insights` never fails; the caller always has something to show.

pub mod client;
pub mod config;
pub mod error;
pub mod prompt;

pub use client::GenerativeClient;
pub use config::AdvisorConfig;
pub use error::{AdvisorError, AdvisorResult};
pub use prompt::build_prompt;

use applemar_core::report::AdvisorSnapshot;
use tracing::{info, warn};

/// Shown when the call fails for any reason.
pub const FALLBACK_OFFLINE: &str =
    "A Applemar AI requer conexão online para análise financeira profunda.";

/// Shown when the model answers with no text.
pub const FALLBACK_EMPTY: &str = "Ocorreu um erro ao processar a inteligência financeira.";

/// Advisory entry point.
#[derive(Debug, Clone)]
pub struct Advisor {
    config: AdvisorConfig,
}

impl Advisor {
    pub fn new(config: AdvisorConfig) -> Self {
        Advisor { config }
    }

    /// Advisor configured from the environment.
    pub fn from_env() -> Self {
        Advisor::new(AdvisorConfig::from_env())
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Whether an API key is configured.
    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Advice text for `snapshot`, or one of the fallback messages.
    pub async fn insights(&self, snapshot: &AdvisorSnapshot) -> String {
        match self.try_insights(snapshot).await {
            Ok(text) if text.trim().is_empty() => {
                warn!("Advisory service returned no text");
                FALLBACK_EMPTY.to_string()
            }
            Ok(text) => {
                info!(chars = text.len(), "Advisory text received");
                text
            }
            Err(e) => {
                warn!(error = %e, "Advisory request failed; using offline message");
                FALLBACK_OFFLINE.to_string()
            }
        }
    }

    /// Same as [`Advisor::insights`] but surfaces the failure.
    pub async fn try_insights(&self, snapshot: &AdvisorSnapshot) -> AdvisorResult<String> {
        let client = GenerativeClient::new(self.config.clone())?;
        client.generate(&build_prompt(snapshot)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn snapshot() -> AdvisorSnapshot {
        AdvisorSnapshot {
            company: "Applemar Company Lda".to_string(),
            income_cents: 285_000,
            expense_cents: 100_000,
            margin_cents: 185_000,
            product_count: 3,
            critical_stock_count: 1,
            critical_threshold: 5,
        }
    }

    fn request_complete(raw: &[u8]) -> bool {
        let Some(header_end) = raw.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&raw[..header_end]);
        let content_length = headers
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        raw.len() >= header_end + 4 + content_length
    }

    /// Answers a single request with `status` and `body`; yields the raw request.
    async fn answer_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            while !request_complete(&request) {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).into_owned()
        });

        (endpoint, handle)
    }

    fn advisor_at(endpoint: &str) -> Advisor {
        Advisor::new(
            AdvisorConfig::default()
                .with_api_key("test-key")
                .with_endpoint(endpoint)
                .with_timeout(Duration::from_secs(5)),
        )
    }

    #[tokio::test]
    async fn test_model_text_is_returned_verbatim() {
        let (endpoint, server) = answer_once(
            "200 OK",
            r#"{"candidates":[{"content":{"parts":[{"text":"1. Reforçar o stock de Cuca."}]}}]}"#,
        )
        .await;

        let advice = advisor_at(&endpoint).insights(&snapshot()).await;
        assert_eq!(advice, "1. Reforçar o stock de Cuca.");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /v1beta/models/"));
        assert!(request.contains(":generateContent"));
        assert!(request.to_ascii_lowercase().contains("x-goog-api-key: test-key"));
        assert!(!request.contains("key=test-key"));
    }

    #[tokio::test]
    async fn test_empty_answer_uses_empty_fallback() {
        let (endpoint, server) = answer_once("200 OK", r#"{"candidates":[]}"#).await;

        let advice = advisor_at(&endpoint).insights(&snapshot()).await;
        assert_eq!(advice, FALLBACK_EMPTY);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_server_error_uses_offline_fallback() {
        let (endpoint, server) =
            answer_once("500 Internal Server Error", r#"{"error":{"code":500}}"#).await;

        let advice = advisor_at(&endpoint).insights(&snapshot()).await;
        assert_eq!(advice, FALLBACK_OFFLINE);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_server_error_surfaces_status() {
        let (endpoint, server) = answer_once("503 Service Unavailable", "{}").await;

        let err = advisor_at(&endpoint)
            .try_insights(&snapshot())
            .await
            .unwrap_err();
        assert!(matches!(err, AdvisorError::Status { status: 503, .. }));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_key_falls_back() {
        let advisor = Advisor::new(AdvisorConfig::default());
        assert!(!advisor.is_configured());

        assert!(matches!(
            advisor.try_insights(&snapshot()).await,
            Err(AdvisorError::MissingApiKey)
        ));
        assert_eq!(advisor.insights(&snapshot()).await, FALLBACK_OFFLINE);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_falls_back() {
        let config = AdvisorConfig::default()
            .with_api_key("test-key")
            .with_endpoint("http://127.0.0.1:1")
            .with_timeout(Duration::from_secs(2));
        let advisor = Advisor::new(config);

        assert_eq!(advisor.insights(&snapshot()).await, FALLBACK_OFFLINE);
    }
}
