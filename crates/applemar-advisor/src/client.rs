//! # Generative-Text Client
//!
//! Minimal `generateContent` REST call.
//!
//! ## Wire Shape
//! ```text
//! POST {endpoint}/v1beta/models/{model}:generateContent
//! x-goog-api-key: <key>
//!
//! { "contents": [ { "parts": [ { "text": "<prompt>" } ] } ] }
//!
//! 200 OK
//! { "candidates": [ { "content": { "parts": [ { "text": "..." }, ... ] } } ] }
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AdvisorConfig;
use crate::error::{AdvisorError, AdvisorResult};

// =============================================================================
// Request / Response Bodies
// =============================================================================

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate; empty if there is none.
    pub(crate) fn text(&self) -> String {
        self.candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

// =============================================================================
// Client
// =============================================================================

#[derive(Debug, Clone)]
pub struct GenerativeClient {
    http: reqwest::Client,
    config: AdvisorConfig,
}

impl GenerativeClient {
    pub fn new(config: AdvisorConfig) -> AdvisorResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AdvisorError::Transport(e.to_string()))?;

        Ok(GenerativeClient { http, config })
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Sends `prompt` and returns the generated text (possibly empty).
    pub async fn generate(&self, prompt: &str) -> AdvisorResult<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AdvisorError::MissingApiKey)?;

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        debug!(model = %self.config.model, prompt_chars = prompt.len(), "Requesting advisory text");

        let response = self
            .http
            .post(self.config.generate_url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AdvisorError::InvalidResponse(e.to_string()))?;

        Ok(parsed.text())
    }
}
