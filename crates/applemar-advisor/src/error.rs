//! # Advisor Error Types
//!
//! Failures of the advisory call. None of them reach the operator:
//! [`crate::Advisor::insights`] logs them and answers with fallback text.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdvisorError {
    /// No API key configured.
    ///
    /// ## When This Occurs
    /// - Neither `GEMINI_API_KEY` nor `API_KEY` is set
    #[error("No API key configured for the advisory service")]
    MissingApiKey,

    /// The request never got a response.
    ///
    /// ## When This Occurs
    /// - Offline, DNS failure, connection refused
    /// - Request timeout elapsed
    #[error("Advisory request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("Advisory service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON.
    #[error("Failed to parse advisory response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for AdvisorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AdvisorError::InvalidResponse(err.to_string())
        } else {
            AdvisorError::Transport(err.to_string())
        }
    }
}

/// Result type for advisory operations.
pub type AdvisorResult<T> = Result<T, AdvisorError>;
