//! External translation service boundary
//!
//! The pipeline talks to exactly one logical operation: send a batch of
//! numbered texts plus an instruction, get a text response back. Everything
//! behind that line (transport, authentication, provider format) is opaque
//! to the core.

pub mod client;
pub mod retry;

pub use client::{ClientConfig, OpenAiClient};
pub use retry::{execute_with_retry, RetryPolicy};

use thiserror::Error;

/// A single translation request covering one batch.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    /// Model identifier passed through to the provider.
    pub model: String,
    /// Instruction describing the target language and placeholder rules.
    pub system_instruction: String,
    /// The 1-based numbered list of texts to translate.
    pub user_text: String,
}

/// Per-attempt failure at the service boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    #[error("API returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("empty response from translation API")]
    EmptyResponse,
}

impl ApiError {
    /// Transient failures are retried; deterministic client errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(_) | ApiError::Timeout(_) | ApiError::EmptyResponse => true,
            ApiError::Status { status, .. } => *status == 429 || *status >= 500,
        }
    }
}

/// Result alias for boundary operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// The one operation the pipeline needs from a translation provider.
#[allow(async_fn_in_trait)]
pub trait TranslationBackend {
    /// Translate one batch; returns the raw response text for parsing.
    async fn translate_batch(&self, request: &BatchRequest) -> ApiResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ApiError::Transport("reset".into()).is_retryable());
        assert!(ApiError::Timeout(30).is_retryable());
        assert!(ApiError::EmptyResponse.is_retryable());
        assert!(ApiError::Status {
            status: 503,
            message: "unavailable".into()
        }
        .is_retryable());
        assert!(ApiError::Status {
            status: 429,
            message: "rate limited".into()
        }
        .is_retryable());
        assert!(!ApiError::Status {
            status: 401,
            message: "unauthorized".into()
        }
        .is_retryable());
    }
}
