//! Sentiment scoring error types.

use thiserror::Error;

pub type ScoreResult<T> = Result<T, SentimentError>;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("Sentiment service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SentimentError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SentimentError::ServiceUnavailable(_) | SentimentError::Network(_)
        )
    }
}
