//! Extractor error types.

use thiserror::Error;

use smca_models::UrlError;

pub type SourceResult<T> = Result<T, SourceError>;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Unsupported URL: {0}")]
    UnsupportedUrl(#[from] UrlError),

    #[error("Invalid {platform} URL format")]
    InvalidUrl { platform: &'static str },

    #[error("Platform API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Post not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SourceError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            SourceError::Network(_) => true,
            SourceError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
