//! Worker error types.
//!
//! The display string of a [`WorkerError`] is what a failed job reports.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Extraction failed: {0}")]
    Extraction(#[from] smca_sources::SourceError),

    #[error("Sentiment scoring failed: {0}")]
    Scoring(#[from] smca_sentiment::SentimentError),

    #[error("Publishing results failed: {0}")]
    Publish(#[from] smca_storage::StorageError),

    #[error("job timed out after {0}s")]
    Timeout(u64),

    #[error("job panicked: {0}")]
    Panicked(String),

    #[error("Job store error: {0}")]
    Store(#[from] smca_jobs::JobsError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message() {
        assert_eq!(WorkerError::Timeout(600).to_string(), "job timed out after 600s");
    }

    #[test]
    fn test_wraps_collaborator_errors() {
        let err: WorkerError = smca_sources::SourceError::NotFound("YouTube video x".into()).into();
        assert_eq!(err.to_string(), "Extraction failed: Post not found: YouTube video x");
    }
}
