//! Job store error types.

use thiserror::Error;

use smca_models::JobStatus;

pub type JobsResult<T> = Result<T, JobsError>;

#[derive(Debug, Error)]
pub enum JobsError {
    #[error("Analysis job not found: {0}")]
    NotFound(String),

    #[error("Invalid transition for job {request_id}: {from} -> {to}")]
    InvalidTransition {
        request_id: String,
        from: JobStatus,
        to: JobStatus,
    },
}

impl JobsError {
    pub fn not_found(request_id: impl Into<String>) -> Self {
        Self::NotFound(request_id.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, JobsError::NotFound(_))
    }
}
