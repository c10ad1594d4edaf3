//! Analysis job definitions.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::Platform;

/// Public path prefix under which generated artifacts are served.
pub const FILES_ROUTE_PREFIX: &str = "/api/files";

/// Unique identifier for an analysis request.
///
/// Format: `req_<YYYYMMDDHHMMSS>_<6 hex chars>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new request ID stamped with the current time.
    pub fn generate() -> Self {
        Self::generate_at(Utc::now())
    }

    /// Generate a request ID for the given timestamp with a random suffix.
    pub fn generate_at(now: DateTime<Utc>) -> Self {
        let random = Uuid::new_v4();
        let bytes = random.as_bytes();
        Self(format!(
            "req_{}_{:02x}{:02x}{:02x}",
            now.format("%Y%m%d%H%M%S"),
            bytes[0],
            bytes[1],
            bytes[2]
        ))
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Job processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job is being processed in the background
    #[default]
    Processing,
    /// Job completed successfully
    Completed,
    /// Job failed with an error
    Failed,
}

impl JobStatus {
    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Status transitions are monotonic: processing -> completed | failed.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Processing, JobStatus::Completed) | (JobStatus::Processing, JobStatus::Failed)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Filenames of the artifacts generated for a completed job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResultBundle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment_file: Option<String>,
    pub metadata_file: String,
}

impl ResultBundle {
    /// Map filenames to their download paths.
    pub fn file_urls(&self) -> FileUrls {
        FileUrls {
            comments_csv: self.comments_file.as_deref().map(file_url),
            sentiment_csv: self.sentiment_file.as_deref().map(file_url),
            metadata_txt: file_url(&self.metadata_file),
        }
    }

    /// All filenames in the bundle.
    pub fn filenames(&self) -> Vec<&str> {
        let mut names = Vec::with_capacity(3);
        if let Some(name) = &self.comments_file {
            names.push(name.as_str());
        }
        if let Some(name) = &self.sentiment_file {
            names.push(name.as_str());
        }
        names.push(self.metadata_file.as_str());
        names
    }
}

/// Download paths for a result bundle, as reported by the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FileUrls {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments_csv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment_csv: Option<String>,
    pub metadata_txt: String,
}

/// Download path for a generated file.
pub fn file_url(filename: &str) -> String {
    format!("{}/{}", FILES_ROUTE_PREFIX, filename)
}

/// Terminal outcome recorded by the job runner.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Completed {
        result: ResultBundle,
        comment_count: usize,
    },
    Failed {
        error: String,
    },
}

impl JobOutcome {
    pub fn status(&self) -> JobStatus {
        match self {
            JobOutcome::Completed { .. } => JobStatus::Completed,
            JobOutcome::Failed { .. } => JobStatus::Failed,
        }
    }
}

/// An analysis job tracked by the job store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Job {
    /// Unique request ID
    pub request_id: JobId,

    /// Current status
    #[serde(default)]
    pub status: JobStatus,

    /// URL submitted for analysis
    pub submitted_url: String,

    /// Platform classified from the URL
    pub platform: Platform,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,

    /// Generated files (completed jobs only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultBundle>,

    /// Number of comments analysed (completed jobs only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<usize>,

    /// Error message (failed jobs only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Job {
    /// Create a new job in the processing state.
    pub fn new(request_id: JobId, submitted_url: impl Into<String>, platform: Platform) -> Self {
        let now = Utc::now();
        Self {
            request_id,
            status: JobStatus::Processing,
            submitted_url: submitted_url.into(),
            platform,
            created_at: now,
            updated_at: now,
            result: None,
            comment_count: None,
            error: None,
        }
    }

    /// Apply a terminal outcome, producing the post-update state.
    ///
    /// Returns `None` if the job already left the processing state.
    pub fn finish(&self, outcome: JobOutcome) -> Option<Self> {
        if !self.status.can_transition_to(outcome.status()) {
            return None;
        }

        let mut next = self.clone();
        next.status = outcome.status();
        next.updated_at = Utc::now();
        match outcome {
            JobOutcome::Completed {
                result,
                comment_count,
            } => {
                next.result = Some(result);
                next.comment_count = Some(comment_count);
            }
            JobOutcome::Failed { error } => {
                next.error = Some(error);
            }
        }
        Some(next)
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
