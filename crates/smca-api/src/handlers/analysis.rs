//! Analysis submission and status polling.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use smca_models::{classify_url, FileUrls, Job, JobId, JobStatus, Platform};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Detail returned for unknown request IDs.
pub const JOB_NOT_FOUND: &str = "Analysis job not found";

/// Request to analyse a post.
#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeRequest {
    /// Instagram or YouTube post URL
    #[validate(length(min = 1, max = 2048))]
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub request_id: JobId,
    pub status: JobStatus,
}

/// Start a background analysis job.
///
/// The URL is classified before anything is stored, so rejected
/// submissions never create a job.
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let url = request.url.trim();
    let platform = classify_url(url).map_err(|e| {
        warn!(url = %url, "Rejected analysis request: {}", e);
        ApiError::bad_request(e.to_string())
    })?;

    let request_id = state.store.create(url, platform).await;
    let _ = state
        .runner
        .submit(request_id.clone(), url.to_string(), platform);

    metrics::record_job_submitted(platform.as_str());
    info!(request_id = %request_id, platform = %platform, "Analysis started");

    Ok(Json(AnalyzeResponse {
        request_id,
        status: JobStatus::Processing,
    }))
}

/// Job state as reported to pollers.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub request_id: JobId,
    pub status: JobStatus,
    pub platform: Platform,
    pub submitted_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_urls: Option<FileUrls>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Job> for StatusResponse {
    fn from(job: Job) -> Self {
        Self {
            file_urls: job.result.as_ref().map(|r| r.file_urls()),
            request_id: job.request_id,
            status: job.status,
            platform: job.platform,
            submitted_url: job.submitted_url,
            created_at: job.created_at,
            comment_count: job.comment_count,
            error: job.error,
        }
    }
}

/// Poll a job's status.
pub async fn get_status(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> ApiResult<Json<StatusResponse>> {
    let job = state
        .store
        .get(&JobId::from(request_id))
        .await
        .map_err(|e| {
            if e.is_not_found() {
                ApiError::not_found(JOB_NOT_FOUND)
            } else {
                ApiError::internal(e.to_string())
            }
        })?;

    Ok(Json(job.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use smca_models::{JobOutcome, ResultBundle};

    #[test]
    fn test_request_validation() {
        let empty = AnalyzeRequest { url: String::new() };
        assert!(empty.validate().is_err());

        let long = AnalyzeRequest {
            url: format!("https://youtube.com/watch?v={}", "a".repeat(2048)),
        };
        assert!(long.validate().is_err());

        let ok = AnalyzeRequest {
            url: "https://youtu.be/_Xczf06n6x0".to_string(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_status_response_shape() {
        let job = Job::new(
            JobId::from("req_20250101000000_abcdef"),
            "https://www.instagram.com/p/C1a2B3c4D5e/",
            Platform::Instagram,
        );
        let processing = serde_json::to_value(StatusResponse::from(job.clone())).unwrap();
        assert_eq!(processing["status"], "processing");
        assert!(processing.get("file_urls").is_none());
        assert!(processing.get("error").is_none());

        let done = job
            .finish(JobOutcome::Completed {
                result: ResultBundle {
                    comments_file: None,
                    sentiment_file: None,
                    metadata_file: "insta_metadata_req_20250101000000_abcdef_20250101_000001.txt"
                        .to_string(),
                },
                comment_count: 0,
            })
            .unwrap();
        let completed = serde_json::to_value(StatusResponse::from(done)).unwrap();
        assert_eq!(completed["status"], "completed");
        assert_eq!(completed["platform"], "instagram");
        assert_eq!(
            completed["file_urls"]["metadata_txt"],
            "/api/files/insta_metadata_req_20250101000000_abcdef_20250101_000001.txt"
        );
        assert!(completed["file_urls"].get("comments_csv").is_none());
    }
}
