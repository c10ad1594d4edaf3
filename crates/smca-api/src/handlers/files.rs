//! Artifact downloads.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Stream a generated file as an attachment.
pub async fn download_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    let stored = state.publisher.open(&filename).await.map_err(|e| {
        if e.is_not_found() {
            ApiError::not_found("File not found")
        } else {
            ApiError::Storage(e)
        }
    })?;

    debug!(file = %filename, bytes = stored.len, "Serving artifact");
    metrics::record_file_served(artifact_kind(&filename));

    // `open` only accepts [A-Za-z0-9._-] names, so no quoting is needed.
    let disposition = format!("attachment; filename=\"{}\"", filename);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, stored.content_type)
        .header(header::CONTENT_LENGTH, stored.len)
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from_stream(ReaderStream::new(stored.file)))
        .map_err(|e| ApiError::internal(format!("Failed to build response: {}", e)))
}

/// Artifact kind from `<prefix>_<kind>_...`, for metric labels.
fn artifact_kind(filename: &str) -> &'static str {
    match filename.split('_').nth(1) {
        Some("comments") => "comments",
        Some("sentiment") => "sentiment",
        Some("metadata") => "metadata",
        _ => "other",
    }
}
