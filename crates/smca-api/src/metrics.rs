//! Prometheus metrics for the API server.

use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return the handle used by `/metrics`.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "smca_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "smca_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "smca_http_requests_in_flight";

    // Job metrics (completion counters and the in-flight gauge live in the worker)
    pub const JOBS_SUBMITTED_TOTAL: &str = "smca_jobs_submitted_total";

    // Download metrics
    pub const FILES_SERVED_TOTAL: &str = "smca_files_served_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "smca_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record an accepted analysis submission.
pub fn record_job_submitted(platform: &str) {
    let labels = [("platform", platform.to_string())];
    counter!(names::JOBS_SUBMITTED_TOTAL, &labels).increment(1);
}

/// Record a file download by artifact kind.
pub fn record_file_served(kind: &str) {
    let labels = [("kind", kind.to_string())];
    counter!(names::FILES_SERVED_TOTAL, &labels).increment(1);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", sanitize_path(endpoint))];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Collapse request IDs and filenames so label cardinality stays bounded.
fn sanitize_path(path: &str) -> String {
    let mut segments = path.split('/');
    let mut out = Vec::new();

    while let Some(segment) = segments.next() {
        out.push(segment);
        match segment {
            "status" => {
                if segments.next().is_some() {
                    out.push(":request_id");
                }
            }
            "files" => {
                if segments.next().is_some() {
                    out.push(":filename");
                }
            }
            _ => {}
        }
    }

    out.join("/")
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);
    let response = next.run(request).await;
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(
            sanitize_path("/api/status/req_20250101000000_abcdef"),
            "/api/status/:request_id"
        );
        assert_eq!(
            sanitize_path("/api/files/yt_comments_req_1_20250101_000000.csv"),
            "/api/files/:filename"
        );
        assert_eq!(sanitize_path("/api/analyze"), "/api/analyze");
        assert_eq!(sanitize_path("/health"), "/health");
    }
}
