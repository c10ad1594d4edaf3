//! Structured job logging.
//!
//! Each job owns a `job` span carrying `request_id` and `platform`; events
//! are emitted under it and only add what is specific to the event.

use tracing::{error, info, info_span, warn, Span};

use smca_models::{JobId, Platform};

/// Pipeline stage reported in progress events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Score,
    Publish,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Extract => "extract",
            Stage::Score => "score",
            Stage::Publish => "publish",
        }
    }
}

#[derive(Debug, Clone)]
pub struct JobLogger {
    span: Span,
}

impl JobLogger {
    pub fn new(request_id: &JobId, platform: Platform) -> Self {
        Self {
            span: info_span!("job", request_id = %request_id, platform = platform.as_str()),
        }
    }

    /// The job span; the runner instruments the job task with it.
    pub fn span(&self) -> Span {
        self.span.clone()
    }

    pub fn started(&self, url: &str) {
        info!(parent: &self.span, url = %url, "Analysis started");
    }

    pub fn stage(&self, stage: Stage, detail: &str) {
        info!(parent: &self.span, stage = stage.as_str(), "{}", detail);
    }

    pub fn warning(&self, message: &str) {
        warn!(parent: &self.span, "{}", message);
    }

    pub fn completed(&self, files: usize, comments: usize) {
        info!(parent: &self.span, files, comments, "Analysis completed");
    }

    pub fn failed(&self, reason: &str) {
        error!(parent: &self.span, reason = %reason, "Analysis failed");
    }
}
