//! Shared data models for the comment analyzer.
//!
//! This crate provides Serde-serializable types for:
//! - Analysis jobs, their status and result bundles
//! - Source platforms and harvested comments
//! - Sentiment labels, per-comment results and aggregate summaries
//! - URL classification helpers

pub mod comment;
pub mod job;
pub mod metadata;
pub mod platform;
pub mod sentiment;
pub mod utils;

// Re-export common types
pub use comment::Comment;
pub use job::{file_url, FileUrls, Job, JobId, JobOutcome, JobStatus, ResultBundle, FILES_ROUTE_PREFIX};
pub use metadata::{Extraction, PostMetadata};
pub use platform::Platform;
pub use sentiment::{SentimentLabel, SentimentResult, SentimentSummary};
pub use utils::{
    classify_url, extract_instagram_shortcode, extract_youtube_id, UrlError, UrlResult,
    MAX_URL_LENGTH,
};
