//! Utility functions for URL classification and post ID extraction.
//!
//! Shared by the API (to classify submissions) and the extractors
//! (to find the video ID or shortcode a URL points at).

use thiserror::Error;
use url::Url;

use crate::Platform;

/// Maximum accepted URL length.
pub const MAX_URL_LENGTH: usize = 2048;

/// Errors that can occur while classifying a URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("URL cannot be empty")]
    Empty,

    #[error("URL exceeds maximum length of {MAX_URL_LENGTH} characters")]
    TooLong,

    #[error("Invalid URL format: {0}")]
    Malformed(String),

    #[error("Invalid protocol '{0}'. Only HTTP and HTTPS are allowed.")]
    UnsupportedScheme(String),

    #[error("Unsupported URL. Only Instagram and YouTube are supported.")]
    UnsupportedPlatform,

    #[error("Video ID has invalid format")]
    InvalidVideoId,

    #[error("Post ID not found in URL")]
    PostIdNotFound,
}

/// Result type for URL helpers.
pub type UrlResult<T> = Result<T, UrlError>;

/// Classify a submitted URL into a supported platform.
///
/// Only `http`/`https` URLs on Instagram or YouTube hosts are accepted.
pub fn classify_url(url: &str) -> UrlResult<Platform> {
    let url = url.trim();
    if url.is_empty() {
        return Err(UrlError::Empty);
    }
    if url.len() > MAX_URL_LENGTH {
        return Err(UrlError::TooLong);
    }

    let parsed = Url::parse(url).map_err(|e| UrlError::Malformed(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| UrlError::Malformed("URL must have a valid domain".to_string()))?
        .to_ascii_lowercase();

    if host_matches(&host, "instagram.com") {
        Ok(Platform::Instagram)
    } else if host_matches(&host, "youtube.com") || host == "youtu.be" {
        Ok(Platform::YouTube)
    } else {
        Err(UrlError::UnsupportedPlatform)
    }
}

/// `host` is `domain` or one of its subdomains.
fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{}", domain))
}

/// Extract YouTube video ID from URL.
///
/// Supports:
/// - https://youtube.com/watch?v=VIDEO_ID
/// - https://youtu.be/VIDEO_ID
/// - https://youtube.com/embed/VIDEO_ID
/// - https://youtube.com/v/VIDEO_ID
/// - https://youtube.com/shorts/VIDEO_ID
///
/// Returns the 11-character video ID.
pub fn extract_youtube_id(url: &str) -> UrlResult<String> {
    let url = url.trim();

    if classify_url(url)? != Platform::YouTube {
        return Err(UrlError::UnsupportedPlatform);
    }

    let candidates = [
        extract_after(url, "?v="),
        extract_after(url, "&v="),
        extract_after(url, "youtu.be/"),
        extract_after(url, "/embed/"),
        extract_after(url, "/v/"),
        extract_after(url, "/shorts/"),
    ];

    match candidates.into_iter().flatten().next() {
        Some(id) => validate_youtube_id(id),
        None => Err(UrlError::PostIdNotFound),
    }
}

/// Extract an Instagram post shortcode from `/p/`, `/reel/` or `/tv/` URLs.
pub fn extract_instagram_shortcode(url: &str) -> UrlResult<String> {
    let url = url.trim();

    if classify_url(url)? != Platform::Instagram {
        return Err(UrlError::UnsupportedPlatform);
    }

    let shortcode = ["/p/", "/reel/", "/reels/", "/tv/"]
        .iter()
        .find_map(|marker| extract_after(url, marker))
        .ok_or(UrlError::PostIdNotFound)?;

    if shortcode
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        Ok(shortcode)
    } else {
        Err(UrlError::PostIdNotFound)
    }
}

/// Extract the segment following `marker`, up to the next delimiter.
fn extract_after(url: &str, marker: &str) -> Option<String> {
    let start = url.find(marker)? + marker.len();
    let remaining = &url[start..];
    let end = remaining
        .find(['&', '#', '?', '/'])
        .unwrap_or(remaining.len());
    let segment = remaining[..end].trim();
    if segment.is_empty() {
        None
    } else {
        Some(segment.to_string())
    }
}

/// Validate YouTube video ID format and return it.
fn validate_youtube_id(id: String) -> UrlResult<String> {
    if id.len() != 11 {
        return Err(UrlError::InvalidVideoId);
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(UrlError::InvalidVideoId);
    }
    Ok(id)
}
