//! Artifact naming.
//!
//! Filenames are the only addressing mechanism for generated files, so the
//! format here is the contract consumed by the download endpoint.

use chrono::{DateTime, Utc};

use smca_models::{JobId, Platform};

/// Maximum accepted filename length.
const MAX_FILENAME_LENGTH: usize = 256;

/// Kind of generated artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Comments,
    Sentiment,
    Metadata,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Comments => "comments",
            ArtifactKind::Sentiment => "sentiment",
            ArtifactKind::Metadata => "metadata",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Comments | ArtifactKind::Sentiment => "csv",
            ArtifactKind::Metadata => "txt",
        }
    }
}

/// Build `<platform_prefix>_<kind>_<request_id>_<YYYYMMDD_HHMMSS>.<ext>`.
pub fn artifact_filename(
    platform: Platform,
    kind: ArtifactKind,
    request_id: &JobId,
    generated_at: DateTime<Utc>,
) -> String {
    format!(
        "{}_{}_{}_{}.{}",
        platform.file_prefix(),
        kind.as_str(),
        request_id,
        generated_at.format("%Y%m%d_%H%M%S"),
        kind.extension()
    )
}

/// Content type served for a published filename.
pub fn content_type(filename: &str) -> &'static str {
    if filename.ends_with(".csv") {
        "text/csv; charset=utf-8"
    } else if filename.ends_with(".txt") {
        "text/plain; charset=utf-8"
    } else {
        "application/octet-stream"
    }
}

/// Validate a filename requested for download.
///
/// Valid: alphanumeric, hyphens, underscores, dots; a `.csv` or `.txt`
/// extension; no path traversal.
pub fn is_valid_filename(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_FILENAME_LENGTH {
        return false;
    }
    if name.contains("..") || name.contains('/') || name.contains('\\') || name.starts_with('.') {
        return false;
    }
    if !(name.ends_with(".csv") || name.ends_with(".txt")) {
        return false;
    }
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}
