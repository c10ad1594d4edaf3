//! Source platforms.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Social media platform a submitted URL belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Instagram,
    #[serde(rename = "youtube")]
    YouTube,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::YouTube => "youtube",
        }
    }

    /// Human-readable name used in generated reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::YouTube => "YouTube",
        }
    }

    /// Short prefix used in generated artifact filenames.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            Platform::Instagram => "insta",
            Platform::YouTube => "yt",
        }
    }

    /// Whether comment extraction is available for this platform.
    pub fn supports_comments(&self) -> bool {
        matches!(self, Platform::YouTube)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
