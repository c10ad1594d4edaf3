//! Harvested comments.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Platform;

/// A single comment (or reply) harvested from a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Comment {
    /// Display name of the author
    pub author: String,

    /// Comment text, normalised to a single line
    pub text: String,

    /// Number of likes on the comment
    #[serde(default)]
    pub like_count: u64,

    /// Platform-specific comment identifier
    #[serde(default)]
    pub comment_id: String,

    /// Platform the comment was harvested from
    pub platform: Platform,

    /// Whether this comment is a reply to another comment
    #[serde(default)]
    pub is_reply: bool,

    /// Parent comment ID (replies only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Publication timestamp as reported by the platform
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
}

impl Comment {
    /// Create a top-level comment.
    pub fn new(
        platform: Platform,
        author: impl Into<String>,
        text: impl AsRef<str>,
        like_count: u64,
    ) -> Self {
        Self {
            author: author.into(),
            text: single_line(text.as_ref()),
            like_count,
            comment_id: String::new(),
            platform,
            is_reply: false,
            parent_id: None,
            published_at: None,
        }
    }

    pub fn with_id(mut self, comment_id: impl Into<String>) -> Self {
        self.comment_id = comment_id.into();
        self
    }

    /// Mark this comment as a reply to `parent_id`.
    pub fn reply_to(mut self, parent_id: impl Into<String>) -> Self {
        self.is_reply = true;
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn published_at(mut self, published_at: impl Into<String>) -> Self {
        self.published_at = Some(published_at.into());
        self
    }

    /// Author name, falling back to "Anonymous" when the platform omitted it.
    pub fn author_or_anonymous(&self) -> &str {
        if self.author.trim().is_empty() {
            "Anonymous"
        } else {
            &self.author
        }
    }
}

/// Join multi-line text into a single line.
fn single_line(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_text_is_single_line() {
        let comment = Comment::new(Platform::YouTube, "alice", "first line\nsecond line", 3);
        assert_eq!(comment.text, "first line second line");
        assert_eq!(comment.like_count, 3);
        assert!(!comment.is_reply);
    }

    #[test]
    fn test_reply_builder() {
        let reply = Comment::new(Platform::YouTube, "bob", "agreed", 0)
            .with_id("c2")
            .reply_to("c1");
        assert!(reply.is_reply);
        assert_eq!(reply.parent_id.as_deref(), Some("c1"));
        assert_eq!(reply.comment_id, "c2");
    }

    #[test]
    fn test_anonymous_author() {
        let comment = Comment::new(Platform::YouTube, "  ", "hi there", 0);
        assert_eq!(comment.author_or_anonymous(), "Anonymous");
    }
}
