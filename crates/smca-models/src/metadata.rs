//! Post metadata and extractor output.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Comment;

/// Ordered key/value description of a post.
///
/// Order is preserved so reports list fields the way the extractor produced them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PostMetadata {
    entries: Vec<(String, String)>,
}

impl PostMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, replacing the value if the key already exists.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style `insert`.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What an extractor returns for one URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Extraction {
    pub metadata: PostMetadata,
    /// `None` when the platform does not support comment extraction
    pub comments: Option<Vec<Comment>>,
}

impl Extraction {
    pub fn metadata_only(metadata: PostMetadata) -> Self {
        Self {
            metadata,
            comments: None,
        }
    }

    pub fn with_comments(metadata: PostMetadata, comments: Vec<Comment>) -> Self {
        Self {
            metadata,
            comments: Some(comments),
        }
    }
}
