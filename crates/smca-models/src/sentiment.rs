//! Sentiment labels, per-comment results and aggregate distribution.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentiment polarity of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }

    /// Capitalised form used in generated tables and reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
        }
    }

    /// Map a model-specific label (e.g. `POSITIVE`, `LABEL_NEG`, `neutral`)
    /// to a polarity.
    pub fn from_model_label(label: &str) -> Self {
        let upper = label.to_ascii_uppercase();
        if upper.contains("POS") {
            SentimentLabel::Positive
        } else if upper.contains("NEG") {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sentiment of one comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SentimentResult {
    /// Index into the comment list this result belongs to
    pub comment_ref: usize,
    pub label: SentimentLabel,
    /// Model confidence in [0, 1]
    pub score: f32,
}

impl SentimentResult {
    pub fn new(comment_ref: usize, label: SentimentLabel, score: f32) -> Self {
        Self {
            comment_ref,
            label,
            score: score.clamp(0.0, 1.0),
        }
    }

    /// Result used for texts too short to classify.
    pub fn neutral(comment_ref: usize) -> Self {
        Self::new(comment_ref, SentimentLabel::Neutral, 0.5)
    }
}

/// Aggregate sentiment distribution over a set of comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct SentimentSummary {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentSummary {
    /// Count labels over a set of results.
    pub fn from_results(results: &[SentimentResult]) -> Self {
        let mut summary = Self::default();
        for result in results {
            summary.record(result.label);
        }
        summary
    }

    pub fn record(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }

    pub fn count(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Negative => self.negative,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    /// Share of `label` in percent, 0 for an empty summary.
    pub fn percentage(&self, label: SentimentLabel) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.count(label) as f64 / total as f64 * 100.0
    }
}
