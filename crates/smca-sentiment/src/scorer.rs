//! Scorer trait and shared helpers.

use async_trait::async_trait;

use smca_models::{SentimentResult, SentimentSummary};

use crate::error::ScoreResult;

/// Texts shorter than this (after trimming) are neutral without scoring.
pub const MIN_TEXT_LEN: usize = 3;

/// Classifies comment texts.
#[async_trait]
pub trait SentimentScorer: Send + Sync {
    /// Score `texts`, returning one result per text with `comment_ref` set
    /// to the text's index.
    async fn score(&self, texts: &[String]) -> ScoreResult<Vec<SentimentResult>>;
}

/// Aggregate distribution of a result set.
pub fn summarize(results: &[SentimentResult]) -> SentimentSummary {
    SentimentSummary::from_results(results)
}

pub(crate) fn is_scorable(text: &str) -> bool {
    text.trim().chars().count() >= MIN_TEXT_LEN
}

/// Indices and trimmed contents of the texts that need a model call.
pub(crate) fn scorable(texts: &[String]) -> (Vec<usize>, Vec<&str>) {
    texts
        .iter()
        .enumerate()
        .filter(|(_, text)| is_scorable(text))
        .map(|(i, text)| (i, text.trim()))
        .unzip()
}

/// Spread scored results back over the full input, defaulting the rest to neutral.
pub(crate) fn merge(
    len: usize,
    indices: &[usize],
    scored: Vec<SentimentResult>,
) -> Vec<SentimentResult> {
    let mut results: Vec<SentimentResult> = (0..len).map(SentimentResult::neutral).collect();
    for (&index, result) in indices.iter().zip(scored) {
        results[index] = SentimentResult::new(index, result.label, result.score);
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use smca_models::SentimentLabel;

    #[test]
    fn test_short_texts_are_skipped() {
        let texts = vec!["ok".to_string(), "  great  ".to_string(), " ".to_string()];
        let (indices, contents) = scorable(&texts);
        assert_eq!(indices, vec![1]);
        assert_eq!(contents, vec!["great"]);
    }

    #[test]
    fn test_merge_keeps_order_and_refs() {
        let scored = vec![SentimentResult::new(0, SentimentLabel::Negative, 0.9)];
        let merged = merge(3, &[2], scored);

        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0], SentimentResult::neutral(0));
        assert_eq!(merged[2].comment_ref, 2);
        assert_eq!(merged[2].label, SentimentLabel::Negative);
    }

    #[test]
    fn test_summarize_totals() {
        let mut results = Vec::new();
        for i in 0..135 {
            let label = match i {
                0..=87 => SentimentLabel::Positive,
                88..=131 => SentimentLabel::Neutral,
                _ => SentimentLabel::Negative,
            };
            results.push(SentimentResult::new(i, label, 0.8));
        }

        let summary = summarize(&results);
        assert_eq!((summary.positive, summary.neutral, summary.negative), (88, 44, 3));
        assert_eq!(summary.total(), 135);
    }
}
