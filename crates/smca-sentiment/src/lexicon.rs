//! Word-list sentiment scorer.

use std::collections::HashSet;

use async_trait::async_trait;

use smca_models::{SentimentLabel, SentimentResult};

use crate::error::ScoreResult;
use crate::scorer::{is_scorable, SentimentScorer};

const POSITIVE: &[&str] = &[
    "amazing", "awesome", "beautiful", "best", "brilliant", "cool", "enjoy", "enjoyed",
    "excellent", "fantastic", "favorite", "favourite", "fun", "glad", "good", "great",
    "happy", "helpful", "incredible", "interesting", "like", "liked", "love", "loved",
    "lovely", "nice", "perfect", "recommend", "superb", "thank", "thanks", "useful",
    "win", "wonderful", "wow",
];

const NEGATIVE: &[&str] = &[
    "annoying", "awful", "bad", "boring", "broken", "cringe", "disappointed",
    "disappointing", "dislike", "fail", "fake", "hate", "hated", "horrible", "lame",
    "mediocre", "poor", "sad", "scam", "stupid", "terrible", "trash", "ugly", "useless",
    "waste", "worse", "worst", "wrong",
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "dont", "don't", "doesnt", "doesn't", "didnt", "didn't", "isnt",
    "isn't", "wasnt", "wasn't", "cant", "can't", "wont", "won't", "hardly",
];

/// Tokens after a negation whose polarity is flipped.
const NEGATION_WINDOW: usize = 2;

/// Polarity magnitude at which confidence saturates.
const SATURATION: f32 = 4.0;

/// Deterministic scorer counting positive and negative words.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    positive: HashSet<&'static str>,
    negative: HashSet<&'static str>,
    negations: HashSet<&'static str>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self {
            positive: POSITIVE.iter().copied().collect(),
            negative: NEGATIVE.iter().copied().collect(),
            negations: NEGATIONS.iter().copied().collect(),
        }
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Net polarity of a text: positive words count +1, negative -1, and
    /// a preceding negation flips the sign.
    fn polarity(&self, text: &str) -> i32 {
        let lowered = text.to_lowercase();
        let tokens = lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|t| !t.is_empty());

        let mut total = 0;
        let mut negate_for = 0usize;
        for token in tokens {
            if self.negations.contains(token) {
                negate_for = NEGATION_WINDOW;
                continue;
            }

            let value = if self.positive.contains(token) {
                1
            } else if self.negative.contains(token) {
                -1
            } else {
                0
            };
            total += if negate_for > 0 { -value } else { value };
            negate_for = negate_for.saturating_sub(1);
        }
        total
    }

    fn classify(&self, index: usize, text: &str) -> SentimentResult {
        if !is_scorable(text) {
            return SentimentResult::neutral(index);
        }

        let polarity = self.polarity(text);
        let label = match polarity.signum() {
            1 => SentimentLabel::Positive,
            -1 => SentimentLabel::Negative,
            _ => return SentimentResult::neutral(index),
        };
        let strength = (polarity.unsigned_abs() as f32).min(SATURATION) / SATURATION;
        SentimentResult::new(index, label, 0.5 + 0.5 * strength)
    }
}

#[async_trait]
impl SentimentScorer for LexiconScorer {
    async fn score(&self, texts: &[String]) -> ScoreResult<Vec<SentimentResult>> {
        Ok(texts
            .iter()
            .enumerate()
            .map(|(i, text)| self.classify(i, text))
            .collect())
    }
}
