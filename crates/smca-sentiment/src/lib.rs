//! Sentiment scoring for harvested comments.
//!
//! Two scorers implement [`SentimentScorer`]:
//! - [`HttpSentimentScorer`] calls an external model service in batches
//! - [`LexiconScorer`] is a deterministic word-list fallback
//!
//! Both return exactly one result per input text, in input order.

pub mod client;
pub mod error;
pub mod lexicon;
pub mod scorer;
pub mod types;

use std::sync::Arc;

pub use client::{HttpSentimentScorer, SentimentConfig};
pub use error::{ScoreResult, SentimentError};
pub use lexicon::LexiconScorer;
pub use scorer::{summarize, SentimentScorer, MIN_TEXT_LEN};

/// Pick the HTTP scorer when a service URL is configured, the lexicon otherwise.
pub fn scorer_from_config(config: SentimentConfig) -> ScoreResult<Arc<dyn SentimentScorer>> {
    if config.service_url.is_some() {
        Ok(Arc::new(HttpSentimentScorer::new(config)?))
    } else {
        tracing::info!("SENTIMENT_SERVICE_URL not set, using lexicon scorer");
        Ok(Arc::new(LexiconScorer::new()))
    }
}
