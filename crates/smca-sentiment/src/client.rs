//! HTTP client for an external sentiment model service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use smca_models::{SentimentLabel, SentimentResult};

use crate::error::{ScoreResult, SentimentError};
use crate::scorer::{merge, scorable, SentimentScorer};
use crate::types::{BatchRequest, BatchResponse};

/// Configuration for sentiment scoring.
#[derive(Debug, Clone)]
pub struct SentimentConfig {
    /// Base URL of the model service; `None` selects the lexicon scorer
    pub service_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Max retries
    pub max_retries: u32,
    /// Texts per request
    pub batch_size: usize,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            service_url: None,
            timeout: Duration::from_secs(60),
            max_retries: 2,
            batch_size: 64,
        }
    }
}

impl SentimentConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            service_url: std::env::var("SENTIMENT_SERVICE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            timeout: std::env::var("SENTIMENT_SERVICE_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            max_retries: std::env::var("SENTIMENT_SERVICE_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_retries),
            batch_size: defaults.batch_size,
        }
    }
}

/// Scores texts by POSTing batches to `{service_url}/sentiment/batch`.
pub struct HttpSentimentScorer {
    http: Client,
    base_url: String,
    config: SentimentConfig,
}

impl HttpSentimentScorer {
    pub fn new(config: SentimentConfig) -> ScoreResult<Self> {
        let base_url = config
            .service_url
            .clone()
            .ok_or_else(|| SentimentError::Config("SENTIMENT_SERVICE_URL not set".to_string()))?;

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(SentimentError::Network)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            config,
        })
    }

    async fn score_batch(&self, texts: &[&str]) -> ScoreResult<Vec<SentimentResult>> {
        let url = format!("{}/sentiment/batch", self.base_url);
        let request = BatchRequest {
            texts: texts.to_vec(),
        };

        debug!(count = texts.len(), "Sending sentiment batch to {}", url);

        let response: BatchResponse = self
            .with_retry(|| async {
                let response = self
                    .http
                    .post(&url)
                    .json(&request)
                    .send()
                    .await
                    .map_err(SentimentError::Network)?;

                let status = response.status();
                if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                    return Err(SentimentError::ServiceUnavailable(format!(
                        "sentiment service returned {}",
                        status
                    )));
                }
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(SentimentError::RequestFailed(format!(
                        "sentiment service returned {}: {}",
                        status, body
                    )));
                }

                let body = response.bytes().await.map_err(SentimentError::Network)?;
                Ok(serde_json::from_slice(&body)?)
            })
            .await?;

        if response.results.len() != texts.len() {
            return Err(SentimentError::InvalidResponse(format!(
                "expected {} results, got {}",
                texts.len(),
                response.results.len()
            )));
        }

        Ok(response
            .results
            .into_iter()
            .enumerate()
            .map(|(i, p)| SentimentResult::new(i, SentimentLabel::from_model_label(&p.label), p.score))
            .collect())
    }

    /// Execute with retry logic.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> ScoreResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = ScoreResult<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        "Sentiment request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(SentimentError::RequestFailed("Unknown error".to_string())))
    }
}

#[async_trait]
impl SentimentScorer for HttpSentimentScorer {
    async fn score(&self, texts: &[String]) -> ScoreResult<Vec<SentimentResult>> {
        let (indices, contents) = scorable(texts);
        let mut scored = Vec::with_capacity(contents.len());

        for batch in contents.chunks(self.config.batch_size.max(1)) {
            scored.extend(self.score_batch(batch).await?);
        }

        Ok(merge(texts.len(), &indices, scored))
    }
}
