//! Job runner.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::FutureExt;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{error, info, warn, Instrument};

use smca_jobs::JobStore;
use smca_models::{Extraction, JobId, JobOutcome, Platform, ResultBundle};
use smca_sentiment::{SentimentError, SentimentScorer};
use smca_sources::{Extractor, SourceError};
use smca_storage::{Artifacts, FilePublisher};

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::logging::{JobLogger, Stage};
use crate::retry::retry_async;

/// Counter of jobs that reached `completed`.
pub const JOBS_COMPLETED: &str = "smca_jobs_completed_total";
/// Counter of jobs that reached `failed`.
pub const JOBS_FAILED: &str = "smca_jobs_failed_total";
/// Histogram of pipeline durations.
pub const JOB_DURATION: &str = "smca_job_duration_seconds";
/// Gauge of jobs spawned and not yet recorded.
pub const JOBS_IN_FLIGHT: &str = "smca_jobs_in_flight";

/// Runs analysis pipelines in the background.
///
/// Cloning is cheap; clones share the same concurrency limit and task set.
#[derive(Clone)]
pub struct JobRunner {
    inner: Arc<RunnerInner>,
}

struct RunnerInner {
    config: WorkerConfig,
    store: Arc<JobStore>,
    extractor: Arc<dyn Extractor>,
    scorer: Arc<dyn SentimentScorer>,
    publisher: Arc<FilePublisher>,
    job_semaphore: Semaphore,
    tasks: TaskTracker,
}

impl JobRunner {
    pub fn new(
        config: WorkerConfig,
        store: Arc<JobStore>,
        extractor: Arc<dyn Extractor>,
        scorer: Arc<dyn SentimentScorer>,
        publisher: Arc<FilePublisher>,
    ) -> Self {
        info!(
            "Job runner ready with {} max concurrent jobs",
            config.max_concurrent_jobs
        );
        let job_semaphore = Semaphore::new(config.max_concurrent_jobs.max(1));

        Self {
            inner: Arc::new(RunnerInner {
                config,
                store,
                extractor,
                scorer,
                publisher,
                job_semaphore,
                tasks: TaskTracker::new(),
            }),
        }
    }

    /// Start the pipeline for a job created in the store.
    ///
    /// Returns immediately; the job waits for a free slot in the background.
    pub fn submit(&self, job_id: JobId, url: String, platform: Platform) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let logger = JobLogger::new(&job_id, platform);
        let span = logger.span();
        metrics::gauge!(JOBS_IN_FLIGHT).increment(1.0);

        self.inner
            .tasks
            .spawn(async move { inner.execute(job_id, url, platform, logger).await }.instrument(span))
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.inner.config
    }

    /// Jobs spawned and not yet finished.
    pub fn in_flight(&self) -> usize {
        self.inner.tasks.len()
    }

    /// Wait for in-flight jobs, giving up after `timeout`.
    ///
    /// Returns `true` if every job finished in time.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        self.inner.tasks.close();
        info!("Waiting for {} in-flight jobs to complete...", self.in_flight());

        match tokio::time::timeout(timeout, self.inner.tasks.wait()).await {
            Ok(()) => {
                info!("Job runner stopped");
                true
            }
            Err(_) => {
                warn!(
                    "Shutdown timed out with {} jobs still running",
                    self.in_flight()
                );
                false
            }
        }
    }
}

impl RunnerInner {
    /// Run one job to its terminal state and record it exactly once.
    ///
    /// Errors, timeouts and panics inside the pipeline all end in `failed`.
    async fn execute(&self, job_id: JobId, url: String, platform: Platform, logger: JobLogger) {
        let _permit = match self.job_semaphore.acquire().await {
            Ok(permit) => Some(permit),
            Err(_) => {
                logger.warning("job semaphore closed, running without a slot");
                None
            }
        };

        logger.started(&url);
        let started = Instant::now();

        let pipeline = tokio::time::timeout(
            self.config.job_timeout,
            self.run_pipeline(&job_id, &url, platform, &logger),
        );
        let result = match AssertUnwindSafe(pipeline).catch_unwind().await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(WorkerError::Timeout(self.config.job_timeout.as_secs())),
            Err(payload) => Err(WorkerError::Panicked(panic_message(payload.as_ref()))),
        };

        metrics::histogram!(JOB_DURATION, "platform" => platform.as_str())
            .record(started.elapsed().as_secs_f64());

        let outcome = match result {
            Ok((result, comment_count)) => {
                logger.completed(result.filenames().len(), comment_count);
                metrics::counter!(JOBS_COMPLETED, "platform" => platform.as_str()).increment(1);
                JobOutcome::Completed {
                    result,
                    comment_count,
                }
            }
            Err(e) => {
                logger.failed(&e.to_string());
                metrics::counter!(JOBS_FAILED, "platform" => platform.as_str()).increment(1);
                JobOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        if let Err(e) = self.store.update(&job_id, outcome).await {
            error!(request_id = %job_id, "{}", WorkerError::from(e));
        }
        metrics::gauge!(JOBS_IN_FLIGHT).decrement(1.0);
    }

    /// extract → score → publish.
    async fn run_pipeline(
        &self,
        job_id: &JobId,
        url: &str,
        platform: Platform,
        logger: &JobLogger,
    ) -> WorkerResult<(ResultBundle, usize)> {
        logger.stage(Stage::Extract, "fetching post");
        let Extraction { metadata, comments } = retry_async(
            &self.config.retry_config("extract"),
            SourceError::is_retryable,
            || self.extractor.extract(url),
        )
        .await
        .into_result()?;

        let Some(comments) = comments else {
            logger.stage(Stage::Publish, "no comments for this platform, publishing metadata only");
            let bundle = self
                .publisher
                .publish(job_id, platform, Artifacts::metadata_only(&metadata))
                .await?;
            return Ok((bundle, 0));
        };

        logger.stage(Stage::Score, &format!("scoring {} comments", comments.len()));
        let texts: Vec<String> = comments.iter().map(|c| c.text.clone()).collect();
        // Scorers own their retry policy (see `SentimentConfig::max_retries`).
        let sentiments = self.scorer.score(&texts).await?;

        if sentiments.len() != comments.len() {
            return Err(SentimentError::InvalidResponse(format!(
                "{} results for {} comments",
                sentiments.len(),
                comments.len()
            ))
            .into());
        }

        logger.stage(Stage::Publish, "writing reports");
        let bundle = self
            .publisher
            .publish(
                job_id,
                platform,
                Artifacts::with_analysis(&metadata, &comments, &sentiments),
            )
            .await?;
        Ok((bundle, comments.len()))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
