//! Application state.

use std::sync::Arc;

use smca_jobs::JobStore;
use smca_sentiment::{scorer_from_config, SentimentConfig};
use smca_sources::SourceRouter;
use smca_storage::{FilePublisher, PublisherConfig};
use smca_worker::{JobRunner, WorkerConfig};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Arc<JobStore>,
    pub runner: JobRunner,
    pub publisher: Arc<FilePublisher>,
}

impl AppState {
    /// Create new application state from environment configuration.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let publisher = Arc::new(FilePublisher::new(PublisherConfig::from_env()).await?);
        let extractor = Arc::new(SourceRouter::from_env()?);
        let scorer = scorer_from_config(SentimentConfig::from_env())?;
        let store = Arc::new(JobStore::new());

        let runner = JobRunner::new(
            WorkerConfig::from_env(),
            Arc::clone(&store),
            extractor,
            scorer,
            Arc::clone(&publisher),
        );

        Ok(Self::with_components(config, store, runner, publisher))
    }

    /// Assemble state from already-built components.
    pub fn with_components(
        config: ApiConfig,
        store: Arc<JobStore>,
        runner: JobRunner,
        publisher: Arc<FilePublisher>,
    ) -> Self {
        Self {
            config,
            store,
            runner,
            publisher,
        }
    }
}
