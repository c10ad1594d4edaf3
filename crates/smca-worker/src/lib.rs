//! Background job runner.
//!
//! Runs the analysis pipeline for each submitted job:
//! extract → score → publish → record the terminal outcome.
//! Jobs run as spawned tasks bounded by a semaphore; extractor calls are
//! retried on transient failures and the whole pipeline is time-limited.

pub mod config;
pub mod error;
pub mod logging;
pub mod retry;
pub mod runner;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use logging::{JobLogger, Stage};
pub use retry::{retry_async, RetryConfig, RetryResult};
pub use runner::JobRunner;
