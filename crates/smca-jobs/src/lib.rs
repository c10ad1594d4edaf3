//! In-memory analysis job store.
//!
//! This crate provides:
//! - Request ID allocation with uniqueness guarantees
//! - Linearizable per-job reads and terminal updates
//!
//! The store is an owned object created at process start; nothing survives
//! a restart.

pub mod error;
pub mod store;

pub use error::{JobsError, JobsResult};
pub use store::JobStore;
