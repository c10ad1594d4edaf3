//! Result artifact publisher.
//!
//! This crate provides:
//! - Deterministic artifact naming (`<prefix>_<kind>_<request_id>_<timestamp>.<ext>`)
//! - Comments/sentiment CSV and metadata report rendering
//! - Atomic writes into the configured output directory
//! - Validated file lookup for download

pub mod error;
pub mod naming;
pub mod publisher;
pub mod render;

pub use error::{StorageError, StorageResult};
pub use naming::{artifact_filename, content_type, is_valid_filename, ArtifactKind};
pub use publisher::{Artifacts, FilePublisher, PublisherConfig, StoredFile};
