//! Extractor adapters for supported platforms.
//!
//! Each extractor turns a post URL into [`Extraction`] records:
//! - YouTube: video metadata plus every comment thread and reply (Data API v3)
//! - Instagram: post metadata only (oEmbed)
//!
//! [`SourceRouter`] dispatches on the platform a URL classifies to.
//!
//! [`Extraction`]: smca_models::Extraction

pub mod error;
pub mod extractor;
pub mod instagram;
pub mod youtube;

pub use error::{SourceError, SourceResult};
pub use extractor::{Extractor, SourceRouter};
pub use instagram::{InstagramConfig, InstagramExtractor};
pub use youtube::{YouTubeConfig, YouTubeExtractor};
