//! Extractor trait and platform router.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use smca_models::{classify_url, Extraction, Platform};

use crate::error::SourceResult;
use crate::instagram::{InstagramConfig, InstagramExtractor};
use crate::youtube::{YouTubeConfig, YouTubeExtractor};

/// Turns a post URL into metadata and, where supported, comments.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, url: &str) -> SourceResult<Extraction>;
}

/// Dispatches each URL to the extractor for its platform.
#[derive(Clone)]
pub struct SourceRouter {
    youtube: Arc<dyn Extractor>,
    instagram: Arc<dyn Extractor>,
}

impl SourceRouter {
    pub fn new(youtube: Arc<dyn Extractor>, instagram: Arc<dyn Extractor>) -> Self {
        Self { youtube, instagram }
    }

    /// Build both platform extractors from environment variables.
    pub fn from_env() -> SourceResult<Self> {
        let youtube = YouTubeExtractor::new(YouTubeConfig::from_env())?;
        let instagram = InstagramExtractor::new(InstagramConfig::from_env())?;
        Ok(Self::new(Arc::new(youtube), Arc::new(instagram)))
    }

    fn for_platform(&self, platform: Platform) -> &Arc<dyn Extractor> {
        match platform {
            Platform::YouTube => &self.youtube,
            Platform::Instagram => &self.instagram,
        }
    }
}

#[async_trait]
impl Extractor for SourceRouter {
    async fn extract(&self, url: &str) -> SourceResult<Extraction> {
        let platform = classify_url(url)?;
        debug!(platform = %platform, "Routing extraction");
        self.for_platform(platform).extract(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smca_models::PostMetadata;

    use crate::error::SourceError;

    struct Fixed(&'static str);

    #[async_trait]
    impl Extractor for Fixed {
        async fn extract(&self, _url: &str) -> SourceResult<Extraction> {
            Ok(Extraction::metadata_only(
                PostMetadata::new().with("Source", self.0),
            ))
        }
    }

    fn router() -> SourceRouter {
        SourceRouter::new(Arc::new(Fixed("youtube")), Arc::new(Fixed("instagram")))
    }

    #[tokio::test]
    async fn test_routes_by_platform() {
        let router = router();

        let yt = router
            .extract("https://youtu.be/_Xczf06n6x0")
            .await
            .unwrap();
        assert_eq!(yt.metadata.get("Source"), Some("youtube"));

        let ig = router
            .extract("https://www.instagram.com/p/C1a2B3c4D5e/")
            .await
            .unwrap();
        assert_eq!(ig.metadata.get("Source"), Some("instagram"));
    }

    #[tokio::test]
    async fn test_unsupported_url() {
        let err = router().extract("https://vimeo.com/1").await.unwrap_err();
        assert!(matches!(err, SourceError::UnsupportedUrl(_)));
    }
}
