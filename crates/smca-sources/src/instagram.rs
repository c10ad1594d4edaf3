//! Instagram metadata extractor.
//!
//! Comment extraction is unsupported for Instagram; only post metadata is
//! produced, via the Graph API oEmbed endpoint when a token is configured.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use smca_models::{extract_instagram_shortcode, Extraction, Platform, PostMetadata, UrlError};

use crate::error::{SourceError, SourceResult};
use crate::extractor::Extractor;

const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.facebook.com/v19.0";

/// Configuration for the Instagram extractor.
#[derive(Debug, Clone)]
pub struct InstagramConfig {
    /// Graph API access token
    pub access_token: Option<String>,
    /// Graph API base URL
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for InstagramConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            base_url: DEFAULT_GRAPH_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl InstagramConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            access_token: std::env::var("INSTAGRAM_ACCESS_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            base_url: std::env::var("INSTAGRAM_GRAPH_BASE_URL").unwrap_or(defaults.base_url),
            timeout: defaults.timeout,
        }
    }
}

pub struct InstagramExtractor {
    http: Client,
    config: InstagramConfig,
}

impl InstagramExtractor {
    pub fn new(config: InstagramConfig) -> SourceResult<Self> {
        if config.access_token.is_none() {
            warn!("INSTAGRAM_ACCESS_TOKEN not set, Instagram metadata limited to the URL");
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(SourceError::Network)?;

        Ok(Self { http, config })
    }

    async fn fetch_oembed(&self, url: &str, token: &str) -> SourceResult<OEmbed> {
        let endpoint = format!(
            "{}/instagram_oembed",
            self.config.base_url.trim_end_matches('/')
        );
        let response = self
            .http
            .get(&endpoint)
            .query(&[("url", url), ("access_token", token)])
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<GraphErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            return Err(SourceError::api(status.as_u16(), message));
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl Extractor for InstagramExtractor {
    async fn extract(&self, url: &str) -> SourceResult<Extraction> {
        let shortcode = extract_instagram_shortcode(url).map_err(|e| match e {
            UrlError::PostIdNotFound => SourceError::InvalidUrl {
                platform: Platform::Instagram.display_name(),
            },
            other => SourceError::UnsupportedUrl(other),
        })?;

        let mut metadata = PostMetadata::new()
            .with("Platform", Platform::Instagram.display_name())
            .with("Post ID", &shortcode)
            .with("Post URL", url.trim());

        if let Some(token) = self.config.access_token.as_deref() {
            let embed = self.fetch_oembed(url.trim(), token).await?;
            metadata.insert(
                "Owner",
                embed.author_name.unwrap_or_else(|| "Unknown".to_string()),
            );
            metadata.insert(
                "Caption",
                embed
                    .title
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| "No caption".to_string()),
            );
            if let Some(thumbnail) = embed.thumbnail_url {
                metadata.insert("Thumbnail", thumbnail);
            }
            if let Some(provider) = embed.provider_name {
                metadata.insert("Provider", provider);
            }
        }

        info!(shortcode = %shortcode, fields = metadata.len(), "Extracted Instagram post");
        Ok(Extraction::metadata_only(metadata))
    }
}

#[derive(Debug, Deserialize)]
struct OEmbed {
    author_name: Option<String>,
    title: Option<String>,
    thumbnail_url: Option<String>,
    provider_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphErrorEnvelope {
    error: GraphErrorBody,
}

#[derive(Debug, Deserialize)]
struct GraphErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const POST_URL: &str = "https://www.instagram.com/p/C1a2B3c4D5e/";

    fn extractor(base_url: String, token: Option<&str>) -> InstagramExtractor {
        InstagramExtractor::new(InstagramConfig {
            access_token: token.map(String::from),
            base_url,
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_oembed_metadata_without_comments() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/instagram_oembed"))
            .and(query_param("url", POST_URL))
            .and(query_param("access_token", "tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "author_name": "someone",
                "title": "Sunset",
                "provider_name": "Instagram",
                "thumbnail_url": "https://cdn.example/t.jpg"
            })))
            .mount(&server)
            .await;

        let extraction = extractor(server.uri(), Some("tok"))
            .extract(POST_URL)
            .await
            .unwrap();

        assert!(extraction.comments.is_none());
        assert_eq!(extraction.metadata.get("Post ID"), Some("C1a2B3c4D5e"));
        assert_eq!(extraction.metadata.get("Owner"), Some("someone"));
        assert_eq!(extraction.metadata.get("Caption"), Some("Sunset"));
    }

    #[tokio::test]
    async fn test_without_token_uses_url_only() {
        let extraction = extractor("http://127.0.0.1:1".into(), None)
            .extract(POST_URL)
            .await
            .unwrap();

        assert!(extraction.comments.is_none());
        assert_eq!(extraction.metadata.get("Platform"), Some("Instagram"));
        assert!(extraction.metadata.get("Owner").is_none());
    }

    #[tokio::test]
    async fn test_graph_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/instagram_oembed"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "message": "Invalid OAuth access token", "code": 190 }
            })))
            .mount(&server)
            .await;

        let err = extractor(server.uri(), Some("bad"))
            .extract(POST_URL)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Api { status: 400, .. }));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_profile_url_is_invalid() {
        let err = extractor("http://127.0.0.1:1".into(), None)
            .extract("https://www.instagram.com/someuser/")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid Instagram URL format");
    }
}
