//! YouTube Data API v3 extractor.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};

use smca_models::{extract_youtube_id, Comment, Extraction, Platform, PostMetadata, UrlError};

use crate::error::{SourceError, SourceResult};
use crate::extractor::Extractor;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Largest page size the comment threads endpoint accepts.
const PAGE_SIZE: &str = "100";

/// Configuration for the YouTube extractor.
#[derive(Debug, Clone)]
pub struct YouTubeConfig {
    /// Data API key; extraction fails with a configuration error when unset
    pub api_key: Option<String>,
    /// API base URL
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Upper bound on comment thread pages fetched per video
    pub max_comment_pages: u32,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_comment_pages: 50,
        }
    }
}

impl YouTubeConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("YOUTUBE_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            base_url: std::env::var("YOUTUBE_API_BASE_URL").unwrap_or(defaults.base_url),
            timeout: defaults.timeout,
            max_comment_pages: std::env::var("YOUTUBE_MAX_COMMENT_PAGES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_comment_pages),
        }
    }
}

/// Extracts video metadata and every comment thread (with replies).
pub struct YouTubeExtractor {
    http: Client,
    config: YouTubeConfig,
}

impl YouTubeExtractor {
    pub fn new(config: YouTubeConfig) -> SourceResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(SourceError::Network)?;

        Ok(Self { http, config })
    }

    fn api_key(&self) -> SourceResult<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| SourceError::config("YOUTUBE_API_KEY not set"))
    }

    async fn fetch_metadata(&self, video_id: &str) -> SourceResult<PostMetadata> {
        let videos: VideoListResponse = self
            .get_json(
                "videos",
                &[("part", "snippet,statistics"), ("id", video_id)],
            )
            .await?;

        let video = videos
            .items
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::NotFound(format!("YouTube video {}", video_id)))?;

        let stat = |v: Option<String>| v.unwrap_or_else(|| "N/A".to_string());
        let tags = match video.snippet.tags {
            Some(tags) if !tags.is_empty() => tags.join(", "),
            _ => "No tags".to_string(),
        };

        Ok(PostMetadata::new()
            .with("Platform", Platform::YouTube.display_name())
            .with("Video ID", video_id)
            .with("Title", video.snippet.title)
            .with("Description", video.snippet.description)
            .with("Published At", video.snippet.published_at)
            .with("Channel", video.snippet.channel_title)
            .with("View Count", stat(video.statistics.view_count))
            .with("Like Count", stat(video.statistics.like_count))
            .with("Comment Count", stat(video.statistics.comment_count))
            .with("Tags", tags))
    }

    async fn fetch_comments(&self, video_id: &str) -> SourceResult<Vec<Comment>> {
        let mut comments = Vec::new();
        let mut page_token: Option<String> = None;

        for page in 0..self.config.max_comment_pages {
            let mut query = vec![
                ("part", "snippet,replies"),
                ("videoId", video_id),
                ("maxResults", PAGE_SIZE),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let threads: CommentThreadListResponse =
                match self.get_json("commentThreads", &query).await {
                    Ok(threads) => threads,
                    Err(SourceError::Api { status: 403, message })
                        if message.contains("disabled comments") =>
                    {
                        warn!(video_id = %video_id, "Comments are disabled for this video");
                        break;
                    }
                    Err(e) => return Err(e),
                };

            for thread in threads.items {
                let top = thread.snippet.top_level_comment;
                let parent_id = top.id.clone();
                comments.push(top.into_comment());

                if let Some(replies) = thread.replies {
                    comments.extend(
                        replies
                            .comments
                            .into_iter()
                            .map(|reply| reply.into_comment().reply_to(parent_id.as_str())),
                    );
                }
            }

            debug!(video_id = %video_id, page, total = comments.len(), "Fetched comment page");

            match threads.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => return Ok(comments),
            }
        }

        if page_token.is_some() {
            warn!(
                video_id = %video_id,
                max_pages = self.config.max_comment_pages,
                "Stopped comment pagination at page limit"
            );
        }
        Ok(comments)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> SourceResult<T> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        let response = self
            .http
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key()?)])
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            return Err(SourceError::api(status.as_u16(), message));
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl Extractor for YouTubeExtractor {
    async fn extract(&self, url: &str) -> SourceResult<Extraction> {
        let video_id = extract_youtube_id(url).map_err(|e| match e {
            UrlError::InvalidVideoId | UrlError::PostIdNotFound => SourceError::InvalidUrl {
                platform: Platform::YouTube.display_name(),
            },
            other => SourceError::UnsupportedUrl(other),
        })?;

        let metadata = self.fetch_metadata(&video_id).await?;
        let comments = self.fetch_comments(&video_id).await?;

        info!(
            video_id = %video_id,
            comments = comments.len(),
            "Extracted YouTube video"
        );
        Ok(Extraction::with_comments(metadata, comments))
    }
}

// Wire types

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    snippet: VideoSnippet,
    #[serde(default)]
    statistics: VideoStatistics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    published_at: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    tags: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadListResponse {
    #[serde(default)]
    items: Vec<CommentThread>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    snippet: ThreadSnippet,
    replies: Option<Replies>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadSnippet {
    top_level_comment: YtComment,
}

#[derive(Debug, Deserialize)]
struct Replies {
    #[serde(default)]
    comments: Vec<YtComment>,
}

#[derive(Debug, Deserialize)]
struct YtComment {
    id: String,
    snippet: YtCommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YtCommentSnippet {
    #[serde(default)]
    author_display_name: String,
    #[serde(default)]
    text_display: String,
    #[serde(default)]
    like_count: u64,
    published_at: Option<String>,
}

impl YtComment {
    fn into_comment(self) -> Comment {
        let snippet = self.snippet;
        let comment = Comment::new(
            Platform::YouTube,
            snippet.author_display_name,
            &snippet.text_display,
            snippet.like_count,
        )
        .with_id(self.id);

        match snippet.published_at {
            Some(at) => comment.published_at(at),
            None => comment,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VIDEO_URL: &str = "https://www.youtube.com/watch?v=_Xczf06n6x0";

    fn extractor(server: &MockServer) -> YouTubeExtractor {
        YouTubeExtractor::new(YouTubeConfig {
            api_key: Some("test-key".into()),
            base_url: server.uri(),
            max_comment_pages: 10,
            ..Default::default()
        })
        .unwrap()
    }

    fn video_body() -> serde_json::Value {
        json!({
            "items": [{
                "snippet": {
                    "title": "Demo video",
                    "description": "About things",
                    "publishedAt": "2024-01-01T00:00:00Z",
                    "channelTitle": "Demo Channel",
                    "tags": ["rust", "async"]
                },
                "statistics": { "viewCount": "1000", "likeCount": "50" }
            }]
        })
    }

    fn thread(id: &str, author: &str, text: &str, replies: Vec<(&str, &str)>) -> serde_json::Value {
        let replies: Vec<_> = replies
            .into_iter()
            .map(|(rid, rtext)| {
                json!({
                    "id": rid,
                    "snippet": {
                        "authorDisplayName": "replier",
                        "textDisplay": rtext,
                        "likeCount": 1,
                        "publishedAt": "2024-01-02T00:00:00Z"
                    }
                })
            })
            .collect();
        json!({
            "snippet": {
                "topLevelComment": {
                    "id": id,
                    "snippet": {
                        "authorDisplayName": author,
                        "textDisplay": text,
                        "likeCount": 7,
                        "publishedAt": "2024-01-01T12:00:00Z"
                    }
                }
            },
            "replies": { "comments": replies }
        })
    }

    #[tokio::test]
    async fn test_extracts_metadata_and_paginated_comments() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/videos"))
            .and(query_param("id", "_Xczf06n6x0"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(video_body()))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/commentThreads"))
            .and(query_param("pageToken", "page2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [thread("t2", "carol", "second page", vec![])]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/commentThreads"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [thread("t1", "alice", "line one\nline two", vec![("r1", "a reply")])],
                "nextPageToken": "page2"
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        let extraction = extractor(&server).extract(VIDEO_URL).await.unwrap();

        let metadata = &extraction.metadata;
        assert_eq!(metadata.get("Platform"), Some("YouTube"));
        assert_eq!(metadata.get("Title"), Some("Demo video"));
        assert_eq!(metadata.get("Tags"), Some("rust, async"));
        assert_eq!(metadata.get("Comment Count"), Some("N/A"));

        let comments = extraction.comments.unwrap();
        assert_eq!(comments.len(), 3);
        assert_eq!(comments[0].text, "line one line two");
        assert_eq!(comments[0].comment_id, "t1");
        assert!(!comments[0].is_reply);
        assert!(comments[1].is_reply);
        assert_eq!(comments[1].parent_id.as_deref(), Some("t1"));
        assert_eq!(comments[2].author, "carol");
    }

    #[tokio::test]
    async fn test_missing_video_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
            .mount(&server)
            .await;

        let err = extractor(&server).extract(VIDEO_URL).await.unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_api_error_carries_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": { "code": 403, "message": "API key not valid" }
            })))
            .mount(&server)
            .await;

        let err = extractor(&server).extract(VIDEO_URL).await.unwrap_err();
        match err {
            SourceError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_disabled_comments_yield_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(video_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/commentThreads"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": { "code": 403, "message": "The video identified by the videoId parameter has disabled comments." }
            })))
            .mount(&server)
            .await;

        let extraction = extractor(&server).extract(VIDEO_URL).await.unwrap();
        assert_eq!(extraction.comments, Some(vec![]));
    }

    #[tokio::test]
    async fn test_bad_video_url_and_missing_key() {
        let server = MockServer::start().await;

        let err = extractor(&server)
            .extract("https://www.youtube.com/channel/xyz")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid YouTube URL format");

        let unkeyed = YouTubeExtractor::new(YouTubeConfig {
            base_url: server.uri(),
            ..Default::default()
        })
        .unwrap();
        let err = unkeyed.extract(VIDEO_URL).await.unwrap_err();
        assert!(matches!(err, SourceError::Config(_)));
    }
}
