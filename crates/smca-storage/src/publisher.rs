//! Filesystem publisher for job artifacts.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use tracing::{debug, info};

use smca_models::{
    Comment, JobId, Platform, PostMetadata, ResultBundle, SentimentResult, SentimentSummary,
};

use crate::error::{StorageError, StorageResult};
use crate::naming::{artifact_filename, content_type, is_valid_filename, ArtifactKind};
use crate::render;

/// Suffix used for in-progress writes before they are renamed into place.
const PARTIAL_SUFFIX: &str = ".partial";

/// Configuration for the file publisher.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Directory that holds every published artifact
    pub output_dir: PathBuf,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
        }
    }
}

impl PublisherConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            output_dir: std::env::var("OUTPUT_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
        }
    }
}

/// Records handed to the publisher for one job.
#[derive(Debug, Clone, Copy)]
pub struct Artifacts<'a> {
    pub metadata: &'a PostMetadata,
    /// `None` for platforms without comment extraction
    pub comments: Option<&'a [Comment]>,
    /// One result per comment; required whenever `comments` is present
    pub sentiments: Option<&'a [SentimentResult]>,
}

impl<'a> Artifacts<'a> {
    pub fn metadata_only(metadata: &'a PostMetadata) -> Self {
        Self {
            metadata,
            comments: None,
            sentiments: None,
        }
    }

    pub fn with_analysis(
        metadata: &'a PostMetadata,
        comments: &'a [Comment],
        sentiments: &'a [SentimentResult],
    ) -> Self {
        Self {
            metadata,
            comments: Some(comments),
            sentiments: Some(sentiments),
        }
    }
}

/// A published file opened for streaming.
#[derive(Debug)]
pub struct StoredFile {
    pub file: fs::File,
    pub len: u64,
    pub content_type: &'static str,
}

/// Writes job artifacts into a flat output directory and serves them back.
#[derive(Debug, Clone)]
pub struct FilePublisher {
    output_dir: PathBuf,
}

impl FilePublisher {
    /// Create a publisher, creating the output directory if missing.
    pub async fn new(config: PublisherConfig) -> StorageResult<Self> {
        fs::create_dir_all(&config.output_dir).await.map_err(|e| {
            StorageError::not_writable(format!("{}: {}", config.output_dir.display(), e))
        })?;

        info!(output_dir = %config.output_dir.display(), "File publisher ready");
        Ok(Self {
            output_dir: config.output_dir,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render and write every artifact for a job.
    ///
    /// All files share one generation timestamp. The returned bundle only
    /// names files that were fully written.
    pub async fn publish(
        &self,
        request_id: &JobId,
        platform: Platform,
        artifacts: Artifacts<'_>,
    ) -> StorageResult<ResultBundle> {
        let generated_at = Utc::now();
        let name = |kind| artifact_filename(platform, kind, request_id, generated_at);

        let analysis = match (artifacts.comments, artifacts.sentiments) {
            (Some(comments), Some(sentiments)) => Some((comments, sentiments)),
            (None, _) => None,
            (Some(_), None) => {
                return Err(StorageError::InvalidInput(
                    "comments supplied without sentiment results".to_string(),
                ))
            }
        };

        let mut bundle = ResultBundle {
            comments_file: None,
            sentiment_file: None,
            metadata_file: name(ArtifactKind::Metadata),
        };

        // Render everything up front so a rendering error leaves no files behind.
        let mut pending: Vec<(String, Vec<u8>)> = Vec::with_capacity(3);
        let summary = match analysis {
            Some((comments, sentiments)) => {
                let comments_file = name(ArtifactKind::Comments);
                let sentiment_file = name(ArtifactKind::Sentiment);
                pending.push((comments_file.clone(), render::comments_csv(comments)?));
                pending.push((
                    sentiment_file.clone(),
                    render::sentiment_csv(comments, sentiments)?,
                ));
                bundle.comments_file = Some(comments_file);
                bundle.sentiment_file = Some(sentiment_file);
                Some(SentimentSummary::from_results(sentiments))
            }
            None => None,
        };

        let report = render::metadata_text(
            platform,
            artifacts.metadata,
            analysis
                .map(|(comments, _)| comments)
                .zip(summary.as_ref()),
        );
        pending.push((bundle.metadata_file.clone(), report.into_bytes()));

        for (filename, contents) in &pending {
            self.write_atomic(filename, contents).await?;
        }

        info!(
            request_id = %request_id,
            platform = %platform,
            files = pending.len(),
            "Published job artifacts"
        );
        Ok(bundle)
    }

    /// Open a published file for download.
    ///
    /// Invalid names are reported the same way as missing files.
    pub async fn open(&self, filename: &str) -> StorageResult<StoredFile> {
        if !is_valid_filename(filename) {
            return Err(StorageError::invalid_name(filename));
        }

        let path = self.output_dir.join(filename);
        let file = fs::File::open(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::not_found(filename),
            _ => StorageError::Io(e),
        })?;
        let meta = file.metadata().await?;
        if !meta.is_file() {
            return Err(StorageError::not_found(filename));
        }

        Ok(StoredFile {
            file,
            len: meta.len(),
            content_type: content_type(filename),
        })
    }

    /// Verify the output directory accepts writes.
    pub async fn check_writable(&self) -> StorageResult<()> {
        let marker = self.output_dir.join(format!(".ready-check-{}", std::process::id()));
        fs::write(&marker, b"ok")
            .await
            .map_err(|e| StorageError::not_writable(format!("{}: {}", self.output_dir.display(), e)))?;
        let _ = fs::remove_file(&marker).await;
        Ok(())
    }

    /// Write to `<name>.partial`, then rename onto the final name.
    async fn write_atomic(&self, filename: &str, contents: &[u8]) -> StorageResult<()> {
        let target = self.output_dir.join(filename);
        let partial = self.output_dir.join(format!("{}{}", filename, PARTIAL_SUFFIX));

        let written = async {
            fs::write(&partial, contents).await?;
            fs::rename(&partial, &target).await
        }
        .await;

        if let Err(e) = written {
            let _ = fs::remove_file(&partial).await;
            return Err(StorageError::not_writable(format!("{}: {}", filename, e)));
        }

        debug!(file = %filename, bytes = contents.len(), "Wrote artifact");
        Ok(())
    }
}
