//! Job store implementation.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use smca_models::{Job, JobId, JobOutcome, JobStatus, Platform};

use crate::error::{JobsError, JobsResult};

/// Process-wide table of analysis jobs keyed by request ID.
///
/// Every read returns a full snapshot cloned under the lock, and the single
/// terminal update swaps the whole record, so readers observe either the
/// processing state or the finished one.
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl JobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh request ID and insert a processing job for it.
    pub async fn create(&self, url: &str, platform: Platform) -> JobId {
        let mut jobs = self.jobs.write().await;

        // The random suffix is short; redraw until unused while holding the lock.
        let mut request_id = JobId::generate_at(Utc::now());
        while jobs.contains_key(&request_id) {
            debug!(request_id = %request_id, "Request ID collision, regenerating");
            request_id = JobId::generate_at(Utc::now());
        }

        let job = Job::new(request_id.clone(), url, platform);
        jobs.insert(request_id.clone(), job);

        info!(
            request_id = %request_id,
            platform = %platform,
            "Created analysis job"
        );
        request_id
    }

    /// Get the current state of a job.
    pub async fn get(&self, request_id: &JobId) -> JobsResult<Job> {
        self.jobs
            .read()
            .await
            .get(request_id)
            .cloned()
            .ok_or_else(|| JobsError::not_found(request_id.as_str()))
    }

    /// Record the terminal outcome of a job.
    ///
    /// Only a processing job may be updated; the store rejects any attempt
    /// to move a job out of a terminal state.
    pub async fn update(&self, request_id: &JobId, outcome: JobOutcome) -> JobsResult<Job> {
        let mut jobs = self.jobs.write().await;
        let current = jobs
            .get(request_id)
            .ok_or_else(|| JobsError::not_found(request_id.as_str()))?;

        let to = outcome.status();
        let next = match current.finish(outcome) {
            Some(next) => next,
            None => {
                warn!(
                    request_id = %request_id,
                    from = %current.status,
                    to = %to,
                    "Rejected job status transition"
                );
                return Err(JobsError::InvalidTransition {
                    request_id: request_id.to_string(),
                    from: current.status,
                    to,
                });
            }
        };

        info!(request_id = %request_id, status = %next.status, "Updated analysis job");
        jobs.insert(request_id.clone(), next.clone());
        Ok(next)
    }

    /// Number of tracked jobs.
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    /// Number of jobs currently in `status`.
    pub async fn count_by_status(&self, status: JobStatus) -> usize {
        self.jobs
            .read()
            .await
            .values()
            .filter(|job| job.status == status)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use smca_models::ResultBundle;

    use super::*;

    const YT_URL: &str = "https://www.youtube.com/watch?v=_Xczf06n6x0";

    fn bundle(request_id: &JobId) -> ResultBundle {
        ResultBundle {
            comments_file: Some(format!("yt_comments_{}_20250101_000000.csv", request_id)),
            sentiment_file: Some(format!("yt_sentiment_{}_20250101_000000.csv", request_id)),
            metadata_file: format!("yt_metadata_{}_20250101_000000.txt", request_id),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = JobStore::new();
        let id = store.create(YT_URL, Platform::YouTube).await;

        let job = store.get(&id).await.unwrap();
        assert_eq!(job.request_id, id);
        assert_eq!(job.status, JobStatus::Processing);
        assert_eq!(job.submitted_url, YT_URL);
        assert_eq!(job.platform, Platform::YouTube);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let store = JobStore::new();
        let err = store.get(&JobId::from("req_missing")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_completes_once() {
        let store = JobStore::new();
        let id = store.create(YT_URL, Platform::YouTube).await;

        let done = store
            .update(
                &id,
                JobOutcome::Completed {
                    result: bundle(&id),
                    comment_count: 135,
                },
            )
            .await
            .unwrap();
        assert_eq!(done.status, JobStatus::Completed);

        let err = store
            .update(&id, JobOutcome::Failed { error: "late".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, JobsError::InvalidTransition { .. }));

        // State is unchanged by the rejected update
        let job = store.get(&id).await.unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.error.is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let store = JobStore::new();
        let err = store
            .update(&JobId::from("req_missing"), JobOutcome::Failed { error: "x".into() })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_repeated_polls_return_identical_result() {
        let store = JobStore::new();
        let id = store.create(YT_URL, Platform::YouTube).await;
        store
            .update(
                &id,
                JobOutcome::Completed {
                    result: bundle(&id),
                    comment_count: 3,
                },
            )
            .await
            .unwrap();

        let first = store.get(&id).await.unwrap();
        let second = store.get(&id).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_are_unique() {
        let store = Arc::new(JobStore::new());

        let handles: Vec<_> = (0..500)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.create(YT_URL, Platform::YouTube).await })
            })
            .collect();

        let ids: Vec<JobId> = futures_util::future::join_all(handles)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 500);
        assert_eq!(store.len().await, 500);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_readers_never_see_partial_state() {
        let store = Arc::new(JobStore::new());
        let id = store.create(YT_URL, Platform::YouTube).await;

        let reader = {
            let store = Arc::clone(&store);
            let id = id.clone();
            tokio::spawn(async move {
                for _ in 0..1000 {
                    let job = store.get(&id).await.unwrap();
                    match job.status {
                        JobStatus::Processing => assert!(job.result.is_none()),
                        JobStatus::Completed => {
                            assert!(job.result.is_some());
                            assert_eq!(job.comment_count, Some(135));
                        }
                        JobStatus::Failed => panic!("unexpected failure"),
                    }
                    tokio::task::yield_now().await;
                }
            })
        };

        store
            .update(
                &id,
                JobOutcome::Completed {
                    result: bundle(&id),
                    comment_count: 135,
                },
            )
            .await
            .unwrap();

        reader.await.unwrap();
        assert_eq!(store.count_by_status(JobStatus::Completed).await, 1);
    }
}
