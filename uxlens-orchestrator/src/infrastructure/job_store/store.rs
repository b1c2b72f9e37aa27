use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::EvaluationJob;

/// Job persistence errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JobStoreError {
    #[error("Job not found: {0}")]
    NotFound(Uuid),
    #[error("Job store unavailable: {0}")]
    Unavailable(String),
}

/// Job storage interface.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert or replace the job keyed by its id
    async fn save(&self, job: &EvaluationJob) -> Result<(), JobStoreError>;
    async fn get(&self, job_id: Uuid) -> Result<Option<EvaluationJob>, JobStoreError>;
}

/// Process-local job store. Finished jobs are dropped once they are older than the
/// retention window.
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<Uuid, EvaluationJob>>,
    retention: Duration,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::with_retention(Duration::from_secs(24 * 60 * 60))
    }

    pub fn with_retention(retention: Duration) -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
            retention,
        }
    }

    fn is_expired(&self, job: &EvaluationJob) -> bool {
        let Ok(retention) = chrono::Duration::from_std(self.retention) else {
            return false;
        };
        job.status.is_terminal() && job.updated_at + retention < Utc::now()
    }
}

impl Default for InMemoryJobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn save(&self, job: &EvaluationJob) -> Result<(), JobStoreError> {
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|_, existing| !self.is_expired(existing));
        if jobs.len() < before {
            tracing::debug!(evicted = before - jobs.len(), "Evicted finished jobs");
        }
        jobs.insert(job.job_id, job.clone());

        tracing::debug!(
            job_id = %job.job_id,
            status = %job.status,
            progress = job.progress,
            "Job saved"
        );
        Ok(())
    }

    async fn get(&self, job_id: Uuid) -> Result<Option<EvaluationJob>, JobStoreError> {
        Ok(self.jobs.read().await.get(&job_id).cloned())
    }
}
