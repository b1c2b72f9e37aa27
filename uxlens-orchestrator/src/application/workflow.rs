//! Job workflow: state-machine controller for evaluation jobs.
//!
//! Every status or progress change goes through [`JobWorkflow`], which validates the
//! transition against [`JobStatus`], persists the job, and records an audit-trail entry.
//!
//! ```text
//! StartEvaluation      EvaluationRunner       JobWorkflow        JobStore
//!     │                      │                    │                 │
//!     ├─ create_job() ──────────────────────────►│── save ────────►│  started, 0
//!     │                      │                    │                 │
//!     │                      ├─ begin(n) ────────►│── save ────────►│
//!     │                      ├─ record_frame() ──►│── save ────────►│  ongoing, k*100/n
//!     │                      ├─ complete_job() ──►│── save ────────►│  done, 100
//!     │                      └─ fail_job() ──────►│── save ────────►│  error
//! ```

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::{EvaluationJob, RunSummary};
use crate::domain::value_objects::{JobProgress, JobStatus, JobTransitionError};
use crate::infrastructure::job_store::{JobStore, JobStoreError};

/// Errors from the workflow layer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorkflowError {
    #[error("Invalid state transition: {0}")]
    InvalidTransition(#[from] JobTransitionError),

    #[error("Persistence error: {0}")]
    Store(#[from] JobStoreError),
}

/// Centralised job lifecycle controller.
#[derive(Clone)]
pub struct JobWorkflow {
    job_store: Arc<dyn JobStore>,
}

impl JobWorkflow {
    pub fn new(job_store: Arc<dyn JobStore>) -> Self {
        Self { job_store }
    }

    /// Create and persist a job in [`JobStatus::Started`] at progress 0.
    pub async fn create_job(
        &self,
        design_id: Uuid,
        version_id: Uuid,
    ) -> Result<EvaluationJob, WorkflowError> {
        let job = EvaluationJob::new(design_id, version_id);
        self.job_store.save(&job).await?;
        info!(job_id = %job.job_id, %design_id, %version_id, "Job created");
        Ok(job)
    }

    /// Fix the number of frames the run will produce.
    pub async fn begin(
        &self,
        job: &mut EvaluationJob,
        frames_total: usize,
    ) -> Result<(), WorkflowError> {
        job.frames_total = frames_total;
        self.job_store.save(job).await?;
        debug!(job_id = %job.job_id, frames_total, "Job frame count fixed");
        Ok(())
    }

    /// Count one finished frame; the first one moves the job to [`JobStatus::Ongoing`].
    pub async fn record_frame(&self, job: &mut EvaluationJob) -> Result<(), WorkflowError> {
        job.record_frame()?;
        self.job_store.save(job).await?;
        debug!(
            job_id = %job.job_id,
            progress = job.progress,
            completed = job.frames_completed,
            total = job.frames_total,
            "Job progress advanced"
        );
        Ok(())
    }

    /// Transition to [`JobStatus::Done`] at progress 100 and persist.
    pub async fn complete_job(
        &self,
        job: &mut EvaluationJob,
        summary: &RunSummary,
    ) -> Result<(), WorkflowError> {
        job.transition(
            JobStatus::Done,
            Some(format!(
                "Completed with {} evaluated and {} skipped frames",
                summary.evaluated, summary.skipped
            )),
        )?;
        job.progress = 100;
        self.job_store.save(job).await?;

        info!(
            job_id = %job.job_id,
            aggregate_score = ?summary.aggregate_score,
            "Job transitioned to Done"
        );
        Ok(())
    }

    /// Transition to [`JobStatus::Error`] with a message and persist. Progress is left
    /// where the run stopped.
    pub async fn fail_job(
        &self,
        job: &mut EvaluationJob,
        error: &str,
    ) -> Result<(), WorkflowError> {
        job.transition(JobStatus::Error, Some(format!("Run failed: {}", error)))?;
        job.error = Some(error.to_string());
        self.job_store.save(job).await?;

        warn!(job_id = %job.job_id, error, "Job transitioned to Error");
        Ok(())
    }

    pub async fn get_job(&self, job_id: Uuid) -> Result<Option<EvaluationJob>, WorkflowError> {
        Ok(self.job_store.get(job_id).await?)
    }

    /// Last known progress. Unknown ids and store failures read as the default
    /// `{0, started}`; polling has no side effects.
    pub async fn progress(&self, job_id: Uuid) -> JobProgress {
        match self.job_store.get(job_id).await {
            Ok(Some(job)) => job.snapshot(),
            Ok(None) => JobProgress::default(),
            Err(e) => {
                warn!(%job_id, error = %e, "Job store read failed, reporting default progress");
                JobProgress::default()
            }
        }
    }
}
