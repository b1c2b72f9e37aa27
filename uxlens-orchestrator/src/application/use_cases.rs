//! Orchestrator use cases

use std::collections::HashSet;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use uxlens_core::domain::{
    Design, DesignVersion, LedgerRepository, NewDesign, NewDesignVersion, VersionOutcome,
    VersionStatus,
};

use crate::application::evaluation_run::{EvaluationRunner, PreparedRun};
use crate::application::workflow::JobWorkflow;
use crate::domain::entities::{
    EvaluationRequest, EvaluationResults, StartedEvaluation, VersionHistory,
};
use crate::domain::errors::EvaluationError;
use crate::domain::value_objects::JobProgress;

async fn require_design(
    ledger: &dyn LedgerRepository,
    design_id: Uuid,
) -> Result<Design, EvaluationError> {
    ledger
        .find_design(design_id)
        .await?
        .ok_or_else(|| EvaluationError::NotFound {
            entity: "Design",
            id: design_id.to_string(),
        })
}

/// Load a version and check it belongs to the design
async fn require_version_of(
    ledger: &dyn LedgerRepository,
    design_id: Uuid,
    version_id: Uuid,
) -> Result<DesignVersion, EvaluationError> {
    let version = ledger
        .find_version(version_id)
        .await?
        .ok_or_else(|| EvaluationError::NotFound {
            entity: "Design version",
            id: version_id.to_string(),
        })?;
    if version.design_id != design_id {
        return Err(EvaluationError::input(format!(
            "Version {} does not belong to design {}",
            version_id, design_id
        )));
    }
    Ok(version)
}

/// Use case for registering a design
pub struct CreateDesignUseCase {
    ledger: Arc<dyn LedgerRepository>,
}

impl CreateDesignUseCase {
    pub fn new(ledger: Arc<dyn LedgerRepository>) -> Self {
        Self { ledger }
    }

    pub async fn execute(
        &self,
        title: &str,
        owner_id: Option<String>,
    ) -> Result<Design, EvaluationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(EvaluationError::input("Design title must not be empty"));
        }

        let design = self
            .ledger
            .create_design(NewDesign {
                title: title.to_string(),
                owner_id,
            })
            .await?;
        info!(design_id = %design.id, "Design created");
        Ok(design)
    }
}

/// Use case for starting an evaluation run.
///
/// Input is validated and the pending version plus its job are written before anything
/// runs; the run itself continues in the background.
pub struct StartEvaluationUseCase {
    ledger: Arc<dyn LedgerRepository>,
    workflow: JobWorkflow,
    runner: Arc<EvaluationRunner>,
    shutdown: CancellationToken,
}

impl StartEvaluationUseCase {
    pub fn new(
        ledger: Arc<dyn LedgerRepository>,
        workflow: JobWorkflow,
        runner: Arc<EvaluationRunner>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            ledger,
            workflow,
            runner,
            shutdown,
        }
    }

    #[instrument(skip_all, fields(design_id = %request.design_id))]
    pub async fn execute(
        &self,
        request: EvaluationRequest,
    ) -> Result<StartedEvaluation, EvaluationError> {
        let prepared = self.prepare(request).await?;
        let started = StartedEvaluation {
            job: prepared.job.clone(),
            version: prepared.version.clone(),
        };

        let runner = self.runner.clone();
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            // Failures are recorded on the version and job by the runner
            if let Err(e) = runner.run(prepared, shutdown).await {
                debug!(error = %e, "Background evaluation run ended with error");
            }
        });

        Ok(started)
    }

    /// Validate the request, then create the pending version and the started job
    pub async fn prepare(
        &self,
        request: EvaluationRequest,
    ) -> Result<PreparedRun, EvaluationError> {
        self.validate(&request)?;
        require_design(self.ledger.as_ref(), request.design_id).await?;

        let version = self
            .ledger
            .insert_version(NewDesignVersion {
                design_id: request.design_id,
                file_key: request.file_key.trim().to_string(),
                node_id: request.node_id.clone(),
                thumbnail_url: request.thumbnail_url.clone(),
                snapshot: request.snapshot.clone(),
                created_by: request.created_by.clone(),
            })
            .await?;

        let job = match self
            .workflow
            .create_job(version.design_id, version.id)
            .await
        {
            Ok(job) => job,
            Err(e) => {
                let outcome = VersionOutcome {
                    status: VersionStatus::Error,
                    aggregate_score: None,
                    thumbnail_url: version.thumbnail_url.clone(),
                };
                self.ledger.complete_version(version.id, outcome).await?;
                return Err(EvaluationError::persistence(e.to_string()));
            }
        };

        info!(
            version_id = %version.id,
            version = version.version,
            job_id = %job.job_id,
            "Evaluation accepted"
        );
        Ok(PreparedRun {
            request,
            version,
            job,
        })
    }

    fn validate(&self, request: &EvaluationRequest) -> Result<(), EvaluationError> {
        if request.file_key.trim().is_empty() {
            return Err(EvaluationError::input("file_key must not be empty"));
        }
        if request.node_id.as_deref().is_some_and(|id| id.trim().is_empty()) {
            return Err(EvaluationError::input("node_id must not be empty when given"));
        }

        let max = self.runner.max_frames_per_run();
        if request.frame_ids.len() > max {
            return Err(EvaluationError::input(format!(
                "At most {} frames can be evaluated in one run, got {}",
                max,
                request.frame_ids.len()
            )));
        }

        let mut seen = HashSet::new();
        for frame_id in &request.frame_ids {
            if frame_id.trim().is_empty() {
                return Err(EvaluationError::input("frame_ids must not contain empty ids"));
            }
            if !seen.insert(frame_id.as_str()) {
                return Err(EvaluationError::input(format!(
                    "Frame {} requested more than once",
                    frame_id
                )));
            }
        }
        Ok(())
    }
}

/// Use case for polling a job
pub struct GetProgressUseCase {
    workflow: JobWorkflow,
}

impl GetProgressUseCase {
    pub fn new(workflow: JobWorkflow) -> Self {
        Self { workflow }
    }

    pub async fn execute(&self, job_id: Uuid) -> JobProgress {
        self.workflow.progress(job_id).await
    }
}

/// Use case for moving a design's current-version pointer
pub struct RevertVersionUseCase {
    ledger: Arc<dyn LedgerRepository>,
}

impl RevertVersionUseCase {
    pub fn new(ledger: Arc<dyn LedgerRepository>) -> Self {
        Self { ledger }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self,
        design_id: Uuid,
        version_id: Uuid,
    ) -> Result<Design, EvaluationError> {
        let mut design = require_design(self.ledger.as_ref(), design_id).await?;
        let version = require_version_of(self.ledger.as_ref(), design_id, version_id).await?;

        self.ledger.set_current_version(design_id, version.id).await?;
        design.current_version_id = Some(version.id);

        info!(version = version.version, "Current version reverted");
        Ok(design)
    }
}

/// Use case for reading the critiqued frames of a version
pub struct GetEvaluationResultsUseCase {
    ledger: Arc<dyn LedgerRepository>,
}

impl GetEvaluationResultsUseCase {
    pub fn new(ledger: Arc<dyn LedgerRepository>) -> Self {
        Self { ledger }
    }

    /// Frames of `version_id`, or of the current version when none is given. Frames
    /// without critique data are left out.
    pub async fn execute(
        &self,
        design_id: Uuid,
        version_id: Option<Uuid>,
    ) -> Result<EvaluationResults, EvaluationError> {
        let design = require_design(self.ledger.as_ref(), design_id).await?;

        let Some(version_id) = version_id.or(design.current_version_id) else {
            return Ok(EvaluationResults {
                design_id,
                version: None,
                frames: Vec::new(),
            });
        };
        let version = require_version_of(self.ledger.as_ref(), design_id, version_id).await?;

        let frames = self
            .ledger
            .list_frame_evaluations(design_id, version.id)
            .await?
            .into_iter()
            .filter(|frame| frame.critique.is_some())
            .collect();

        Ok(EvaluationResults {
            design_id,
            version: Some(version),
            frames,
        })
    }
}

/// Use case for listing a design's version history
pub struct ListVersionsUseCase {
    ledger: Arc<dyn LedgerRepository>,
}

impl ListVersionsUseCase {
    pub fn new(ledger: Arc<dyn LedgerRepository>) -> Self {
        Self { ledger }
    }

    pub async fn execute(&self, design_id: Uuid) -> Result<VersionHistory, EvaluationError> {
        let design = require_design(self.ledger.as_ref(), design_id).await?;
        let versions = self.ledger.list_versions(design_id).await?;
        Ok(VersionHistory { design, versions })
    }
}
