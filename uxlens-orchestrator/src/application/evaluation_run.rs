//! Evaluation run pipeline
//!
//! One run turns a pending design version into a finished one:
//!
//! ```text
//! fetch document ─► analyse (normalize ─► score ∥ detect)
//!     │
//!     └─ for each requested frame, in order:
//!          render image (placeholder on failure)
//!          critique (skip frame on failure)
//!          insert frame evaluation ─► advance job progress
//!     │
//! complete version (done + aggregate score) ─► move current pointer ─► job done
//! ```
//!
//! Frame-level failures are recorded on the frame and never stop the run. A run fails
//! only when the document cannot be fetched or analysed, a ledger write fails, or the
//! service is shutting down.

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use uxlens_analysis::{AnalyzeDocumentUseCase, DocumentAnalysis, FrameAnalysis};
use uxlens_core::domain::{
    DesignVersion, FrameAccessibility, FrameEvaluationStatus, LedgerRepository, NewFrameEvaluation,
    VersionOutcome, VersionStatus,
};
use uxlens_llm::{CritiqueFrameUseCase, CritiqueRequest};

use crate::application::workflow::JobWorkflow;
use crate::domain::entities::{EvaluationJob, EvaluationRequest, RunSummary};
use crate::domain::errors::EvaluationError;
use crate::domain::services::DesignSource;

pub const FRAME_NOT_FOUND_DETAIL: &str = "frame not found in document";

/// A validated request with its pending version and started job
#[derive(Debug, Clone)]
pub struct PreparedRun {
    pub request: EvaluationRequest,
    pub version: DesignVersion,
    pub job: EvaluationJob,
}

/// A frame the run will produce an evaluation for
enum FrameTarget<'a> {
    Found(&'a FrameAnalysis),
    /// Requested id with no frame in the document
    Missing(String),
}

/// Executes prepared runs
pub struct EvaluationRunner {
    ledger: Arc<dyn LedgerRepository>,
    design_source: Arc<dyn DesignSource>,
    analyzer: Arc<AnalyzeDocumentUseCase>,
    critic: Arc<CritiqueFrameUseCase>,
    workflow: JobWorkflow,
    placeholder_image_url: String,
    max_frames_per_run: usize,
}

impl EvaluationRunner {
    pub fn new(
        ledger: Arc<dyn LedgerRepository>,
        design_source: Arc<dyn DesignSource>,
        analyzer: Arc<AnalyzeDocumentUseCase>,
        critic: Arc<CritiqueFrameUseCase>,
        workflow: JobWorkflow,
        placeholder_image_url: impl Into<String>,
        max_frames_per_run: usize,
    ) -> Self {
        Self {
            ledger,
            design_source,
            analyzer,
            critic,
            workflow,
            placeholder_image_url: placeholder_image_url.into(),
            max_frames_per_run,
        }
    }

    pub fn max_frames_per_run(&self) -> usize {
        self.max_frames_per_run
    }

    #[instrument(
        skip_all,
        fields(
            design_id = %run.version.design_id,
            version_id = %run.version.id,
            job_id = %run.job.job_id
        )
    )]
    pub async fn run(
        &self,
        run: PreparedRun,
        shutdown: CancellationToken,
    ) -> Result<RunSummary, EvaluationError> {
        let PreparedRun {
            request,
            version,
            mut job,
        } = run;
        let start_time = Instant::now();

        let document = match self
            .design_source
            .fetch_document(&version.file_key, version.node_id.as_deref())
            .await
        {
            Ok(document) => document,
            Err(e) => {
                let err = EvaluationError::upstream(format!("design document: {}", e));
                return Err(self.fail(&version, &mut job, err).await);
            }
        };

        let analysis = match self.analyzer.execute(&document).await {
            Ok(analysis) => analysis,
            Err(e) => {
                let err = EvaluationError::upstream(format!("document analysis: {}", e));
                return Err(self.fail(&version, &mut job, err).await);
            }
        };

        let targets = self.select_targets(&analysis, &request.frame_ids);
        if let Err(e) = self.workflow.begin(&mut job, targets.len()).await {
            warn!(error = %e, "Failed to persist job frame count");
        }
        info!(frames = targets.len(), "Evaluating frames");

        let mut evaluations = Vec::with_capacity(targets.len());
        let mut first_render: Option<String> = None;

        for (index, target) in targets.into_iter().enumerate() {
            if shutdown.is_cancelled() {
                return Err(self.fail(&version, &mut job, EvaluationError::Cancelled).await);
            }

            let (evaluation, rendered) = self
                .evaluate_frame(&request, &version, index, target)
                .await;
            if first_render.is_none() {
                first_render = rendered;
            }

            let stored = match self.ledger.insert_frame_evaluation(evaluation).await {
                Ok(stored) => stored,
                Err(e) => return Err(self.fail(&version, &mut job, e.into()).await),
            };
            evaluations.push(stored);

            if let Err(e) = self.workflow.record_frame(&mut job).await {
                warn!(error = %e, "Failed to persist job progress");
            }
        }

        let summary = RunSummary::from_evaluations(&evaluations);
        let thumbnail_url = version.thumbnail_url.clone().or(first_render);

        let outcome = VersionOutcome {
            status: VersionStatus::Done,
            aggregate_score: summary.aggregate_score,
            thumbnail_url,
        };
        if let Err(e) = self.ledger.complete_version(version.id, outcome).await {
            return Err(self.fail_job(&mut job, e.into()).await);
        }
        if let Err(e) = self
            .ledger
            .set_current_version(version.design_id, version.id)
            .await
        {
            return Err(self.fail_job(&mut job, e.into()).await);
        }

        if let Err(e) = self.workflow.complete_job(&mut job, &summary).await {
            warn!(error = %e, "Failed to persist job completion");
        }

        info!(
            version = version.version,
            evaluated = summary.evaluated,
            skipped = summary.skipped,
            aggregate_score = ?summary.aggregate_score,
            duration_ms = start_time.elapsed().as_millis() as u64,
            "Evaluation run completed"
        );
        Ok(summary)
    }

    /// Requested frames in request order, or every frame of the document (capped)
    fn select_targets<'a>(
        &self,
        analysis: &'a DocumentAnalysis,
        frame_ids: &[String],
    ) -> Vec<FrameTarget<'a>> {
        if frame_ids.is_empty() {
            if analysis.frames.len() > self.max_frames_per_run {
                warn!(
                    frames = analysis.frames.len(),
                    max = self.max_frames_per_run,
                    "Document has more frames than a run evaluates, truncating"
                );
            }
            return analysis
                .frames
                .iter()
                .take(self.max_frames_per_run)
                .map(FrameTarget::Found)
                .collect();
        }

        frame_ids
            .iter()
            .map(|id| match analysis.frame(id) {
                Some(frame) => FrameTarget::Found(frame),
                None => FrameTarget::Missing(id.clone()),
            })
            .collect()
    }

    /// Build one frame's evaluation. Also returns the render URL when a real render
    /// was obtained.
    async fn evaluate_frame(
        &self,
        request: &EvaluationRequest,
        version: &DesignVersion,
        index: usize,
        target: FrameTarget<'_>,
    ) -> (NewFrameEvaluation, Option<String>) {
        let frame = match target {
            FrameTarget::Found(frame) => frame,
            FrameTarget::Missing(frame_id) => {
                warn!(frame_id = %frame_id, frame_index = index, "Requested frame not in document");
                let evaluation = NewFrameEvaluation {
                    design_id: version.design_id,
                    version_id: version.id,
                    node_id: frame_id.clone(),
                    frame_index: index as u32,
                    frame_name: frame_id,
                    status: FrameEvaluationStatus::Skipped,
                    image_url: None,
                    accessibility: FrameAccessibility::default(),
                    elements: Vec::new(),
                    theme_keywords: Vec::new(),
                    critique: None,
                    error_detail: Some(FRAME_NOT_FOUND_DETAIL.to_string()),
                };
                return (evaluation, None);
            }
        };

        let frame_id = frame.frame.id.as_str();
        let rendered = match self
            .design_source
            .render_frame(&version.file_key, frame_id)
            .await
        {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(
                    frame_id,
                    frame_index = index,
                    error = %e,
                    "Frame render failed, using placeholder image"
                );
                None
            }
        };
        let image_url = rendered
            .clone()
            .unwrap_or_else(|| self.placeholder_image_url.clone());

        let elements = frame.elements();
        let critique_request = CritiqueRequest {
            frame_index: index as u32,
            frame_name: frame.frame.name.clone(),
            image_url: image_url.clone(),
            snapshot: request.snapshot.clone(),
            accessibility: frame.accessibility.clone(),
            elements: elements.clone(),
            theme_keywords: frame.theme_keywords.clone(),
        };

        let (status, critique, error_detail) = match self.critic.execute(&critique_request).await {
            Ok(critique) => (FrameEvaluationStatus::Evaluated, Some(critique), None),
            Err(e) => {
                warn!(
                    frame_id,
                    frame_index = index,
                    error = %e,
                    "Critique failed, frame skipped"
                );
                (FrameEvaluationStatus::Skipped, None, Some(e.detail()))
            }
        };

        let evaluation = NewFrameEvaluation {
            design_id: version.design_id,
            version_id: version.id,
            node_id: frame_id.to_string(),
            frame_index: index as u32,
            frame_name: frame.frame.name.clone(),
            status,
            image_url: Some(image_url),
            accessibility: frame.accessibility.clone(),
            elements,
            theme_keywords: frame.theme_keywords.clone(),
            critique,
            error_detail,
        };
        (evaluation, rendered)
    }

    /// Mark the version and the job as failed and hand the error back
    async fn fail(
        &self,
        version: &DesignVersion,
        job: &mut EvaluationJob,
        err: EvaluationError,
    ) -> EvaluationError {
        let outcome = VersionOutcome {
            status: VersionStatus::Error,
            aggregate_score: None,
            thumbnail_url: version.thumbnail_url.clone(),
        };
        if let Err(e) = self.ledger.complete_version(version.id, outcome).await {
            error!(error = %e, "Failed to mark version as error");
        }
        self.fail_job(job, err).await
    }

    async fn fail_job(&self, job: &mut EvaluationJob, err: EvaluationError) -> EvaluationError {
        error!(error = %err, "Evaluation run failed");
        if let Err(e) = self.workflow.fail_job(job, &err.to_string()).await {
            error!(error = %e, "Failed to persist job failure");
        }
        err
    }
}
