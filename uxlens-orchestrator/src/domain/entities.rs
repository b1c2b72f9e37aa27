//! Orchestrator domain entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use uxlens_core::domain::{Design, DesignVersion, FrameEvaluation, FrameEvaluationStatus};

use super::value_objects::{JobProgress, JobStatus, JobTransition, JobTransitionError};

/// What a caller asks to have evaluated
#[derive(Debug, Clone, Default)]
pub struct EvaluationRequest {
    pub design_id: Uuid,
    pub file_key: String,
    /// Restricts the fetched tree to one node of the file
    pub node_id: Option<String>,
    /// Frames to critique, in order. Empty means every frame of the document.
    pub frame_ids: Vec<String>,
    /// Persona/demographic context passed to the critique and stored on the version
    pub snapshot: serde_json::Value,
    pub thumbnail_url: Option<String>,
    pub created_by: Option<String>,
}

/// Progress record of one evaluation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationJob {
    pub job_id: Uuid,
    pub design_id: Uuid,
    pub version_id: Uuid,
    pub status: JobStatus,
    pub progress: u8,
    pub frames_total: usize,
    pub frames_completed: usize,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub transitions: Vec<JobTransition>,
}

impl EvaluationJob {
    pub fn new(design_id: Uuid, version_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            job_id: Uuid::new_v4(),
            design_id,
            version_id,
            status: JobStatus::Started,
            progress: 0,
            frames_total: 0,
            frames_completed: 0,
            error: None,
            created_at: now,
            updated_at: now,
            transitions: Vec::new(),
        }
    }

    pub fn transition(
        &mut self,
        target: JobStatus,
        reason: Option<String>,
    ) -> Result<(), JobTransitionError> {
        if !self.status.can_transition_to(&target) {
            return Err(JobTransitionError {
                from: self.status,
                to: target,
            });
        }
        let now = Utc::now();
        self.transitions.push(JobTransition {
            from: self.status,
            to: target,
            timestamp: now,
            reason,
        });
        self.status = target;
        self.updated_at = now;
        Ok(())
    }

    /// Count one more finished frame (evaluated or skipped) and advance progress.
    ///
    /// Progress is `completed * 100 / total`, rounded down, and never moves backwards.
    pub fn record_frame(&mut self) -> Result<(), JobTransitionError> {
        if self.status == JobStatus::Started {
            self.transition(JobStatus::Ongoing, Some("First frame finished".into()))?;
        }
        self.frames_completed = (self.frames_completed + 1).min(self.frames_total.max(1));
        let progress = match self.frames_total {
            0 => 100,
            total => (self.frames_completed * 100 / total).min(100) as u8,
        };
        self.progress = self.progress.max(progress);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn snapshot(&self) -> JobProgress {
        JobProgress {
            progress: self.progress,
            status: self.status,
        }
    }
}

/// Counts and aggregate score of a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub aggregate_score: Option<u8>,
    pub evaluated: usize,
    pub skipped: usize,
}

impl RunSummary {
    /// Mean critique score of evaluated frames. When every frame was skipped the mean
    /// accessibility score stands in; no frames at all gives no score.
    pub fn from_evaluations(evaluations: &[FrameEvaluation]) -> Self {
        let critique_scores = evaluations
            .iter()
            .filter(|e| e.status == FrameEvaluationStatus::Evaluated)
            .filter_map(|e| e.critique.as_ref().map(|c| c.overall_score))
            .collect::<Vec<_>>();
        let evaluated = critique_scores.len();
        let skipped = evaluations.len() - evaluated;

        let aggregate_score = if !critique_scores.is_empty() {
            Some(rounded_mean(&critique_scores))
        } else if !evaluations.is_empty() {
            let accessibility = evaluations
                .iter()
                .map(|e| e.accessibility.average_score)
                .collect::<Vec<_>>();
            Some(rounded_mean(&accessibility))
        } else {
            None
        };

        Self {
            aggregate_score,
            evaluated,
            skipped,
        }
    }
}

fn rounded_mean(scores: &[u8]) -> u8 {
    let sum = scores.iter().map(|s| *s as f64).sum::<f64>();
    (sum / scores.len() as f64).round() as u8
}

/// Returned when a run has been accepted
#[derive(Debug, Clone, PartialEq)]
pub struct StartedEvaluation {
    pub job: EvaluationJob,
    pub version: DesignVersion,
}

/// Frames with critique data for one version of a design
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResults {
    pub design_id: Uuid,
    /// `None` when the design has no current version yet
    pub version: Option<DesignVersion>,
    pub frames: Vec<FrameEvaluation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VersionHistory {
    pub design: Design,
    /// Ascending version number
    pub versions: Vec<DesignVersion>,
}
