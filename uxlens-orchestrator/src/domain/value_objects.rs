//! Orchestrator value objects

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Status of an evaluation job as seen by pollers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Version row created, no frame finished yet
    Started,
    /// At least one frame has a result
    Ongoing,
    Done,
    Error,
}

impl JobStatus {
    /// Returns the set of valid target states from the current state.
    ///
    /// ```text
    /// Started ──► Ongoing ──► Done
    ///   │  │         │
    ///   │  └──► Done └──► Error
    ///   └──────────────────► Error
    /// ```
    pub fn valid_transitions(&self) -> &[JobStatus] {
        match self {
            Self::Started => &[Self::Ongoing, Self::Done, Self::Error],
            Self::Ongoing => &[Self::Done, Self::Error],
            Self::Done | Self::Error => &[],
        }
    }

    pub fn can_transition_to(&self, target: &JobStatus) -> bool {
        self.valid_transitions().contains(target)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Ongoing => "ongoing",
            Self::Done => "done",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last known `{progress, status}` of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct JobProgress {
    /// 0-100, never decreases
    #[schema(example = 66)]
    pub progress: u8,
    pub status: JobStatus,
}

impl Default for JobProgress {
    /// What pollers see for a job id nobody knows about
    fn default() -> Self {
        Self {
            progress: 0,
            status: JobStatus::Started,
        }
    }
}

/// Recorded state transition for an evaluation job (audit trail).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobTransition {
    pub from: JobStatus,
    pub to: JobStatus,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Invalid job transition from {from} to {to}")]
pub struct JobTransitionError {
    pub from: JobStatus,
    pub to: JobStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states_have_no_exits() {
        for status in [JobStatus::Done, JobStatus::Error] {
            assert!(status.is_terminal());
            assert!(status.valid_transitions().is_empty());
        }
    }

    #[test]
    fn test_started_may_finish_without_frames() {
        assert!(JobStatus::Started.can_transition_to(&JobStatus::Done));
        assert!(!JobStatus::Ongoing.can_transition_to(&JobStatus::Started));
    }

    #[test]
    fn test_default_progress_is_started_zero() {
        let progress = JobProgress::default();
        assert_eq!(progress.progress, 0);
        assert_eq!(
            serde_json::to_value(progress).unwrap(),
            serde_json::json!({"progress": 0, "status": "started"})
        );
    }
}
