//! Evaluation error taxonomy

use uxlens_core::domain::LedgerError;

use super::value_objects::JobTransitionError;

/// Errors surfaced to callers of the evaluation use cases.
///
/// Per-frame degradations (render failure, critique failure, unparsable output) never
/// reach this type; they are recorded on the frame evaluation instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    /// Missing or invalid design, file or version reference
    #[error("Invalid input: {message}")]
    Input { message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The design document could not be fetched or analysed
    #[error("Upstream service failed: {message}")]
    Upstream { message: String },

    #[error("Persistence failed: {message}")]
    Persistence { message: String },

    /// Shutdown began before the run finished
    #[error("Evaluation cancelled")]
    Cancelled,
}

impl EvaluationError {
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Input { .. } | Self::NotFound { .. })
    }
}

impl From<LedgerError> for EvaluationError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::DesignNotFound { id } => Self::NotFound {
                entity: "Design",
                id,
            },
            LedgerError::VersionNotFound { id } => Self::NotFound {
                entity: "Design version",
                id,
            },
            LedgerError::VersionDesignMismatch { .. } => Self::input(err.to_string()),
            other => Self::persistence(other.to_string()),
        }
    }
}

impl From<JobTransitionError> for EvaluationError {
    fn from(err: JobTransitionError) -> Self {
        Self::persistence(err.to_string())
    }
}
