//! Ledger domain errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Design not found: {id}")]
    DesignNotFound { id: String },

    #[error("Design version not found: {id}")]
    VersionNotFound { id: String },

    /// The version exists but belongs to another design
    #[error("Version {version_id} does not belong to design {design_id}")]
    VersionDesignMismatch {
        design_id: String,
        version_id: String,
    },

    #[error("Illegal version status change from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    /// Two writers raced for the same version number
    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Database error: {message}")]
    DatabaseError { message: String },
}

impl LedgerError {
    /// Errors caused by the caller's references rather than the store
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::DesignNotFound { .. }
                | Self::VersionNotFound { .. }
                | Self::VersionDesignMismatch { .. }
        )
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}
