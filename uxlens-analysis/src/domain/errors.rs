//! Analysis errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    /// The document root is JSON but not an object
    #[error("Document root must be a JSON object, got {found}")]
    InvalidRoot { found: String },
}

/// Failure of a single button-detection worker. Siblings are unaffected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectionError {
    #[error("Frame {frame_id} exceeds the maximum tree depth of {max_depth}")]
    DepthExceeded { frame_id: String, max_depth: usize },

    #[error("Detection worker for frame {frame_id} failed: {message}")]
    WorkerFailed { frame_id: String, message: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// A scoring or accordion task panicked or was cancelled
    #[error("Analysis task failed: {message}")]
    TaskFailed { message: String },
}
