//! Orchestrator domain services

use async_trait::async_trait;
use serde_json::Value;

/// Read-only access to the design tool's document API
#[async_trait]
pub trait DesignSource: Send + Sync {
    /// Raw node tree of a file, or of a single node when `node_id` is given
    async fn fetch_document(
        &self,
        file_key: &str,
        node_id: Option<&str>,
    ) -> Result<Value, DesignSourceError>;

    /// URL of a rendered image of one node
    async fn render_frame(&self, file_key: &str, node_id: &str)
    -> Result<String, DesignSourceError>;
}

/// Design API error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DesignSourceError {
    #[error("Design file or node not found: {0}")]
    NotFound(String),

    #[error("Design API rejected the access token: {0}")]
    Unauthorized(String),

    #[error("Design API rate limit exceeded")]
    RateLimited,

    #[error("Design API returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid design API response: {0}")]
    InvalidResponse(String),

    /// The render endpoint answered but produced no image for the node
    #[error("No render produced for node {0}")]
    NotRendered(String),
}

impl DesignSourceError {
    /// Errors that point at the caller's file or node reference
    pub fn is_reference_error(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
