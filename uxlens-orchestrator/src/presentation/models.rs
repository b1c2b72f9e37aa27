//! API request and response models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use uxlens_core::domain::{Design, DesignVersion, FrameEvaluation, VersionStatus};

use crate::domain::entities::{EvaluationRequest, EvaluationResults, VersionHistory};
use crate::domain::value_objects::JobStatus;

/// Request model for registering a design
#[derive(Deserialize, ToSchema)]
pub struct CreateDesignRequest {
    #[schema(example = "Checkout redesign")]
    pub title: String,

    /// Opaque owner reference supplied by the caller's auth layer
    #[schema(example = "user_42")]
    pub owner_id: Option<String>,
}

/// Design with its current-version pointer
#[derive(Serialize, ToSchema)]
pub struct DesignResponse {
    pub id: Uuid,
    pub title: String,
    pub owner_id: Option<String>,
    /// Version shown by default; `null` until a run has finished
    pub current_version_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<Design> for DesignResponse {
    fn from(design: Design) -> Self {
        Self {
            id: design.id,
            title: design.title,
            owner_id: design.owner_id,
            current_version_id: design.current_version_id,
            created_at: design.created_at,
        }
    }
}

/// Request model for starting an evaluation run
#[derive(Deserialize, ToSchema)]
pub struct StartEvaluationRequest {
    /// Design-tool file key
    #[schema(example = "FgK3x9PqLm2")]
    pub file_key: String,

    /// Restrict the run to one node of the file
    #[schema(example = "12:34")]
    pub node_id: Option<String>,

    /// Frames to evaluate, in order. Omit to evaluate every frame.
    #[serde(default)]
    #[schema(example = json!(["1:2", "1:7"]))]
    pub frame_ids: Vec<String>,

    /// Persona or demographic context for the critique
    #[schema(value_type = Object, example = json!({"persona": "first-time shopper", "age_range": "55-70"}))]
    pub snapshot: Option<serde_json::Value>,

    pub thumbnail_url: Option<String>,

    pub created_by: Option<String>,
}

impl StartEvaluationRequest {
    pub fn into_domain(self, design_id: Uuid) -> EvaluationRequest {
        EvaluationRequest {
            design_id,
            file_key: self.file_key,
            node_id: self.node_id,
            frame_ids: self.frame_ids,
            snapshot: self
                .snapshot
                .unwrap_or_else(|| serde_json::Value::Object(Default::default())),
            thumbnail_url: self.thumbnail_url,
            created_by: self.created_by,
        }
    }
}

/// Response returned when a run is accepted for background processing
#[derive(Serialize, ToSchema)]
pub struct EvaluationAcceptedResponse {
    pub job_id: Uuid,
    pub version_id: Uuid,
    /// Version number assigned to this run
    #[schema(example = 4)]
    pub version: i32,
    pub status: JobStatus,
    #[schema(example = "/api/v1/jobs/550e8400-e29b-41d4-a716-446655440000/progress")]
    pub progress_url: String,
}

/// Query parameters for evaluation results
#[derive(Debug, Deserialize, IntoParams)]
pub struct ResultsQuery {
    /// Read this version instead of the current one
    pub version_id: Option<Uuid>,
}

/// Critiqued frames of one version
#[derive(Serialize, ToSchema)]
pub struct EvaluationResultsResponse {
    pub design_id: Uuid,
    /// `null` when the design has no current version yet
    pub version_id: Option<Uuid>,
    pub version: Option<i32>,
    pub aggregate_score: Option<u8>,
    /// Frames with critique data, in evaluation order
    pub frames: Vec<FrameEvaluation>,
}

impl From<EvaluationResults> for EvaluationResultsResponse {
    fn from(results: EvaluationResults) -> Self {
        Self {
            design_id: results.design_id,
            version_id: results.version.as_ref().map(|v| v.id),
            version: results.version.as_ref().map(|v| v.version),
            aggregate_score: results.version.and_then(|v| v.aggregate_score),
            frames: results.frames,
        }
    }
}

/// One entry of a design's version history
#[derive(Serialize, ToSchema)]
pub struct VersionDto {
    pub id: Uuid,
    pub version: i32,
    pub status: VersionStatus,
    pub aggregate_score: Option<u8>,
    pub file_key: String,
    pub node_id: Option<String>,
    pub thumbnail_url: Option<String>,
    #[schema(value_type = Object)]
    pub snapshot: serde_json::Value,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_current: bool,
}

impl VersionDto {
    fn from_version(version: DesignVersion, current: Option<Uuid>) -> Self {
        Self {
            is_current: current == Some(version.id),
            id: version.id,
            version: version.version,
            status: version.status,
            aggregate_score: version.aggregate_score,
            file_key: version.file_key,
            node_id: version.node_id,
            thumbnail_url: version.thumbnail_url,
            snapshot: version.snapshot,
            created_by: version.created_by,
            created_at: version.created_at,
        }
    }
}

/// Version history in ascending version order
#[derive(Serialize, ToSchema)]
pub struct VersionHistoryResponse {
    pub design_id: Uuid,
    pub current_version_id: Option<Uuid>,
    pub versions: Vec<VersionDto>,
}

impl From<VersionHistory> for VersionHistoryResponse {
    fn from(history: VersionHistory) -> Self {
        let current = history.design.current_version_id;
        Self {
            design_id: history.design.id,
            current_version_id: current,
            versions: history
                .versions
                .into_iter()
                .map(|v| VersionDto::from_version(v, current))
                .collect(),
        }
    }
}

/// Request model for moving the current-version pointer
#[derive(Deserialize, ToSchema)]
pub struct RevertRequest {
    pub version_id: Uuid,
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code
    #[schema(example = "INVALID_INPUT")]
    pub code: String,

    /// Human-readable error message
    #[schema(example = "file_key must not be empty")]
    pub message: String,

    /// Additional error context
    pub details: Option<serde_json::Value>,

    /// Unique request identifier for tracking and support
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub request_id: Uuid,

    /// Error occurrence timestamp
    #[schema(example = "2024-01-15T10:30:00Z")]
    pub timestamp: DateTime<Utc>,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,

    #[schema(example = "uxlens")]
    pub service: String,

    #[schema(example = "0.3.0")]
    pub version: String,

    pub timestamp: DateTime<Utc>,
}
