//! Ledger entities
//!
//! Versions and frame evaluations are append-only. The only mutable state is a design's
//! current-version pointer and a version's status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::critique::CritiqueResult;
use crate::domain::design::{DetectedElement, FrameAccessibility};

/// A design and its current-version pointer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Design {
    pub id: Uuid,
    pub title: String,
    pub owner_id: Option<String>,
    pub current_version_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDesign {
    pub title: String,
    pub owner_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    Pending,
    Done,
    Error,
}

impl VersionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
            Self::Error => "error",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "done" => Some(Self::Done),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// `pending` resolves exactly once, to `done` or `error`
    pub fn can_transition_to(&self, target: VersionStatus) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Done) | (Self::Pending, Self::Error)
        )
    }
}

impl std::fmt::Display for VersionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable snapshot of one evaluation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DesignVersion {
    pub id: Uuid,
    pub design_id: Uuid,
    /// Per design, starting at 1, never reused
    pub version: i32,
    pub file_key: String,
    pub node_id: Option<String>,
    pub thumbnail_url: Option<String>,
    /// Set when the run completes
    pub aggregate_score: Option<u8>,
    /// Caller-supplied persona/demographic context
    #[schema(value_type = Object)]
    pub snapshot: serde_json::Value,
    pub status: VersionStatus,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a version. The store assigns id, number and timestamp.
#[derive(Debug, Clone)]
pub struct NewDesignVersion {
    pub design_id: Uuid,
    pub file_key: String,
    pub node_id: Option<String>,
    pub thumbnail_url: Option<String>,
    pub snapshot: serde_json::Value,
    pub created_by: Option<String>,
}

/// Final state written once per version
#[derive(Debug, Clone, PartialEq)]
pub struct VersionOutcome {
    pub status: VersionStatus,
    pub aggregate_score: Option<u8>,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FrameEvaluationStatus {
    Evaluated,
    Skipped,
}

impl FrameEvaluationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Evaluated => "evaluated",
            Self::Skipped => "skipped",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "evaluated" => Some(Self::Evaluated),
            "skipped" => Some(Self::Skipped),
            _ => None,
        }
    }
}

/// Deterministic metrics of one frame joined with its critique
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FrameEvaluation {
    pub id: Uuid,
    pub design_id: Uuid,
    pub version_id: Uuid,
    pub node_id: String,
    /// Position of the frame in the run's request
    pub frame_index: u32,
    pub frame_name: String,
    pub status: FrameEvaluationStatus,
    pub image_url: Option<String>,
    pub accessibility: FrameAccessibility,
    pub elements: Vec<DetectedElement>,
    /// Theme keywords the frame matched
    pub theme_keywords: Vec<String>,
    /// `None` for skipped frames
    pub critique: Option<CritiqueResult>,
    /// Diagnostic detail kept for skipped frames
    pub error_detail: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFrameEvaluation {
    pub design_id: Uuid,
    pub version_id: Uuid,
    pub node_id: String,
    pub frame_index: u32,
    pub frame_name: String,
    pub status: FrameEvaluationStatus,
    pub image_url: Option<String>,
    pub accessibility: FrameAccessibility,
    pub elements: Vec<DetectedElement>,
    pub theme_keywords: Vec<String>,
    pub critique: Option<CritiqueResult>,
    pub error_detail: Option<String>,
}

impl NewFrameEvaluation {
    pub fn into_evaluation(self, id: Uuid, created_at: DateTime<Utc>) -> FrameEvaluation {
        FrameEvaluation {
            id,
            design_id: self.design_id,
            version_id: self.version_id,
            node_id: self.node_id,
            frame_index: self.frame_index,
            frame_name: self.frame_name,
            status: self.status,
            image_url: self.image_url,
            accessibility: self.accessibility,
            elements: self.elements,
            theme_keywords: self.theme_keywords,
            critique: self.critique,
            error_detail: self.error_detail,
            created_at,
        }
    }
}
