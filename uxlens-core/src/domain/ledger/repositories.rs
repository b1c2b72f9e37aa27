//! Ledger repository trait

use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{
    Design, DesignVersion, FrameEvaluation, NewDesign, NewDesignVersion, NewFrameEvaluation,
    VersionOutcome,
};
use super::errors::LedgerError;

/// Persistence contract for designs, versions and frame evaluations
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    async fn create_design(&self, design: NewDesign) -> Result<Design, LedgerError>;

    async fn find_design(&self, design_id: Uuid) -> Result<Option<Design>, LedgerError>;

    /// Insert a `pending` version numbered max(existing) + 1 for the design
    async fn insert_version(
        &self,
        version: NewDesignVersion,
    ) -> Result<DesignVersion, LedgerError>;

    async fn find_version(&self, version_id: Uuid) -> Result<Option<DesignVersion>, LedgerError>;

    async fn find_version_by_number(
        &self,
        design_id: Uuid,
        version: i32,
    ) -> Result<Option<DesignVersion>, LedgerError>;

    /// Ascending version order
    async fn list_versions(&self, design_id: Uuid) -> Result<Vec<DesignVersion>, LedgerError>;

    /// Resolve a pending version. Fails with `InvalidStatusTransition` otherwise.
    async fn complete_version(
        &self,
        version_id: Uuid,
        outcome: VersionOutcome,
    ) -> Result<DesignVersion, LedgerError>;

    async fn insert_frame_evaluation(
        &self,
        evaluation: NewFrameEvaluation,
    ) -> Result<FrameEvaluation, LedgerError>;

    /// Insertion order
    async fn list_frame_evaluations(
        &self,
        design_id: Uuid,
        version_id: Uuid,
    ) -> Result<Vec<FrameEvaluation>, LedgerError>;

    /// Single atomic write of the current-version pointer, last writer wins
    async fn set_current_version(
        &self,
        design_id: Uuid,
        version_id: Uuid,
    ) -> Result<(), LedgerError>;
}
