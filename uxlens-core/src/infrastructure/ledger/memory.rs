//! In-memory ledger for development and tests

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::ledger::{
    Design, DesignVersion, FrameEvaluation, LedgerError, LedgerRepository, NewDesign,
    NewDesignVersion, NewFrameEvaluation, VersionOutcome, VersionStatus,
};

#[derive(Default)]
struct LedgerState {
    designs: HashMap<Uuid, Design>,
    /// Append-only, insertion order
    versions: Vec<DesignVersion>,
    /// Append-only, insertion order
    evaluations: Vec<FrameEvaluation>,
}

/// Ledger held behind a single lock so version numbering is atomic
#[derive(Default)]
pub struct InMemoryLedgerRepository {
    state: RwLock<LedgerState>,
}

impl InMemoryLedgerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerRepository for InMemoryLedgerRepository {
    async fn create_design(&self, design: NewDesign) -> Result<Design, LedgerError> {
        let design = Design {
            id: Uuid::new_v4(),
            title: design.title,
            owner_id: design.owner_id,
            current_version_id: None,
            created_at: Utc::now(),
        };
        self.state
            .write()
            .await
            .designs
            .insert(design.id, design.clone());
        Ok(design)
    }

    async fn find_design(&self, design_id: Uuid) -> Result<Option<Design>, LedgerError> {
        Ok(self.state.read().await.designs.get(&design_id).cloned())
    }

    async fn insert_version(
        &self,
        version: NewDesignVersion,
    ) -> Result<DesignVersion, LedgerError> {
        let mut state = self.state.write().await;
        if !state.designs.contains_key(&version.design_id) {
            return Err(LedgerError::DesignNotFound {
                id: version.design_id.to_string(),
            });
        }

        let next = state
            .versions
            .iter()
            .filter(|v| v.design_id == version.design_id)
            .map(|v| v.version)
            .max()
            .unwrap_or(0)
            + 1;

        let row = DesignVersion {
            id: Uuid::new_v4(),
            design_id: version.design_id,
            version: next,
            file_key: version.file_key,
            node_id: version.node_id,
            thumbnail_url: version.thumbnail_url,
            aggregate_score: None,
            snapshot: version.snapshot,
            status: VersionStatus::Pending,
            created_by: version.created_by,
            created_at: Utc::now(),
        };
        state.versions.push(row.clone());
        Ok(row)
    }

    async fn find_version(&self, version_id: Uuid) -> Result<Option<DesignVersion>, LedgerError> {
        Ok(self
            .state
            .read()
            .await
            .versions
            .iter()
            .find(|v| v.id == version_id)
            .cloned())
    }

    async fn find_version_by_number(
        &self,
        design_id: Uuid,
        version: i32,
    ) -> Result<Option<DesignVersion>, LedgerError> {
        Ok(self
            .state
            .read()
            .await
            .versions
            .iter()
            .find(|v| v.design_id == design_id && v.version == version)
            .cloned())
    }

    async fn list_versions(&self, design_id: Uuid) -> Result<Vec<DesignVersion>, LedgerError> {
        let mut versions: Vec<DesignVersion> = self
            .state
            .read()
            .await
            .versions
            .iter()
            .filter(|v| v.design_id == design_id)
            .cloned()
            .collect();
        versions.sort_by_key(|v| v.version);
        Ok(versions)
    }

    async fn complete_version(
        &self,
        version_id: Uuid,
        outcome: VersionOutcome,
    ) -> Result<DesignVersion, LedgerError> {
        let mut state = self.state.write().await;
        let row = state
            .versions
            .iter_mut()
            .find(|v| v.id == version_id)
            .ok_or_else(|| LedgerError::VersionNotFound {
                id: version_id.to_string(),
            })?;

        if !row.status.can_transition_to(outcome.status) {
            return Err(LedgerError::InvalidStatusTransition {
                from: row.status.to_string(),
                to: outcome.status.to_string(),
            });
        }

        row.status = outcome.status;
        row.aggregate_score = outcome.aggregate_score;
        if outcome.thumbnail_url.is_some() {
            row.thumbnail_url = outcome.thumbnail_url;
        }
        Ok(row.clone())
    }

    async fn insert_frame_evaluation(
        &self,
        evaluation: NewFrameEvaluation,
    ) -> Result<FrameEvaluation, LedgerError> {
        let mut state = self.state.write().await;
        if !state
            .versions
            .iter()
            .any(|v| v.id == evaluation.version_id && v.design_id == evaluation.design_id)
        {
            return Err(LedgerError::VersionNotFound {
                id: evaluation.version_id.to_string(),
            });
        }

        let row = evaluation.into_evaluation(Uuid::new_v4(), Utc::now());
        state.evaluations.push(row.clone());
        Ok(row)
    }

    async fn list_frame_evaluations(
        &self,
        design_id: Uuid,
        version_id: Uuid,
    ) -> Result<Vec<FrameEvaluation>, LedgerError> {
        Ok(self
            .state
            .read()
            .await
            .evaluations
            .iter()
            .filter(|e| e.design_id == design_id && e.version_id == version_id)
            .cloned()
            .collect())
    }

    async fn set_current_version(
        &self,
        design_id: Uuid,
        version_id: Uuid,
    ) -> Result<(), LedgerError> {
        let mut state = self.state.write().await;
        let belongs = state
            .versions
            .iter()
            .find(|v| v.id == version_id)
            .map(|v| v.design_id == design_id);

        match belongs {
            None => Err(LedgerError::VersionNotFound {
                id: version_id.to_string(),
            }),
            Some(false) => Err(LedgerError::VersionDesignMismatch {
                design_id: design_id.to_string(),
                version_id: version_id.to_string(),
            }),
            Some(true) => {
                let design =
                    state
                        .designs
                        .get_mut(&design_id)
                        .ok_or_else(|| LedgerError::DesignNotFound {
                            id: design_id.to_string(),
                        })?;
                design.current_version_id = Some(version_id);
                Ok(())
            }
        }
    }
}
