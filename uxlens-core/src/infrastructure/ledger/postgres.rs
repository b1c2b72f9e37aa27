//! SQLx implementation of the ledger repository
//!
//! Schema: `uxlens-core/schema/ledger.sql`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::critique::CritiqueResult;
use crate::domain::design::{DetectedElement, FrameAccessibility};
use crate::domain::ledger::{
    Design, DesignVersion, FrameEvaluation, FrameEvaluationStatus, LedgerError,
    LedgerRepository, NewDesign, NewDesignVersion, NewFrameEvaluation, VersionOutcome,
    VersionStatus,
};

const VERSION_COLUMNS: &str = "id, design_id, version, file_key, node_id, thumbnail_url, \
     aggregate_score, snapshot, status, created_by, created_at";

const EVALUATION_COLUMNS: &str = "id, design_id, version_id, node_id, frame_index, frame_name, \
     status, image_url, accessibility, elements, theme_keywords, critique, error_detail, created_at";

/// SQLx implementation of the ledger repository
pub struct SqlxLedgerRepository {
    pool: Arc<PgPool>,
}

impl SqlxLedgerRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> LedgerError {
    move |e| {
        tracing::error!("Database error {}: {}", context, e);
        LedgerError::DatabaseError {
            message: e.to_string(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct DesignRow {
    id: Uuid,
    title: String,
    owner_id: Option<String>,
    current_version_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl From<DesignRow> for Design {
    fn from(row: DesignRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            owner_id: row.owner_id,
            current_version_id: row.current_version_id,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct VersionRow {
    id: Uuid,
    design_id: Uuid,
    version: i32,
    file_key: String,
    node_id: Option<String>,
    thumbnail_url: Option<String>,
    aggregate_score: Option<i16>,
    snapshot: serde_json::Value,
    status: String,
    created_by: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<VersionRow> for DesignVersion {
    type Error = LedgerError;

    fn try_from(row: VersionRow) -> Result<Self, Self::Error> {
        let status =
            VersionStatus::parse(&row.status).ok_or_else(|| LedgerError::Serialization {
                message: format!("unknown version status '{}'", row.status),
            })?;
        Ok(Self {
            id: row.id,
            design_id: row.design_id,
            version: row.version,
            file_key: row.file_key,
            node_id: row.node_id,
            thumbnail_url: row.thumbnail_url,
            aggregate_score: row.aggregate_score.map(|s| s.clamp(0, 100) as u8),
            snapshot: row.snapshot,
            status,
            created_by: row.created_by,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct EvaluationRow {
    id: Uuid,
    design_id: Uuid,
    version_id: Uuid,
    node_id: String,
    frame_index: i32,
    frame_name: String,
    status: String,
    image_url: Option<String>,
    accessibility: Json<FrameAccessibility>,
    elements: Json<Vec<DetectedElement>>,
    theme_keywords: Vec<String>,
    critique: Option<Json<CritiqueResult>>,
    error_detail: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<EvaluationRow> for FrameEvaluation {
    type Error = LedgerError;

    fn try_from(row: EvaluationRow) -> Result<Self, Self::Error> {
        let status = FrameEvaluationStatus::parse(&row.status).ok_or_else(|| {
            LedgerError::Serialization {
                message: format!("unknown frame evaluation status '{}'", row.status),
            }
        })?;
        Ok(Self {
            id: row.id,
            design_id: row.design_id,
            version_id: row.version_id,
            node_id: row.node_id,
            frame_index: row.frame_index.max(0) as u32,
            frame_name: row.frame_name,
            status,
            image_url: row.image_url,
            accessibility: row.accessibility.0,
            elements: row.elements.0,
            theme_keywords: row.theme_keywords,
            critique: row.critique.map(|c| c.0),
            error_detail: row.error_detail,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl LedgerRepository for SqlxLedgerRepository {
    async fn create_design(&self, design: NewDesign) -> Result<Design, LedgerError> {
        let row = sqlx::query_as::<_, DesignRow>(
            r#"
            INSERT INTO designs (id, title, owner_id, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING id, title, owner_id, current_version_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&design.title)
        .bind(&design.owner_id)
        .fetch_one(&*self.pool)
        .await
        .map_err(db_error("creating design"))?;

        Ok(row.into())
    }

    async fn find_design(&self, design_id: Uuid) -> Result<Option<Design>, LedgerError> {
        let row = sqlx::query_as::<_, DesignRow>(
            "SELECT id, title, owner_id, current_version_id, created_at FROM designs WHERE id = $1",
        )
        .bind(design_id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(db_error("finding design"))?;

        Ok(row.map(Design::from))
    }

    async fn insert_version(
        &self,
        version: NewDesignVersion,
    ) -> Result<DesignVersion, LedgerError> {
        // Number assigned by the store; UNIQUE(design_id, version) rejects a racing writer
        let sql = format!(
            r#"
            INSERT INTO design_versions (
                id, design_id, version, file_key, node_id, thumbnail_url,
                snapshot, status, created_by, created_at
            )
            SELECT $1, $2, COALESCE(MAX(version), 0) + 1, $3, $4, $5, $6, 'pending', $7, NOW()
            FROM design_versions
            WHERE design_id = $2
            RETURNING {VERSION_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, VersionRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(version.design_id)
            .bind(&version.file_key)
            .bind(&version.node_id)
            .bind(&version.thumbnail_url)
            .bind(&version.snapshot)
            .bind(&version.created_by)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| {
                if let Some(db) = e.as_database_error() {
                    if db.is_unique_violation() {
                        return LedgerError::Conflict {
                            message: format!(
                                "concurrent version insert for design {}",
                                version.design_id
                            ),
                        };
                    }
                    if db.is_foreign_key_violation() {
                        return LedgerError::DesignNotFound {
                            id: version.design_id.to_string(),
                        };
                    }
                }
                db_error("inserting design version")(e)
            })?;

        row.try_into()
    }

    async fn find_version(&self, version_id: Uuid) -> Result<Option<DesignVersion>, LedgerError> {
        let sql = format!("SELECT {VERSION_COLUMNS} FROM design_versions WHERE id = $1");
        sqlx::query_as::<_, VersionRow>(&sql)
            .bind(version_id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(db_error("finding design version"))?
            .map(DesignVersion::try_from)
            .transpose()
    }

    async fn find_version_by_number(
        &self,
        design_id: Uuid,
        version: i32,
    ) -> Result<Option<DesignVersion>, LedgerError> {
        let sql = format!(
            "SELECT {VERSION_COLUMNS} FROM design_versions WHERE design_id = $1 AND version = $2"
        );
        sqlx::query_as::<_, VersionRow>(&sql)
            .bind(design_id)
            .bind(version)
            .fetch_optional(&*self.pool)
            .await
            .map_err(db_error("finding design version by number"))?
            .map(DesignVersion::try_from)
            .transpose()
    }

    async fn list_versions(&self, design_id: Uuid) -> Result<Vec<DesignVersion>, LedgerError> {
        let sql = format!(
            "SELECT {VERSION_COLUMNS} FROM design_versions WHERE design_id = $1 ORDER BY version ASC"
        );
        sqlx::query_as::<_, VersionRow>(&sql)
            .bind(design_id)
            .fetch_all(&*self.pool)
            .await
            .map_err(db_error("listing design versions"))?
            .into_iter()
            .map(DesignVersion::try_from)
            .collect()
    }

    async fn complete_version(
        &self,
        version_id: Uuid,
        outcome: VersionOutcome,
    ) -> Result<DesignVersion, LedgerError> {
        let sql = format!(
            r#"
            UPDATE design_versions
            SET status = $2,
                aggregate_score = $3,
                thumbnail_url = COALESCE($4, thumbnail_url)
            WHERE id = $1 AND status = 'pending'
            RETURNING {VERSION_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, VersionRow>(&sql)
            .bind(version_id)
            .bind(outcome.status.as_str())
            .bind(outcome.aggregate_score.map(i16::from))
            .bind(&outcome.thumbnail_url)
            .fetch_optional(&*self.pool)
            .await
            .map_err(db_error("completing design version"))?;

        match row {
            Some(row) => row.try_into(),
            None => match self.find_version(version_id).await? {
                Some(existing) => Err(LedgerError::InvalidStatusTransition {
                    from: existing.status.to_string(),
                    to: outcome.status.to_string(),
                }),
                None => Err(LedgerError::VersionNotFound {
                    id: version_id.to_string(),
                }),
            },
        }
    }

    async fn insert_frame_evaluation(
        &self,
        evaluation: NewFrameEvaluation,
    ) -> Result<FrameEvaluation, LedgerError> {
        let sql = format!(
            r#"
            INSERT INTO frame_evaluations (
                id, design_id, version_id, node_id, frame_index, frame_name, status, image_url,
                accessibility, elements, theme_keywords, critique, error_detail, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, NOW())
            RETURNING {EVALUATION_COLUMNS}
            "#
        );
        let version_id = evaluation.version_id;
        let row = sqlx::query_as::<_, EvaluationRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(evaluation.design_id)
            .bind(evaluation.version_id)
            .bind(&evaluation.node_id)
            .bind(evaluation.frame_index as i32)
            .bind(&evaluation.frame_name)
            .bind(evaluation.status.as_str())
            .bind(&evaluation.image_url)
            .bind(Json(&evaluation.accessibility))
            .bind(Json(&evaluation.elements))
            .bind(&evaluation.theme_keywords)
            .bind(evaluation.critique.as_ref().map(Json))
            .bind(&evaluation.error_detail)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| {
                if e
                    .as_database_error()
                    .is_some_and(|db| db.is_foreign_key_violation())
                {
                    return LedgerError::VersionNotFound {
                        id: version_id.to_string(),
                    };
                }
                db_error("inserting frame evaluation")(e)
            })?;

        row.try_into()
    }

    async fn list_frame_evaluations(
        &self,
        design_id: Uuid,
        version_id: Uuid,
    ) -> Result<Vec<FrameEvaluation>, LedgerError> {
        let sql = format!(
            r#"
            SELECT {EVALUATION_COLUMNS}
            FROM frame_evaluations
            WHERE design_id = $1 AND version_id = $2
            ORDER BY seq ASC
            "#
        );
        sqlx::query_as::<_, EvaluationRow>(&sql)
            .bind(design_id)
            .bind(version_id)
            .fetch_all(&*self.pool)
            .await
            .map_err(db_error("listing frame evaluations"))?
            .into_iter()
            .map(FrameEvaluation::try_from)
            .collect()
    }

    async fn set_current_version(
        &self,
        design_id: Uuid,
        version_id: Uuid,
    ) -> Result<(), LedgerError> {
        let result = sqlx::query(
            r#"
            UPDATE designs
            SET current_version_id = $2
            WHERE id = $1
              AND EXISTS (SELECT 1 FROM design_versions WHERE id = $2 AND design_id = $1)
            "#,
        )
        .bind(design_id)
        .bind(version_id)
        .execute(&*self.pool)
        .await
        .map_err(db_error("updating current version"))?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        if self.find_design(design_id).await?.is_none() {
            return Err(LedgerError::DesignNotFound {
                id: design_id.to_string(),
            });
        }
        match self.find_version(version_id).await? {
            Some(_) => Err(LedgerError::VersionDesignMismatch {
                design_id: design_id.to_string(),
                version_id: version_id.to_string(),
            }),
            None => Err(LedgerError::VersionNotFound {
                id: version_id.to_string(),
            }),
        }
    }
}
