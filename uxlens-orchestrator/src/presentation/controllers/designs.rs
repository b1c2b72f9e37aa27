//! Design and version-history controllers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Json, Response},
};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::presentation::controllers::{OrchestratorState, map_evaluation_error};
use crate::presentation::middleware::RequestId;
use crate::presentation::models::{
    CreateDesignRequest, DesignResponse, ErrorResponse, RevertRequest, VersionHistoryResponse,
};

/// POST /api/v1/designs - Register a design
#[utoipa::path(
    post,
    path = "/api/v1/designs",
    request_body = CreateDesignRequest,
    responses(
        (status = 201, description = "Design created", body = DesignResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "designs"
)]
#[instrument(skip(state, request_id, request))]
pub async fn create_design(
    State(state): State<OrchestratorState>,
    request_id: RequestId,
    Json(request): Json<CreateDesignRequest>,
) -> Result<(StatusCode, Json<DesignResponse>), Response> {
    let design = state
        .create_design_use_case
        .execute(&request.title, request.owner_id)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create design");
            map_evaluation_error(e, request_id)
        })?;

    Ok((StatusCode::CREATED, Json(DesignResponse::from(design))))
}

/// GET /api/v1/designs/{design_id}/versions - Version history
#[utoipa::path(
    get,
    path = "/api/v1/designs/{design_id}/versions",
    params(
        ("design_id" = Uuid, Path, description = "Design ID")
    ),
    responses(
        (status = 200, description = "Versions in ascending order", body = VersionHistoryResponse),
        (status = 404, description = "Design not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "designs"
)]
#[instrument(skip(state, request_id))]
pub async fn list_versions(
    State(state): State<OrchestratorState>,
    request_id: RequestId,
    Path(design_id): Path<Uuid>,
) -> Result<Json<VersionHistoryResponse>, Response> {
    let history = state
        .list_versions_use_case
        .execute(design_id)
        .await
        .map_err(|e| map_evaluation_error(e, request_id))?;

    Ok(Json(VersionHistoryResponse::from(history)))
}

/// POST /api/v1/designs/{design_id}/revert - Move the current-version pointer
#[utoipa::path(
    post,
    path = "/api/v1/designs/{design_id}/revert",
    params(
        ("design_id" = Uuid, Path, description = "Design ID")
    ),
    request_body = RevertRequest,
    responses(
        (status = 200, description = "Pointer moved", body = DesignResponse),
        (status = 400, description = "Version belongs to another design", body = ErrorResponse),
        (status = 404, description = "Design or version not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "designs"
)]
#[instrument(skip(state, request_id, request), fields(version_id = %request.version_id))]
pub async fn revert_version(
    State(state): State<OrchestratorState>,
    request_id: RequestId,
    Path(design_id): Path<Uuid>,
    Json(request): Json<RevertRequest>,
) -> Result<Json<DesignResponse>, Response> {
    let design = state
        .revert_version_use_case
        .execute(design_id, request.version_id)
        .await
        .map_err(|e| {
            error!(error = %e, "Revert rejected");
            map_evaluation_error(e, request_id)
        })?;

    info!("Design reverted");
    Ok(Json(DesignResponse::from(design)))
}
