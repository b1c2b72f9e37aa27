//! Evaluation run controllers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Json, Response},
};
use tracing::{error, instrument};
use uuid::Uuid;

use crate::presentation::controllers::{OrchestratorState, map_evaluation_error};
use crate::presentation::middleware::RequestId;
use crate::presentation::models::{
    ErrorResponse, EvaluationAcceptedResponse, EvaluationResultsResponse, ResultsQuery,
    StartEvaluationRequest,
};

/// POST /api/v1/designs/{design_id}/evaluations - Start an evaluation run
#[utoipa::path(
    post,
    path = "/api/v1/designs/{design_id}/evaluations",
    params(
        ("design_id" = Uuid, Path, description = "Design ID")
    ),
    request_body = StartEvaluationRequest,
    responses(
        (status = 202, description = "Run accepted; poll the progress URL", body = EvaluationAcceptedResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Design not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "evaluations"
)]
#[instrument(skip(state, request_id, request))]
pub async fn start_evaluation(
    State(state): State<OrchestratorState>,
    request_id: RequestId,
    Path(design_id): Path<Uuid>,
    Json(request): Json<StartEvaluationRequest>,
) -> Result<(StatusCode, Json<EvaluationAcceptedResponse>), Response> {
    let started = state
        .start_evaluation_use_case
        .execute(request.into_domain(design_id))
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to start evaluation");
            map_evaluation_error(e, request_id)
        })?;

    let job_id = started.job.job_id;
    Ok((
        StatusCode::ACCEPTED,
        Json(EvaluationAcceptedResponse {
            job_id,
            version_id: started.version.id,
            version: started.version.version,
            status: started.job.status,
            progress_url: format!("/api/v1/jobs/{}/progress", job_id),
        }),
    ))
}

/// GET /api/v1/designs/{design_id}/evaluations - Critiqued frames of a version
#[utoipa::path(
    get,
    path = "/api/v1/designs/{design_id}/evaluations",
    params(
        ("design_id" = Uuid, Path, description = "Design ID"),
        ResultsQuery
    ),
    responses(
        (status = 200, description = "Frames with critique data", body = EvaluationResultsResponse),
        (status = 400, description = "Version belongs to another design", body = ErrorResponse),
        (status = 404, description = "Design or version not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "evaluations"
)]
#[instrument(skip(state, request_id))]
pub async fn get_evaluation_results(
    State(state): State<OrchestratorState>,
    request_id: RequestId,
    Path(design_id): Path<Uuid>,
    Query(query): Query<ResultsQuery>,
) -> Result<Json<EvaluationResultsResponse>, Response> {
    let results = state
        .get_results_use_case
        .execute(design_id, query.version_id)
        .await
        .map_err(|e| map_evaluation_error(e, request_id))?;

    Ok(Json(EvaluationResultsResponse::from(results)))
}
