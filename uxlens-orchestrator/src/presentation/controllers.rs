//! Orchestrator API controllers

pub mod designs;
pub mod evaluations;
pub mod health;
pub mod jobs;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use crate::application::use_cases::{
    CreateDesignUseCase, GetEvaluationResultsUseCase, GetProgressUseCase, ListVersionsUseCase,
    RevertVersionUseCase, StartEvaluationUseCase,
};
use crate::domain::errors::EvaluationError;
use crate::presentation::middleware::RequestId;
use crate::presentation::models::ErrorResponse;

/// Application state for orchestrator
#[derive(Clone)]
pub struct OrchestratorState {
    pub create_design_use_case: Arc<CreateDesignUseCase>,
    pub start_evaluation_use_case: Arc<StartEvaluationUseCase>,
    pub get_progress_use_case: Arc<GetProgressUseCase>,
    pub get_results_use_case: Arc<GetEvaluationResultsUseCase>,
    pub list_versions_use_case: Arc<ListVersionsUseCase>,
    pub revert_version_use_case: Arc<RevertVersionUseCase>,
}

fn error_response(
    status: StatusCode,
    code: &str,
    message: String,
    request_id: RequestId,
) -> Response {
    let body = Json(ErrorResponse {
        code: code.to_string(),
        message,
        details: None,
        request_id: request_id.0,
        timestamp: chrono::Utc::now(),
    });

    (status, body).into_response()
}

pub(crate) fn map_evaluation_error(error: EvaluationError, request_id: RequestId) -> Response {
    let (status, code) = match &error {
        EvaluationError::Input { .. } => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
        EvaluationError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        EvaluationError::Upstream { .. } => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
        EvaluationError::Persistence { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE_ERROR")
        }
        EvaluationError::Cancelled => (StatusCode::SERVICE_UNAVAILABLE, "SHUTTING_DOWN"),
    };

    error_response(status, code, error.to_string(), request_id)
}
