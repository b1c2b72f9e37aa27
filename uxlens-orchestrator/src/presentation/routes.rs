//! Route definitions and server setup

use axum::http::StatusCode;
use axum::{
    Router, middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use uxlens_core::Config;
use uxlens_core::domain::{
    CategoryScores, ComplianceLevel, CritiqueIssue, CritiqueResult, DetectedElement, ElementKind,
    ElementSource, FrameAccessibility, FrameEvaluation, FrameEvaluationStatus, HeuristicCode,
    Resource, Severity, TextAccessibility, VersionStatus,
};

use crate::domain::value_objects::{JobProgress, JobStatus};
use crate::presentation::{
    controllers::{
        OrchestratorState,
        designs::{create_design, list_versions, revert_version},
        evaluations::{get_evaluation_results, start_evaluation},
        health::health_check,
        jobs::get_job_progress,
    },
    middleware::logging_middleware,
    models::*,
};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::controllers::designs::create_design,
        crate::presentation::controllers::designs::list_versions,
        crate::presentation::controllers::designs::revert_version,
        crate::presentation::controllers::evaluations::start_evaluation,
        crate::presentation::controllers::evaluations::get_evaluation_results,
        crate::presentation::controllers::jobs::get_job_progress,
        crate::presentation::controllers::health::health_check,
    ),
    components(schemas(
        CreateDesignRequest,
        DesignResponse,
        StartEvaluationRequest,
        EvaluationAcceptedResponse,
        EvaluationResultsResponse,
        VersionDto,
        VersionHistoryResponse,
        RevertRequest,
        ErrorResponse,
        HealthResponse,
        JobProgress,
        JobStatus,
        VersionStatus,
        FrameEvaluation,
        FrameEvaluationStatus,
        FrameAccessibility,
        TextAccessibility,
        ComplianceLevel,
        DetectedElement,
        ElementKind,
        ElementSource,
        CritiqueResult,
        CritiqueIssue,
        HeuristicCode,
        CategoryScores,
        Severity,
        Resource,
    )),
    tags(
        (name = "designs", description = "Designs, version history and revert"),
        (name = "evaluations", description = "Evaluation runs and their critiqued frames"),
        (name = "jobs", description = "Progress polling for background runs"),
        (name = "health", description = "Service health")
    ),
    info(
        title = "uxlens API",
        version = "0.3.0",
        description = "Evaluates design-tool frames with deterministic accessibility metrics and a structured model critique, versioning every run per design."
    )
)]
pub struct ApiDoc;

fn build_cors_layer(config: &Config) -> CorsLayer {
    let methods = [
        axum::http::Method::GET,
        axum::http::Method::POST,
        axum::http::Method::OPTIONS,
    ];
    let headers = [
        axum::http::header::CONTENT_TYPE,
        axum::http::header::ACCEPT,
        axum::http::header::USER_AGENT,
        axum::http::header::ORIGIN,
        axum::http::header::ACCESS_CONTROL_REQUEST_METHOD,
        axum::http::header::ACCESS_CONTROL_REQUEST_HEADERS,
    ];

    if config.server.allowed_origins.len() == 1 && config.server.allowed_origins[0] == "*" {
        tracing::warn!("CORS: Using wildcard origin (*); restrict allowed_origins in production");
        CorsLayer::new()
            .allow_origin(tower_http::cors::AllowOrigin::any())
            .allow_methods(methods)
            .allow_headers(headers)
            .max_age(Duration::from_secs(3600))
    } else {
        let origins: Vec<axum::http::HeaderValue> = config
            .server
            .allowed_origins
            .iter()
            .filter_map(|origin| {
                axum::http::HeaderValue::from_str(origin)
                    .map_err(|_| {
                        tracing::warn!(origin, "Invalid CORS origin in config; skipping");
                    })
                    .ok()
            })
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(headers)
            .max_age(Duration::from_secs(3600))
    }
}

/// Create the application router
pub fn create_router(orchestrator_state: OrchestratorState, config: Arc<Config>) -> Router {
    let api_routes = Router::new()
        .route("/designs", post(create_design))
        .route(
            "/designs/{design_id}/evaluations",
            post(start_evaluation).get(get_evaluation_results),
        )
        .route("/designs/{design_id}/versions", get(list_versions))
        .route("/designs/{design_id}/revert", post(revert_version))
        .route("/jobs/{job_id}/progress", get(get_job_progress));

    async fn root_handler() -> Response {
        axum::Json(serde_json::json!({
            "name": "uxlens API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Design evaluation engine",
            "endpoints": {
                "health": "/health",
                "api": "/api/v1",
                "docs": "/docs"
            }
        }))
        .into_response()
    }

    let health_routes = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check));

    let mut router = Router::new()
        .nest("/api/v1", api_routes)
        .merge(health_routes);

    // Docs can be switched off in production
    if config.server.enable_docs {
        router =
            router.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&config))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.server.request_timeout_seconds),
        ))
        .layer(middleware::from_fn(logging_middleware));

    router.layer(service_builder).with_state(orchestrator_state)
}
