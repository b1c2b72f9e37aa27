use axum::{
    extract::{Path, State},
    response::Json,
};
use tracing::debug;
use uuid::Uuid;

use crate::domain::value_objects::JobProgress;
use crate::presentation::controllers::OrchestratorState;

/// GET /api/v1/jobs/{job_id}/progress - Poll a run
///
/// Unknown job ids, including ones that are not UUIDs, answer
/// `{"progress": 0, "status": "started"}`.
#[utoipa::path(
    get,
    path = "/api/v1/jobs/{job_id}/progress",
    params(
        ("job_id" = String, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Last known progress", body = JobProgress)
    ),
    tag = "jobs"
)]
pub async fn get_job_progress(
    State(state): State<OrchestratorState>,
    Path(job_id): Path<String>,
) -> Json<JobProgress> {
    match Uuid::parse_str(&job_id) {
        Ok(job_id) => Json(state.get_progress_use_case.execute(job_id).await),
        Err(_) => {
            debug!(job_id = %job_id, "Progress polled for a malformed job id");
            Json(JobProgress::default())
        }
    }
}
