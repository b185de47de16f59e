//! Read-only queue dashboard.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use runyard_db::models::job::{Job, StatusCounts};
use runyard_db::repositories::JobRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// How many recent jobs the dashboard shows.
const RECENT_JOBS_LIMIT: i64 = 50;

#[derive(Debug, Serialize)]
struct QueueStatusResponse {
    counts: StatusCounts,
    jobs: Vec<Job>,
}

/// GET /queue
///
/// Per-status job counts plus the most recently enqueued jobs.
pub async fn queue_status(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let counts = JobRepo::status_counts(&state.pool).await?;
    let jobs = JobRepo::list_recent(&state.pool, RECENT_JOBS_LIMIT).await?;
    Ok(Json(QueueStatusResponse { counts, jobs }))
}
