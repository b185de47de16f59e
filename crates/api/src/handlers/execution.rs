//! Handlers for enqueueing executions and polling job status.
//!
//! Enqueue returns immediately after the job is recorded with the broker;
//! polling the status endpoint is the only progress-observation mechanism.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use runyard_core::error::CoreError;
use runyard_core::types::JobId;
use runyard_db::models::job::NewJob;
use runyard_db::repositories::JobRepo;

use crate::error::AppResult;
use crate::response::EnqueuedResponse;
use crate::state::AppState;

/// Body of the status endpoint: `{"status": ..., "result": ...}`.
#[derive(Debug, Serialize)]
struct JobStatusResponse {
    status: &'static str,
    result: Option<serde_json::Value>,
}

/// POST /workspace/{name}/execute/{script}
///
/// Enqueue whole-script execution. The script's stdout and stderr end up
/// in a log file written into the workspace.
pub async fn enqueue_script(
    State(state): State<AppState>,
    Path((name, script)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    enqueue(state, name, script, None).await
}

/// POST /workspace/{name}/execute/{script}/{function}
///
/// Enqueue execution of a named top-level function from a script. The
/// function's return value becomes the job result.
pub async fn enqueue_function(
    State(state): State<AppState>,
    Path((name, script, function)): Path<(String, String, String)>,
) -> AppResult<impl IntoResponse> {
    enqueue(state, name, script, Some(function)).await
}

/// Validate the target and hand it to the job queue.
///
/// Workspace and script existence are checked here, at enqueue time; the
/// worker re-resolves at execution time and a workspace deleted in between
/// fails the job.
async fn enqueue(
    state: AppState,
    workspace: String,
    script: String,
    function: Option<String>,
) -> AppResult<Json<EnqueuedResponse>> {
    if !state.store.exists(&workspace).await {
        return Err(CoreError::WorkspaceNotFound(workspace).into());
    }
    let script_path = state.store.file_path(&workspace, &script)?;
    if tokio::fs::metadata(&script_path).await.is_err() {
        return Err(CoreError::ScriptNotFound(script).into());
    }

    let job = JobRepo::enqueue(
        &state.pool,
        &NewJob {
            workspace,
            script,
            function_name: function,
        },
    )
    .await?;

    tracing::info!(
        job_id = %job.id,
        workspace = %job.workspace,
        script = %job.script,
        function = job.function_name.as_deref(),
        "Job enqueued",
    );

    Ok(Json(EnqueuedResponse {
        message: "Script execution started",
        job_id: job.id,
    }))
}

/// GET /execution/{job_id}/status
///
/// Current status of an enqueued job and its result if finished. Anything
/// that does not name a known job, including a malformed UUID, is a 404.
pub async fn job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id: JobId = job_id
        .parse()
        .map_err(|_| CoreError::JobNotFound(JobId::nil()))?;

    let job = JobRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::JobNotFound(id))?;

    Ok(Json(JobStatusResponse {
        status: job.status_name(),
        result: job.result,
    }))
}
