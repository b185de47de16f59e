//! Handlers for workspace directories: a thin layer over the
//! [`WorkspaceStore`](runyard_core::workspace::WorkspaceStore).

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::MessageResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct WorkspacesResponse {
    workspaces: Vec<String>,
}

#[derive(Debug, Serialize)]
struct FilesResponse {
    files: Vec<String>,
}

/// GET /workspaces
///
/// Retrieve a list of all workspaces.
pub async fn list_workspaces(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let workspaces = state.store.list().await?;
    Ok(Json(WorkspacesResponse { workspaces }))
}

/// POST /workspace/{name}
///
/// Create a new workspace directory. Idempotent.
pub async fn create_workspace(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.store.create(&name).await?;
    tracing::info!(workspace = %name, "Workspace created");
    Ok(Json(MessageResponse::new(format!(
        "Workspace '{name}' created"
    ))))
}

/// DELETE /workspace/{name}
///
/// Delete an existing, empty workspace. 404 if missing, 409 if non-empty.
pub async fn delete_workspace(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.store.delete(&name).await?;
    tracing::info!(workspace = %name, "Workspace deleted");
    Ok(Json(MessageResponse::new(format!(
        "Workspace '{name}' deleted"
    ))))
}

/// GET /workspace/{name}/files
///
/// List all files in a workspace.
pub async fn list_files(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let files = state.store.list_files(&name).await?;
    Ok(Json(FilesResponse { files }))
}
