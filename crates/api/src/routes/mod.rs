pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the application route tree.
///
/// Route hierarchy:
///
/// ```text
/// /workspaces                                      list workspaces (GET)
/// /workspace/{name}                                create (POST), delete (DELETE)
/// /workspace/{name}/files                          list files (GET)
/// /workspace/{name}/view/{file}                    stream file content (GET)
/// /workspace/{name}/create/{file}                  create file from string (POST)
/// /workspace/{name}/upload                         upload file (POST, multipart)
/// /workspace/{name}/execute/{script}               enqueue script run (POST)
/// /workspace/{name}/execute/{script}/{function}    enqueue function run (POST)
/// /execution/{job_id}/status                       poll job status (GET)
/// /api                                             route catalog (GET, ?search=)
/// /api/{endpoint}                                  routes matching fragment (GET)
/// /queue                                           queue dashboard (GET)
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        // Workspace directories.
        .route("/workspaces", get(handlers::workspace::list_workspaces))
        .route(
            "/workspace/{name}",
            post(handlers::workspace::create_workspace)
                .delete(handlers::workspace::delete_workspace),
        )
        .route(
            "/workspace/{name}/files",
            get(handlers::workspace::list_files),
        )
        // Files within a workspace.
        .route(
            "/workspace/{name}/view/{file}",
            get(handlers::files::view_file),
        )
        .route(
            "/workspace/{name}/create/{file}",
            post(handlers::files::create_file),
        )
        .route(
            "/workspace/{name}/upload",
            post(handlers::files::upload_file),
        )
        // Asynchronous script execution.
        .route(
            "/workspace/{name}/execute/{script}",
            post(handlers::execution::enqueue_script),
        )
        .route(
            "/workspace/{name}/execute/{script}/{function}",
            post(handlers::execution::enqueue_function),
        )
        .route(
            "/execution/{job_id}/status",
            get(handlers::execution::job_status),
        )
        // Route catalog.
        .route("/api", get(handlers::introspection::list_routes))
        .route(
            "/api/{endpoint}",
            get(handlers::introspection::routes_for_endpoint),
        )
        // Queue dashboard.
        .route("/queue", get(handlers::queue::queue_status))
}
