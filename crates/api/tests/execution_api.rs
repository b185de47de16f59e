//! Integration tests for the execution enqueue and status endpoints.
//!
//! These exercise the API side of the queue only: jobs land in `queued`
//! and stay there because no worker is attached to the test pool.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_empty, post_json};
use sqlx::PgPool;
use tempfile::TempDir;
use uuid::Uuid;

async fn seed_script(app: &axum::Router, workspace: &str, script: &str) {
    post_empty(app.clone(), &format!("/workspace/{workspace}")).await;
    post_json(
        app.clone(),
        &format!("/workspace/{workspace}/create/{script}"),
        serde_json::json!({"data": "print('hi')\n"}),
    )
    .await;
}

// ---------------------------------------------------------------------------
// Enqueue
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn enqueue_script_returns_job_id(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let app = common::build_test_app(pool, dir.path());
    seed_script(&app, "alpha", "hello.py").await;

    let response = post_empty(app.clone(), "/workspace/alpha/execute/hello.py").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Script execution started");

    let job_id: Uuid = json["job_id"].as_str().unwrap().parse().unwrap();

    // The job is recorded with the broker as queued, no result yet.
    let response = get(app, &format!("/execution/{job_id}/status")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "queued");
    assert_eq!(json["result"], serde_json::Value::Null);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn enqueue_function_returns_job_id(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let app = common::build_test_app(pool, dir.path());
    seed_script(&app, "alpha", "lib.py").await;

    let response = post_empty(app.clone(), "/workspace/alpha/execute/lib.py/f").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let job_id: Uuid = json["job_id"].as_str().unwrap().parse().unwrap();

    let json = body_json(get(app, &format!("/execution/{job_id}/status")).await).await;
    assert_eq!(json["status"], "queued");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn enqueue_distinct_jobs_get_distinct_ids(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let app = common::build_test_app(pool, dir.path());
    seed_script(&app, "alpha", "hello.py").await;

    let first = body_json(post_empty(app.clone(), "/workspace/alpha/execute/hello.py").await).await;
    let second =
        body_json(post_empty(app.clone(), "/workspace/alpha/execute/hello.py").await).await;

    assert_ne!(first["job_id"], second["job_id"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn enqueue_in_missing_workspace_returns_404(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let app = common::build_test_app(pool, dir.path());

    let response = post_empty(app, "/workspace/nope/execute/hello.py").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert!(json["error"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn enqueue_missing_script_returns_404(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let app = common::build_test_app(pool, dir.path());
    post_empty(app.clone(), "/workspace/alpha").await;

    let response = post_empty(app, "/workspace/alpha/execute/nope.py").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Status polling
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn status_for_unknown_job_returns_404(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let app = common::build_test_app(pool, dir.path());

    let response = get(app, &format!("/execution/{}/status", Uuid::new_v4())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn status_for_malformed_job_id_returns_404(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let app = common::build_test_app(pool, dir.path());

    let response = get(app, "/execution/not-a-uuid/status").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
