//! Integration tests for the route catalog and queue dashboard endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_empty, post_json};
use sqlx::PgPool;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Route catalog
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn api_lists_all_routes(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let app = common::build_test_app(pool, dir.path());

    let response = get(app, "/api").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let paths = json["paths"].as_array().unwrap();
    assert!(!paths.is_empty());

    // Every entry carries a path, methods, and a doc line.
    for entry in paths {
        assert!(entry["path"].as_str().unwrap().starts_with('/'));
        assert!(!entry["methods"].as_array().unwrap().is_empty());
        assert!(entry["doc"].is_string());
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn api_search_filters_routes(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let app = common::build_test_app(pool, dir.path());

    let json = body_json(get(app.clone(), "/api?search=execute").await).await;
    let paths = json["paths"].as_array().unwrap();
    assert_eq!(paths.len(), 2);

    let json = body_json(get(app, "/api?search=definitely-no-match").await).await;
    assert_eq!(json["paths"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn api_endpoint_fragment_lookup(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let app = common::build_test_app(pool, dir.path());

    let json = body_json(get(app.clone(), "/api/workspaces").await).await;
    let paths = json["paths"].as_array().unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0]["path"], "/workspaces");

    // Unmatched fragments give an empty list, not a 404.
    let response = get(app, "/api/no-such-fragment").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["paths"].as_array().unwrap().len(), 0);
}

// ---------------------------------------------------------------------------
// Queue dashboard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn queue_dashboard_reflects_enqueued_jobs(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let app = common::build_test_app(pool, dir.path());

    post_empty(app.clone(), "/workspace/alpha").await;
    post_json(
        app.clone(),
        "/workspace/alpha/create/hello.py",
        serde_json::json!({"data": "print('hi')\n"}),
    )
    .await;
    post_empty(app.clone(), "/workspace/alpha/execute/hello.py").await;
    post_empty(app.clone(), "/workspace/alpha/execute/hello.py").await;

    let response = get(app, "/queue").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["counts"]["queued"], 2);
    assert_eq!(json["counts"]["started"], 0);
    assert_eq!(json["jobs"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn queue_dashboard_empty_queue(pool: PgPool) {
    let dir = TempDir::new().unwrap();
    let app = common::build_test_app(pool, dir.path());

    let json = body_json(get(app, "/queue").await).await;
    assert_eq!(json["counts"]["queued"], 0);
    assert_eq!(json["jobs"].as_array().unwrap().len(), 0);
}
