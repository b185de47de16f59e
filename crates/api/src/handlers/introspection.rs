//! Handlers for the `/api` route-catalog endpoints.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::catalog::{self, RouteInfo};
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ApiQuery {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
struct RoutesResponse {
    paths: Vec<&'static RouteInfo>,
}

/// GET /api
///
/// List registered routes, optionally filtered with `?search=`.
pub async fn list_routes(
    State(_state): State<AppState>,
    Query(query): Query<ApiQuery>,
) -> AppResult<impl IntoResponse> {
    let paths = catalog::search(query.search.as_deref());
    Ok(Json(RoutesResponse { paths }))
}

/// GET /api/{endpoint}
///
/// List registered routes whose path contains the given fragment. An
/// unmatched fragment yields an empty list, not a 404.
pub async fn routes_for_endpoint(
    State(_state): State<AppState>,
    Path(endpoint): Path<String>,
) -> AppResult<impl IntoResponse> {
    let paths = catalog::by_path_fragment(&endpoint);
    Ok(Json(RoutesResponse { paths }))
}
