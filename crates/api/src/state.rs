use std::sync::Arc;

use runyard_core::workspace::WorkspaceStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Job queue broker connection pool, shared with the workers.
    pub pool: runyard_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Directory-backed workspace store.
    pub store: Arc<WorkspaceStore>,
}
