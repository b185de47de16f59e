use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use runyard_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses
/// of the shape `{"error": <message>, "code": <CODE>}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `runyard_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A broker/database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::WorkspaceNotFound(_) => {
                    (StatusCode::NOT_FOUND, "WORKSPACE_NOT_FOUND", core.to_string())
                }
                CoreError::WorkspaceNotEmpty(_) => {
                    (StatusCode::CONFLICT, "WORKSPACE_NOT_EMPTY", core.to_string())
                }
                CoreError::FileNotFound { .. } => {
                    (StatusCode::NOT_FOUND, "FILE_NOT_FOUND", core.to_string())
                }
                CoreError::ScriptNotFound(_) => {
                    (StatusCode::NOT_FOUND, "SCRIPT_NOT_FOUND", core.to_string())
                }
                CoreError::FunctionNotFound { .. } => {
                    (StatusCode::NOT_FOUND, "FUNCTION_NOT_FOUND", core.to_string())
                }
                CoreError::JobNotFound(_) => {
                    (StatusCode::NOT_FOUND, "JOB_NOT_FOUND", core.to_string())
                }
                CoreError::InvalidName(_) => {
                    (StatusCode::BAD_REQUEST, "INVALID_NAME", core.to_string())
                }
                CoreError::Execution { .. } => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXECUTION_FAILED",
                    core.to_string(),
                ),
                CoreError::Io(err) => {
                    tracing::error!(error = %err, "I/O error in handler");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - Connectivity failures map to 503: the broker is unreachable and the
///   caller must resubmit (no retry happens server-side).
/// - `RowNotFound` maps to 404.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => {
            tracing::error!(error = %err, "Job queue broker unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "BROKER_UNAVAILABLE",
                "Job queue broker is unreachable".to_string(),
            )
        }
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
