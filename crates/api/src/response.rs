//! Shared response payloads for API handlers.

use runyard_core::types::JobId;
use serde::Serialize;

/// Standard `{"message": ...}` confirmation body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body returned by the execute endpoints.
#[derive(Debug, Serialize)]
pub struct EnqueuedResponse {
    pub message: &'static str,
    pub job_id: JobId,
}
