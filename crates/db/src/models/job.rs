//! Job entity model and DTOs for the execution queue.

use runyard_core::target::ExecutionTarget;
use runyard_core::types::{JobId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::status::{JobStatus, StatusId};

/// A row from the `jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: JobId,
    pub workspace: String,
    pub script: String,
    /// `None` means whole-script mode.
    pub function_name: Option<String>,
    pub status_id: StatusId,
    /// Populated only when the job finished. Whole-script mode stores
    /// `{"log_file": ...}`; function mode stores the return value.
    pub result: Option<serde_json::Value>,
    /// Populated only when the job failed.
    pub error_message: Option<String>,
    /// Label of the worker that claimed the job.
    pub worker_id: Option<String>,
    pub enqueued_at: Timestamp,
    pub claimed_at: Option<Timestamp>,
    pub started_at: Option<Timestamp>,
    pub finished_at: Option<Timestamp>,
}

impl Job {
    /// Wire name of the job's status. The `status_id` column carries a
    /// foreign key to the lookup table, so an unknown ID only occurs on a
    /// corrupted row.
    pub fn status_name(&self) -> &'static str {
        JobStatus::from_id(self.status_id)
            .map(JobStatus::name)
            .unwrap_or("unknown")
    }

    /// The execution target this job references.
    pub fn target(&self) -> ExecutionTarget {
        ExecutionTarget::from_parts(
            self.workspace.clone(),
            self.script.clone(),
            self.function_name.clone(),
        )
    }
}

/// DTO for enqueueing a new job.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub workspace: String,
    pub script: String,
    pub function_name: Option<String>,
}

/// Per-status job counts for the queue dashboard.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StatusCounts {
    pub queued: i64,
    pub started: i64,
    pub finished: i64,
    pub failed: i64,
}
