//! Repository for the `jobs` table: the service's job queue.
//!
//! Enqueue and claim are single atomic statements, so each job is handed
//! to exactly one worker. Status transitions guard on the expected current
//! status, keeping the lifecycle monotonic. A worker crash mid-job leaves
//! its job in `started` forever; there is no reaper.

use sqlx::PgPool;

use runyard_core::types::JobId;

use crate::models::job::{Job, NewJob, StatusCounts};
use crate::models::status::{JobStatus, StatusId};

/// Column list for `jobs` queries.
const COLUMNS: &str = "\
    id, workspace, script, function_name, status_id, result, \
    error_message, worker_id, enqueued_at, claimed_at, started_at, finished_at";

/// Maximum page size for the dashboard job listing.
const MAX_LIMIT: i64 = 100;

/// Provides queue operations for background jobs.
pub struct JobRepo;

impl JobRepo {
    /// Create a new queued job with a fresh UUID and return it immediately.
    /// The caller never waits for execution. Errors if the broker is
    /// unreachable.
    pub async fn enqueue(pool: &PgPool, input: &NewJob) -> Result<Job, sqlx::Error> {
        let query = format!(
            "INSERT INTO jobs (id, workspace, script, function_name, status_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(uuid::Uuid::new_v4())
            .bind(&input.workspace)
            .bind(&input.script)
            .bind(&input.function_name)
            .bind(JobStatus::Queued.id())
            .fetch_one(pool)
            .await
    }

    /// Current snapshot of a job, or `None` if the ID is unrecognized.
    pub async fn find_by_id(pool: &PgPool, id: JobId) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Atomically claim the oldest queued job for a worker, transitioning
    /// it `queued → started`.
    ///
    /// FIFO by `enqueued_at`; `FOR UPDATE SKIP LOCKED` prevents two workers
    /// from ever claiming the same job.
    pub async fn claim_next(
        pool: &PgPool,
        worker_id: &str,
    ) -> Result<Option<Job>, sqlx::Error> {
        let query = format!(
            "UPDATE jobs \
             SET worker_id = $1, status_id = $2, claimed_at = NOW(), started_at = NOW() \
             WHERE id = ( \
                 SELECT id FROM jobs \
                 WHERE status_id = $3 \
                 ORDER BY enqueued_at ASC \
                 LIMIT 1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(worker_id)
            .bind(JobStatus::Started.id())
            .bind(JobStatus::Queued.id())
            .fetch_optional(pool)
            .await
    }

    /// Transition `started → finished` and store the result payload.
    ///
    /// Returns `false` if the job was not in `started` (stale call);
    /// nothing is modified in that case.
    pub async fn finish(
        pool: &PgPool,
        id: JobId,
        result: &serde_json::Value,
    ) -> Result<bool, sqlx::Error> {
        let updated = sqlx::query(
            "UPDATE jobs \
             SET status_id = $2, result = $3, finished_at = NOW() \
             WHERE id = $1 AND status_id = $4",
        )
        .bind(id)
        .bind(JobStatus::Finished.id())
        .bind(result)
        .bind(JobStatus::Started.id())
        .execute(pool)
        .await?;
        Ok(updated.rows_affected() > 0)
    }

    /// Transition `{queued, started} → failed` and record the error
    /// message. Returns `false` if the job was already terminal.
    pub async fn fail(pool: &PgPool, id: JobId, error: &str) -> Result<bool, sqlx::Error> {
        let updated = sqlx::query(
            "UPDATE jobs \
             SET status_id = $2, error_message = $3, finished_at = NOW() \
             WHERE id = $1 AND status_id IN ($4, $5)",
        )
        .bind(id)
        .bind(JobStatus::Failed.id())
        .bind(error)
        .bind(JobStatus::Queued.id())
        .bind(JobStatus::Started.id())
        .execute(pool)
        .await?;
        Ok(updated.rows_affected() > 0)
    }

    /// Per-status job counts for the queue dashboard.
    pub async fn status_counts(pool: &PgPool) -> Result<StatusCounts, sqlx::Error> {
        let rows: Vec<(StatusId, i64)> =
            sqlx::query_as("SELECT status_id, COUNT(*) FROM jobs GROUP BY status_id")
                .fetch_all(pool)
                .await?;

        let mut counts = StatusCounts::default();
        for (status_id, count) in rows {
            match JobStatus::from_id(status_id) {
                Some(JobStatus::Queued) => counts.queued = count,
                Some(JobStatus::Started) => counts.started = count,
                Some(JobStatus::Finished) => counts.finished = count,
                Some(JobStatus::Failed) => counts.failed = count,
                None => {}
            }
        }
        Ok(counts)
    }

    /// Most recently enqueued jobs, newest first, for the dashboard.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<Job>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM jobs ORDER BY enqueued_at DESC, id LIMIT $1"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(limit.clamp(1, MAX_LIMIT))
            .fetch_all(pool)
            .await
    }
}
