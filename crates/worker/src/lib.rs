//! Queue worker: claims jobs from the broker and runs them.
//!
//! Each worker is a polling loop over [`JobRepo::claim_next`]. The claim is
//! atomic, so any number of workers (in any number of processes) can share
//! one queue without double-execution.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use runyard_core::runner::Runner;
use runyard_core::workspace::WorkspaceStore;
use runyard_db::models::job::Job;
use runyard_db::repositories::JobRepo;
use runyard_db::DbPool;

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Number of concurrent worker loops (default: `2`).
    pub worker_count: usize,
    /// Delay between polls when the queue is empty (default: `500` ms).
    pub poll_interval: Duration,
    /// Base directory holding workspace directories.
    pub workspaces_dir: String,
    /// Python interpreter used for script execution.
    pub python_bin: String,
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var            | Default      |
    /// |--------------------|--------------|
    /// | `WORKER_COUNT`     | `2`          |
    /// | `POLL_INTERVAL_MS` | `500`        |
    /// | `WORKSPACES_DIR`   | `workspaces` |
    /// | `PYTHON_BIN`       | `python3`    |
    pub fn from_env() -> Self {
        let worker_count: usize = std::env::var("WORKER_COUNT")
            .unwrap_or_else(|_| "2".into())
            .parse()
            .expect("WORKER_COUNT must be a valid usize");

        let poll_interval_ms: u64 = std::env::var("POLL_INTERVAL_MS")
            .unwrap_or_else(|_| "500".into())
            .parse()
            .expect("POLL_INTERVAL_MS must be a valid u64");

        let workspaces_dir =
            std::env::var("WORKSPACES_DIR").unwrap_or_else(|_| "workspaces".into());

        let python_bin = std::env::var("PYTHON_BIN").unwrap_or_else(|_| "python3".into());

        Self {
            worker_count,
            poll_interval: Duration::from_millis(poll_interval_ms),
            workspaces_dir,
            python_bin,
        }
    }
}

/// A single worker loop bound to a broker pool and workspace store.
pub struct Worker {
    id: String,
    pool: DbPool,
    store: Arc<WorkspaceStore>,
    runner: Runner,
    poll_interval: Duration,
}

impl Worker {
    pub fn new(
        id: impl Into<String>,
        pool: DbPool,
        store: Arc<WorkspaceStore>,
        runner: Runner,
        poll_interval: Duration,
    ) -> Self {
        Self {
            id: id.into(),
            pool,
            store,
            runner,
            poll_interval,
        }
    }

    /// Run until cancelled. Polls the queue, sleeping `poll_interval`
    /// between polls that find nothing; broker errors are logged and
    /// retried after the same delay.
    ///
    /// Cancellation is only checked between jobs, so a job that is
    /// already executing always reaches a terminal status.
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(worker = %self.id, "Worker started");
        loop {
            if cancel.is_cancelled() {
                tracing::info!(worker = %self.id, "Worker stopping");
                break;
            }
            match self.run_pending_once().await {
                // Claimed and executed a job; poll again immediately.
                Ok(true) => continue,
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(worker = %self.id, error = %e, "Broker poll failed");
                }
            }
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::info!(worker = %self.id, "Worker stopping");
                    break;
                }
                () = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }

    /// Claim and execute at most one queued job. Returns whether a job
    /// was claimed.
    pub async fn run_pending_once(&self) -> Result<bool, sqlx::Error> {
        let Some(job) = JobRepo::claim_next(&self.pool, &self.id).await? else {
            return Ok(false);
        };

        tracing::info!(
            worker = %self.id,
            job_id = %job.id,
            workspace = %job.workspace,
            script = %job.script,
            function = job.function_name.as_deref(),
            "Job claimed",
        );

        self.execute(&job).await?;
        Ok(true)
    }

    /// Run one claimed job to a terminal status.
    ///
    /// The execution outcome only ever moves the job forward: `finish` and
    /// `fail` are guarded against jobs no longer in `started`.
    async fn execute(&self, job: &Job) -> Result<(), sqlx::Error> {
        let target = job.target();
        match self.runner.run(&self.store, &target).await {
            Ok(outcome) => {
                let result = outcome.into_result_json();
                JobRepo::finish(&self.pool, job.id, &result).await?;
                tracing::info!(worker = %self.id, job_id = %job.id, "Job finished");
            }
            Err(e) => {
                JobRepo::fail(&self.pool, job.id, &e.to_string()).await?;
                tracing::warn!(worker = %self.id, job_id = %job.id, error = %e, "Job failed");
            }
        }
        Ok(())
    }
}
