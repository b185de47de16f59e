use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use runyard_core::runner::Runner;
use runyard_core::workspace::WorkspaceStore;
use runyard_worker::{Worker, WorkerConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "runyard_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = WorkerConfig::from_env();
    tracing::info!(
        workers = config.worker_count,
        poll_interval_ms = config.poll_interval.as_millis() as u64,
        "Loaded worker configuration"
    );

    // --- Job queue broker ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = runyard_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to job queue broker");

    runyard_db::health_check(&pool)
        .await
        .expect("Broker health check failed");

    runyard_db::run_migrations(&pool)
        .await
        .expect("Failed to run broker migrations");
    tracing::info!("Broker ready");

    // --- Workspace store ---
    let store = Arc::new(WorkspaceStore::new(&config.workspaces_dir));
    store
        .ensure_base_dir()
        .await
        .expect("Failed to create workspaces directory");

    // --- Worker loops ---
    let cancel = CancellationToken::new();
    let hostname = std::env::var("HOSTNAME").unwrap_or_else(|_| "local".into());

    let mut handles = Vec::with_capacity(config.worker_count);
    for n in 0..config.worker_count {
        let worker = Worker::new(
            format!("{hostname}-{n}"),
            pool.clone(),
            Arc::clone(&store),
            Runner::new(&config.python_bin),
            config.poll_interval,
        );
        let cancel = cancel.clone();
        handles.push(tokio::spawn(async move {
            worker.run(cancel).await;
        }));
    }

    shutdown_signal().await;
    cancel.cancel();

    // In-flight jobs run to completion before the loops exit.
    for handle in handles {
        let _ = tokio::time::timeout(Duration::from_secs(30), handle).await;
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
