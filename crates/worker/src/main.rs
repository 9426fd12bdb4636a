use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scenaris_bundler::{BuilderConfig, BundleBuilder, Packager, ZipPackager};
use scenaris_db::store::{JobStore, PgJobStore};
use scenaris_worker::{JobRunner, ResultPublisher, WorkerConfig, WorkerPool};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scenaris_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = WorkerConfig::from_env();
    tracing::info!(
        concurrency = config.concurrency,
        exports_dir = %config.exports_dir.display(),
        callback = config.callback_url.is_some(),
        "Loaded worker configuration",
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = scenaris_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    scenaris_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    // --- Dependencies (explicit wiring; no process-global queue client) ---
    let store: Arc<dyn JobStore> = Arc::new(PgJobStore::new(pool.clone(), config.lease_timeout));
    let packager: Arc<dyn Packager> = Arc::new(ZipPackager::new(config.zip_bin.clone()));
    let builder = Arc::new(BundleBuilder::new(
        BuilderConfig::new(config.exports_dir.clone()),
        packager,
    ));
    let publisher = Arc::new(ResultPublisher::new(
        config.export_base_url.clone(),
        config.callback_url.clone(),
    ));
    let runner = Arc::new(JobRunner::new(Arc::clone(&store), builder, publisher));

    // --- Worker pool ---
    let cancel = CancellationToken::new();
    let worker_pool = WorkerPool::new(store, runner, config.poll_interval);
    let handles = worker_pool.spawn(config.concurrency, cancel.clone());
    tracing::info!(workers = config.concurrency, "Worker pool started");

    // --- Shutdown ---
    shutdown_signal().await;
    cancel.cancel();
    tracing::info!("Stopped leasing; draining in-flight jobs");

    let drain = async {
        for handle in handles {
            let _ = handle.await;
        }
    };
    if tokio::time::timeout(config.shutdown_timeout, drain)
        .await
        .is_err()
    {
        tracing::warn!("Drain timed out; abandoned jobs become re-leasable after their lease expires");
    }

    pool.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the worker shuts
/// down cleanly whether stopped interactively or by a process manager.
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
