//! Per-job execution: build, publish, record the terminal state.
//!
//! Errors inside one job are fully contained here; [`JobRunner::run`]
//! always returns an explicit [`JobOutcome`] and never propagates a build
//! failure to the worker loop.

use std::sync::Arc;

use tokio::sync::mpsc;

use scenaris_bundler::BundleBuilder;
use scenaris_core::export::{ExportParams, ExportResult};
use scenaris_db::models::export_job::ExportJob;
use scenaris_db::store::JobStore;

use crate::publisher::ResultPublisher;

/// Capacity of the per-job progress channel.
const PROGRESS_CHANNEL_CAPACITY: usize = 16;

/// Explicit outcome of one job execution.
#[derive(Debug)]
pub enum JobOutcome {
    Completed(ExportResult),
    Failed(String),
}

/// Drives one leased job through build, publish, and state recording.
pub struct JobRunner {
    store: Arc<dyn JobStore>,
    builder: Arc<BundleBuilder>,
    publisher: Arc<ResultPublisher>,
}

impl JobRunner {
    pub fn new(
        store: Arc<dyn JobStore>,
        builder: Arc<BundleBuilder>,
        publisher: Arc<ResultPublisher>,
    ) -> Self {
        Self {
            store,
            builder,
            publisher,
        }
    }

    /// Execute a leased job to its terminal state.
    ///
    /// On success the job is marked `completed` before the callback fires,
    /// so a slow or failing callback can never affect the stored status.
    pub async fn run(&self, worker: &str, job: &ExportJob) -> JobOutcome {
        match self.execute(worker, job).await {
            Ok(result) => {
                match self.store.complete(job.id, &result).await {
                    Ok(true) => {}
                    Ok(false) => {
                        // Lease expired mid-build and another worker owns a
                        // newer attempt; leave their state alone.
                        tracing::warn!(job_id = job.id, "Job no longer active at completion");
                    }
                    Err(e) => {
                        tracing::error!(job_id = job.id, error = %e, "Failed to record completion");
                    }
                }
                self.publisher.notify(job.id, &result).await;
                JobOutcome::Completed(result)
            }
            Err(message) => {
                match self.store.fail(job.id, &message).await {
                    Ok(true) => {}
                    Ok(false) => {
                        tracing::warn!(job_id = job.id, "Job no longer active at failure");
                    }
                    Err(e) => {
                        tracing::error!(job_id = job.id, error = %e, "Failed to record failure");
                    }
                }
                JobOutcome::Failed(message)
            }
        }
    }

    /// Build and publish, forwarding builder progress into the store.
    async fn execute(&self, worker: &str, job: &ExportJob) -> Result<ExportResult, String> {
        let params: ExportParams = serde_json::from_value(job.params.clone())
            .map_err(|e| format!("Invalid job parameters: {e}"))?;

        let (progress_tx, mut progress_rx) = mpsc::channel::<i16>(PROGRESS_CHANNEL_CAPACITY);
        let forwarder = {
            let store = Arc::clone(&self.store);
            let worker = worker.to_string();
            let job_id = job.id;
            tokio::spawn(async move {
                while let Some(percent) = progress_rx.recv().await {
                    if let Err(e) = store.update_progress(job_id, &worker, percent).await {
                        // Progress is best-effort; losing a tick must not
                        // fail the build.
                        tracing::warn!(job_id, percent, error = %e, "Progress update failed");
                    }
                }
            })
        };

        let build = self.builder.build(job.id, &params, &progress_tx).await;
        drop(progress_tx);
        let _ = forwarder.await;

        let artifact = build.map_err(|e| e.to_string())?;
        let result = self
            .publisher
            .publish(&artifact)
            .await
            .map_err(|e| e.to_string())?;
        Ok(result)
    }
}
