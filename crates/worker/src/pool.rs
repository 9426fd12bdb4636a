//! The worker pool: N independent sequential lease/execute loops.
//!
//! Workers share nothing but the job store. Each loop polls for work on a
//! ticker, executes whatever it leases via [`JobRunner`], and backs off
//! exponentially when the store itself is unreachable.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use scenaris_db::store::JobStore;

use crate::runner::{JobOutcome, JobRunner};

/// First backoff delay after an infrastructure error.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Ceiling for the exponential infrastructure backoff.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Fixed-size pool of export workers.
pub struct WorkerPool {
    store: Arc<dyn JobStore>,
    runner: Arc<JobRunner>,
    poll_interval: Duration,
}

impl WorkerPool {
    pub fn new(store: Arc<dyn JobStore>, runner: Arc<JobRunner>, poll_interval: Duration) -> Self {
        Self {
            store,
            runner,
            poll_interval,
        }
    }

    /// Spawn `count` worker loops. Each runs until `cancel` is triggered;
    /// the returned handles resolve once their in-flight job (if any) has
    /// finished.
    pub fn spawn(&self, count: usize, cancel: CancellationToken) -> Vec<JoinHandle<()>> {
        (0..count)
            .map(|index| {
                let store = Arc::clone(&self.store);
                let runner = Arc::clone(&self.runner);
                let cancel = cancel.clone();
                let poll_interval = self.poll_interval;
                tokio::spawn(async move {
                    worker_loop(index, store, runner, poll_interval, cancel).await;
                })
            })
            .collect()
    }
}

/// One worker's sequential loop: lease, execute, repeat.
///
/// A job failure is recorded by the runner and never breaks the loop;
/// only cancellation ends it.
async fn worker_loop(
    index: usize,
    store: Arc<dyn JobStore>,
    runner: Arc<JobRunner>,
    poll_interval: Duration,
    cancel: CancellationToken,
) {
    let worker = format!("worker-{index}");
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut backoff = INITIAL_BACKOFF;

    tracing::info!(worker = %worker, "Worker started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(worker = %worker, "Worker shutting down");
                break;
            }
            _ = ticker.tick() => {
                match store.lease(&worker).await {
                    Ok(Some(job)) => {
                        backoff = INITIAL_BACKOFF;
                        tracing::info!(worker = %worker, job_id = job.id, "Job leased");

                        match runner.run(&worker, &job).await {
                            JobOutcome::Completed(result) => tracing::info!(
                                worker = %worker,
                                job_id = job.id,
                                archive = %result.archive_name,
                                size_bytes = result.size_bytes,
                                "Job completed",
                            ),
                            JobOutcome::Failed(message) => tracing::error!(
                                worker = %worker,
                                job_id = job.id,
                                error = %message,
                                "Job failed",
                            ),
                        }
                    }
                    Ok(None) => {
                        backoff = INITIAL_BACKOFF;
                    }
                    Err(e) => {
                        tracing::error!(
                            worker = %worker,
                            error = %e,
                            backoff_ms = backoff.as_millis() as u64,
                            "Lease failed, backing off",
                        );
                        tokio::select! {
                            _ = cancel.cancelled() => break,
                            _ = tokio::time::sleep(backoff) => {}
                        }
                        backoff = (backoff * 2).min(MAX_BACKOFF);
                    }
                }
            }
        }
    }
}
