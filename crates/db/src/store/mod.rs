//! The job store seam between the queue's callers and its backends.
//!
//! The API server and the worker pool both receive an `Arc<dyn JobStore>`
//! at construction time; nothing reaches for a process-global queue
//! client. [`PgJobStore`] is the durable production backend;
//! [`MemoryJobStore`] backs development and the test suite with identical
//! state-machine semantics.

use async_trait::async_trait;

use scenaris_core::export::{ExportParams, ExportResult};
use scenaris_core::types::DbId;

use crate::models::export_job::ExportJob;

mod memory;
mod postgres;

pub use memory::MemoryJobStore;
pub use postgres::PgJobStore;

/// Error type for job store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing database rejected or failed the operation.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A payload could not be encoded for storage.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable queue of export jobs.
///
/// State machine per job: `queued -> active -> {completed, failed}`, with
/// no transitions out of terminal states. Implementations must serialize
/// transitions per job so concurrent workers cannot double-lease or
/// clobber a terminal state.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Persist a new job in `queued` state and return it immediately.
    async fn enqueue(&self, params: &ExportParams) -> Result<ExportJob, StoreError>;

    /// Atomically claim the next available job for `worker`, marking it
    /// `active` and stamping its lease. Returns `None` when no job is
    /// available. Must never hand the same job to two concurrent callers.
    async fn lease(&self, worker: &str) -> Result<Option<ExportJob>, StoreError>;

    /// Record progress on an active job owned by `worker`. Progress is
    /// monotonically non-decreasing; updates to jobs in any other state
    /// are ignored.
    async fn update_progress(
        &self,
        job_id: DbId,
        worker: &str,
        percent: i16,
    ) -> Result<(), StoreError>;

    /// Transition `active -> completed` with the result payload. Returns
    /// `false` (no-op) when the job was not active.
    async fn complete(&self, job_id: DbId, result: &ExportResult) -> Result<bool, StoreError>;

    /// Transition `active -> failed` with an error message. Returns
    /// `false` (no-op) when the job was not active.
    async fn fail(&self, job_id: DbId, error: &str) -> Result<bool, StoreError>;

    /// Fetch a job by id.
    async fn get(&self, job_id: DbId) -> Result<Option<ExportJob>, StoreError>;

    /// List jobs, newest first, with clamped pagination.
    async fn list(&self, limit: Option<i64>, offset: Option<i64>)
        -> Result<Vec<ExportJob>, StoreError>;

    /// Whether the backing store is reachable.
    async fn healthy(&self) -> bool;
}
