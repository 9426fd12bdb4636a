//! In-memory [`JobStore`] backend.
//!
//! Single-process fallback for development and the backend the test suite
//! runs against. Enforces exactly the same state-machine semantics as the
//! Postgres store: atomic leasing, lease expiry, monotonic progress, and
//! immutable terminal states.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use scenaris_core::export::{ExportParams, ExportResult};
use scenaris_core::types::DbId;

use crate::models::export_job::ExportJob;
use crate::models::status::ExportJobStatus;

use super::{JobStore, StoreError};

/// Maximum page size for job listing (matches the Postgres repo).
const MAX_LIMIT: i64 = 100;

/// Default page size for job listing (matches the Postgres repo).
const DEFAULT_LIMIT: i64 = 50;

struct Inner {
    next_id: DbId,
    /// Keyed by id; iteration order doubles as submission order since ids
    /// are assigned monotonically.
    jobs: BTreeMap<DbId, ExportJob>,
}

/// Mutex-guarded job map.
pub struct MemoryJobStore {
    lease_timeout: Duration,
    inner: Mutex<Inner>,
}

impl MemoryJobStore {
    /// Create an empty store with the given lease visibility timeout.
    pub fn new(lease_timeout: Duration) -> Self {
        Self {
            lease_timeout,
            inner: Mutex::new(Inner {
                next_id: 1,
                jobs: BTreeMap::new(),
            }),
        }
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn enqueue(&self, params: &ExportParams) -> Result<ExportJob, StoreError> {
        let params = serde_json::to_value(params)?;
        let now = chrono::Utc::now();

        let mut inner = self.inner.lock().expect("job store mutex poisoned");
        let id = inner.next_id;
        inner.next_id += 1;

        let job = ExportJob {
            id,
            status_id: ExportJobStatus::Queued.id(),
            params,
            progress_percent: 0,
            result: None,
            error_message: None,
            leased_by: None,
            lease_expires_at: None,
            submitted_at: now,
            claimed_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        inner.jobs.insert(id, job.clone());
        Ok(job)
    }

    async fn lease(&self, worker: &str) -> Result<Option<ExportJob>, StoreError> {
        let now = chrono::Utc::now();
        let lease_timeout =
            chrono::Duration::from_std(self.lease_timeout).unwrap_or(chrono::Duration::zero());

        let mut inner = self.inner.lock().expect("job store mutex poisoned");
        let candidate = inner.jobs.values().find_map(|job| {
            let leasable = match job.status() {
                Some(ExportJobStatus::Queued) => true,
                Some(ExportJobStatus::Active) => {
                    job.lease_expires_at.is_some_and(|expiry| expiry <= now)
                }
                _ => false,
            };
            leasable.then_some(job.id)
        });

        let Some(id) = candidate else {
            return Ok(None);
        };

        let job = inner.jobs.get_mut(&id).expect("candidate id present");
        job.status_id = ExportJobStatus::Active.id();
        job.leased_by = Some(worker.to_string());
        job.claimed_at = Some(now);
        job.lease_expires_at = Some(now + lease_timeout);
        job.updated_at = now;
        Ok(Some(job.clone()))
    }

    async fn update_progress(
        &self,
        job_id: DbId,
        worker: &str,
        percent: i16,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("job store mutex poisoned");
        if let Some(job) = inner.jobs.get_mut(&job_id) {
            let owned = job.status() == Some(ExportJobStatus::Active)
                && job.leased_by.as_deref() == Some(worker);
            if owned {
                job.progress_percent = job.progress_percent.max(percent.clamp(0, 100));
                job.updated_at = chrono::Utc::now();
            }
        }
        Ok(())
    }

    async fn complete(&self, job_id: DbId, result: &ExportResult) -> Result<bool, StoreError> {
        let result = serde_json::to_value(result)?;
        let now = chrono::Utc::now();

        let mut inner = self.inner.lock().expect("job store mutex poisoned");
        let Some(job) = inner.jobs.get_mut(&job_id) else {
            return Ok(false);
        };
        if job.status() != Some(ExportJobStatus::Active) {
            return Ok(false);
        }
        job.status_id = ExportJobStatus::Completed.id();
        job.result = Some(result);
        job.progress_percent = 100;
        job.completed_at = Some(now);
        job.updated_at = now;
        Ok(true)
    }

    async fn fail(&self, job_id: DbId, error: &str) -> Result<bool, StoreError> {
        let now = chrono::Utc::now();

        let mut inner = self.inner.lock().expect("job store mutex poisoned");
        let Some(job) = inner.jobs.get_mut(&job_id) else {
            return Ok(false);
        };
        if job.status() != Some(ExportJobStatus::Active) {
            return Ok(false);
        }
        job.status_id = ExportJobStatus::Failed.id();
        job.error_message = Some(error.to_string());
        job.completed_at = Some(now);
        job.updated_at = now;
        Ok(true)
    }

    async fn get(&self, job_id: DbId) -> Result<Option<ExportJob>, StoreError> {
        let inner = self.inner.lock().expect("job store mutex poisoned");
        Ok(inner.jobs.get(&job_id).cloned())
    }

    async fn list(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<ExportJob>, StoreError> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT) as usize;
        let offset = offset.unwrap_or(0).max(0) as usize;

        let inner = self.inner.lock().expect("job store mutex poisoned");
        // Newest first, matching the Postgres repo's ordering.
        Ok(inner
            .jobs
            .values()
            .rev()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn healthy(&self) -> bool {
        true
    }
}
