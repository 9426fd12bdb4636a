//! Postgres-backed [`JobStore`] delegating to [`ExportJobRepo`].

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;

use scenaris_core::export::{ExportParams, ExportResult};
use scenaris_core::types::DbId;

use crate::models::export_job::{ExportJob, ListJobsQuery};
use crate::repositories::ExportJobRepo;

use super::{JobStore, StoreError};

/// Durable job store on top of the `export_jobs` table.
pub struct PgJobStore {
    pool: PgPool,
    lease_timeout: Duration,
}

impl PgJobStore {
    /// Wrap a pool with the given lease visibility timeout.
    ///
    /// An `active` job whose lease is older than `lease_timeout` becomes
    /// re-leasable, so a crashed worker's job is eventually retried.
    pub fn new(pool: PgPool, lease_timeout: Duration) -> Self {
        Self {
            pool,
            lease_timeout,
        }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn enqueue(&self, params: &ExportParams) -> Result<ExportJob, StoreError> {
        let params = serde_json::to_value(params)?;
        Ok(ExportJobRepo::enqueue(&self.pool, &params).await?)
    }

    async fn lease(&self, worker: &str) -> Result<Option<ExportJob>, StoreError> {
        Ok(ExportJobRepo::lease(&self.pool, worker, self.lease_timeout.as_secs_f64()).await?)
    }

    async fn update_progress(
        &self,
        job_id: DbId,
        worker: &str,
        percent: i16,
    ) -> Result<(), StoreError> {
        Ok(ExportJobRepo::update_progress(&self.pool, job_id, worker, percent).await?)
    }

    async fn complete(&self, job_id: DbId, result: &ExportResult) -> Result<bool, StoreError> {
        let result = serde_json::to_value(result)?;
        Ok(ExportJobRepo::complete(&self.pool, job_id, &result).await?)
    }

    async fn fail(&self, job_id: DbId, error: &str) -> Result<bool, StoreError> {
        Ok(ExportJobRepo::fail(&self.pool, job_id, error).await?)
    }

    async fn get(&self, job_id: DbId) -> Result<Option<ExportJob>, StoreError> {
        Ok(ExportJobRepo::find_by_id(&self.pool, job_id).await?)
    }

    async fn list(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<ExportJob>, StoreError> {
        let query = ListJobsQuery { limit, offset };
        Ok(ExportJobRepo::list(&self.pool, &query).await?)
    }

    async fn healthy(&self) -> bool {
        crate::health_check(&self.pool).await.is_ok()
    }
}
