//! Repository for the `export_jobs` table.
//!
//! Every status transition is a single atomic UPDATE guarded by the
//! expected current status, so concurrent workers can never corrupt a
//! job's state machine. No magic numbers: every status literal comes from
//! [`ExportJobStatus`].

use sqlx::PgPool;

use scenaris_core::types::DbId;

use crate::models::export_job::{ExportJob, ListJobsQuery};
use crate::models::status::ExportJobStatus;

/// Column list for `export_jobs` queries.
const COLUMNS: &str = "\
    id, status_id, params, progress_percent, result, error_message, \
    leased_by, lease_expires_at, \
    submitted_at, claimed_at, completed_at, created_at, updated_at";

/// Maximum page size for job listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for job listing.
const DEFAULT_LIMIT: i64 = 50;

/// Provides queue operations for export jobs.
pub struct ExportJobRepo;

impl ExportJobRepo {
    /// Persist a new job in `queued` state. Returns immediately with the
    /// job row; never waits on worker availability.
    pub async fn enqueue(pool: &PgPool, params: &serde_json::Value) -> Result<ExportJob, sqlx::Error> {
        let query = format!(
            "INSERT INTO export_jobs (status_id, params) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ExportJob>(&query)
            .bind(ExportJobStatus::Queued.id())
            .bind(params)
            .fetch_one(pool)
            .await
    }

    /// Atomically lease the next available job for a worker.
    ///
    /// A job is available when it is `queued`, or when it is `active` but
    /// its lease has expired (the previous worker crashed or was killed
    /// mid-build). Uses `SELECT FOR UPDATE SKIP LOCKED` so two workers can
    /// never lease the same job concurrently.
    pub async fn lease(
        pool: &PgPool,
        worker: &str,
        lease_timeout_secs: f64,
    ) -> Result<Option<ExportJob>, sqlx::Error> {
        let query = format!(
            "UPDATE export_jobs \
             SET status_id = $3, leased_by = $1, claimed_at = NOW(), \
                 lease_expires_at = NOW() + make_interval(secs => $2), \
                 updated_at = NOW() \
             WHERE id = ( \
                 SELECT id FROM export_jobs \
                 WHERE status_id = $4 \
                    OR (status_id = $3 AND lease_expires_at < NOW()) \
                 ORDER BY submitted_at ASC \
                 LIMIT 1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ExportJob>(&query)
            .bind(worker)
            .bind(lease_timeout_secs)
            .bind(ExportJobStatus::Active.id())
            .bind(ExportJobStatus::Queued.id())
            .fetch_optional(pool)
            .await
    }

    /// Record progress on an active job owned by `worker`.
    ///
    /// `GREATEST` keeps the stored percentage monotonically non-decreasing
    /// even if updates arrive out of order. A job that is no longer active
    /// (or no longer owned by the caller) is left untouched.
    pub async fn update_progress(
        pool: &PgPool,
        job_id: DbId,
        worker: &str,
        percent: i16,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE export_jobs \
             SET progress_percent = GREATEST(progress_percent, $3), updated_at = NOW() \
             WHERE id = $1 AND leased_by = $2 AND status_id = $4",
        )
        .bind(job_id)
        .bind(worker)
        .bind(percent.clamp(0, 100))
        .bind(ExportJobStatus::Active.id())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Transition `active -> completed`, storing the result payload.
    ///
    /// Returns `false` (no-op) if the job was not active: calling this on
    /// an already-terminal job cannot corrupt its stored state.
    pub async fn complete(
        pool: &PgPool,
        job_id: DbId,
        result: &serde_json::Value,
    ) -> Result<bool, sqlx::Error> {
        let done = sqlx::query(
            "UPDATE export_jobs \
             SET status_id = $2, result = $3, progress_percent = 100, \
                 completed_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND status_id = $4",
        )
        .bind(job_id)
        .bind(ExportJobStatus::Completed.id())
        .bind(result)
        .bind(ExportJobStatus::Active.id())
        .execute(pool)
        .await?;
        Ok(done.rows_affected() > 0)
    }

    /// Transition `active -> failed`, storing the error message.
    ///
    /// Returns `false` (no-op) if the job was not active.
    pub async fn fail(pool: &PgPool, job_id: DbId, error: &str) -> Result<bool, sqlx::Error> {
        let done = sqlx::query(
            "UPDATE export_jobs \
             SET status_id = $2, error_message = $3, \
                 completed_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND status_id = $4",
        )
        .bind(job_id)
        .bind(ExportJobStatus::Failed.id())
        .bind(error)
        .bind(ExportJobStatus::Active.id())
        .execute(pool)
        .await?;
        Ok(done.rows_affected() > 0)
    }

    /// Find a job by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ExportJob>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM export_jobs WHERE id = $1");
        sqlx::query_as::<_, ExportJob>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List jobs, newest first, with clamped pagination.
    pub async fn list(pool: &PgPool, params: &ListJobsQuery) -> Result<Vec<ExportJob>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);

        let query = format!(
            "SELECT {COLUMNS} FROM export_jobs \
             ORDER BY submitted_at DESC \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, ExportJob>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
