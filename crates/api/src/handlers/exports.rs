//! Handlers for the `/exports` resource.
//!
//! Submission validates the engine and returns immediately; the worker
//! pool picks the job up from the queue. Authorization is delegated to an
//! external middleware layer, so handlers assume an authorized caller.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use scenaris_core::engines;
use scenaris_core::error::CoreError;
use scenaris_core::export::ExportParams;
use scenaris_core::types::DbId;
use scenaris_db::models::export_job::{ExportJob, ExportJobView, ListJobsQuery};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a job by ID or return 404.
async fn ensure_job_exists(state: &AppState, job_id: DbId) -> AppResult<ExportJob> {
    state
        .store
        .get(job_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ExportJob",
            id: job_id,
        }))
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// POST /api/v1/exports
///
/// Submit a new export job. Returns 201 with the created job immediately;
/// never blocks on worker availability.
pub async fn submit_export(
    State(state): State<AppState>,
    Json(input): Json<ExportParams>,
) -> AppResult<impl IntoResponse> {
    if input.scenario_id.trim().is_empty() {
        return Err(AppError::BadRequest("scenario_id must not be empty".into()));
    }
    engines::validate_engine(&input.engine)?;

    let job = state.store.enqueue(&input).await?;

    tracing::info!(
        job_id = job.id,
        scenario_id = %input.scenario_id,
        engine = %input.engine,
        "Export job submitted",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: job })))
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

/// GET /api/v1/exports/{id}
///
/// Current status of one job: `{ status, progress, result?, error? }`.
pub async fn get_export(
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let job = ensure_job_exists(&state, job_id).await?;
    Ok(Json(DataResponse {
        data: ExportJobView::from(&job),
    }))
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// GET /api/v1/exports
///
/// List jobs, newest first. Supports optional `limit` and `offset` query
/// parameters (clamped server-side).
pub async fn list_exports(
    State(state): State<AppState>,
    Query(params): Query<ListJobsQuery>,
) -> AppResult<impl IntoResponse> {
    let jobs = state.store.list(params.limit, params.offset).await?;
    let views: Vec<ExportJobView> = jobs.iter().map(ExportJobView::from).collect();
    Ok(Json(DataResponse { data: views }))
}
