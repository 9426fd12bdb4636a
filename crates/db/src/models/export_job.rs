//! Export job entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use scenaris_core::types::{DbId, Timestamp};

use super::status::{ExportJobStatus, StatusId};

/// A row from the `export_jobs` table.
///
/// `params` holds the caller's `ExportParams` verbatim as JSONB; `result`
/// is present only on completed jobs, `error_message` only on failed ones.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExportJob {
    pub id: DbId,
    pub status_id: StatusId,
    pub params: serde_json::Value,
    pub progress_percent: i16,
    pub result: Option<serde_json::Value>,
    pub error_message: Option<String>,
    pub leased_by: Option<String>,
    pub lease_expires_at: Option<Timestamp>,
    pub submitted_at: Timestamp,
    pub claimed_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ExportJob {
    /// Decode the status id, if it maps to a known status.
    pub fn status(&self) -> Option<ExportJobStatus> {
        ExportJobStatus::from_id(self.status_id)
    }

    /// Whether the job has reached a final state.
    pub fn is_terminal(&self) -> bool {
        self.status().is_some_and(ExportJobStatus::is_terminal)
    }
}

/// Caller-facing status view: `{ status, progress, result?, error? }`.
#[derive(Debug, Serialize)]
pub struct ExportJobView {
    pub id: DbId,
    pub status: &'static str,
    pub progress: i16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&ExportJob> for ExportJobView {
    fn from(job: &ExportJob) -> Self {
        Self {
            id: job.id,
            status: job.status().map_or("unknown", ExportJobStatus::label),
            progress: job.progress_percent,
            result: job.result.clone(),
            error: job.error_message.clone(),
        }
    }
}

/// Query parameters for listing export jobs.
#[derive(Debug, Default, Deserialize)]
pub struct ListJobsQuery {
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(status_id: StatusId) -> ExportJob {
        let now = chrono::Utc::now();
        ExportJob {
            id: 1,
            status_id,
            params: serde_json::json!({"scenario_id": "s1", "engine": "unity"}),
            progress_percent: 40,
            result: None,
            error_message: None,
            leased_by: None,
            lease_expires_at: None,
            submitted_at: now,
            claimed_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn view_maps_status_label() {
        let view = ExportJobView::from(&job(ExportJobStatus::Active.id()));
        assert_eq!(view.status, "active");
        assert_eq!(view.progress, 40);
        assert!(view.result.is_none());
        assert!(view.error.is_none());
    }

    #[test]
    fn view_unknown_status() {
        let view = ExportJobView::from(&job(42));
        assert_eq!(view.status, "unknown");
    }

    #[test]
    fn view_omits_absent_fields_in_json() {
        let view = ExportJobView::from(&job(ExportJobStatus::Queued.id()));
        let value = serde_json::to_value(&view).unwrap();
        assert!(value.get("result").is_none());
        assert!(value.get("error").is_none());
    }
}
