//! Export job parameter and result payloads.
//!
//! [`ExportParams`] is the caller-supplied request body, stored verbatim in
//! the job row's JSONB `params` column. [`ExportResult`] is what a completed
//! job carries in its `result` column and what the completion webhook sends.

use serde::{Deserialize, Serialize};

/// Manifest protocol version stamped into bundles when the caller does not
/// supply one.
pub const DEFAULT_PROTOCOL_VERSION: &str = "5.0.0";

/// Caller-supplied parameters for one export job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportParams {
    /// The scenario/project to export.
    pub scenario_id: String,
    /// Target engine identifier (see [`crate::engines::VALID_ENGINES`]).
    pub engine: String,
    /// Deterministic generation seed. Snapshots fall back to a fixed
    /// sentinel when absent.
    #[serde(default)]
    pub seed: Option<String>,
    /// Caller-supplied manifest entries, merged over the generated
    /// metadata (caller keys win).
    #[serde(default)]
    pub manifest_overrides: Option<serde_json::Value>,
    /// Manifest protocol version; defaults to [`DEFAULT_PROTOCOL_VERSION`].
    #[serde(default)]
    pub version: Option<String>,
}

impl ExportParams {
    /// The protocol version to stamp into the manifest.
    pub fn protocol_version(&self) -> &str {
        self.version.as_deref().unwrap_or(DEFAULT_PROTOCOL_VERSION)
    }
}

/// Result payload of a completed export job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportResult {
    /// Stable URL the archive can be fetched from.
    pub download_url: String,
    /// Byte size of the durable archive copy.
    pub size_bytes: i64,
    /// SHA-256 hex digest of the durable archive copy.
    pub checksum: String,
    /// File name of the archive inside the durable output directory.
    pub archive_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_version_defaults() {
        let params: ExportParams = serde_json::from_value(serde_json::json!({
            "scenario_id": "s1",
            "engine": "unity",
        }))
        .unwrap();
        assert_eq!(params.protocol_version(), DEFAULT_PROTOCOL_VERSION);
        assert!(params.seed.is_none());
        assert!(params.manifest_overrides.is_none());
    }

    #[test]
    fn protocol_version_caller_wins() {
        let params: ExportParams = serde_json::from_value(serde_json::json!({
            "scenario_id": "s1",
            "engine": "unity",
            "version": "6.1.0",
        }))
        .unwrap();
        assert_eq!(params.protocol_version(), "6.1.0");
    }

    #[test]
    fn result_round_trips_through_json() {
        let result = ExportResult {
            download_url: "http://localhost:8080/exports/scenaris_export_1_unity.zip".into(),
            size_bytes: 42,
            checksum: "ab".repeat(32),
            archive_name: "scenaris_export_1_unity.zip".into(),
        };
        let value = serde_json::to_value(&result).unwrap();
        let back: ExportResult = serde_json::from_value(value).unwrap();
        assert_eq!(back, result);
    }
}
