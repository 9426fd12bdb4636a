//! Bundle artifact payloads: the build manifest and the world snapshot.
//!
//! Both are written into the working directory before packaging. The
//! manifest carries build metadata; the snapshot carries the deterministic
//! seed and a fresh identity token for this attempt.

use serde::{Deserialize, Serialize};

use crate::export::ExportParams;
use crate::types::Timestamp;

/// Seed value snapshotted when the caller supplied none.
pub const SEED_SENTINEL: &str = "0x0";

/// Content descriptor stamped into every world snapshot.
pub const WORLD_DESCRIPTOR: &str = "procedurally_generated";

/// Entity count recorded in the snapshot payload.
pub const DEFAULT_ENTITY_COUNT: u32 = 200;

/// Build the `manifest.json` payload for a job.
///
/// Starts from the generated metadata (timestamp, engine, scenario id,
/// protocol version) and merges the caller's `manifest_overrides` on top:
/// caller keys win over generated ones. Overrides that are not a JSON
/// object are ignored.
pub fn bundle_manifest(params: &ExportParams, generated_at: Timestamp) -> serde_json::Value {
    let mut manifest = serde_json::Map::new();
    manifest.insert(
        "generated".to_string(),
        serde_json::Value::String(generated_at.to_rfc3339()),
    );
    manifest.insert(
        "engine".to_string(),
        serde_json::Value::String(params.engine.clone()),
    );
    manifest.insert(
        "scenario_id".to_string(),
        serde_json::Value::String(params.scenario_id.clone()),
    );
    manifest.insert(
        "version".to_string(),
        serde_json::Value::String(params.protocol_version().to_string()),
    );

    if let Some(serde_json::Value::Object(overrides)) = &params.manifest_overrides {
        for (key, value) in overrides {
            manifest.insert(key.clone(), value.clone());
        }
    }

    serde_json::Value::Object(manifest)
}

/// The `world.json` payload: the state snapshot packaged with every bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Deterministic generation seed, or [`SEED_SENTINEL`] when absent.
    pub seed: String,
    /// Content descriptor.
    pub world: String,
    /// Number of entities in the snapshot.
    pub entities: u32,
    /// Identity token distinguishing this snapshot from any other attempt.
    pub checksum: String,
}

impl WorldSnapshot {
    /// Build a snapshot for the given seed and a freshly generated token.
    pub fn new(seed: Option<&str>, checksum: String) -> Self {
        Self {
            seed: seed.unwrap_or(SEED_SENTINEL).to_string(),
            world: WORLD_DESCRIPTOR.to_string(),
            entities: DEFAULT_ENTITY_COUNT,
            checksum,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(overrides: Option<serde_json::Value>) -> ExportParams {
        ExportParams {
            scenario_id: "s1".to_string(),
            engine: "unity".to_string(),
            seed: None,
            manifest_overrides: overrides,
            version: None,
        }
    }

    #[test]
    fn manifest_carries_generated_metadata() {
        let now = chrono::Utc::now();
        let manifest = bundle_manifest(&params(None), now);
        assert_eq!(manifest["engine"], "unity");
        assert_eq!(manifest["scenario_id"], "s1");
        assert_eq!(manifest["version"], crate::export::DEFAULT_PROTOCOL_VERSION);
        assert_eq!(manifest["generated"], now.to_rfc3339());
    }

    #[test]
    fn caller_overrides_win() {
        let overrides = serde_json::json!({
            "version": "9.9.9",
            "studio": "acme",
        });
        let manifest = bundle_manifest(&params(Some(overrides)), chrono::Utc::now());
        assert_eq!(manifest["version"], "9.9.9");
        assert_eq!(manifest["studio"], "acme");
        // Generated keys the caller did not touch survive.
        assert_eq!(manifest["engine"], "unity");
    }

    #[test]
    fn non_object_overrides_ignored() {
        let manifest = bundle_manifest(
            &params(Some(serde_json::Value::String("bogus".into()))),
            chrono::Utc::now(),
        );
        assert_eq!(manifest["engine"], "unity");
        assert_eq!(manifest["scenario_id"], "s1");
    }

    #[test]
    fn snapshot_uses_seed_sentinel() {
        let snapshot = WorldSnapshot::new(None, "abcd".to_string());
        assert_eq!(snapshot.seed, SEED_SENTINEL);
        assert_eq!(snapshot.world, WORLD_DESCRIPTOR);
        assert_eq!(snapshot.entities, DEFAULT_ENTITY_COUNT);
    }

    #[test]
    fn snapshot_keeps_caller_seed() {
        let snapshot = WorldSnapshot::new(Some("0xDEAD"), "abcd".to_string());
        assert_eq!(snapshot.seed, "0xDEAD");
    }
}
