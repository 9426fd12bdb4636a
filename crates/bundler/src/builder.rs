//! The bundle build sequence.
//!
//! One call to [`BundleBuilder::build`] is one attempt: stage artifacts in
//! a fresh working directory, tick progress, package, copy the archive to
//! the durable output directory, and report its size and digest. The
//! working directory is a `tempfile` guard, so it is removed on every exit
//! path, including early `?` returns.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use scenaris_core::export::ExportParams;
use scenaris_core::hashing;
use scenaris_core::manifest::{bundle_manifest, WorldSnapshot};
use scenaris_core::naming::archive_file_name;
use scenaris_core::types::DbId;

use crate::error::BuildError;
use crate::packager::Packager;

/// Manifest artifact file name inside the working directory.
const MANIFEST_FILE: &str = "manifest.json";

/// World snapshot artifact file name inside the working directory.
const SNAPSHOT_FILE: &str = "world.json";

/// Default number of discrete progress ticks per build.
const DEFAULT_PROGRESS_STEPS: u32 = 5;

/// Default delay between progress ticks.
const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(600);

/// Builder configuration.
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    /// Durable output directory; created if absent.
    pub output_dir: PathBuf,
    /// Number of discrete progress ticks emitted per build.
    pub progress_steps: u32,
    /// Delay between progress ticks.
    pub step_delay: Duration,
}

impl BuilderConfig {
    /// Configuration with the default progress cadence.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            progress_steps: DEFAULT_PROGRESS_STEPS,
            step_delay: DEFAULT_STEP_DELAY,
        }
    }
}

/// What a successful build leaves behind.
#[derive(Debug, Clone)]
pub struct BuildArtifact {
    /// Archive file name (deterministic per job id + engine).
    pub archive_name: String,
    /// Path of the durable archive copy.
    pub archive_path: PathBuf,
    /// Byte size of the durable copy.
    pub size_bytes: i64,
    /// SHA-256 hex digest of the durable copy.
    pub checksum: String,
}

/// Builds one archive per job attempt, isolated from concurrent attempts.
pub struct BundleBuilder {
    config: BuilderConfig,
    packager: Arc<dyn Packager>,
}

impl BundleBuilder {
    pub fn new(config: BuilderConfig, packager: Arc<dyn Packager>) -> Self {
        Self { config, packager }
    }

    /// Run one build attempt for `job_id`.
    ///
    /// Progress ticks are sent on `progress` as percentages from low to
    /// 100, each separated by the configured delay; a dropped receiver
    /// does not abort the build. The durable copy is only written after
    /// packaging succeeds, so no partial archive ever becomes fetchable.
    pub async fn build(
        &self,
        job_id: DbId,
        params: &ExportParams,
        progress: &mpsc::Sender<i16>,
    ) -> Result<BuildArtifact, BuildError> {
        let workdir = tempfile::Builder::new()
            .prefix(&format!("scenaris_export_{job_id}_"))
            .tempdir()?;
        let archive_name = archive_file_name(job_id, &params.engine);

        let manifest = bundle_manifest(params, chrono::Utc::now());
        tokio::fs::write(
            workdir.path().join(MANIFEST_FILE),
            serde_json::to_vec_pretty(&manifest)?,
        )
        .await?;

        let snapshot = WorldSnapshot::new(params.seed.as_deref(), hashing::build_token());
        tokio::fs::write(
            workdir.path().join(SNAPSHOT_FILE),
            serde_json::to_vec(&snapshot)?,
        )
        .await?;

        for step in 1..=self.config.progress_steps.max(1) {
            tokio::time::sleep(self.config.step_delay).await;
            let percent = ((step * 100) / self.config.progress_steps.max(1)) as i16;
            if progress.send(percent).await.is_err() {
                tracing::debug!(job_id, "Progress receiver dropped, continuing build");
            }
        }

        let staged_archive = workdir.path().join(&archive_name);
        self.packager.pack(workdir.path(), &staged_archive).await?;

        tokio::fs::create_dir_all(&self.config.output_dir).await?;
        let archive_path = self.config.output_dir.join(&archive_name);
        tokio::fs::copy(&staged_archive, &archive_path).await?;

        let size_bytes = tokio::fs::metadata(&archive_path).await?.len() as i64;
        let bytes = tokio::fs::read(&archive_path).await?;
        let checksum = hashing::sha256_hex(&bytes);

        tracing::debug!(
            job_id,
            archive = %archive_name,
            size_bytes,
            "Bundle packaged and copied to output directory",
        );

        Ok(BuildArtifact {
            archive_name,
            archive_path,
            size_bytes,
            checksum,
        })
    }
}
