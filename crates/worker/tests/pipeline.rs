//! End-to-end pipeline tests: enqueue through terminal state against the
//! in-memory store, with a stub packager so no external archive tool is
//! needed.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use scenaris_bundler::{BuilderConfig, BundleBuilder, Packager, PackagerError, ZipPackager};
use scenaris_core::export::{ExportParams, ExportResult};
use scenaris_core::types::DbId;
use scenaris_db::models::export_job::ExportJob;
use scenaris_db::models::status::ExportJobStatus;
use scenaris_db::store::{JobStore, MemoryJobStore};
use scenaris_events::WebhookNotifier;
use scenaris_worker::{JobRunner, ResultPublisher, WorkerPool};

/// Packager stand-in that writes a small archive without any external tool.
struct StubPackager;

#[async_trait]
impl Packager for StubPackager {
    async fn pack(&self, _dir: &Path, archive_path: &Path) -> Result<(), PackagerError> {
        std::fs::write(archive_path, b"PK\x03\x04 stub archive bytes")?;
        Ok(())
    }
}

fn params(scenario: &str, engine: &str) -> ExportParams {
    ExportParams {
        scenario_id: scenario.to_string(),
        engine: engine.to_string(),
        seed: None,
        manifest_overrides: None,
        version: None,
    }
}

fn fast_builder(output_dir: &Path, packager: Arc<dyn Packager>) -> Arc<BundleBuilder> {
    let config = BuilderConfig {
        output_dir: output_dir.to_path_buf(),
        progress_steps: 5,
        step_delay: Duration::from_millis(1),
    };
    Arc::new(BundleBuilder::new(config, packager))
}

/// Pool wiring for one test: store + runner + 2 workers on a fast poll.
struct Harness {
    store: Arc<dyn JobStore>,
    cancel: CancellationToken,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl Harness {
    fn start(
        output_dir: &Path,
        packager: Arc<dyn Packager>,
        callback_url: Option<String>,
        workers: usize,
    ) -> Self {
        let store: Arc<dyn JobStore> = Arc::new(MemoryJobStore::new(Duration::from_secs(60)));
        let builder = fast_builder(output_dir, packager);
        // Single-attempt notifier so callback failures don't slow tests.
        let publisher = Arc::new(ResultPublisher::with_notifier(
            "http://localhost:8080/exports".to_string(),
            callback_url,
            WebhookNotifier::with_schedule(Vec::new()),
        ));
        let runner = Arc::new(JobRunner::new(Arc::clone(&store), builder, publisher));

        let cancel = CancellationToken::new();
        let pool = WorkerPool::new(Arc::clone(&store), runner, Duration::from_millis(5));
        let handles = pool.spawn(workers, cancel.clone());

        Self {
            store,
            cancel,
            handles,
        }
    }

    async fn stop(self) {
        self.cancel.cancel();
        for handle in self.handles {
            let _ = handle.await;
        }
    }
}

/// Poll the store until the job reaches a terminal state.
async fn wait_terminal(store: &Arc<dyn JobStore>, job_id: DbId) -> ExportJob {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    loop {
        let job = store.get(job_id).await.unwrap().expect("job exists");
        if job.is_terminal() {
            return job;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "job {job_id} did not reach a terminal state in time"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

// ---------------------------------------------------------------------------
// Scenario A: happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn completed_export_carries_checksummed_result() {
    let output = tempfile::tempdir().unwrap();
    let harness = Harness::start(output.path(), Arc::new(StubPackager), None, 2);

    let job = harness.store.enqueue(&params("s1", "blender")).await.unwrap();
    let finished = wait_terminal(&harness.store, job.id).await;

    assert_eq!(finished.status(), Some(ExportJobStatus::Completed));
    assert_eq!(finished.progress_percent, 100);
    assert!(finished.error_message.is_none());

    let result: ExportResult =
        serde_json::from_value(finished.result.clone().expect("result present")).unwrap();
    assert!(result.size_bytes > 0);
    assert_eq!(result.checksum.len(), 64);

    let expected_name = format!("scenaris_export_{}_blender.zip", job.id);
    assert_eq!(result.archive_name, expected_name);
    assert!(result.download_url.ends_with(&expected_name));
    assert!(output.path().join(&expected_name).exists());

    harness.stop().await;
}

// ---------------------------------------------------------------------------
// Scenario B: packaging tool failure
// ---------------------------------------------------------------------------

#[tokio::test]
async fn broken_packaging_tool_fails_the_job() {
    let output = tempfile::tempdir().unwrap();
    let packager = Arc::new(ZipPackager::new("definitely-not-a-real-zip-binary"));
    let harness = Harness::start(output.path(), packager, None, 2);

    let job = harness.store.enqueue(&params("s2", "unity")).await.unwrap();
    let finished = wait_terminal(&harness.store, job.id).await;

    assert_eq!(finished.status(), Some(ExportJobStatus::Failed));
    let error = finished.error_message.clone().expect("error present");
    assert!(!error.is_empty());
    assert!(finished.result.is_none());

    let would_be_name = format!("scenaris_export_{}_unity.zip", job.id);
    assert!(!output.path().join(would_be_name).exists());

    harness.stop().await;
}

// ---------------------------------------------------------------------------
// Scenario C: 10 jobs, 2 workers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pool_of_two_drains_ten_jobs_without_overcommit() {
    let output = tempfile::tempdir().unwrap();
    let harness = Harness::start(output.path(), Arc::new(StubPackager), None, 2);

    let mut ids = Vec::new();
    for i in 0..10 {
        let job = harness
            .store
            .enqueue(&params(&format!("s{i}"), "godot"))
            .await
            .unwrap();
        ids.push(job.id);
    }

    // Sample the active count while the pool drains the queue.
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    loop {
        let jobs = harness.store.list(Some(100), None).await.unwrap();
        let active = jobs
            .iter()
            .filter(|j| j.status() == Some(ExportJobStatus::Active))
            .count();
        assert!(active <= 2, "observed {active} active jobs with 2 workers");

        let terminal = jobs.iter().filter(|j| j.is_terminal()).count();
        if terminal == 10 {
            break;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "queue did not drain in time ({terminal}/10 terminal)"
        );
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    for id in ids {
        let job = harness.store.get(id).await.unwrap().unwrap();
        assert_eq!(job.status(), Some(ExportJobStatus::Completed));
    }

    harness.stop().await;
}

// ---------------------------------------------------------------------------
// Scenario D: unreachable callback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreachable_callback_does_not_fail_the_job() {
    let output = tempfile::tempdir().unwrap();
    let harness = Harness::start(
        output.path(),
        Arc::new(StubPackager),
        Some("http://127.0.0.1:1/callback".to_string()),
        2,
    );

    let job = harness.store.enqueue(&params("s3", "ue5")).await.unwrap();
    let finished = wait_terminal(&harness.store, job.id).await;

    assert_eq!(finished.status(), Some(ExportJobStatus::Completed));
    assert!(finished.error_message.is_none());

    harness.stop().await;
}

// ---------------------------------------------------------------------------
// Shutdown: cancelled pool stops leasing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cancelled_pool_leases_no_further_jobs() {
    let output = tempfile::tempdir().unwrap();
    let harness = Harness::start(output.path(), Arc::new(StubPackager), None, 2);

    let store = Arc::clone(&harness.store);
    harness.stop().await;

    let job = store.enqueue(&params("s4", "unity")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let current = store.get(job.id).await.unwrap().unwrap();
    assert_eq!(current.status(), Some(ExportJobStatus::Queued));
}
