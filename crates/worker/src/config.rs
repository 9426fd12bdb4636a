use std::path::PathBuf;
use std::time::Duration;

/// Worker configuration loaded from environment variables.
///
/// All fields except the database URL have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Number of concurrent workers (default: `4`).
    pub concurrency: usize,
    /// How often an idle worker polls for new jobs (default: `1000` ms).
    pub poll_interval: Duration,
    /// Lease visibility timeout; an active job whose lease is older than
    /// this becomes re-leasable (default: `900` s).
    pub lease_timeout: Duration,
    /// How long in-flight jobs get to finish on shutdown (default: `30` s).
    pub shutdown_timeout: Duration,
    /// Durable output directory, created if missing (default: `exports`).
    pub exports_dir: PathBuf,
    /// Public base URL the archives are served from.
    pub export_base_url: String,
    /// Optional completion callback endpoint; unset disables callbacks.
    pub callback_url: Option<String>,
    /// Archive tool binary (default: `zip`).
    pub zip_bin: String,
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                           |
    /// |---------------------------|-----------------------------------|
    /// | `WORKER_CONCURRENCY`      | `4`                               |
    /// | `WORKER_POLL_INTERVAL_MS` | `1000`                            |
    /// | `LEASE_TIMEOUT_SECS`      | `900`                             |
    /// | `SHUTDOWN_TIMEOUT_SECS`   | `30`                              |
    /// | `EXPORTS_DIR`             | `exports`                         |
    /// | `EXPORT_BASE_URL`         | `http://localhost:8080/exports`   |
    /// | `CALLBACK_URL`            | (unset)                           |
    /// | `ZIP_BIN`                 | `zip`                             |
    pub fn from_env() -> Self {
        let concurrency: usize = std::env::var("WORKER_CONCURRENCY")
            .unwrap_or_else(|_| "4".into())
            .parse()
            .expect("WORKER_CONCURRENCY must be a positive integer");
        assert!(concurrency > 0, "WORKER_CONCURRENCY must be at least 1");

        let poll_interval_ms: u64 = std::env::var("WORKER_POLL_INTERVAL_MS")
            .unwrap_or_else(|_| "1000".into())
            .parse()
            .expect("WORKER_POLL_INTERVAL_MS must be a valid u64");

        let lease_timeout_secs: u64 = std::env::var("LEASE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "900".into())
            .parse()
            .expect("LEASE_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let exports_dir =
            PathBuf::from(std::env::var("EXPORTS_DIR").unwrap_or_else(|_| "exports".into()));

        let export_base_url = std::env::var("EXPORT_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080/exports".into());

        let callback_url = std::env::var("CALLBACK_URL").ok().filter(|s| !s.is_empty());

        let zip_bin = std::env::var("ZIP_BIN").unwrap_or_else(|_| "zip".into());

        Self {
            concurrency,
            poll_interval: Duration::from_millis(poll_interval_ms),
            lease_timeout: Duration::from_secs(lease_timeout_secs),
            shutdown_timeout: Duration::from_secs(shutdown_timeout_secs),
            exports_dir,
            export_base_url,
            callback_url,
            zip_bin,
        }
    }
}
