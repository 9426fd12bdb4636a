//! Result publication: URL derivation and the optional completion callback.
//!
//! The builder has already placed the archive in the durable output
//! directory; publishing moves no bytes. It derives the download URL from
//! the configured public base and, when a callback URL is configured,
//! posts a best-effort completion notice.

use scenaris_bundler::BuildArtifact;
use scenaris_core::export::ExportResult;
use scenaris_core::types::DbId;
use scenaris_events::{CompletionNotice, WebhookNotifier};

/// Error type for result publication.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The durable archive is not where the builder reported it.
    #[error("Durable archive missing at {path}: {source}")]
    ArchiveMissing {
        path: String,
        source: std::io::Error,
    },
}

/// Makes a finished build fetchable and notifies the external callback.
pub struct ResultPublisher {
    base_url: String,
    callback_url: Option<String>,
    notifier: WebhookNotifier,
}

impl ResultPublisher {
    pub fn new(base_url: String, callback_url: Option<String>) -> Self {
        Self::with_notifier(base_url, callback_url, WebhookNotifier::new())
    }

    /// Publisher with a custom notifier (retry schedule, timeouts).
    pub fn with_notifier(
        base_url: String,
        callback_url: Option<String>,
        notifier: WebhookNotifier,
    ) -> Self {
        Self {
            base_url,
            callback_url,
            notifier,
        }
    }

    /// Derive the caller-visible result for a built archive.
    ///
    /// Verifies the durable copy is actually present; a missing file here
    /// means the build cannot be marked completed.
    pub async fn publish(&self, artifact: &BuildArtifact) -> Result<ExportResult, PublishError> {
        if let Err(source) = tokio::fs::metadata(&artifact.archive_path).await {
            return Err(PublishError::ArchiveMissing {
                path: artifact.archive_path.display().to_string(),
                source,
            });
        }

        let download_url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            artifact.archive_name
        );

        Ok(ExportResult {
            download_url,
            size_bytes: artifact.size_bytes,
            checksum: artifact.checksum.clone(),
            archive_name: artifact.archive_name.clone(),
        })
    }

    /// Post the completion notice, if a callback URL is configured.
    ///
    /// Delivery failures are logged and swallowed; they never affect the
    /// job's status.
    pub async fn notify(&self, job_id: DbId, result: &ExportResult) {
        let Some(url) = &self.callback_url else {
            return;
        };

        let notice = CompletionNotice::completed(job_id, result);
        match self.notifier.deliver(url, &notice).await {
            Ok(()) => tracing::info!(job_id, url = %url, "Completion callback delivered"),
            Err(e) => tracing::warn!(
                job_id,
                url = %url,
                error = %e,
                "Completion callback failed (job remains completed)",
            ),
        }
    }
}
