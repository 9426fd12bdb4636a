//! Completion webhook delivery with exponential-backoff retry.
//!
//! [`WebhookNotifier`] sends a JSON-encoded [`CompletionNotice`] to an
//! external URL via HTTP POST. Failed attempts are retried with
//! exponential backoff (1 s, 2 s, 4 s by default). Each attempt carries a
//! request timeout so a slow endpoint cannot stall the caller.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use scenaris_core::export::ExportResult;
use scenaris_core::types::DbId;

/// Default retry delays in seconds (exponential backoff: 1s, 2s, 4s).
const RETRY_DELAYS_SECS: [u64; 3] = [1, 2, 4];

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Status value carried in a completion notice.
pub const NOTICE_STATUS_COMPLETED: &str = "completed";

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// The callback payload for a finished export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionNotice {
    pub export_id: DbId,
    pub status: String,
    pub download_url: String,
    pub size_bytes: i64,
    pub checksum: String,
}

impl CompletionNotice {
    /// Build the notice for a completed job.
    pub fn completed(job_id: DbId, result: &ExportResult) -> Self {
        Self {
            export_id: job_id,
            status: NOTICE_STATUS_COMPLETED.to_string(),
            download_url: result.download_url.clone(),
            size_bytes: result.size_bytes,
            checksum: result.checksum.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for webhook delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// WebhookNotifier
// ---------------------------------------------------------------------------

/// Delivers completion notices to an external webhook endpoint.
pub struct WebhookNotifier {
    client: reqwest::Client,
    retry_delays: Vec<Duration>,
}

impl WebhookNotifier {
    /// Notifier with the default retry schedule.
    pub fn new() -> Self {
        Self::with_schedule(RETRY_DELAYS_SECS.map(Duration::from_secs).to_vec())
    }

    /// Notifier with a custom retry schedule (one final attempt follows
    /// the last delay; an empty schedule means a single attempt).
    pub fn with_schedule(retry_delays: Vec<Duration>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            retry_delays,
        }
    }

    /// Deliver a notice to a webhook URL with retry.
    ///
    /// Returns `Ok(())` on the first successful attempt.
    pub async fn deliver(&self, url: &str, notice: &CompletionNotice) -> Result<(), WebhookError> {
        let mut last_err: Option<WebhookError> = None;

        for (attempt, delay) in self.retry_delays.iter().enumerate() {
            match self.try_send(url, notice).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        url,
                        error = %e,
                        "Webhook delivery attempt failed, retrying"
                    );
                    last_err = Some(e);
                    tokio::time::sleep(*delay).await;
                }
            }
        }

        // Final attempt after the last backoff.
        match self.try_send(url, notice).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!(url, error = %e, "Webhook delivery failed after all retries");
                Err(last_err.unwrap_or(e))
            }
        }
    }

    /// Execute a single POST request and check the response status.
    async fn try_send(&self, url: &str, notice: &CompletionNotice) -> Result<(), WebhookError> {
        let response = self.client.post(url).json(notice).send().await?;
        if !response.status().is_success() {
            return Err(WebhookError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

impl Default for WebhookNotifier {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn notice() -> CompletionNotice {
        CompletionNotice {
            export_id: 7,
            status: NOTICE_STATUS_COMPLETED.to_string(),
            download_url: "http://localhost:8080/exports/scenaris_export_7_unity.zip".to_string(),
            size_bytes: 64,
            checksum: "cd".repeat(32),
        }
    }

    #[test]
    fn new_does_not_panic() {
        let _notifier = WebhookNotifier::new();
    }

    #[test]
    fn default_does_not_panic() {
        let _notifier = WebhookNotifier::default();
    }

    #[test]
    fn notice_serializes_expected_fields() {
        let value = serde_json::to_value(notice()).unwrap();
        assert_eq!(value["export_id"], 7);
        assert_eq!(value["status"], "completed");
        assert_eq!(value["size_bytes"], 64);
        assert!(value["download_url"].as_str().unwrap().ends_with(".zip"));
        assert!(value.get("checksum").is_some());
    }

    #[test]
    fn webhook_error_display_http_status() {
        let err = WebhookError::HttpStatus(502);
        assert_eq!(err.to_string(), "Webhook returned HTTP 502");
    }

    #[tokio::test]
    async fn unreachable_endpoint_errors_without_retry_delay() {
        // Empty schedule: a single attempt against a closed port.
        let notifier = WebhookNotifier::with_schedule(Vec::new());
        let err = notifier
            .deliver("http://127.0.0.1:1/callback", &notice())
            .await
            .unwrap_err();
        assert!(matches!(err, WebhookError::Request(_)), "got {err:?}");
    }
}
