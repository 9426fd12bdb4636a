//! Outbound event delivery for the export pipeline.
//!
//! Currently one delivery channel: the completion webhook posted to an
//! externally configured callback URL.

pub mod webhook;

pub use webhook::{CompletionNotice, WebhookError, WebhookNotifier};
