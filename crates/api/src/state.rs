use std::sync::Arc;

use scenaris_db::store::JobStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). The job store is
/// injected at startup; handlers never reach for a process-global client.
#[derive(Clone)]
pub struct AppState {
    /// The export job queue.
    pub store: Arc<dyn JobStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
