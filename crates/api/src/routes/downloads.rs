//! Route definitions for archive downloads.

use axum::routing::get;
use axum::Router;

use crate::handlers::downloads;
use crate::state::AppState;

/// Routes mounted at `/exports` (root level, static-file style).
///
/// ```text
/// GET    /{file_name}    -> download_archive
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{file_name}", get(downloads::download_archive))
}
