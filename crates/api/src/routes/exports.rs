//! Route definitions for the `/exports` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::exports;
use crate::state::AppState;

/// Routes mounted at `/exports`.
///
/// ```text
/// GET    /        -> list_exports
/// POST   /        -> submit_export
/// GET    /{id}    -> get_export
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(exports::list_exports).post(exports::submit_export))
        .route("/{id}", get(exports::get_export))
}
