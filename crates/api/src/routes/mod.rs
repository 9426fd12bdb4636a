pub mod downloads;
pub mod exports;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /exports            list (GET), submit (POST)
/// /exports/{id}       status (GET)
/// ```
///
/// Archive downloads are served at root level (`/exports/{file_name}`),
/// not under `/api/v1` — see [`downloads::router`].
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/exports", exports::router())
}
