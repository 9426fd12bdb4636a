//! Archive download handler.
//!
//! Serves completed bundles straight from the durable output directory
//! with an attachment disposition. The durable copy step only runs after a
//! successful build, so nothing partial is ever fetchable here.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue};
use axum::response::Response;
use tokio_util::io::ReaderStream;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /exports/{file_name}
///
/// Stream an archive with `application/zip` content type and attachment
/// disposition. Rejects anything that could escape the output directory.
pub async fn download_archive(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> AppResult<Response> {
    if file_name.contains("..") || file_name.contains('/') || file_name.contains('\\') {
        return Err(AppError::BadRequest("Invalid archive name".into()));
    }

    let path = state.config.exports_dir.join(&file_name);
    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|_| AppError::NotFound(format!("No archive named {file_name}")))?;
    let metadata = file
        .metadata()
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to stat archive: {e}")))?;

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
        .map_err(|e| AppError::InternalError(format!("Invalid disposition header: {e}")))?;

    let mut response = Response::new(Body::from_stream(ReaderStream::new(file)));
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/zip"));
    response
        .headers_mut()
        .insert(header::CONTENT_DISPOSITION, disposition);
    response
        .headers_mut()
        .insert(header::CONTENT_LENGTH, HeaderValue::from(metadata.len()));

    tracing::debug!(file = %file_name, size_bytes = metadata.len(), "Serving archive");

    Ok(response)
}
