//! Serves finished audio artifacts back to clients.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{IntoResponse, Response};
use tracing::info;

use crate::errors::app_error::AppResult;
use crate::state::AppState;

/// Handler for GET /api/audio/{filename}.
///
/// The filename is whatever a synthesis response handed out in `audioUrl`;
/// the store revalidates it before touching the filesystem, so traversal
/// attempts land on the same 404 as a genuinely missing file.
pub async fn get_audio(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    let (body, content_type) = state.artifacts.serve(&filename).await?;

    info!(
        "Serving audio file - name: {}, size: {} bytes",
        filename,
        body.len()
    );

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    if let Ok(len) = HeaderValue::from_str(&body.len().to_string()) {
        headers.insert(header::CONTENT_LENGTH, len);
    }

    Ok((headers, body).into_response())
}
