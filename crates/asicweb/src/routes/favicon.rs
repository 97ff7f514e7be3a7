//! Static favicon.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::error::PageError;
use crate::state::AppState;

/// Serve `favicon.ico` from the www directory as `image/x-icon`.
pub async fn favicon(State(state): State<AppState>) -> Response {
    let path = state.config.www_dir.join("favicon.ico");

    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/x-icon")], bytes).into_response(),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "favicon unavailable");
            state.error_response(PageError::NotFound("/favicon.ico".to_string()))
        }
    }
}
