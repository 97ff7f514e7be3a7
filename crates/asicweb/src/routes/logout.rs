//! Logout: drop the session and bounce to the home page.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::auth::Session;

/// `GET /logout.html`. Always answers `302 Found` to `/`.
pub async fn logout(session: Session) -> Response {
    if session.is_authenticated() {
        session.clear();
    } else {
        tracing::debug!("logout without a session, nothing to clear");
    }

    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}
