//! Home page, also the catch-all for unknown paths.

use axum::extract::State;
use axum::http::Uri;
use axum::response::Response;
use serde::Serialize;

use crate::error::PageError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct HomePage<'a> {
    page_title: &'static str,
    weekday: String,
    greeting: &'a str,
}

/// Render the home page for `/` and `/index.html`.
///
/// Any other path reaching this handler gets the 404 error page.
pub async fn home_page(State(state): State<AppState>, uri: Uri) -> Response {
    let path = uri.path();
    if path != "/" && path != "/index.html" {
        return state.error_response(PageError::NotFound(path.to_string()));
    }

    let view = HomePage {
        page_title: "Home Page",
        weekday: super::weekday(),
        greeting: &state.site.greeting,
    };
    tracing::debug!(?view, "rendering home page");

    state.render_page("index.html", &view)
}
