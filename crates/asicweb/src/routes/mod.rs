//! Route definitions.
//!
//! ## Routes
//!
//! - `GET /`, `GET /index.html` - Home page
//! - `GET /asic.html`, `GET /asic2.html` - Device information
//! - `GET /login.html` - Login form
//! - `POST /login.html` - Credential submission (`name`, `password`)
//! - `GET /logout.html` - Clear the session, redirect to `/`
//! - `GET /internal.html` - Members page (display-only gate)
//! - `GET /favicon.ico` - Site icon
//!
//! Every other path falls through to the home handler, which answers 404.
//! A known path asked with an unsupported method gets the 405 error page.

mod device;
mod favicon;
mod home;
mod internal;
mod login;
mod logout;

use axum::Router;
use axum::extract::State;
use axum::http::{Method, Uri};
use axum::response::Response;
use axum::routing::get;
use tower_cookies::CookieManagerLayer;

use crate::error::PageError;
use crate::state::AppState;

/// Build the complete site router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::home_page))
        .route("/index.html", get(home::home_page))
        .route("/asic.html", get(device::asic_page))
        .route("/asic2.html", get(device::asic2_page))
        .route(
            "/login.html",
            get(login::login_page).post(login::login_submit),
        )
        .route("/logout.html", get(logout::logout))
        .route("/internal.html", get(internal::internal_page))
        .route("/favicon.ico", get(favicon::favicon))
        .fallback(home::home_page)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(CookieManagerLayer::new())
        .with_state(state)
}

async fn method_not_allowed(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    state.error_response(PageError::MethodNotAllowed {
        method: method.to_string(),
        path: uri.path().to_string(),
    })
}

/// Full English name of the current local weekday, e.g. "Tuesday".
fn weekday() -> String {
    chrono::Local::now().format("%A").to_string()
}
