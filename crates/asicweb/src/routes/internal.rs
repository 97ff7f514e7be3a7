//! Members page.
//!
//! Only what is displayed depends on the login state. Anonymous visitors
//! still get a 200 with `logged_in = false`; there is no redirect to the
//! login form.

use axum::extract::State;
use axum::response::Response;
use serde::Serialize;

use crate::auth::Session;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct InternalPage {
    page_title: &'static str,
    logged_in: bool,
    username: String,
}

pub async fn internal_page(State(state): State<AppState>, session: Session) -> Response {
    let view = InternalPage {
        page_title: "Internal Page",
        logged_in: session.is_authenticated(),
        username: session.current_user(),
    };
    tracing::debug!(?view, "rendering internal page");

    state.render_page("internal.html", &view)
}
