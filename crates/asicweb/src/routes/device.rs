//! Device information pages. Public, filled from the site config.

use axum::extract::State;
use axum::response::Response;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
struct DevicePage<'a> {
    page_title: &'static str,
    weekday: String,
    greeting: &'a str,
    username: &'a str,
    device_model: &'a str,
}

impl<'a> DevicePage<'a> {
    fn new(state: &'a AppState, page_title: &'static str) -> Self {
        Self {
            page_title,
            weekday: super::weekday(),
            greeting: &state.site.greeting,
            username: &state.site.username,
            device_model: &state.site.device_model,
        }
    }
}

pub async fn asic_page(State(state): State<AppState>) -> Response {
    let view = DevicePage::new(&state, "Asic Page");
    tracing::debug!(?view, "rendering asic page");
    state.render_page("asic.html", &view)
}

pub async fn asic2_page(State(state): State<AppState>) -> Response {
    let view = DevicePage::new(&state, "Asic2 Page");
    tracing::debug!(?view, "rendering asic2 page");
    state.render_page("asic2.html", &view)
}
