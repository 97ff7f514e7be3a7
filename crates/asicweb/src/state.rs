//! Application state shared across all request handlers.
//!
//! Everything here is built once before the listener starts and is
//! read-only afterwards, so handlers share it through `Arc`s without locks.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;

use crate::auth::AuthGate;
use crate::config::Config;
use crate::error::{LoadError, PageError};
use crate::session::SessionCodec;
use crate::site::SiteConfig;
use crate::templates::TemplateStore;

/// Template used for every error page.
const ERROR_TEMPLATE: &str = "error.html";

/// View model for `error.html`.
#[derive(Debug, Serialize)]
struct ErrorPage {
    page_title: &'static str,
    /// Pre-escaped so paths in the message keep their slashes.
    error_msg: minijinja::Value,
}

/// Shared application state available to all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<Config>,

    /// Display values from the site JSON.
    pub site: Arc<SiteConfig>,

    /// Parsed page templates.
    pub templates: Arc<TemplateStore>,

    /// Session cookie issuer and reader.
    pub auth: AuthGate,
}

impl AppState {
    /// Load templates and site config and generate fresh session keys.
    ///
    /// Load problems are fatal only in
    /// [`StartupMode::FailFast`](crate::config::StartupMode::FailFast).
    pub fn new(config: Config) -> Result<Self, LoadError> {
        let templates = TemplateStore::load_dir(&config.www_dir, config.startup_mode)?;
        let site = SiteConfig::load_with_mode(&config.site_config_path, config.startup_mode)?;
        let codec = SessionCodec::generate(config.session_max_age);

        tracing::info!(
            templates = templates.names().len(),
            session_max_age_secs = config.session_max_age.as_secs(),
            "application state initialized"
        );

        Ok(Self::from_parts(config, site, templates, codec))
    }

    /// Assemble state from already-loaded parts.
    pub fn from_parts(
        config: Config,
        site: SiteConfig,
        templates: TemplateStore,
        codec: SessionCodec,
    ) -> Self {
        Self {
            config: Arc::new(config),
            site: Arc::new(site),
            templates: Arc::new(templates),
            auth: AuthGate::new(codec),
        }
    }

    /// Render `template` with `view` into a complete response.
    ///
    /// Render failures produce a single 500 error page.
    pub fn render_page<S: Serialize>(&self, template: &str, view: S) -> Response {
        match self.templates.render(template, view) {
            Ok(html) => Html(html).into_response(),
            Err(err) => self.error_response(PageError::from(err)),
        }
    }

    /// Render the error page for `err`, with the matching status code.
    ///
    /// Falls back to a built-in page if `error.html` cannot be rendered.
    pub fn error_response(&self, err: PageError) -> Response {
        err.log();

        let status: StatusCode = err.status();
        let message = maud::html! { (err.user_message()) }.into_string();
        let view = ErrorPage {
            page_title: "Error",
            error_msg: minijinja::Value::from_safe_string(message),
        };

        match self.templates.render(ERROR_TEMPLATE, view) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(render_err) => {
                tracing::error!(error = %render_err, "error page unavailable, using fallback");
                err.into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StartupMode;

    fn config_in(dir: &std::path::Path, mode: StartupMode) -> Config {
        Config {
            www_dir: dir.join("www"),
            site_config_path: dir.join("config.json"),
            startup_mode: mode,
            ..Config::default()
        }
    }

    #[test]
    fn degrade_mode_starts_with_nothing_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(config_in(dir.path(), StartupMode::Degrade)).unwrap();
        assert!(state.templates.is_empty());
        assert_eq!(*state.site, SiteConfig::default());
    }

    #[test]
    fn fail_fast_mode_refuses_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppState::new(config_in(dir.path(), StartupMode::FailFast)).is_err());

        std::fs::create_dir(dir.path().join("www")).unwrap();
        std::fs::write(dir.path().join("www/index.html"), "{{ greeting }}").unwrap();
        let err = AppState::new(config_in(dir.path(), StartupMode::FailFast)).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));

        std::fs::write(dir.path().join("config.json"), r#"{"Greeting": "hi"}"#).unwrap();
        let state = AppState::new(config_in(dir.path(), StartupMode::FailFast)).unwrap();
        assert_eq!(state.templates.names(), ["index.html"]);
        assert_eq!(state.site.greeting, "hi");
    }

    #[tokio::test]
    async fn error_page_prefers_template() {
        use http_body_util::BodyExt;

        let dir = tempfile::tempdir().unwrap();
        let mut templates = TemplateStore::empty();
        templates
            .add("error.html".into(), "[{{ error_msg }}]".into())
            .unwrap();
        let state = AppState::from_parts(
            config_in(dir.path(), StartupMode::Degrade),
            SiteConfig::default(),
            templates,
            SessionCodec::generate(std::time::Duration::from_secs(60)),
        );

        let response = state.error_response(PageError::NotFound("/a<b".to_string()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"[Error 404: Page /a&lt;b not found]");
    }
}
