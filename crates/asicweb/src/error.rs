//! Error types for startup loading and page rendering.
//!
//! Request-time errors are turned into HTML error pages. The normal path
//! renders `error.html` from the template store (see
//! [`AppState::error_response`](crate::state::AppState::error_response));
//! the [`IntoResponse`] impl here is the template-free fallback used when
//! that page cannot be rendered either.

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use maud::{DOCTYPE, html};

use crate::session::SessionError;

/// Errors raised while loading templates or the site configuration.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A file or directory could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The site JSON could not be parsed.
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A template file failed to compile.
    #[error("failed to parse template {name}: {source}")]
    Template {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

/// Request-time page error.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// No page exists at the requested path.
    #[error("Error 404: Page {0} not found")]
    NotFound(String),

    /// The path exists but does not answer this method.
    #[error("Error 405: Method {method} not allowed on {path}")]
    MethodNotAllowed { method: String, path: String },

    /// The template is missing or failed to execute against its view model.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// A session cookie could not be produced.
    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

impl PageError {
    /// HTTP status reported for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::Template(_) | Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the visitor. Internal details stay in the log.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(_) | Self::MethodNotAllowed { .. } => self.to_string(),
            Self::Template(_) | Self::Session(_) => {
                "Error 500: The page could not be displayed.".to_string()
            }
        }
    }

    /// Log the error once, at a level matching its status.
    pub fn log(&self) {
        match self {
            Self::NotFound(path) => tracing::debug!(path = %path, "page not found"),
            Self::MethodNotAllowed { method, path } => {
                tracing::debug!(method = %method, path = %path, "method not allowed")
            }
            Self::Template(err) => tracing::error!(error = %err, "template render failed"),
            Self::Session(err) => tracing::error!(error = %err, "session encoding failed"),
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.user_message();

        let markup = html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    title { "Error" }
                    style { (maud::PreEscaped(FALLBACK_CSS)) }
                }
                body {
                    main class="error-page" {
                        h1 { "Error" }
                        p { (message) }
                        a href="/" { "Back to home" }
                    }
                }
            }
        };

        (status, markup).into_response()
    }
}

const FALLBACK_CSS: &str = r#"
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;display:flex;justify-content:center;align-items:center;min-height:100vh;margin:0;background:#fafafa;color:#1a1a2e}
.error-page{text-align:center;max-width:400px}
.error-page p{color:#666}
"#;
