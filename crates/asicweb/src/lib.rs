//! asicweb - a small templated device-info site with a demo login.
//!
//! Serves a handful of HTML pages rendered from templates in a `www`
//! directory, filled from a static `config.json`, plus a cookie-based
//! login that unlocks the display of one members page.
//!
//! # Architecture
//!
//! - **Templates**: every `www/*.html` file parsed once into a named set
//! - **Site config**: greeting, username and device model from JSON
//! - **Session**: HMAC-signed, AES-GCM-encrypted cookie payloads with
//!   per-process keys; nothing is stored server-side
//! - **Auth**: the `session` cookie gate and the demo credential check
//! - **Routes**: one handler per page
//!
//! All shared state is built before the listener starts and is read-only
//! afterwards.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod session;
pub mod site;
pub mod state;
pub mod templates;

pub use config::{Config, StartupMode};
pub use routes::router;
pub use state::AppState;
