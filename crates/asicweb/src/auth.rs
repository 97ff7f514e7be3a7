//! Cookie-based login state.
//!
//! [`AuthGate`] is the only place that knows the session lives in a cookie
//! named `session`. Handlers use the [`Session`] extractor, which pairs the
//! gate with the request's cookie jar.
//!
//! A visitor is authenticated exactly when the `session` cookie decodes, so
//! [`Session::is_authenticated`] and [`Session::current_user`] always agree.
//! Forged, expired, or stale-key cookies read as anonymous.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};

use crate::session::{Payload, SessionCodec, SessionError};
use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Payload key holding the signed-in username.
const NAME_KEY: &str = "name";

/// The single accepted demo login.
const DEMO_USERNAME: &str = "howie";
const DEMO_PASSWORD: &str = "123";

/// Check a submitted username and password against the demo login.
///
/// Both fields must match exactly. The result carries no hint about which
/// field was wrong.
pub fn check_credentials(username: &str, password: &str) -> bool {
    username == DEMO_USERNAME && password == DEMO_PASSWORD
}

/// Issues, reads and clears session cookies.
#[derive(Debug, Clone)]
pub struct AuthGate {
    codec: Arc<SessionCodec>,
}

impl AuthGate {
    pub fn new(codec: SessionCodec) -> Self {
        Self {
            codec: Arc::new(codec),
        }
    }

    /// Username carried by a raw cookie value, if it decodes.
    pub fn user_from_value(&self, value: &str) -> Option<String> {
        match self.codec.decode(value) {
            Ok(mut payload) => Some(payload.remove(NAME_KEY).unwrap_or_default()),
            Err(err) => {
                tracing::debug!(error = %err, "ignoring undecodable session cookie");
                None
            }
        }
    }

    /// Build the cookie that signs `username` in.
    ///
    /// Scoped to `/` with no expiry, so it lasts for the browser session.
    pub fn session_cookie(&self, username: &str) -> Result<Cookie<'static>, SessionError> {
        let payload = Payload::from([(NAME_KEY.to_string(), username.to_string())]);
        let token = self.codec.encode(&payload)?;
        Ok(Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build())
    }

    /// Build the cookie that tells the browser to drop the session.
    pub fn removal_cookie() -> Cookie<'static> {
        let mut cookie = Cookie::build((SESSION_COOKIE, "")).path("/").build();
        cookie.make_removal();
        cookie
    }

    fn identity(&self, cookies: &Cookies) -> Option<String> {
        let cookie = cookies.get(SESSION_COOKIE)?;
        self.user_from_value(cookie.value())
    }
}

/// Request extractor exposing the login state of the current request.
#[derive(Clone)]
pub struct Session {
    gate: AuthGate,
    cookies: Cookies,
}

impl Session {
    pub fn new(gate: AuthGate, cookies: Cookies) -> Self {
        Self { gate, cookies }
    }

    /// Whether the request carries a valid session cookie.
    pub fn is_authenticated(&self) -> bool {
        self.gate.identity(&self.cookies).is_some()
    }

    /// The signed-in username, or an empty string for anonymous visitors.
    pub fn current_user(&self) -> String {
        self.gate.identity(&self.cookies).unwrap_or_default()
    }

    /// Attach a fresh session cookie for `username` to the response.
    pub fn issue(&self, username: &str) -> Result<(), SessionError> {
        self.cookies.add(self.gate.session_cookie(username)?);
        tracing::debug!(username = %username, "session issued");
        Ok(())
    }

    /// Expire the session cookie on the client.
    pub fn clear(&self) {
        self.cookies.add(AuthGate::removal_cookie());
        tracing::debug!("session cleared");
    }
}

impl FromRequestParts<AppState> for Session {
    type Rejection = <Cookies as FromRequestParts<AppState>>::Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let cookies = Cookies::from_request_parts(parts, state).await?;
        Ok(Self::new(state.auth.clone(), cookies))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn gate() -> AuthGate {
        AuthGate::new(SessionCodec::generate(Duration::from_secs(3600)))
    }

    #[test]
    fn credentials_require_exact_pair() {
        assert!(check_credentials("howie", "123"));

        for (user, pass) in [
            ("", ""),
            ("howie", ""),
            ("", "123"),
            ("howie", "1234"),
            ("howie", "12"),
            ("Howie", "123"),
            ("howie ", "123"),
            ("alice", "123"),
            ("123", "howie"),
        ] {
            assert!(!check_credentials(user, pass), "{user:?}/{pass:?} accepted");
        }
    }

    #[test]
    fn session_cookie_carries_username() {
        let gate = gate();
        let cookie = gate.session_cookie("alice").unwrap();
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.path(), Some("/"));
        assert!(cookie.max_age().is_none());
        assert!(cookie.expires().is_none());
        assert_eq!(gate.user_from_value(cookie.value()).as_deref(), Some("alice"));
    }

    #[test]
    fn foreign_or_garbage_values_are_anonymous() {
        let issued = gate().session_cookie("alice").unwrap();
        assert_eq!(gate().user_from_value(issued.value()), None);
        assert_eq!(gate().user_from_value("garbage"), None);
        assert_eq!(gate().user_from_value(""), None);
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let cookie = AuthGate::removal_cookie();
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.path(), Some("/"));
        assert!(cookie.max_age().is_some_and(|age| age.is_zero()));
    }
}
