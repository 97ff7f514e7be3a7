//! Login form and credential submission.

use axum::Form;
use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::response::Response;
use serde::{Deserialize, Serialize};

use crate::auth::{Session, check_credentials};
use crate::state::AppState;

/// Submitted login form. Missing fields read as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub name: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
struct LoginPage<'a> {
    page_title: &'static str,
    username: &'a str,
    logged_in: bool,
    login_failed: bool,
}

/// `GET /login.html`: show the form, or the signed-in state.
pub async fn login_page(State(state): State<AppState>, session: Session) -> Response {
    let logged_in = session.is_authenticated();
    let username = session.current_user();
    tracing::debug!(logged_in, "rendering login page");

    let view = LoginPage {
        page_title: "Login Page",
        username: &username,
        logged_in,
        login_failed: false,
    };
    state.render_page("login.html", &view)
}

/// `POST /login.html`: check the credentials and sign in on success.
///
/// A rejected attempt changes nothing and re-renders the form. A body that
/// is not a urlencoded form counts as empty fields.
pub async fn login_submit(
    State(state): State<AppState>,
    session: Session,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "unreadable login form, treating as empty");
            LoginForm::default()
        }
    };
    let logged_in = check_credentials(&form.name, &form.password);

    if logged_in {
        if let Err(err) = session.issue(&form.name) {
            return state.error_response(err.into());
        }
        tracing::info!(username = %form.name, "login accepted");
    } else {
        tracing::info!(username = %form.name, "login rejected");
    }

    let view = LoginPage {
        page_title: "Login Page",
        username: &form.name,
        logged_in,
        login_failed: !logged_in,
    };
    state.render_page("login.html", &view)
}
