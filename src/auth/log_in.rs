//! The log-in page and the endpoint that verifies credentials.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState,
    alert::Alert,
    auth::{cookie::set_auth_cookie, user::get_user_by_username},
    endpoints,
    error::Error,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, link,
        log_in_register, password_input,
    },
};

/// How long the auth cookie lasts when "remember me" is ticked.
pub const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

/// The state needed to log a user in.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The key for encrypting private cookies.
    pub cookie_key: Key,
    /// How long an auth cookie stays valid without activity.
    pub cookie_duration: Duration,
    /// The database connection for looking up users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

/// Display the log-in page.
pub async fn get_log_in_page() -> Markup {
    let form = html! {
        form
            class="space-y-4 md:space-y-6"
            hx-post=(endpoints::LOG_IN_API)
            hx-target-error="this"
        {
            div
            {
                label for="username" class=(FORM_LABEL_STYLE) { "Username" }

                input
                    type="text"
                    name="username"
                    id="username"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required
                    autofocus;
            }

            (password_input("password", "Password", None))

            div class="flex items-center gap-2"
            {
                input
                    type="checkbox"
                    name="remember_me"
                    id="remember_me"
                    class="w-4 h-4 rounded border-gray-300 dark:border-gray-600";

                label for="remember_me" class=(FORM_LABEL_STYLE) { "Stay logged in" }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Log in" }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Don't have an account yet? "
                (link(endpoints::REGISTER_VIEW, "Register here"))
            }
        }
    };

    base("Log in", &[], &log_in_register("Log in to your account", &form))
}

/// The data submitted from the log-in form.
#[derive(Debug, Deserialize)]
pub struct LogInForm {
    /// The name the user logs in with.
    pub username: String,
    /// The user's password in plain text.
    pub password: String,
    /// Present when the "stay logged in" checkbox is ticked.
    pub remember_me: Option<String>,
}

/// Verify the user's credentials and set the auth cookie.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    Form(form): Form<LogInForm>,
) -> Response {
    match verify_credentials(&state, &form) {
        Ok(user_id) => {
            let cookie_duration = if form.remember_me.is_some() {
                REMEMBER_ME_COOKIE_DURATION
            } else {
                state.cookie_duration
            };

            match set_auth_cookie(jar, user_id, cookie_duration) {
                Ok(jar) => (
                    jar,
                    HxRedirect(endpoints::ROOT.to_owned()),
                    StatusCode::SEE_OTHER,
                )
                    .into_response(),
                Err(error) => error.into_alert_response(),
            }
        }
        Err(Error::InvalidCredentials) | Err(Error::NotFound) => (
            StatusCode::UNAUTHORIZED,
            Alert::error(
                "Could not log in",
                "The username and password do not match. Check them and try again.",
            )
            .into_html(),
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn verify_credentials(
    state: &LogInState,
    form: &LogInForm,
) -> Result<crate::auth::user::UserID, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_username(&form.username, &connection)?;
    user.password_hash.verify(&form.password)?;

    Ok(user.id)
}
