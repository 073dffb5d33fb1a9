//! The registration page and the endpoint that creates an account.
//!
//! The very first account registered becomes the site administrator.

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
    auth::{
        cookie::set_auth_cookie,
        password::{PasswordHash, ValidatedPassword},
        user::{UserID, create_user},
    },
    endpoints,
    error::Error,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, link,
        log_in_register, password_input,
    },
};

/// The state needed to register a user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key for encrypting private cookies.
    pub cookie_key: Key,
    /// How long an auth cookie stays valid without activity.
    pub cookie_duration: Duration,
    /// The database connection for creating users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Markup {
    let form = html! {
        form
            class="space-y-4 md:space-y-6"
            hx-post=(endpoints::USERS_API)
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

            div
            {
                label for="email" class=(FORM_LABEL_STYLE) { "Email" }

                input
                    type="email"
                    name="email"
                    id="email"
                    placeholder="you@example.com"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }

            (password_input("password", "Password", None))
            (password_input("confirm_password", "Confirm password", None))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create account" }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                (link(endpoints::LOG_IN_VIEW, "Log in here"))
            }
        }
    };

    base(
        "Register",
        &[],
        &log_in_register("Create an account", &form),
    )
}

/// The data submitted from the registration form.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    /// The name the user will log in with.
    pub username: String,
    /// The user's email address.
    pub email: String,
    /// The user's password in plain text.
    pub password: String,
    /// The password a second time, to catch typos.
    pub confirm_password: String,
}

/// Create an account and log the new user in.
pub async fn post_register(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.password != form.confirm_password {
        return (
            StatusCode::BAD_REQUEST,
            Alert::error("Passwords do not match", "Enter the same password twice.").into_html(),
        )
            .into_response();
    }

    match register_user(&state, &form) {
        Ok(user_id) => match set_auth_cookie(jar, user_id, state.cookie_duration) {
            Ok(jar) => (
                jar,
                HxRedirect(endpoints::ROOT.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response(),
            Err(error) => error.into_alert_response(),
        },
        Err(error) => error.into_alert_response(),
    }
}

fn register_user(state: &RegistrationState, form: &RegisterForm) -> Result<UserID, Error> {
    let username = form.username.trim();
    if username.is_empty() {
        return Err(Error::EmptyField("username"));
    }

    let email = form.email.trim();
    if !email.contains('@') {
        return Err(Error::InvalidEmail(email.to_owned()));
    }

    let password = ValidatedPassword::new(&form.password, &[username, email])?;
    let password_hash = PasswordHash::from_validated_password(password)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = create_user(username, email, password_hash, &connection)?;

    Ok(user.id)
}

#[cfg(test)]
mod register_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, routing::{get, post}};
    use axum_extra::extract::cookie::Key;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use sha2::Digest;

    use crate::{
        auth::{
            cookie::{COOKIE_TOKEN, DEFAULT_COOKIE_DURATION},
            user::{create_user_table, get_user_by_username},
        },
        endpoints,
    };

    use super::{RegistrationState, get_register_page, post_register};

    fn get_test_state() -> RegistrationState {
        let connection = Connection::open_in_memory().expect("could not open database");
        create_user_table(&connection).expect("could not create user table");

        let hash = sha2::Sha512::digest("nafstenoas");

        RegistrationState {
            cookie_key: Key::from(&hash),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn get_test_server(state: RegistrationState) -> TestServer {
        let app = Router::new()
            .route(endpoints::REGISTER_VIEW, get(get_register_page))
            .route(endpoints::USERS_API, post(post_register))
            .with_state(state);

        TestServer::new(app)
    }

    #[tokio::test]
    async fn register_page_contains_form() {
        let server = get_test_server(get_test_state());

        let response = server.get(endpoints::REGISTER_VIEW).await;
        response.assert_status_ok();

        let document = Html::parse_document(&response.text());
        let form_selector =
            Selector::parse(&format!("form[hx-post='{}']", endpoints::USERS_API)).unwrap();
        let form = document
            .select(&form_selector)
            .next()
            .expect("page should contain a registration form");

        let input_selector = Selector::parse("input").unwrap();
        let input_names: Vec<_> = form
            .select(&input_selector)
            .filter_map(|input| input.value().attr("name"))
            .collect();
        for name in ["username", "email", "password", "confirm_password"] {
            assert!(input_names.contains(&name), "missing input {name}");
        }
    }

    #[tokio::test]
    async fn registering_creates_admin_and_logs_in() {
        let state = get_test_state();
        let server = get_test_server(state.clone());

        let response = server
            .post(endpoints::USERS_API)
            .form(&[
                ("username", "alice"),
                ("email", "alice@example.com"),
                ("password", "correct-horse-battery-staple"),
                ("confirm_password", "correct-horse-battery-staple"),
            ])
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("hx-redirect"), endpoints::ROOT);
        assert!(response.maybe_cookie(COOKIE_TOKEN).is_some());

        let connection = state.db_connection.lock().unwrap();
        let user = get_user_by_username("alice", &connection).expect("user should exist");
        assert!(user.is_admin);
    }

    #[tokio::test]
    async fn mismatched_passwords_are_rejected() {
        let server = get_test_server(get_test_state());

        let response = server
            .post(endpoints::USERS_API)
            .form(&[
                ("username", "alice"),
                ("email", "alice@example.com"),
                ("password", "correct-horse-battery-staple"),
                ("confirm_password", "incorrect-horse"),
            ])
            .await;

        response.assert_status_bad_request();
        assert!(response.text().contains("Passwords do not match"));
    }

    #[tokio::test]
    async fn weak_password_is_rejected() {
        let server = get_test_server(get_test_state());

        let response = server
            .post(endpoints::USERS_API)
            .form(&[
                ("username", "alice"),
                ("email", "alice@example.com"),
                ("password", "password123"),
                ("confirm_password", "password123"),
            ])
            .await;

        response.assert_status_bad_request();
        assert!(response.text().contains("Password too weak"));
    }

    #[tokio::test]
    async fn invalid_email_is_rejected() {
        let server = get_test_server(get_test_state());

        let response = server
            .post(endpoints::USERS_API)
            .form(&[
                ("username", "alice"),
                ("email", "not-an-email"),
                ("password", "correct-horse-battery-staple"),
                ("confirm_password", "correct-horse-battery-staple"),
            ])
            .await;

        response.assert_status_bad_request();
        assert!(response.text().contains("Invalid email address"));
    }
}
