//! Defines the state of the application, which is shared between all route handlers.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{auth::cookie::DEFAULT_COOKIE_DURATION, pagination::PaginationConfig};

/// The state of the application to be shared across all route handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key used to encrypt and decrypt private cookies.
    pub cookie_key: Key,
    /// How long an auth cookie stays valid without activity.
    pub cookie_duration: Duration,
    /// The IANA name of the timezone the server reports dates in.
    pub local_timezone: String,
    /// How list pages should be paginated.
    pub pagination_config: PaginationConfig,
    /// The database connection. Only one thread may use it at a time.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create the application state.
    ///
    /// `cookie_secret` is hashed to produce the private cookie key, so it can
    /// be any non-empty string.
    pub fn new(db_connection: Connection, cookie_secret: &str, local_timezone: &str) -> Self {
        Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            local_timezone: local_timezone.to_owned(),
            pagination_config: PaginationConfig::default(),
            db_connection: Arc::new(Mutex::new(db_connection)),
        }
    }
}

/// Create a private cookie key from `secret`.
fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);
    Key::from(&hash)
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
