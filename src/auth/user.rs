//! The user model and its database operations.
//!
//! Users are the site administrators. Donors and volunteers do not get
//! accounts, so the first registered user is made an admin automatically.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{auth::password::PasswordHash, database_id::DatabaseId, error::Error};

/// The ID of a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserID(DatabaseId);

impl UserID {
    /// Create a user ID.
    pub fn new(id: DatabaseId) -> Self {
        Self(id)
    }

    /// The underlying row ID.
    pub fn as_i64(&self) -> DatabaseId {
        self.0
    }
}

/// A registered user of the admin interface.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the database.
    pub id: UserID,
    /// The name the user logs in with.
    pub username: String,
    /// The user's email address.
    pub email: String,
    /// The hash of the user's password.
    pub password_hash: PasswordHash,
    /// Whether the user may manage campaigns and the fund ledger.
    pub is_admin: bool,
}

/// Create the user table.
pub fn create_user_table(connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
            id INTEGER PRIMARY KEY,
            username TEXT UNIQUE NOT NULL,
            email TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            is_admin INTEGER NOT NULL DEFAULT 0
        )",
        (),
    )?;

    Ok(())
}

/// Create a user in the database.
///
/// The first user ever created becomes an admin.
///
/// # Errors
/// Returns [Error::DuplicateUsername] or [Error::DuplicateEmail] if the
/// username or email is already taken.
pub fn create_user(
    username: &str,
    email: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    let is_admin = count_users(connection)? == 0;

    connection.execute(
        "INSERT INTO user (username, email, password_hash, is_admin) VALUES (?1, ?2, ?3, ?4)",
        (username, email, password_hash.to_string(), is_admin),
    )?;

    let id = connection.last_insert_rowid();

    Ok(User {
        id: UserID::new(id),
        username: username.to_owned(),
        email: email.to_owned(),
        password_hash,
        is_admin,
    })
}

/// Retrieve a user from the database by their ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no user with that ID.
pub fn get_user_by_id(id: UserID, connection: &Connection) -> Result<User, Error> {
    let user = connection
        .prepare("SELECT id, username, email, password_hash, is_admin FROM user WHERE id = ?1")?
        .query_row([id.as_i64()], map_user_row)?;

    Ok(user)
}

/// Retrieve a user from the database by their username.
///
/// # Errors
/// Returns [Error::NotFound] if there is no user with that username.
pub fn get_user_by_username(username: &str, connection: &Connection) -> Result<User, Error> {
    let user = connection
        .prepare(
            "SELECT id, username, email, password_hash, is_admin FROM user WHERE username = ?1",
        )?
        .query_row([username], map_user_row)?;

    Ok(user)
}

/// The number of registered users.
pub fn count_users(connection: &Connection) -> Result<i64, Error> {
    let count = connection
        .prepare("SELECT COUNT(id) FROM user")?
        .query_row([], |row| row.get(0))?;

    Ok(count)
}

fn map_user_row(row: &rusqlite::Row) -> Result<User, rusqlite::Error> {
    let raw_password_hash: String = row.get(3)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: PasswordHash::new_unchecked(raw_password_hash),
        is_admin: row.get(4)?,
    })
}

/// Check that `user_id` refers to an admin.
///
/// # Errors
/// Returns [Error::Forbidden] if the user is not an admin, or
/// [Error::NotFound] if the user does not exist.
pub fn require_admin(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    let user = get_user_by_id(user_id, connection)?;

    if user.is_admin {
        Ok(user)
    } else {
        Err(Error::Forbidden)
    }
}
