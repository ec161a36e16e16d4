//! Defines the user model and its database queries.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, params};
use serde::Serialize;

use crate::Error;

/// The database ID of a user.
pub type UserId = i64;

/// A registered user.
///
/// Serializing a `User` produces the profile view: the password hash and
/// account status fields are never sent to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    /// The ID of the user.
    pub id: UserId,
    /// The user's email, unique among users.
    pub email: String,
    /// The bcrypt hash of the user's password.
    #[serde(skip)]
    pub password_hash: String,
    /// The display nickname, unique among users when not empty.
    pub nickname: String,
    /// The user's real name.
    pub name: String,
    /// The user's phone number.
    pub phone_number: String,
    /// Whether the account has been activated and not deleted.
    #[serde(skip)]
    pub is_active: bool,
    /// When the user last logged in.
    #[serde(skip)]
    pub last_login: Option<DateTime<Utc>>,
    /// When the user registered.
    pub date_joined: DateTime<Utc>,
}

/// The data for inserting a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// The email to register.
    pub email: String,
    /// The bcrypt hash of the chosen password.
    pub password_hash: String,
    /// The display nickname.
    pub nickname: String,
    /// The user's real name.
    pub name: String,
    /// The user's phone number.
    pub phone_number: String,
}

/// Create the users table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL
/// error.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            nickname TEXT NOT NULL DEFAULT '',
            name TEXT NOT NULL DEFAULT '',
            phone_number TEXT NOT NULL DEFAULT '',
            is_active INTEGER NOT NULL DEFAULT 0,
            last_login TEXT,
            date_joined TEXT NOT NULL
            )",
        (),
    )?;

    Ok(())
}

/// Insert a new, inactive user.
///
/// # Errors
/// Returns [Error::DuplicateEmail] if the email is already registered, or
/// [Error::SqlError] if there is some other SQL error.
pub fn insert_user(new_user: NewUser, connection: &Connection) -> Result<User, Error> {
    let date_joined = Utc::now();

    connection.execute(
        "INSERT INTO users (email, password_hash, nickname, name, phone_number, is_active, date_joined)
         VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
        params![
            new_user.email,
            new_user.password_hash,
            new_user.nickname,
            new_user.name,
            new_user.phone_number,
            date_joined,
        ],
    )?;

    let id = connection.last_insert_rowid();

    Ok(User {
        id,
        email: new_user.email,
        password_hash: new_user.password_hash,
        nickname: new_user.nickname,
        name: new_user.name,
        phone_number: new_user.phone_number,
        is_active: false,
        last_login: None,
        date_joined,
    })
}

const USER_COLUMNS: &str =
    "id, email, password_hash, nickname, name, phone_number, is_active, last_login, date_joined";

/// Retrieve a user by their database ID.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a user, or
/// [Error::SqlError] if there is some other SQL error.
pub fn get_user_by_id(id: UserId, connection: &Connection) -> Result<User, Error> {
    let user = connection.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
        [id],
        map_user_row,
    )?;

    Ok(user)
}

/// Retrieve a user by their email.
///
/// # Errors
/// Returns [Error::NotFound] if no user has this email, or [Error::SqlError]
/// if there is some other SQL error.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    let user = connection.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
        [email],
        map_user_row,
    )?;

    Ok(user)
}

/// Whether `nickname` is already used by a user other than `exclude`.
///
/// Empty nicknames are never considered taken.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn nickname_taken(
    nickname: &str,
    exclude: Option<UserId>,
    connection: &Connection,
) -> Result<bool, Error> {
    if nickname.is_empty() {
        return Ok(false);
    }

    let count: i64 = connection.query_row(
        "SELECT COUNT(id) FROM users WHERE nickname = ?1 AND id != ?2",
        params![nickname, exclude.unwrap_or(-1)],
        |row| row.get(0),
    )?;

    Ok(count > 0)
}

/// Mark a user as active.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a user.
pub fn activate_user(id: UserId, connection: &Connection) -> Result<(), Error> {
    let rows_updated =
        connection.execute("UPDATE users SET is_active = 1 WHERE id = ?1", [id])?;

    if rows_updated == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Soft-delete a user by marking them inactive.
///
/// The row and the user's accounts are kept; an inactive user can no longer
/// log in or refresh tokens.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a user.
pub fn deactivate_user(id: UserId, connection: &Connection) -> Result<(), Error> {
    let rows_updated =
        connection.execute("UPDATE users SET is_active = 0 WHERE id = ?1", [id])?;

    if rows_updated == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Record the time of a successful log-in.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn set_last_login(
    id: UserId,
    timestamp: DateTime<Utc>,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "UPDATE users SET last_login = ?1 WHERE id = ?2",
        params![timestamp, id],
    )?;

    Ok(())
}

/// Update the editable profile fields of a user.
///
/// `None` fields are left unchanged.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a user.
pub fn update_profile(
    id: UserId,
    nickname: Option<&str>,
    name: Option<&str>,
    phone_number: Option<&str>,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_updated = connection.execute(
        "UPDATE users SET
            nickname = COALESCE(?1, nickname),
            name = COALESCE(?2, name),
            phone_number = COALESCE(?3, phone_number)
         WHERE id = ?4",
        params![nickname, name, phone_number, id],
    )?;

    if rows_updated == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Map a database row to a [User].
fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        nickname: row.get(3)?,
        name: row.get(4)?,
        phone_number: row.get(5)?,
        is_active: row.get(6)?,
        last_login: row.get(7)?,
        date_joined: row.get(8)?,
    })
}
