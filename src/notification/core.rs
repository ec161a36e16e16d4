//! Defines the notification model and its database queries.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, params};
use serde::Serialize;

use crate::{Error, user::UserId};

/// The database ID of a notification.
pub type NotificationId = i64;

/// A message recorded for a user, e.g. after a balance change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    /// The ID of the notification.
    pub id: NotificationId,
    /// The user the notification is for.
    #[serde(skip)]
    pub user_id: UserId,
    /// The message text.
    pub message: String,
    /// Whether the user has marked the notification as read.
    pub is_read: bool,
    /// When the notification was recorded.
    pub created_at: DateTime<Utc>,
}

/// Create the notifications table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL
/// error.
pub fn create_notification_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS notifications (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            message TEXT NOT NULL,
            is_read INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
            )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(user_id)",
        (),
    )?;

    Ok(())
}

/// Record an unread notification for a user.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn insert_notification(
    user_id: UserId,
    message: &str,
    connection: &Connection,
) -> Result<Notification, Error> {
    let created_at = Utc::now();

    connection.execute(
        "INSERT INTO notifications (user_id, message, is_read, created_at)
         VALUES (?1, ?2, 0, ?3)",
        params![user_id, message, created_at],
    )?;

    Ok(Notification {
        id: connection.last_insert_rowid(),
        user_id,
        message: message.to_owned(),
        is_read: false,
        created_at,
    })
}

/// Retrieve all notifications for a user, newest first.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn list_notifications(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<Notification>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, message, is_read, created_at FROM notifications
             WHERE user_id = ?1 ORDER BY id DESC",
        )?
        .query_map([user_id], map_notification_row)?
        .map(|result| result.map_err(Error::from))
        .collect()
}

/// Mark one of the user's notifications as read.
///
/// # Errors
/// Returns [Error::NotFound] if the notification does not exist or belongs
/// to another user.
pub fn mark_notification_read(
    notification_id: NotificationId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_updated = connection.execute(
        "UPDATE notifications SET is_read = 1 WHERE id = ?1 AND user_id = ?2",
        params![notification_id, user_id],
    )?;

    if rows_updated == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_notification_row(row: &Row) -> Result<Notification, rusqlite::Error> {
    Ok(Notification {
        id: row.get(0)?,
        user_id: row.get(1)?,
        message: row.get(2)?,
        is_read: row.get(3)?,
        created_at: row.get(4)?,
    })
}
