//! Database initialization: connection pragmas and table creation.

use std::time::Duration;

use rusqlite::Connection;

use crate::{
    account::create_account_table, notification::create_notification_table,
    transaction::create_transaction_history_table, user::create_user_table,
};

/// Configure a connection for use by the application.
///
/// Enables foreign keys, switches file-backed databases to WAL so concurrent
/// writers queue on the busy handler instead of failing immediately, and sets
/// a busy timeout so a second writer waits for the first to commit.
///
/// Every connection to the database must be configured, including extra
/// connections opened by tests that simulate concurrent writers.
///
/// # Errors
/// Returns an error if a pragma cannot be applied.
pub fn configure(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.busy_timeout(Duration::from_secs(5))?;
    connection.pragma_update(None, "foreign_keys", "ON")?;

    // PRAGMA journal_mode returns the resulting mode as a row.
    let _mode: String = connection.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;

    Ok(())
}

/// Configure `connection` and create the tables for the domain models.
///
/// Table creation is idempotent.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    configure(connection)?;

    create_user_table(connection)?;
    create_account_table(connection)?;
    create_transaction_history_table(connection)?;
    create_notification_table(connection)?;

    Ok(())
}
