//! Accountbook is a web API for managing a personal account book: users,
//! their bank accounts and the transaction history of each account.
//!
//! The heart of the crate is the balance ledger in [crate::transaction]:
//! deposits and withdrawals are applied to an account's balance with a
//! store-level conditional update so that concurrent writers can neither lose
//! updates nor overdraw an account.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

pub mod account;
mod app_state;
pub mod auth;
mod cache;
mod config;
mod db;
pub mod endpoints;
pub mod events;
mod mailer;
pub mod money;
pub mod notification;
pub mod pagination;
mod routing;
pub mod transaction;
pub mod user;

pub use app_state::AppState;
pub use cache::ReadCache;
pub use config::Config;
pub use db::{configure as configure_db, initialize as initialize_db};
pub use events::{LedgerEvent, run_invalidation_worker};
pub use mailer::{Mailer, TracingMailer};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The client sent malformed input, e.g. a non-positive transaction
    /// amount or an amount with more than two decimal places.
    #[error("{0}")]
    Validation(String),

    /// The requested resource was not found, or exists but is not owned by
    /// the caller. The two cases are deliberately indistinguishable so that
    /// clients cannot enumerate other users' resources.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A withdrawal would take the account balance below zero. This is a
    /// normal business outcome, not a server fault.
    #[error("the account balance is insufficient for this withdrawal")]
    InsufficientFunds,

    /// The database reported a transient conflict (SQLITE_BUSY/LOCKED). The
    /// operation may be retried a bounded number of times.
    #[error("the database is busy, the request may be retried")]
    TransientStore,

    /// The email is already registered.
    #[error("the email is already in use")]
    DuplicateEmail,

    /// The nickname is already taken by another user.
    #[error("the nickname is already in use")]
    DuplicateNickname,

    /// The user provided an invalid email/password combination.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The user exists but has not activated their account, or has deleted it.
    #[error("the user account is not active")]
    InactiveUser,

    /// The access/refresh/activation token was missing, malformed or expired.
    #[error("invalid or expired token")]
    InvalidToken,

    /// A JWT could not be created.
    #[error("could not create token")]
    TokenCreation,

    /// An unexpected error occurred in the underlying hashing library.
    ///
    /// The error string should only be logged on the server, never sent to
    /// the client.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLock,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            rusqlite::Error::SqliteFailure(sql_error, _)
                if sql_error.code == rusqlite::ErrorCode::DatabaseBusy
                    || sql_error.code == rusqlite::ErrorCode::DatabaseLocked =>
            {
                Error::TransientStore
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.contains("users.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_CHECK
                    && desc.contains("transaction_details_length") =>
            {
                Error::Validation(
                    "transaction details must be at most 255 characters".to_owned(),
                )
            }
            error => {
                tracing::error!("an unhandled SQL error occurred: {error}");
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Error::Validation(ref message) => (StatusCode::BAD_REQUEST, message.clone()),
            Error::InsufficientFunds | Error::DuplicateEmail | Error::DuplicateNickname => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Error::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            Error::InvalidCredentials | Error::InactiveUser | Error::InvalidToken => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            Error::TransientStore => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            // Anything else is an internal fault that must not leak details
            // to the client.
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_owned(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));

        (status, body).into_response()
    }
}
