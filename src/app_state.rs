//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use jsonwebtoken::{DecodingKey, EncodingKey};
use rusqlite::Connection;

use crate::{
    Error,
    cache::ReadCache,
    db::initialize,
    events::{self, EventReceiver, EventSender},
    mailer::{Mailer, TracingMailer},
};

#[derive(Clone)]
struct JwtKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,

    /// The cache of account and profile read views.
    pub cache: ReadCache,

    /// The sending half of the ledger event channel.
    pub events: EventSender,

    /// The collaborator that delivers account verification email.
    pub mailer: Arc<dyn Mailer>,

    /// The base URL used to build activation links.
    pub base_url: String,

    /// Whether token cookies are marked `Secure`. Disabled for local
    /// development over plain HTTP.
    pub secure_cookies: bool,

    jwt_keys: JwtKeys,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection, along with
    /// the receiving half of the ledger event channel.
    ///
    /// This function will initialize the database by adding the tables for
    /// the domain models. The caller is expected to pass the returned
    /// [EventReceiver] to [crate::run_invalidation_worker]; dropping it
    /// instead simply disables cache invalidation and notifications.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        jwt_secret: &str,
        base_url: &str,
        secure_cookies: bool,
    ) -> Result<(Self, EventReceiver), Error> {
        initialize(&db_connection)?;

        let (events, receiver) = events::channel();

        let state = Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            cache: ReadCache::new(),
            events,
            mailer: Arc::new(TracingMailer),
            base_url: base_url.trim_end_matches('/').to_owned(),
            secure_cookies,
            jwt_keys: JwtKeys {
                encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
                decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            },
        };

        Ok((state, receiver))
    }

    /// Replace the mailer, e.g. with a recording implementation in tests.
    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }

    /// The encoding key for JWTs.
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.jwt_keys.encoding_key
    }

    /// The decoding key for JWTs.
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.jwt_keys.decoding_key
    }

    /// Lock the database connection for the duration of a request.
    ///
    /// # Errors
    /// Returns [Error::DatabaseLock] if the lock is poisoned.
    pub fn lock_connection(&self) -> Result<std::sync::MutexGuard<'_, Connection>, Error> {
        self.db_connection.lock().map_err(|_| Error::DatabaseLock)
    }
}
