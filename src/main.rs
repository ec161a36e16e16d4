//! The account book server binary.

use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use accountbook::{AppState, Config, build_router, graceful_shutdown, run_invalidation_worker};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug,tower_http=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();

    let jwt_secret = match std::env::var("JWT_SECRET") {
        Ok(secret) if !secret.is_empty() => secret,
        _ => {
            tracing::error!("The environment variable JWT_SECRET must be set and non-empty.");
            std::process::exit(1);
        }
    };

    let connection = match open_database(&config.db_path) {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not open the database at {}: {error}", config.db_path);
            std::process::exit(1);
        }
    };

    let (state, events) = match AppState::new(
        connection,
        &jwt_secret,
        &config.base_url,
        config.secure_cookies,
    ) {
        Ok(result) => result,
        Err(error) => {
            tracing::error!("Could not initialize the application state: {error}");
            std::process::exit(1);
        }
    };

    tokio::spawn(run_invalidation_worker(
        events,
        state.cache.clone(),
        state.db_connection.clone(),
    ));

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let app = build_router(state);

    tracing::info!("Listening on http://{}", config.address);

    if let Err(error) = axum_server::bind(config.address)
        .handle(handle)
        .serve(app.into_make_service())
        .await
    {
        tracing::error!("The server stopped with an error: {error}");
        std::process::exit(1);
    }
}

fn open_database(db_path: &str) -> Result<Connection, rusqlite::Error> {
    if db_path == ":memory:" {
        tracing::warn!("Using an in-memory database, all data will be lost on shutdown.");
        Connection::open_in_memory()
    } else {
        Connection::open(db_path)
    }
}
