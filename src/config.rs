//! The command line configuration for the server binary.

use std::net::SocketAddr;

use clap::Parser;

/// The command line arguments for the account book server.
#[derive(Debug, Parser)]
#[command(name = "accountbook", about = "A personal account book web API.")]
pub struct Config {
    /// The address and port to listen on.
    #[arg(long, default_value = "127.0.0.1:3000")]
    pub address: SocketAddr,

    /// The path to the SQLite database file. Pass ':memory:' for an
    /// in-memory database that is discarded on shutdown.
    #[arg(long, default_value = "accountbook.db")]
    pub db_path: String,

    /// The public base URL used when building account activation links.
    #[arg(long, default_value = "http://localhost:3000")]
    pub base_url: String,

    /// Mark token cookies as Secure. Enable when serving over HTTPS.
    #[arg(long)]
    pub secure_cookies: bool,
}
