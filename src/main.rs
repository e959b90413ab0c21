use std::{net::SocketAddr, path::PathBuf};

use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use bolso::{AppState, build_router, graceful_shutdown};

/// A personal finance tracker served as a JSON REST API.
#[derive(Debug, Parser)]
#[command(name = "bolso", version, about)]
struct Cli {
    /// Path to the SQLite database file. Created if it does not exist.
    #[arg(long, default_value = "bolso.db3")]
    db_path: PathBuf,

    /// The port to listen on.
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Mark session cookies `Secure`. Set this when serving behind HTTPS.
    #[arg(long)]
    production: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let connection =
        Connection::open(&cli.db_path).expect("Could not open the database file.");
    let state =
        AppState::new(connection, cli.production).expect("Could not initialize the app state.");

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let addr = SocketAddr::from(([127, 0, 0, 1], cli.port));
    tracing::info!("HTTP server listening on {}", addr);

    axum_server::bind(addr)
        .handle(handle)
        .serve(build_router(state).into_make_service())
        .await
        .unwrap();
}
