//! Tic-tac-toe CLI.
//!
//! `serve` runs the session server, `play` runs the terminal client.

#![warn(missing_docs)]

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tictactoe::{AppConfig, Cli, Command, run_tui};
use tictactoe_session::FileSessionStore;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    let config = cli.command.apply_to(config);
    config.validate()?;

    match cli.command {
        Command::Serve { .. } => run_server(config).await,
        Command::Play { .. } => run_tui(config).await,
    }
}

/// Run the HTTP session server
#[instrument(skip_all, fields(host = %config.host(), port = config.port()))]
async fn run_server(config: AppConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(store = %config.store_path().display(), "Starting session server");
    let store = Arc::new(FileSessionStore::new(config.store_path()));
    tictactoe_server::serve(config.host(), *config.port(), store).await
}
