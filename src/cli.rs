//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tictactoe_server::ClientVariant;

use crate::config::AppConfig;

/// N×N tic-tac-toe with a session server and a terminal client
#[derive(Parser, Debug)]
#[command(name = "tictactoe")]
#[command(
    about = "N×N tic-tac-toe with a session server and a terminal client",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// TOML configuration file (defaults to ./tictactoe.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP session server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// JSON file holding the session record
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Play in the terminal
    Play {
        /// Session server URL (used by the stateful variant)
        #[arg(long)]
        server_url: Option<String>,

        /// Client variant
        #[arg(long, value_parser = parse_variant)]
        variant: Option<ClientVariant>,

        /// Starting board dimension
        #[arg(short, long)]
        dimension: Option<usize>,
    },
}

fn parse_variant(raw: &str) -> Result<ClientVariant, String> {
    raw.parse()
        .map_err(|_| format!("unknown variant '{}' (expected basic, advanced or stateful)", raw))
}

impl Command {
    /// Layers this command's flags over `config`.
    pub fn apply_to(&self, config: AppConfig) -> AppConfig {
        match self {
            Command::Serve { host, port, store } => {
                let mut config = config;
                if let Some(host) = host {
                    config = config.with_host(host.clone());
                }
                if let Some(port) = port {
                    config = config.with_port(*port);
                }
                if let Some(store) = store {
                    config = config.with_store_path(store.clone());
                }
                config
            }
            Command::Play {
                server_url,
                variant,
                dimension,
            } => {
                let mut config = config;
                if let Some(url) = server_url {
                    config = config.with_server_url(url.clone());
                }
                if let Some(variant) = variant {
                    config = config.with_variant(*variant);
                }
                if let Some(dimension) = dimension {
                    config = config.with_dimension(*dimension);
                }
                config
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_flags_override_config() {
        let cli = Cli::try_parse_from([
            "tictactoe",
            "play",
            "--variant",
            "stateful",
            "--dimension",
            "5",
            "--server-url",
            "http://localhost:9000",
        ])
        .expect("Parses");
        let config = cli.command.apply_to(AppConfig::default());
        assert_eq!(*config.variant(), ClientVariant::Stateful);
        assert_eq!(*config.dimension(), 5);
        assert_eq!(config.server_url(), "http://localhost:9000");
    }

    #[test]
    fn test_serve_defaults_come_from_config() {
        let cli = Cli::try_parse_from(["tictactoe", "serve", "--config", "other.toml"])
            .expect("Parses");
        assert_eq!(cli.config, Some(PathBuf::from("other.toml")));
        let config = cli.command.apply_to(AppConfig::default());
        assert_eq!(*config.port(), 3000);
        assert_eq!(config.host(), "127.0.0.1");
    }

    #[test]
    fn test_unknown_variant_rejected() {
        assert!(Cli::try_parse_from(["tictactoe", "play", "--variant", "stencil"]).is_err());
    }
}
