//! N×N tic-tac-toe: configuration, game controller and terminal client.
//!
//! # Architecture
//!
//! - **tictactoe_core**: board state machine and win evaluator
//! - **tictactoe_session**: session record, file and HTTP stores
//! - **tictactoe_server**: axum routes over a session store
//! - **this crate**: [`GameController`] adapting UI gestures to the board,
//!   [`AppConfig`], the CLI and the ratatui client
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use tictactoe::GameController;
//! use tictactoe_core::Location;
//! use tokio::sync::mpsc;
//!
//! # async fn example() {
//! let (tx, _rx) = mpsc::unbounded_channel();
//! let mut controller = GameController::new(3, 15, Duration::from_millis(500), None, tx);
//! controller.activate(Location::new(1, 1));
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cli;
mod config;
mod controller;
mod tui;

pub use cli::{Cli, Command};
pub use config::{AppConfig, ConfigError, DEFAULT_CONFIG_FILE};
pub use controller::{GameController, GameEvent};
pub use tui::{App, BoardLayout, LayoutConfig, run_tui};
