//! Pure tic-tac-toe game logic for square boards of any size.
//!
//! # Architecture
//!
//! - **Types**: [`Player`], [`Square`], [`Location`] and the N×N [`Board`]
//! - **Rules**: pure end-condition evaluation ([`check_winner`], [`is_draw`])
//! - **State**: [`BoardState`], the single mutator of a game in progress,
//!   with a "game ended" notification for subscribers
//!
//! # Example
//!
//! ```
//! use tictactoe_core::{BoardState, GameStatus, Location, Player};
//!
//! let mut game = BoardState::new(3);
//! for (row, col) in [(0, 0), (1, 1), (0, 1), (2, 2), (0, 2)] {
//!     let _ = game.apply_move(Location::new(row, col));
//! }
//! assert_eq!(game.status(), GameStatus::Won(Player::X));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod location;
mod outcome;
mod rules;
mod state;
mod types;

pub use action::MoveError;
pub use location::Location;
pub use outcome::Outcome;
pub use rules::{Line, WinningLine, check_winner, is_draw, is_full, winning_line};
pub use state::{BoardSnapshot, BoardState};
pub use types::{Board, GameStatus, GridError, MIN_PLAYABLE_DIMENSION, Player, Square};
