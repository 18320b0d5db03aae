//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`](super::Board). Rules are separated
//! from board storage so they can be evaluated on any grid, including
//! grids that could never arise from legal play.

mod draw;
mod win;

pub use draw::{is_draw, is_full};
pub use win::{Line, WinningLine, check_winner, winning_line};
