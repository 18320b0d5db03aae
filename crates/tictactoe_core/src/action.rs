//! Reasons a move is not applied.

use super::Location;

/// Error returned when [`BoardState::apply_move`](super::BoardState::apply_move)
/// leaves the game untouched.
///
/// Rejections are expected during normal play (duplicate pointer events,
/// clicks after the game ended), so callers usually log and drop them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The cell already holds a mark.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(Location),

    /// The location lies outside the board.
    #[display("Location {} is outside the board", _0)]
    OutOfBounds(Location),

    /// The game already reached a terminal outcome.
    #[display("Game is already over")]
    GameOver,

    /// The board is smaller than the minimum playable dimension.
    #[display("A {0}x{0} board is not playable", _0)]
    Unplayable(usize),
}

impl std::error::Error for MoveError {}
