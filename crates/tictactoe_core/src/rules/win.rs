//! Win detection for N×N boards.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::super::{Board, Location, Player};

/// A complete line of `N` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Line {
    /// Row, counted from the top.
    Row(usize),
    /// Column, counted from the left.
    Column(usize),
    /// Top-left to bottom-right.
    Diagonal,
    /// Top-right to bottom-left.
    AntiDiagonal,
}

impl Line {
    /// All `2N + 2` lines of a board in evaluation order: rows top to
    /// bottom, columns left to right, the diagonal, then the anti-diagonal.
    pub fn all(dimension: usize) -> impl Iterator<Item = Line> {
        (0..dimension)
            .map(Line::Row)
            .chain((0..dimension).map(Line::Column))
            .chain([Line::Diagonal, Line::AntiDiagonal])
    }

    /// Cells covered by this line on a board of the given dimension.
    pub fn locations(self, dimension: usize) -> impl Iterator<Item = Location> {
        (0..dimension).map(move |i| match self {
            Line::Row(row) => Location::new(row, i),
            Line::Column(col) => Location::new(i, col),
            Line::Diagonal => Location::new(i, i),
            Line::AntiDiagonal => Location::new(i, dimension - 1 - i),
        })
    }
}

/// A line fully held by one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WinningLine {
    /// The completed line.
    pub line: Line,
    /// Its owner.
    pub player: Player,
}

/// Returns the owner of `line` if every cell on it holds the same mark.
fn line_owner(board: &Board, line: Line) -> Option<Player> {
    let mut owner = None;
    for location in line.locations(board.dimension()) {
        let player = board.get(location)?.player()?;
        match owner {
            None => owner = Some(player),
            Some(first) if first != player => return None,
            Some(_) => {}
        }
    }
    owner
}

/// Finds the first complete line in evaluation order.
///
/// When several lines are complete at once (only possible on a grid built
/// directly, never through alternating play) a row beats a column, a
/// column beats the diagonal, and the diagonal beats the anti-diagonal.
#[instrument(skip(board), fields(dimension = board.dimension()))]
pub fn winning_line(board: &Board) -> Option<WinningLine> {
    if board.dimension() == 0 {
        return None;
    }
    Line::all(board.dimension())
        .find_map(|line| line_owner(board, line).map(|player| WinningLine { line, player }))
}

/// Checks if there is a winner on the board.
///
/// Returns `Some(player)` if the player holds a full row, column or
/// diagonal, `None` otherwise.
pub fn check_winner(board: &Board) -> Option<Player> {
    winning_line(board).map(|win| win.player)
}
