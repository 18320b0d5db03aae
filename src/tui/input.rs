//! Keyboard handling for the board.

use crossterm::event::KeyCode;
use tictactoe_core::Location;

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move the cursor to a new cell.
    MoveCursor(Location),
    /// Play the cell under the cursor.
    Activate,
    /// Start a new game with the same dimension.
    Restart,
    /// Grow or shrink the board by one (starts a new game).
    Resize(isize),
    /// Leave the client.
    Quit,
    /// Key is not bound.
    None,
}

/// Maps a key to an action, given the cursor and board dimension.
pub fn map_key(key: KeyCode, cursor: Location, dimension: usize) -> Action {
    match key {
        KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down => {
            Action::MoveCursor(move_cursor(cursor, key, dimension))
        }
        KeyCode::Enter | KeyCode::Char(' ') => Action::Activate,
        KeyCode::Char('r') => Action::Restart,
        KeyCode::Char('+') | KeyCode::Char('=') => Action::Resize(1),
        KeyCode::Char('-') => Action::Resize(-1),
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => Action::None,
    }
}

/// Moves the cursor one cell with the arrow keys, stopping at the edges.
pub fn move_cursor(cursor: Location, key: KeyCode, dimension: usize) -> Location {
    let last = dimension.saturating_sub(1);
    let Location { row, col } = clamp(cursor, dimension);
    match key {
        KeyCode::Right => Location::new(row, (col + 1).min(last)),
        KeyCode::Left => Location::new(row, col.saturating_sub(1)),
        KeyCode::Down => Location::new((row + 1).min(last), col),
        KeyCode::Up => Location::new(row.saturating_sub(1), col),
        _ => Location::new(row, col),
    }
}

/// Pulls a cursor back onto a board that may have shrunk.
pub fn clamp(cursor: Location, dimension: usize) -> Location {
    let last = dimension.saturating_sub(1);
    Location::new(cursor.row.min(last), cursor.col.min(last))
}
