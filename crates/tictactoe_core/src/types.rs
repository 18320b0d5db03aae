//! Core domain types for tic-tac-toe.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{Location, Outcome};

/// Smallest board dimension on which moves are accepted.
pub const MIN_PLAYABLE_DIMENSION: usize = 3;

/// Player in the game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum Player {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

/// A square on the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    #[default]
    Empty,
    /// Square occupied by a player.
    Occupied(Player),
}

impl Square {
    /// The occupying player, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Square::Empty => None,
            Square::Occupied(player) => Some(player),
        }
    }
}

/// Error raised when a grid cannot be built from the given cells.
#[derive(Debug, Clone, Display, Error)]
#[display("Grid error: {} at {}:{}", message, file, line)]
pub struct GridError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl GridError {
    /// Creates a new grid error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Square N×N board stored in row-major order.
///
/// The only way to change a square after construction is
/// [`BoardState::apply_move`](super::BoardState::apply_move); the
/// constructors here exist so rules can be evaluated on arbitrary grids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    dimension: usize,
    squares: Vec<Square>,
}

impl Board {
    /// Creates an empty board with `dimension` rows and columns.
    #[instrument]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            squares: vec![Square::Empty; dimension * dimension],
        }
    }

    /// Builds a board from explicit rows.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] unless every row has as many cells as there are rows.
    #[instrument(skip(rows), fields(rows = rows.len()))]
    pub fn from_rows(rows: Vec<Vec<Square>>) -> Result<Self, GridError> {
        let dimension = rows.len();
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != dimension) {
            return Err(GridError::new(format!(
                "Row {} has {} cells, expected {}",
                index,
                row.len(),
                dimension
            )));
        }
        Ok(Self {
            dimension,
            squares: rows.into_iter().flatten().collect(),
        })
    }

    /// Number of rows (and columns).
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Total number of squares, `N²`.
    pub fn cell_count(&self) -> usize {
        self.squares.len()
    }

    /// Gets the square at `location`, or `None` if it is off the board.
    pub fn get(&self, location: Location) -> Option<Square> {
        location
            .to_index(self.dimension)
            .map(|index| self.squares[index])
    }

    /// Checks if a square is on the board and empty.
    pub fn is_empty(&self, location: Location) -> bool {
        matches!(self.get(location), Some(Square::Empty))
    }

    /// Returns all squares in row-major order.
    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Square]> {
        self.squares.chunks(self.dimension.max(1))
    }

    /// Iterates over every location in row-major order.
    pub fn locations(&self) -> impl Iterator<Item = Location> + use<> {
        let dimension = self.dimension;
        (0..dimension * dimension).filter_map(move |i| Location::from_index(i, dimension))
    }

    /// Places `player` on an empty in-range square.
    pub(crate) fn place(
        &mut self,
        location: Location,
        player: Player,
    ) -> Result<(), super::MoveError> {
        let index = location
            .to_index(self.dimension)
            .ok_or(super::MoveError::OutOfBounds(location))?;
        match self.squares[index] {
            Square::Empty => {
                self.squares[index] = Square::Occupied(player);
                Ok(())
            }
            Square::Occupied(_) => Err(super::MoveError::SquareOccupied(location)),
        }
    }

    /// Formats the board as a human-readable string.
    pub fn display(&self) -> String {
        self.rows()
            .map(|row| {
                row.iter()
                    .map(|square| match square {
                        Square::Empty => ".",
                        Square::Occupied(Player::X) => "X",
                        Square::Occupied(Player::O) => "O",
                    })
                    .collect::<Vec<_>>()
                    .join("|")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(MIN_PLAYABLE_DIMENSION)
    }
}

/// Parses rows separated by `/` or newlines, e.g. `"XO./.X./..X"`.
///
/// `X`/`x` and `O`/`o` are marks, `.`, `-` and `_` are empty squares.
/// Whitespace is ignored.
impl std::str::FromStr for Board {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .split(['/', '\n'])
            .map(|row| row.chars().filter(|c| !c.is_whitespace()).collect::<String>())
            .filter(|row| !row.is_empty())
            .map(|row| {
                row.chars()
                    .map(|c| match c {
                        'X' | 'x' => Ok(Square::Occupied(Player::X)),
                        'O' | 'o' => Ok(Square::Occupied(Player::O)),
                        '.' | '-' | '_' => Ok(Square::Empty),
                        other => Err(GridError::new(format!("Unknown square symbol '{}'", other))),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(rows)
    }
}

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended in a win.
    Won(Player),
    /// Game ended in a draw.
    Draw,
}

impl GameStatus {
    /// Returns true once a terminal outcome has been reached.
    pub fn is_over(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    /// The terminal outcome, if the game is over.
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            GameStatus::InProgress => None,
            GameStatus::Won(player) => Some(Outcome::Winner(player)),
            GameStatus::Draw => Some(Outcome::Draw),
        }
    }
}

impl From<Outcome> for GameStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Winner(player) => GameStatus::Won(player),
            Outcome::Draw => GameStatus::Draw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(4);
        assert_eq!(board.dimension(), 4);
        assert_eq!(board.cell_count(), 16);
        assert!(board.squares().iter().all(|s| *s == Square::Empty));
        assert_eq!(board.rows().count(), 4);
    }

    #[test]
    fn test_parse_board() {
        let board: Board = "XO./.X./..X".parse().expect("Valid board");
        assert_eq!(board.dimension(), 3);
        assert_eq!(board.get(Location::new(0, 1)), Some(Square::Occupied(Player::O)));
        assert_eq!(board.get(Location::new(2, 2)), Some(Square::Occupied(Player::X)));
        assert_eq!(board.get(Location::new(1, 0)), Some(Square::Empty));
        assert_eq!(board.display(), "X|O|.\n.|X|.\n.|.|X");
    }

    #[test]
    fn test_parse_rejects_ragged_rows() {
        assert!("XO/X".parse::<Board>().is_err());
        assert!("XO?/.../...".parse::<Board>().is_err());
    }

    #[test]
    fn test_place_rejects_occupied_and_out_of_range() {
        let mut board = Board::new(3);
        board.place(Location::new(1, 1), Player::X).expect("Empty square");
        assert_eq!(
            board.place(Location::new(1, 1), Player::O),
            Err(super::super::MoveError::SquareOccupied(Location::new(1, 1)))
        );
        assert_eq!(
            board.place(Location::new(3, 0), Player::O),
            Err(super::super::MoveError::OutOfBounds(Location::new(3, 0)))
        );
    }

    #[test]
    fn test_zero_dimension_board_has_no_rows() {
        let board = Board::new(0);
        assert_eq!(board.rows().count(), 0);
        assert_eq!(board.locations().count(), 0);
    }

    #[test]
    fn test_status_outcome_conversion() {
        assert_eq!(GameStatus::InProgress.outcome(), None);
        assert_eq!(GameStatus::from(Outcome::Draw), GameStatus::Draw);
        assert!(GameStatus::Won(Player::O).is_over());
    }
}
