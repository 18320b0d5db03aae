//! Mutable state of a single game.
//!
//! [`BoardState`] owns the grid, the active player and the move counter,
//! and is the only place a square ever changes. Rejected moves leave every
//! field untouched, which makes duplicate UI events harmless.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::rules::check_winner;
use super::{Board, GameStatus, Location, MIN_PLAYABLE_DIMENSION, MoveError, Outcome, Player};

type GameEndListener = Box<dyn FnMut(&Outcome) + Send>;

/// Read-only copy of a game at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct BoardSnapshot {
    /// The grid.
    board: Board,
    /// Player to move (or the winner, once won).
    current_player: Player,
    /// Number of accepted moves.
    move_count: usize,
    /// Game status.
    status: GameStatus,
    /// Whether the board accepts moves at all.
    playable: bool,
}

/// A game in progress (or finished) on an N×N board.
pub struct BoardState {
    board: Board,
    current_player: Player,
    move_count: usize,
    status: GameStatus,
    history: Vec<Location>,
    listeners: Vec<GameEndListener>,
}

impl BoardState {
    /// Starts a game on an empty `dimension`×`dimension` board with X to move.
    ///
    /// Boards smaller than [`MIN_PLAYABLE_DIMENSION`] are still allocated but
    /// report [`is_playable`](Self::is_playable) as false and reject every move.
    #[instrument]
    pub fn new(dimension: usize) -> Self {
        if dimension < MIN_PLAYABLE_DIMENSION {
            info!(dimension, "Board is too small to play");
        }
        Self {
            board: Board::new(dimension),
            current_player: Player::X,
            move_count: 0,
            status: GameStatus::InProgress,
            history: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Registers a callback fired once per game when it reaches a terminal
    /// outcome. Subscriptions survive [`reset`](Self::reset).
    pub fn subscribe(&mut self, listener: impl FnMut(&Outcome) + Send + 'static) {
        self.listeners.push(Box::new(listener));
        debug!(listeners = self.listeners.len(), "Game end listener registered");
    }

    /// Starts a new game, possibly with a different dimension.
    #[instrument(skip(self), fields(previous = self.board.dimension()))]
    pub fn reset(&mut self, dimension: usize) {
        info!(dimension, "Resetting game");
        self.board = Board::new(dimension);
        self.current_player = Player::X;
        self.move_count = 0;
        self.status = GameStatus::InProgress;
        self.history.clear();
    }

    /// Places the active player's mark at `location`.
    ///
    /// On success returns the status after the move. A winning move keeps
    /// the winner as the current player; any other accepted non-terminal
    /// move passes the turn.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError`] and changes nothing if the board is unplayable,
    /// the game is over, or the square is occupied or off the board.
    #[instrument(skip(self), fields(player = %self.current_player, moves = self.move_count))]
    pub fn apply_move(&mut self, location: Location) -> Result<GameStatus, MoveError> {
        if !self.is_playable() {
            debug!("Move ignored on unplayable board");
            return Err(MoveError::Unplayable(self.board.dimension()));
        }
        if self.status.is_over() {
            debug!(status = ?self.status, "Move ignored after game end");
            return Err(MoveError::GameOver);
        }

        let player = self.current_player;
        self.board.place(location, player).inspect_err(|e| {
            debug!(error = %e, "Move ignored");
        })?;
        self.move_count += 1;
        self.history.push(location);

        if let Some(winner) = check_winner(&self.board) {
            self.finish(Outcome::Winner(winner));
        } else if self.move_count == self.board.cell_count() {
            self.finish(Outcome::Draw);
        } else {
            self.current_player = player.opponent();
        }

        debug!(status = ?self.status, "Move applied");
        Ok(self.status)
    }

    fn finish(&mut self, outcome: Outcome) {
        self.status = outcome.into();
        info!(%outcome, moves = self.move_count, "Game ended");
        for listener in &mut self.listeners {
            listener(&outcome);
        }
    }

    /// True when the board is at least [`MIN_PLAYABLE_DIMENSION`] wide.
    pub fn is_playable(&self) -> bool {
        self.board.dimension() >= MIN_PLAYABLE_DIMENSION
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Board dimension `N`.
    pub fn dimension(&self) -> usize {
        self.board.dimension()
    }

    /// Returns the current player.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Number of accepted moves.
    pub fn move_count(&self) -> usize {
        self.move_count
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Locations played so far, in order.
    pub fn history(&self) -> &[Location] {
        &self.history
    }

    /// Empty squares that would accept a move right now.
    pub fn valid_moves(&self) -> Vec<Location> {
        if !self.is_playable() || self.status.is_over() {
            return Vec::new();
        }
        self.board
            .locations()
            .filter(|loc| self.board.is_empty(*loc))
            .collect()
    }

    /// Copies the observable state.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            board: self.board.clone(),
            current_player: self.current_player,
            move_count: self.move_count,
            status: self.status,
            playable: self.is_playable(),
        }
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new(MIN_PLAYABLE_DIMENSION)
    }
}

impl std::fmt::Debug for BoardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardState")
            .field("board", &self.board)
            .field("current_player", &self.current_player)
            .field("move_count", &self.move_count)
            .field("status", &self.status)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn play(game: &mut BoardState, moves: &[(usize, usize)]) {
        for &(row, col) in moves {
            game.apply_move(Location::new(row, col)).expect("Valid move");
        }
    }

    #[test]
    fn test_new_game() {
        let game = BoardState::new(3);
        assert!(game.is_playable());
        assert_eq!(game.current_player(), Player::X);
        assert_eq!(game.move_count(), 0);
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.valid_moves().len(), 9);
    }

    #[test]
    fn test_turn_alternates() {
        let mut game = BoardState::new(3);
        play(&mut game, &[(1, 1)]);
        assert_eq!(game.current_player(), Player::O);
        play(&mut game, &[(0, 0)]);
        assert_eq!(game.current_player(), Player::X);
        assert_eq!(game.history(), &[Location::new(1, 1), Location::new(0, 0)]);
    }

    #[test]
    fn test_listener_fires_once() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut game = BoardState::new(3);
        let sink = Arc::clone(&seen);
        game.subscribe(move |outcome| sink.lock().expect("Lock poisoned").push(*outcome));

        play(&mut game, &[(0, 0), (1, 1), (0, 1), (2, 2), (0, 2)]);
        let _ = game.apply_move(Location::new(2, 0));
        let _ = game.apply_move(Location::new(2, 1));

        assert_eq!(*seen.lock().expect("Lock poisoned"), vec![Outcome::Winner(Player::X)]);
    }

    #[test]
    fn test_reset_keeps_listeners() {
        let count = Arc::new(Mutex::new(0));
        let mut game = BoardState::new(3);
        let sink = Arc::clone(&count);
        game.subscribe(move |_| *sink.lock().expect("Lock poisoned") += 1);

        play(&mut game, &[(0, 0), (1, 1), (0, 1), (2, 2), (0, 2)]);
        game.reset(3);
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.move_count(), 0);
        play(&mut game, &[(0, 0), (1, 1), (0, 1), (2, 2), (0, 2)]);

        assert_eq!(*count.lock().expect("Lock poisoned"), 2);
    }

    #[test]
    fn test_reset_changes_dimension() {
        let mut game = BoardState::new(3);
        play(&mut game, &[(0, 0)]);
        game.reset(5);
        assert_eq!(game.dimension(), 5);
        assert_eq!(game.current_player(), Player::X);
        assert!(game.history().is_empty());
        assert_eq!(game.valid_moves().len(), 25);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut game = BoardState::new(2);
        let snapshot = game.snapshot();
        assert!(!snapshot.playable());
        game.reset(3);
        play(&mut game, &[(2, 2)]);
        let snapshot = game.snapshot();
        assert!(*snapshot.playable());
        assert_eq!(*snapshot.move_count(), 1);
        assert_eq!(*snapshot.current_player(), Player::O);
    }
}
