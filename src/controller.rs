//! Adapter between UI events and the board state machine.
//!
//! The controller owns a [`BoardState`], turns UI gestures into moves and
//! subscribes to the game-ended notification. When a game ends it
//! spawns two detached tasks: one records the outcome in the session store
//! (at most once, never retried) and one posts [`GameEvent::Revealed`]
//! after the presentation delay. Neither handle is kept.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tictactoe_core::{BoardState, Location, Outcome};
use tictactoe_session::{RecordedWins, SessionError, SessionPatch, SessionStore, TallyKey};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Messages posted to the UI loop by background tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// The presentation delay for a finished game has elapsed.
    Revealed {
        /// Game the outcome belongs to.
        game_id: u64,
        /// How it ended.
        outcome: Outcome,
    },
    /// Fresh tallies read back after an outcome was recorded.
    TalliesUpdated(RecordedWins),
}

/// Drives one board from UI gestures.
pub struct GameController {
    state: BoardState,
    store: Option<Arc<dyn SessionStore>>,
    game_id: Arc<AtomicU64>,
    revealed: Option<Outcome>,
    tallies: Option<RecordedWins>,
    max_dimension: usize,
}

impl GameController {
    /// Creates a controller for a `dimension`-wide board.
    ///
    /// With a `store`, finished games are recorded and resizes are
    /// persisted; without one, nothing leaves the process.
    #[instrument(skip(store, events), fields(persisting = store.is_some()))]
    pub fn new(
        dimension: usize,
        max_dimension: usize,
        reveal_delay: Duration,
        store: Option<Arc<dyn SessionStore>>,
        events: mpsc::UnboundedSender<GameEvent>,
    ) -> Self {
        let game_id = Arc::new(AtomicU64::new(0));
        let mut state = BoardState::new(dimension);

        let listener_store = store.clone();
        let listener_game = Arc::clone(&game_id);
        state.subscribe(move |outcome: &Outcome| {
            let game_id = listener_game.load(Ordering::SeqCst);
            on_game_ended(
                game_id,
                *outcome,
                reveal_delay,
                listener_store.clone(),
                events.clone(),
            );
        });

        Self {
            state,
            store,
            game_id,
            revealed: None,
            tallies: None,
            max_dimension: max_dimension.max(1),
        }
    }

    /// Reads dimension and tallies from the store and starts a game of
    /// that size. Does nothing without a store.
    ///
    /// # Errors
    ///
    /// Returns the store's error; the current game is left as it was.
    #[instrument(skip(self))]
    pub async fn load_session(&mut self) -> Result<(), SessionError> {
        let Some(store) = self.store.clone() else {
            return Ok(());
        };
        let record = store.read_session().await?;
        let dimension = (*record.dimensions() as usize).clamp(1, self.max_dimension);
        info!(dimension, wins = ?record.recorded_wins(), "Session loaded");
        self.tallies = Some(*record.recorded_wins());
        self.start_game(dimension);
        Ok(())
    }

    /// Plays the active player's mark at `location`.
    ///
    /// Returns `false` if the move was rejected; rejected moves change
    /// nothing and are only logged.
    #[instrument(skip(self), fields(player = %self.state.current_player()))]
    pub fn activate(&mut self, location: Location) -> bool {
        match self.state.apply_move(location) {
            Ok(status) => {
                debug!(?status, move_count = self.state.move_count(), "Move accepted");
                true
            }
            Err(e) => {
                debug!(error = %e, "Move discarded");
                false
            }
        }
    }

    /// Starts a new game with the same dimension.
    #[instrument(skip(self))]
    pub fn restart(&mut self) {
        self.start_game(self.state.dimension());
    }

    /// Changes the board dimension by `delta` and starts a new game.
    ///
    /// The dimension stays within `1..=max_dimension`. Returns `false`
    /// if it would not change. With a store, the new dimension is
    /// written back in the background.
    #[instrument(skip(self))]
    pub fn resize(&mut self, delta: isize) -> bool {
        let current = self.state.dimension();
        let target = current
            .saturating_add_signed(delta)
            .clamp(1, self.max_dimension);
        if target == current {
            debug!(current, "Resize ignored at limit");
            return false;
        }
        self.start_game(target);
        if let Some(store) = self.store.clone() {
            let patch = SessionPatch::default().with_dimensions(target as u32);
            spawn_detached(async move {
                if let Err(e) = store.write_session(patch).await {
                    warn!(error = %e, "Failed to persist board dimension");
                }
            });
        }
        true
    }

    /// Applies a background event. Reveals for games that have since been
    /// restarted are dropped.
    #[instrument(skip(self))]
    pub fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::Revealed { game_id, outcome } => {
                if game_id == self.game_id() {
                    info!(%outcome, "Outcome revealed");
                    self.revealed = Some(outcome);
                } else {
                    debug!(game_id, current = self.game_id(), "Stale reveal dropped");
                }
            }
            GameEvent::TalliesUpdated(wins) => {
                self.tallies = Some(wins);
            }
        }
    }

    /// The board being played.
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// Outcome of the current game once its reveal delay has passed.
    pub fn revealed(&self) -> Option<Outcome> {
        self.revealed
    }

    /// Last known tallies, if a store is attached and has been read.
    pub fn tallies(&self) -> Option<RecordedWins> {
        self.tallies
    }

    /// Identifier of the current game; bumps on every restart or resize.
    pub fn game_id(&self) -> u64 {
        self.game_id.load(Ordering::SeqCst)
    }

    /// Largest dimension [`resize`](Self::resize) allows.
    pub fn max_dimension(&self) -> usize {
        self.max_dimension
    }

    /// Whether finished games are recorded.
    pub fn is_persisting(&self) -> bool {
        self.store.is_some()
    }

    fn start_game(&mut self, dimension: usize) {
        let id = self.game_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.reset(dimension);
        self.revealed = None;
        info!(game_id = id, dimension, "New game");
    }
}

fn on_game_ended(
    game_id: u64,
    outcome: Outcome,
    reveal_delay: Duration,
    store: Option<Arc<dyn SessionStore>>,
    events: mpsc::UnboundedSender<GameEvent>,
) {
    if let Some(store) = store {
        let events = events.clone();
        spawn_detached(async move {
            let key = TallyKey::from(outcome);
            if let Err(e) = store.record_winner(key).await {
                warn!(error = %e, %key, "Failed to record outcome");
                return;
            }
            match store.read_session().await {
                Ok(record) => {
                    let _ = events.send(GameEvent::TalliesUpdated(*record.recorded_wins()));
                }
                Err(e) => warn!(error = %e, "Failed to read tallies back"),
            }
        });
    }

    spawn_detached(async move {
        tokio::time::sleep(reveal_delay).await;
        // The UI may already be gone.
        let _ = events.send(GameEvent::Revealed { game_id, outcome });
    });
}

fn spawn_detached<F>(task: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    match Handle::try_current() {
        Ok(handle) => {
            handle.spawn(task);
        }
        Err(e) => warn!(error = %e, "No async runtime; background task skipped"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(dimension: usize) -> (GameController, mpsc::UnboundedReceiver<GameEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            GameController::new(dimension, 15, Duration::from_millis(10), None, tx),
            rx,
        )
    }

    #[tokio::test]
    async fn test_rejected_move_reports_false() {
        let (mut ctl, _rx) = controller(3);
        assert!(ctl.activate(Location::new(0, 0)));
        assert!(!ctl.activate(Location::new(0, 0)));
        assert!(!ctl.activate(Location::new(3, 0)));
        assert_eq!(ctl.state().move_count(), 1);
    }

    #[tokio::test]
    async fn test_resize_clamps_and_restarts() {
        let (mut ctl, _rx) = controller(3);
        ctl.activate(Location::new(1, 1));
        let before = ctl.game_id();

        assert!(ctl.resize(1));
        assert_eq!(ctl.state().dimension(), 4);
        assert_eq!(ctl.state().move_count(), 0);
        assert_eq!(ctl.game_id(), before + 1);

        assert!(ctl.resize(-10));
        assert_eq!(ctl.state().dimension(), 1);
        assert!(!ctl.resize(-1));
    }

    #[tokio::test]
    async fn test_stale_reveal_is_dropped() {
        let (mut ctl, _rx) = controller(3);
        let old = ctl.game_id();
        ctl.restart();
        ctl.handle_event(GameEvent::Revealed {
            game_id: old,
            outcome: Outcome::Draw,
        });
        assert_eq!(ctl.revealed(), None);
    }

    #[test]
    fn test_game_end_without_runtime_does_not_panic() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut ctl = GameController::new(3, 15, Duration::ZERO, None, tx);
        for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)] {
            ctl.activate(Location::new(row, col));
        }
        assert!(ctl.state().status().is_over());
    }
}
