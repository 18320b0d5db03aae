//! Application state and logic.

use crossterm::event::{KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use tictactoe_core::{GameStatus, Location, Outcome, Player};
use tictactoe_server::ClientVariant;
use tracing::{debug, info};

use super::input::{self, Action};
use super::layout::{BoardLayout, LayoutConfig};
use crate::controller::{GameController, GameEvent};

/// Main application state.
pub struct App {
    controller: GameController,
    variant: ClientVariant,
    layout_config: LayoutConfig,
    cursor: Location,
    layout: Option<BoardLayout>,
    notice: Option<String>,
    should_quit: bool,
}

impl App {
    /// Creates the application around a controller.
    pub fn new(
        controller: GameController,
        variant: ClientVariant,
        layout_config: LayoutConfig,
    ) -> Self {
        Self {
            controller,
            variant,
            layout_config,
            cursor: Location::new(0, 0),
            layout: None,
            notice: None,
            should_quit: false,
        }
    }

    /// The game controller.
    pub fn controller(&self) -> &GameController {
        &self.controller
    }

    /// Mutable access, used while loading the session before the loop starts.
    pub fn controller_mut(&mut self) -> &mut GameController {
        &mut self.controller
    }

    /// Selected client variant.
    pub fn variant(&self) -> ClientVariant {
        self.variant
    }

    /// Board presentation settings.
    pub fn layout_config(&self) -> &LayoutConfig {
        &self.layout_config
    }

    /// Cell under the keyboard cursor.
    pub fn cursor(&self) -> Location {
        self.cursor
    }

    /// Whether the user asked to leave.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Shows a one-off message in place of the normal status until the
    /// next game starts.
    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// Records where the board was last drawn, for mouse hit testing.
    pub fn set_layout(&mut self, layout: Option<BoardLayout>) {
        self.layout = layout;
    }

    /// Handles a key press.
    pub fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let dimension = self.controller.state().dimension();
        match input::map_key(key.code, self.cursor, dimension) {
            Action::MoveCursor(cursor) => self.cursor = cursor,
            Action::Activate => {
                self.controller.activate(self.cursor);
            }
            Action::Restart => {
                self.controller.restart();
                self.notice = None;
            }
            Action::Resize(delta) => self.resize(delta),
            Action::Quit => {
                info!("User quit");
                self.should_quit = true;
            }
            Action::None => {}
        }
    }

    /// Handles a mouse event; a left click plays the cell under the pointer.
    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let Some(location) = self
            .layout
            .and_then(|layout| layout.hit_test(mouse.column, mouse.row))
        else {
            debug!(x = mouse.column, y = mouse.row, "Click outside the board");
            return;
        };
        self.cursor = location;
        self.controller.activate(location);
    }

    /// Applies an event posted by a background task.
    pub fn on_game_event(&mut self, event: GameEvent) {
        self.controller.handle_event(event);
    }

    fn resize(&mut self, delta: isize) {
        if !self.variant.can_resize() {
            debug!(variant = %self.variant, "Resize not available");
            return;
        }
        if self.controller.resize(delta) {
            self.cursor = input::clamp(self.cursor, self.controller.state().dimension());
            self.notice = None;
        }
    }

    /// Text for the status line.
    pub fn status_text(&self) -> String {
        if let Some(notice) = &self.notice {
            return notice.clone();
        }
        let state = self.controller.state();
        if !state.is_playable() {
            let hint = if self.variant.can_resize() { " Press + to grow it." } else { "" };
            return format!(
                "A {n}x{n} board is too small to play.{hint}",
                n = state.dimension()
            );
        }
        match (state.status(), self.controller.revealed()) {
            (GameStatus::InProgress, _) => format!("Player {} to move", state.current_player()),
            (_, Some(Outcome::Winner(player))) => {
                format!("{} wins! Press 'r' to play again.", player)
            }
            (_, Some(Outcome::Draw)) => "It's a draw! Press 'r' to play again.".to_string(),
            (_, None) => "Game over".to_string(),
        }
    }

    /// Running tallies, for the stateful client.
    pub fn tally_text(&self) -> Option<String> {
        self.controller.tallies().map(|wins| {
            format!(
                "{}: {}   {}: {}   Draws: {}",
                Player::X,
                wins.x,
                Player::O,
                wins.o,
                wins.none
            )
        })
    }

    /// Key help for the bottom line.
    pub fn help_text(&self) -> String {
        let mut help = String::from("Arrows move | Enter/Space/click play | r restart");
        if self.variant.can_resize() {
            help.push_str(" | +/- resize");
        }
        help.push_str(" | q quit");
        help
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyModifiers};
    use tokio::sync::mpsc;

    use super::*;

    fn app(variant: ClientVariant, dimension: usize) -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        let controller = GameController::new(dimension, 15, Duration::from_millis(5), None, tx);
        App::new(controller, variant, LayoutConfig::default())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[tokio::test]
    async fn test_keyboard_play() {
        let mut app = app(ClientVariant::Basic, 3);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char(' '));
        let board = app.controller().state().board();
        assert_eq!(board.get(Location::new(0, 0)).and_then(|s| s.player()), Some(Player::X));
        assert_eq!(board.get(Location::new(0, 1)).and_then(|s| s.player()), Some(Player::O));
        assert_eq!(app.status_text(), "Player X to move");
    }

    #[tokio::test]
    async fn test_basic_variant_cannot_resize() {
        let mut app = app(ClientVariant::Basic, 3);
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.controller().state().dimension(), 3);
        assert!(!app.help_text().contains("resize"));
    }

    #[tokio::test]
    async fn test_advanced_resize_clamps_cursor() {
        let mut app = app(ClientVariant::Advanced, 4);
        for _ in 0..3 {
            press(&mut app, KeyCode::Down);
            press(&mut app, KeyCode::Right);
        }
        assert_eq!(app.cursor(), Location::new(3, 3));
        press(&mut app, KeyCode::Char('-'));
        assert_eq!(app.controller().state().dimension(), 3);
        assert_eq!(app.cursor(), Location::new(2, 2));
    }

    #[tokio::test]
    async fn test_unplayable_board_message() {
        let app = app(ClientVariant::Advanced, 2);
        assert_eq!(
            app.status_text(),
            "A 2x2 board is too small to play. Press + to grow it."
        );
    }

    #[tokio::test]
    async fn test_click_without_layout_is_ignored() {
        let mut app = app(ClientVariant::Basic, 3);
        app.on_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 10,
            row: 10,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(app.controller().state().move_count(), 0);
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut app = app(ClientVariant::Basic, 3);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }
}
