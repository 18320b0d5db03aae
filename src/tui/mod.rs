//! Terminal client.

mod app;
mod input;
mod layout;
mod ui;

pub use app::App;
pub use layout::{BoardLayout, LayoutConfig};

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tictactoe_session::{HttpSessionStore, SessionStore};
use tokio::sync::mpsc;
use tracing::{error, info, instrument, warn};

use crate::config::AppConfig;
use crate::controller::{GameController, GameEvent};

/// Runs the terminal client until the user quits.
///
/// # Errors
///
/// Returns an error if the log file or the terminal cannot be set up.
pub async fn run_tui(config: AppConfig) -> Result<()> {
    // Log to a file so the log does not draw over the board.
    let log_file = std::fs::File::create(config.log_file())?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    let variant = *config.variant();
    info!(%variant, server_url = %config.server_url(), "Starting terminal client");

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let store: Option<Arc<dyn SessionStore>> = if variant.persists() {
        Some(Arc::new(HttpSessionStore::new(config.server_url())))
    } else {
        None
    };
    let controller = GameController::new(
        *config.dimension(),
        *config.max_dimension(),
        config.reveal_delay(),
        store,
        event_tx,
    );
    let mut app = App::new(controller, variant, config.layout().clone());

    if let Err(e) = app.controller_mut().load_session().await {
        warn!(error = %e, "Could not load session, keeping local defaults");
        app.set_notice(format!(
            "Session server unavailable at {}; results may not be saved.",
            config.server_url()
        ));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = run_loop(&mut terminal, &mut app, &mut event_rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Client loop error");
    }
    res
}

#[instrument(skip_all)]
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    events: &mut mpsc::UnboundedReceiver<GameEvent>,
) -> Result<()> {
    loop {
        let mut layout = None;
        terminal.draw(|frame| layout = ui::draw(frame, app))?;
        app.set_layout(layout);

        while let Ok(event) = events.try_recv() {
            app.on_game_event(event);
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => app.on_key(key),
                Event::Mouse(mouse) => app.on_mouse(mouse),
                // Layout is recomputed from the new size on the next draw.
                Event::Resize(width, height) => info!(width, height, "Terminal resized"),
                _ => {}
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
