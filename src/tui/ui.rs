//! Stateless UI rendering for the board.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tictactoe_core::{Location, Player, Square, winning_line};

use super::app::App;
use super::layout::BoardLayout;

/// Draws the whole screen and returns where the board landed, if it fit.
pub fn draw(frame: &mut Frame, app: &App) -> Option<BoardLayout> {
    let tally = app.tally_text();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                                   // Title
            Constraint::Min(1),                                      // Board
            Constraint::Length(if tally.is_some() { 1 } else { 0 }), // Tallies
            Constraint::Length(3),                                   // Status
            Constraint::Length(1),                                   // Help
        ])
        .split(frame.area());

    let state = app.controller().state();
    let title = Paragraph::new(format!(
        "Tic-Tac-Toe ({}) {n}x{n}",
        app.variant(),
        n = state.dimension()
    ))
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let layout = draw_board(frame, chunks[1], app);

    if let Some(tally) = tally {
        frame.render_widget(
            Paragraph::new(tally)
                .style(Style::default().fg(Color::Magenta))
                .alignment(Alignment::Center),
            chunks[2],
        );
    }

    let status_style = if state.is_playable() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    };
    let status = Paragraph::new(app.status_text())
        .style(status_style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[3]);

    let help = Paragraph::new(app.help_text())
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[4]);

    layout
}

fn draw_board(frame: &mut Frame, area: Rect, app: &App) -> Option<BoardLayout> {
    let state = app.controller().state();
    let dimension = state.dimension();
    let Some(layout) = BoardLayout::compute(area, dimension, app.layout_config()) else {
        let message = Paragraph::new(format!(
            "Terminal too small for a {n}x{n} board",
            n = dimension
        ))
        .style(Style::default().fg(Color::Red))
        .alignment(Alignment::Center);
        frame.render_widget(message, area);
        return None;
    };

    if *layout.gap() > 0 {
        draw_grid_lines(frame, &layout);
    }

    // Highlighting waits for the reveal, like the status line.
    let highlight = app
        .controller()
        .revealed()
        .and_then(|_| winning_line(state.board()));
    let on_line: Vec<Location> = highlight
        .as_ref()
        .map(|win| win.line.locations(dimension).collect())
        .unwrap_or_default();
    let dim_others = *app.layout_config().dim_after_win() && highlight.is_some();

    for location in state.board().locations() {
        let Some(rect) = layout.cell_rect(location) else {
            continue;
        };
        let square = state.board().get(location).unwrap_or_default();
        let mut style = square_style(square);
        if on_line.contains(&location) {
            style = style.bg(Color::Green).fg(Color::Black);
        } else if dim_others {
            style = style.add_modifier(Modifier::DIM);
        }
        if location == app.cursor() && !state.status().is_over() {
            style = style.bg(Color::White).fg(Color::Black);
        }
        draw_cell(frame, rect, square, style);
    }

    Some(layout)
}

fn square_style(square: Square) -> Style {
    match square {
        Square::Empty => Style::default().fg(Color::DarkGray),
        Square::Occupied(Player::X) => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::BOLD),
        Square::Occupied(Player::O) => Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD),
    }
}

fn draw_cell(frame: &mut Frame, area: Rect, square: Square, style: Style) {
    let symbol = match square {
        Square::Empty => "·".to_string(),
        Square::Occupied(player) => player.to_string(),
    };
    let mut lines = vec![Line::default(); usize::from(area.height.saturating_sub(1) / 2)];
    lines.push(Line::from(Span::raw(symbol)));
    let cell = Paragraph::new(lines)
        .style(style)
        .alignment(Alignment::Center);
    frame.render_widget(cell, area);
}

fn draw_grid_lines(frame: &mut Frame, layout: &BoardLayout) {
    let bounds = layout.bounds();
    let style = Style::default().fg(Color::DarkGray);
    let stride_x = layout.cell_width() + layout.gap();
    let stride_y = layout.cell_height() + layout.gap();

    for i in 1..*layout.dimension() as u16 {
        let y = bounds.y + i * stride_y - layout.gap();
        let row = Rect::new(bounds.x, y, bounds.width, *layout.gap());
        let text = "─".repeat(usize::from(bounds.width));
        frame.render_widget(Paragraph::new(text).style(style), row);

        let x = bounds.x + i * stride_x - layout.gap();
        let column = Rect::new(x, bounds.y, *layout.gap(), bounds.height);
        let text: Vec<Line> = (0..bounds.height).map(|_| Line::from("│")).collect();
        frame.render_widget(Paragraph::new(text).style(style), column);
    }
}
