//! Grid geometry for the terminal board.
//!
//! Recomputed from the current frame area on every draw, so the board
//! follows terminal resizes. The same geometry answers mouse hit tests.

use derive_getters::Getters;
use derive_setters::Setters;
use ratatui::layout::Rect;
use serde::{Deserialize, Serialize};
use tictactoe_core::Location;
use tracing::instrument;

/// Presentation constants for the board.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[serde(default)]
#[setters(prefix = "with_")]
pub struct LayoutConfig {
    /// Blank border kept around the board, in terminal cells.
    padding: u16,
    /// Gap between neighbouring cells (drawn as a grid line when 1 or more).
    gap: u16,
    /// Narrowest a cell may get before the board is declared too small.
    min_cell_width: u16,
    /// Shortest a cell may get before the board is declared too small.
    min_cell_height: u16,
    /// Widest a cell is ever drawn.
    max_cell_width: u16,
    /// Tallest a cell is ever drawn.
    max_cell_height: u16,
    /// Dim the cells outside the winning line once a game is won.
    dim_after_win: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: 1,
            gap: 1,
            min_cell_width: 3,
            min_cell_height: 1,
            max_cell_width: 9,
            max_cell_height: 3,
            dim_after_win: true,
        }
    }
}

/// Placement of an N×N grid inside a frame area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct BoardLayout {
    dimension: usize,
    origin_x: u16,
    origin_y: u16,
    cell_width: u16,
    cell_height: u16,
    gap: u16,
}

impl BoardLayout {
    /// Fits a `dimension`-wide board into `area`.
    ///
    /// Returns `None` if the area cannot hold cells of the configured
    /// minimum size (or `dimension` is zero).
    #[instrument(skip(config))]
    pub fn compute(area: Rect, dimension: usize, config: &LayoutConfig) -> Option<Self> {
        let n = u16::try_from(dimension).ok().filter(|n| *n > 0)?;
        let gaps = config.gap.checked_mul(n - 1)?;

        let inner_width = area.width.checked_sub(config.padding.saturating_mul(2))?;
        let inner_height = area.height.checked_sub(config.padding.saturating_mul(2))?;

        let cell_width = (inner_width.checked_sub(gaps)? / n).min(config.max_cell_width);
        let cell_height = (inner_height.checked_sub(gaps)? / n).min(config.max_cell_height);
        if cell_width < config.min_cell_width.max(1)
            || cell_height < config.min_cell_height.max(1)
        {
            return None;
        }

        let board_width = cell_width * n + gaps;
        let board_height = cell_height * n + gaps;
        Some(Self {
            dimension,
            origin_x: area.x + (area.width - board_width) / 2,
            origin_y: area.y + (area.height - board_height) / 2,
            cell_width,
            cell_height,
            gap: config.gap,
        })
    }

    /// Outer rectangle covered by the grid, grid lines included.
    pub fn bounds(&self) -> Rect {
        let n = self.dimension as u16;
        Rect::new(
            self.origin_x,
            self.origin_y,
            self.cell_width * n + self.gap * (n - 1),
            self.cell_height * n + self.gap * (n - 1),
        )
    }

    /// Rectangle of one cell, or `None` if `location` is off the board.
    pub fn cell_rect(&self, location: Location) -> Option<Rect> {
        if !location.is_within(self.dimension) {
            return None;
        }
        let col = location.col as u16;
        let row = location.row as u16;
        Some(Rect::new(
            self.origin_x
                .saturating_add(col.saturating_mul(self.cell_width.saturating_add(self.gap))),
            self.origin_y
                .saturating_add(row.saturating_mul(self.cell_height.saturating_add(self.gap))),
            self.cell_width,
            self.cell_height,
        ))
    }

    /// Cell under the terminal position `(x, y)`; grid lines and the
    /// surrounding area hit nothing.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<Location> {
        let col = axis_hit(x.checked_sub(self.origin_x)?, self.cell_width, self.gap)?;
        let row = axis_hit(y.checked_sub(self.origin_y)?, self.cell_height, self.gap)?;
        let location = Location::new(row, col);
        location.is_within(self.dimension).then_some(location)
    }
}

fn axis_hit(offset: u16, cell: u16, gap: u16) -> Option<usize> {
    let stride = cell.saturating_add(gap).max(1);
    (offset % stride < cell).then_some((offset / stride) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_by_three_uses_max_cells_when_room() {
        let layout = BoardLayout::compute(Rect::new(0, 0, 80, 24), 3, &LayoutConfig::default())
            .expect("Fits");
        assert_eq!(*layout.cell_width(), 9);
        assert_eq!(*layout.cell_height(), 3);
        // 3 cells of 9 plus 2 gaps, centred in 80 columns.
        assert_eq!(layout.bounds(), Rect::new(25, 6, 29, 11));
    }

    #[test]
    fn test_cells_shrink_with_area() {
        let config = LayoutConfig::default();
        let large = BoardLayout::compute(Rect::new(0, 0, 120, 40), 7, &config).expect("Fits");
        let small = BoardLayout::compute(Rect::new(0, 0, 40, 17), 7, &config).expect("Fits");
        assert!(small.cell_width() < large.cell_width());
        assert_eq!(*small.cell_width(), 4);
        assert_eq!(*small.cell_height(), 1);
    }

    #[test]
    fn test_too_small_area() {
        let config = LayoutConfig::default();
        assert_eq!(BoardLayout::compute(Rect::new(0, 0, 10, 5), 5, &config), None);
        assert_eq!(BoardLayout::compute(Rect::new(0, 0, 80, 24), 0, &config), None);
    }

    #[test]
    fn test_hit_test_matches_cell_rects() {
        let layout = BoardLayout::compute(Rect::new(2, 3, 60, 30), 4, &LayoutConfig::default())
            .expect("Fits");
        for row in 0..4 {
            for col in 0..4 {
                let loc = Location::new(row, col);
                let rect = layout.cell_rect(loc).expect("On board");
                assert_eq!(layout.hit_test(rect.x, rect.y), Some(loc));
                assert_eq!(
                    layout.hit_test(rect.x + rect.width - 1, rect.y + rect.height - 1),
                    Some(loc)
                );
            }
        }
    }

    #[test]
    fn test_hit_test_misses_grid_lines_and_outside() {
        let layout = BoardLayout::compute(Rect::new(0, 0, 80, 24), 3, &LayoutConfig::default())
            .expect("Fits");
        let first = layout.cell_rect(Location::new(0, 0)).expect("On board");
        // Column just right of the first cell is a grid line.
        assert_eq!(layout.hit_test(first.x + first.width, first.y), None);
        assert_eq!(layout.hit_test(0, 0), None);
        let bounds = layout.bounds();
        assert_eq!(layout.hit_test(bounds.x + bounds.width, bounds.y), None);
    }

    #[test]
    fn test_huge_gap_on_single_cell_board() {
        let config = LayoutConfig::default().with_gap(u16::MAX).with_padding(0);
        let layout = BoardLayout::compute(Rect::new(0, 0, 20, 10), 1, &config).expect("Fits");
        let cell = layout.cell_rect(Location::new(0, 0)).expect("On board");
        assert_eq!(cell, Rect::new(5, 3, 9, 3));
        assert_eq!(layout.hit_test(cell.x, cell.y), Some(Location::new(0, 0)));
        assert_eq!(layout.hit_test(19, 9), None);
        assert_eq!(layout.bounds(), cell);
    }

    #[test]
    fn test_no_gap_config() {
        let config = LayoutConfig::default().with_gap(0).with_padding(0);
        let layout = BoardLayout::compute(Rect::new(0, 0, 9, 3), 3, &config).expect("Fits");
        assert_eq!(layout.hit_test(8, 2), Some(Location::new(2, 2)));
        assert_eq!(layout.cell_rect(Location::new(3, 0)), None);
    }
}
