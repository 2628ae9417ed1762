//! Keyboard navigation over the visible grid
//!
//! Arrow moves, Tab/Shift+Tab, Enter and Shift+Arrow extension. Navigation
//! only changes the selection; it never writes to the overlay or the store.
//! Each method returns the cell that should receive focus, or `None` when
//! nothing moved.

use super::state::MassEditState;
use super::view::{CellCoord, CellPosition, GridView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn delta(self) -> (i64, i64) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Offset a position by one step, or None if that leaves the grid
fn step(view: &GridView, pos: CellPosition, direction: Direction) -> Option<CellPosition> {
    let (dr, dc) = direction.delta();
    let row = pos.row.checked_add_signed(dr as isize)?;
    let col = pos.col.checked_add_signed(dc as isize)?;
    (row < view.row_count() && col < view.column_count()).then_some(CellPosition::new(row, col))
}

impl MassEditState {
    fn active_position(&self, view: &GridView) -> Option<CellPosition> {
        self.selection.focus().and_then(|c| view.position_of(c))
    }

    /// Re-anchor on a single cell
    fn jump_to(&mut self, view: &GridView, pos: CellPosition) -> Option<CellCoord> {
        let coord = view.coord_at(pos)?;
        self.typing = None;
        self.selection.select_cell(view, coord.clone());
        Some(coord)
    }

    /// With nothing selected, any navigation key lands on the first cell
    fn select_first(&mut self, view: &GridView) -> Option<CellCoord> {
        self.jump_to(view, CellPosition::new(0, 0))
    }

    /// Move the active cell one step (arrows). Clamped at the edges.
    pub fn move_active(&mut self, view: &GridView, direction: Direction) -> Option<CellCoord> {
        let Some(pos) = self.active_position(view) else {
            return self.select_first(view);
        };
        match step(view, pos, direction) {
            Some(next) => self.jump_to(view, next),
            // At the edge a range still collapses to its focus cell
            None if self.selection.is_range() => self.jump_to(view, pos),
            None => None,
        }
    }

    /// Tab: one column right, wrapping to column 0 of the same row
    pub fn next_cell(&mut self, view: &GridView) -> Option<CellCoord> {
        let Some(pos) = self.active_position(view) else {
            return self.select_first(view);
        };
        let col = if pos.col + 1 >= view.column_count() {
            0
        } else {
            pos.col + 1
        };
        self.jump_to(view, CellPosition::new(pos.row, col))
    }

    /// Shift+Tab: one column left, no-op at column 0
    pub fn prev_cell(&mut self, view: &GridView) -> Option<CellCoord> {
        let Some(pos) = self.active_position(view) else {
            return self.select_first(view);
        };
        if pos.col == 0 {
            return None;
        }
        self.jump_to(view, CellPosition::new(pos.row, pos.col - 1))
    }

    /// Enter: one row down in the same column
    pub fn next_row(&mut self, view: &GridView) -> Option<CellCoord> {
        self.move_active(view, Direction::Down)
    }

    /// Shift+Arrow: move the focus corner, keeping the anchor
    pub fn extend(&mut self, view: &GridView, direction: Direction) -> Option<CellCoord> {
        let Some(pos) = self.active_position(view) else {
            return self.select_first(view);
        };
        let next = step(view, pos, direction)?;
        let coord = view.coord_at(next)?;
        self.typing = None;
        self.selection
            .extend_to(view, coord.clone())
            .then_some(coord)
    }

    /// Escape: shrink a range back to its active cell
    pub fn collapse(&mut self, view: &GridView) -> Option<CellCoord> {
        let pos = self.active_position(view)?;
        if !self.selection.is_range() {
            return None;
        }
        self.jump_to(view, pos)
    }
}
