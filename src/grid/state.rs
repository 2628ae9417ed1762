//! Mass-edit session state

use super::overlay::EditOverlay;
use super::selection::Selection;
use super::view::{CellCoord, GridView};

/// In-progress typing into the active cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingState {
    pub coord: CellCoord,
    pub buffer: String,
}

/// Selection and pending edits, alive only while mass-edit mode is on
#[derive(Debug, Clone, Default)]
pub struct MassEditState {
    pub selection: Selection,
    pub overlay: EditOverlay,
    /// Set while characters are being typed into the active cell; any move
    /// resets it so the next keystroke replaces instead of appends
    pub typing: Option<TypingState>,
}

impl MassEditState {
    /// Fresh state with the first visible cell selected
    pub fn new(view: &GridView) -> Self {
        let mut state = Self::default();
        if let Some(first) = view.first_cell() {
            state.selection.select_cell(view, first);
        }
        state
    }

    /// The active cell: the moving corner of the selection
    pub fn active_cell(&self) -> Option<&CellCoord> {
        self.selection.focus()
    }

    /// Write a value at `coord`, broadcasting across a range that contains it
    pub fn set_value(&mut self, coord: &CellCoord, value: &str) -> usize {
        self.overlay.set_value(&self.selection, coord, value)
    }

    /// Type one character into the active cell.
    ///
    /// The first character after a move replaces the value; later ones append.
    /// Every keystroke is a full `set_value` so a range broadcast always uses
    /// the selection as it is now.
    pub fn type_char(&mut self, ch: char) -> usize {
        let Some(active) = self.selection.focus().cloned() else {
            return 0;
        };

        let buffer = match self.typing.take() {
            Some(mut typing) if typing.coord == active => {
                typing.buffer.push(ch);
                typing.buffer
            }
            _ => ch.to_string(),
        };

        let written = self.overlay.set_value(&self.selection, &active, &buffer);
        self.typing = Some(TypingState {
            coord: active,
            buffer,
        });
        written
    }

    /// Clear every selected cell to an empty string
    pub fn clear_selected(&mut self) -> usize {
        self.typing = None;
        self.overlay.clear_cells(self.selection.members())
    }

    /// Revert the selected cells to their baseline values
    pub fn discard_selected(&mut self) -> usize {
        self.typing = None;
        self.overlay.discard(self.selection.members())
    }

    /// Recompute selection after the visible rows changed
    pub fn revalidate(&mut self, view: &GridView) {
        self.selection.revalidate(view);
        if self
            .typing
            .as_ref()
            .is_some_and(|t| view.position_of(&t.coord).is_none())
        {
            self.typing = None;
        }
    }
}
