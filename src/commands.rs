//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.
//! The runtime executes them and feeds any results back as messages.

use crate::commit::UpdateRequest;
use crate::grid::{CellCoord, ColumnFilters};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Request a redraw of the grid
    Redraw,
    /// Move input focus to a cell; the view decides how
    FocusCell(CellCoord),
    /// Fetch the baseline; sends `SessionMsg::RecordsLoaded`
    FetchRecords { filter: Option<ColumnFilters> },
    /// Run one update per request on the worker pool; each completion
    /// sends `CommitMsg::RecordUpdated`
    UpdateRecords(Vec<UpdateRequest>),
    /// Read the system clipboard; sends `GridMsg::Paste`
    ReadClipboard,
    /// Write text to the system clipboard
    WriteClipboard(String),
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Redraw, plus a focus request if navigation moved the active cell
    pub fn focus_or_redraw(focus: Option<CellCoord>) -> Self {
        match focus {
            Some(coord) => Cmd::batch(vec![Cmd::FocusCell(coord), Cmd::Redraw]),
            None => Cmd::Redraw,
        }
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None => false,
            Cmd::Redraw => true,
            Cmd::FocusCell(_) => true,
            // Async work redraws when its result message arrives
            Cmd::FetchRecords { .. } => false,
            Cmd::UpdateRecords(_) => false,
            Cmd::ReadClipboard => false,
            Cmd::WriteClipboard(_) => false,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
        }
    }

    /// The focus request carried by this command, if any
    pub fn focus_target(&self) -> Option<&CellCoord> {
        match self {
            Cmd::FocusCell(coord) => Some(coord),
            Cmd::Batch(cmds) => cmds.iter().rev().find_map(|c| c.focus_target()),
            _ => None,
        }
    }
}
