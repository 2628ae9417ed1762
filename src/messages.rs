//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use crate::commit::BatchId;
use crate::grid::{CellCoord, SortKey};
use crate::model::{Record, RecordId};
use crate::store::{FetchError, UpdateError};

pub use crate::grid::Direction;

/// Selection, navigation and overlay writes (mass-edit mode only)
#[derive(Debug, Clone, PartialEq)]
pub enum GridMsg {
    /// Arrow key: move the active cell, re-anchoring
    Move(Direction),
    /// Shift+Arrow: extend the selection from its anchor
    Extend(Direction),
    /// Tab
    NextCell,
    /// Shift+Tab
    PrevCell,
    /// Enter
    NextRow,
    /// Click on a cell
    SelectCell(CellCoord),
    /// Shift+Click on a cell
    ExtendTo(CellCoord),
    SelectAll,
    /// Escape: shrink a range to its active cell, or leave mass-edit
    CollapseSelection,
    /// Write a value, broadcasting across the selection
    SetValue { coord: CellCoord, value: String },
    /// Printable key typed into the active cell
    TypeChar(char),
    /// Delete / Backspace
    ClearCells,
    /// Revert the selected cells to baseline
    DiscardSelected,
    /// Revert every pending edit
    DiscardAll,
    /// Copy the selection as clipboard text
    Copy,
    /// Ask the runtime for clipboard text
    RequestPaste,
    /// Clipboard text to apply at the selection origin
    Paste(String),
}

/// Session-level messages (mode, filters, baseline)
#[derive(Debug, Clone, PartialEq)]
pub enum SessionMsg {
    EnterMassEdit,
    ExitMassEdit,
    SetFilter { column: String, needle: String },
    ClearFilters,
    SortBy(Option<SortKey>),
    /// Refetch the baseline from the store
    Refresh,
    /// Baseline fetch completed (async result)
    RecordsLoaded(Result<Vec<Record>, FetchError>),
}

/// Commit lifecycle messages
#[derive(Debug, Clone, PartialEq)]
pub enum CommitMsg {
    /// Commit the overlay diff
    Commit,
    /// One per-record update completed (async result)
    RecordUpdated {
        batch: BatchId,
        record: RecordId,
        result: Result<Record, UpdateError>,
    },
}

/// Top-level message type
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Grid(GridMsg),
    Session(SessionMsg),
    Commit(CommitMsg),
}

// Convenience constructors for common messages
impl Msg {
    pub fn move_active(direction: Direction) -> Self {
        Msg::Grid(GridMsg::Move(direction))
    }

    pub fn extend(direction: Direction) -> Self {
        Msg::Grid(GridMsg::Extend(direction))
    }

    pub fn type_char(ch: char) -> Self {
        Msg::Grid(GridMsg::TypeChar(ch))
    }

    pub fn set_value(coord: CellCoord, value: impl Into<String>) -> Self {
        Msg::Grid(GridMsg::SetValue {
            coord,
            value: value.into(),
        })
    }

    pub fn set_filter(column: impl Into<String>, needle: impl Into<String>) -> Self {
        Msg::Session(SessionMsg::SetFilter {
            column: column.into(),
            needle: needle.into(),
        })
    }

    /// Results of work done off the model thread
    pub fn is_async_result(&self) -> bool {
        matches!(
            self,
            Msg::Session(SessionMsg::RecordsLoaded(_))
                | Msg::Commit(CommitMsg::RecordUpdated { .. })
        )
    }
}
