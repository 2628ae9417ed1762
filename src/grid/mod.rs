//! Tabular mass-edit engine
//!
//! Everything that operates on the visible grid while the user selects, types,
//! pastes and navigates. None of it talks to the record store.
//!
//! # Architecture
//!
//! ```text
//! baseline ──► filter (ColumnFilters + SortKey) ──► GridView
//!                                                     │
//!                              MassEditState ◄────────┘
//!                              ├── Selection   (anchor/focus by identity)
//!                              ├── EditOverlay (CellCoord -> String)
//!                              └── TypingState (active cell buffer)
//! ```
//!
//! Cells are addressed by `CellCoord` (record id + column name) so pending
//! edits survive sorting and filtering. Rectangles are computed in
//! `CellPosition` space against whatever `GridView` is current.

mod filter;
mod navigation;
mod overlay;
mod paste;
mod selection;
mod state;
mod view;

pub use filter::{arrange_rows, visible_rows, ColumnFilters, SortDirection, SortKey};
pub use navigation::Direction;
pub use overlay::{CommitDiff, EditOverlay};
pub use paste::{format_clipboard_grid, parse_clipboard_grid, PasteError};
pub use selection::{GridRect, Selection};
pub use state::{MassEditState, TypingState};
pub use view::{CellCoord, CellPosition, GridView};
