//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod commit;
mod grid;
mod session;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::GridModel;

#[cfg(debug_assertions)]
use crate::tracing::SelectionSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use commit::update_commit;
pub use grid::update_grid;
pub use session::update_session;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut GridModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

fn update_inner(model: &mut GridModel, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Grid(m) => grid::update_grid(model, m),
        Msg::Session(m) => session::update_session(model, m),
        Msg::Commit(m) => commit::update_commit(model, m),
    }
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after selection state and logs diffs for debugging.
#[cfg(debug_assertions)]
fn update_traced(model: &mut GridModel, msg: Msg) -> Option<Cmd> {
    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();

    let before = SelectionSnapshot::from_model(model);
    debug!(target: "message", msg = %msg_name, "processing");

    let result = update_inner(model, msg);

    if let Some(diff) = before.diff(&SelectionSnapshot::from_model(model)) {
        debug!(target: "selection", %diff, "state changed");
    }

    if let Some(state) = model.mass_edit() {
        let expected = state.selection.bounds().map_or(0, |r| r.cell_count());
        debug_assert_eq!(
            state.selection.len(),
            expected,
            "selection is not rectangular after {}",
            msg_name
        );
    }

    result
}

/// Get a display name for a message type
///
/// Async results are summarised so record payloads don't flood the log.
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    use crate::messages::{CommitMsg, SessionMsg};

    match msg {
        Msg::Grid(m) => format!("Grid::{:?}", m),
        Msg::Session(SessionMsg::RecordsLoaded(Ok(records))) => {
            format!("Session::RecordsLoaded(Ok({} records))", records.len())
        }
        Msg::Session(m) => format!("Session::{:?}", m),
        Msg::Commit(CommitMsg::RecordUpdated { batch, record, result }) => format!(
            "Commit::RecordUpdated({}, {}, {})",
            batch,
            record,
            if result.is_ok() { "ok" } else { "err" }
        ),
        Msg::Commit(m) => format!("Commit::{:?}", m),
    }
}
