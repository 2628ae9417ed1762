//! Grid update functions
//!
//! Handles GridMsg while mass-edit mode is on. In browsing mode every grid
//! message is ignored.

use crate::commands::Cmd;
use crate::grid::{format_clipboard_grid, parse_clipboard_grid, CellCoord, GridView, MassEditState};
use crate::messages::GridMsg;
use crate::model::GridModel;

pub fn update_grid(model: &mut GridModel, msg: GridMsg) -> Option<Cmd> {
    match msg {
        GridMsg::Move(direction) => navigate(model, |view, s| s.move_active(view, direction)),
        GridMsg::Extend(direction) => navigate(model, |view, s| s.extend(view, direction)),
        GridMsg::NextCell => navigate(model, |view, s| s.next_cell(view)),
        GridMsg::PrevCell => navigate(model, |view, s| s.prev_cell(view)),
        GridMsg::NextRow => navigate(model, |view, s| s.next_row(view)),
        GridMsg::SelectCell(coord) => select_cell(model, coord),
        GridMsg::ExtendTo(coord) => extend_to(model, coord),
        GridMsg::SelectAll => select_all(model),
        GridMsg::CollapseSelection => collapse_or_exit(model),
        GridMsg::SetValue { coord, value } => set_value(model, &coord, &value),
        GridMsg::TypeChar(ch) => type_char(model, ch),
        GridMsg::ClearCells => clear_cells(model),
        GridMsg::DiscardSelected => discard_selected(model),
        GridMsg::DiscardAll => discard_all(model),
        GridMsg::Copy => copy_selection(model),
        GridMsg::RequestPaste => model.is_mass_edit().then_some(Cmd::ReadClipboard),
        GridMsg::Paste(text) => paste(model, &text),
    }
}

/// Run a navigation step and turn its result into a focus request
fn navigate(
    model: &mut GridModel,
    step: impl FnOnce(&GridView, &mut MassEditState) -> Option<CellCoord>,
) -> Option<Cmd> {
    let (view, state) = model.edit_parts_mut()?;
    let focus = step(view, state);
    Some(Cmd::focus_or_redraw(focus))
}

fn select_cell(model: &mut GridModel, coord: CellCoord) -> Option<Cmd> {
    let (view, state) = model.edit_parts_mut()?;
    if !state.selection.select_cell(view, coord.clone()) {
        tracing::debug!(target: "selection", record = %coord.record, column = %coord.column, "select ignored, cell not visible");
        return None;
    }
    state.typing = None;
    Some(Cmd::focus_or_redraw(Some(coord)))
}

fn extend_to(model: &mut GridModel, coord: CellCoord) -> Option<Cmd> {
    let (view, state) = model.edit_parts_mut()?;
    if !state.selection.extend_to(view, coord.clone()) {
        return None;
    }
    state.typing = None;
    Some(Cmd::focus_or_redraw(Some(coord)))
}

fn select_all(model: &mut GridModel) -> Option<Cmd> {
    let (view, state) = model.edit_parts_mut()?;
    state.typing = None;
    state.selection.select_all(view).then_some(Cmd::Redraw)
}

/// Escape: a range collapses to its active cell; a single cell leaves mass-edit
fn collapse_or_exit(model: &mut GridModel) -> Option<Cmd> {
    let (view, state) = model.edit_parts_mut()?;
    if state.selection.is_range() {
        let focus = state.collapse(view);
        return Some(Cmd::focus_or_redraw(focus));
    }
    super::session::exit_mass_edit(model)
}

fn set_value(model: &mut GridModel, coord: &CellCoord, value: &str) -> Option<Cmd> {
    let (view, state) = model.edit_parts_mut()?;
    if view.column_index(&coord.column).is_none() {
        tracing::warn!(column = %coord.column, "ignoring write to unknown column");
        return None;
    }
    let written = state.set_value(coord, value);
    tracing::trace!(target: "overlay", written, "set value");
    Some(Cmd::Redraw)
}

fn type_char(model: &mut GridModel, ch: char) -> Option<Cmd> {
    let (_, state) = model.edit_parts_mut()?;
    (state.type_char(ch) > 0).then_some(Cmd::Redraw)
}

fn clear_cells(model: &mut GridModel) -> Option<Cmd> {
    let (_, state) = model.edit_parts_mut()?;
    (state.clear_selected() > 0).then_some(Cmd::Redraw)
}

fn discard_selected(model: &mut GridModel) -> Option<Cmd> {
    let (_, state) = model.edit_parts_mut()?;
    (state.discard_selected() > 0).then_some(Cmd::Redraw)
}

fn discard_all(model: &mut GridModel) -> Option<Cmd> {
    let (_, state) = model.edit_parts_mut()?;
    if state.overlay.is_empty() {
        return None;
    }
    state.overlay.discard_all();
    state.typing = None;
    model.set_status("Discarded all pending edits");
    Some(Cmd::Redraw)
}

fn copy_selection(model: &mut GridModel) -> Option<Cmd> {
    let values = model.selection_values();
    if values.is_empty() {
        return None;
    }
    let text = format_clipboard_grid(&values, model.config.column_separator);
    Some(Cmd::WriteClipboard(text))
}

/// Apply clipboard text at the top-left cell of the selection
fn paste(model: &mut GridModel, text: &str) -> Option<Cmd> {
    let separator = model.config.column_separator;
    let (view, state) = model.edit_parts_mut()?;

    let grid = match parse_clipboard_grid(text, separator) {
        Ok(grid) => grid,
        Err(e) => {
            tracing::debug!(target: "overlay", "paste ignored: {}", e);
            return None;
        }
    };

    let origin = state
        .selection
        .bounds()
        .and_then(|rect| view.coord_at(rect.top_left()))?;

    state.typing = None;
    let written = state.overlay.apply_grid(view, &origin, &grid);
    tracing::debug!(target: "overlay", rows = grid.len(), written, "pasted grid");
    Some(Cmd::Redraw)
}
