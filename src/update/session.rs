//! Session update functions
//!
//! Mode switches, filters, sorting and baseline (re)loading.

use crate::commands::Cmd;
use crate::grid::SortKey;
use crate::messages::SessionMsg;
use crate::model::{GridModel, Record};
use crate::store::FetchError;

pub fn update_session(model: &mut GridModel, msg: SessionMsg) -> Option<Cmd> {
    match msg {
        SessionMsg::EnterMassEdit => enter_mass_edit(model),
        SessionMsg::ExitMassEdit => exit_mass_edit(model),
        SessionMsg::SetFilter { column, needle } => set_filter(model, &column, &needle),
        SessionMsg::ClearFilters => {
            if model.filters().is_empty() {
                return None;
            }
            model.clear_filters();
            Some(Cmd::Redraw)
        }
        SessionMsg::SortBy(sort) => sort_by(model, sort),
        SessionMsg::Refresh => refresh(model),
        SessionMsg::RecordsLoaded(result) => records_loaded(model, result),
    }
}

fn enter_mass_edit(model: &mut GridModel) -> Option<Cmd> {
    if !model.enter_mass_edit() {
        return None;
    }
    let focus = model.mass_edit().and_then(|s| s.active_cell()).cloned();
    Some(Cmd::focus_or_redraw(focus))
}

pub(super) fn exit_mass_edit(model: &mut GridModel) -> Option<Cmd> {
    if !model.is_mass_edit() {
        return None;
    }
    if !model.exit_mass_edit() {
        model.set_status("Commit in progress, wait for it to finish");
        return Some(Cmd::Redraw);
    }
    Some(Cmd::Redraw)
}

fn set_filter(model: &mut GridModel, column: &str, needle: &str) -> Option<Cmd> {
    if model.schema().index_of(column).is_none() {
        model.set_status(format!("Unknown column `{}`", column));
        return Some(Cmd::Redraw);
    }
    model.set_filter(column, needle);
    Some(Cmd::Redraw)
}

fn sort_by(model: &mut GridModel, sort: Option<SortKey>) -> Option<Cmd> {
    if let Some(key) = &sort {
        if model.schema().index_of(&key.column).is_none() {
            model.set_status(format!("Unknown column `{}`", key.column));
            return Some(Cmd::Redraw);
        }
    }
    model.set_sort(sort);
    Some(Cmd::Redraw)
}

fn refresh(model: &mut GridModel) -> Option<Cmd> {
    if model.refreshing {
        return None;
    }
    model.refreshing = true;
    Some(Cmd::FetchRecords {
        filter: model.query.clone(),
    })
}

/// A failed fetch or a divergent schema keeps the previous baseline
fn records_loaded(model: &mut GridModel, result: Result<Vec<Record>, FetchError>) -> Option<Cmd> {
    model.refreshing = false;
    let loaded = result.and_then(|records| {
        let count = records.len();
        model.replace_baseline(records)?;
        Ok(count)
    });

    match loaded {
        Ok(count) => model.set_status(format!("Loaded {} record(s)", count)),
        Err(e) => {
            tracing::warn!("Refresh failed: {}", e);
            model.set_status(format!("Refresh failed: {}", e));
        }
    }
    Some(Cmd::Redraw)
}
