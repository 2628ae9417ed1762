//! Commit update functions
//!
//! Starts a batch from the overlay diff and folds per-record outcomes back
//! into the baseline and the overlay as they arrive.

use crate::commands::Cmd;
use crate::commit::{BatchId, CommitError, RecordOutcome};
use crate::messages::CommitMsg;
use crate::model::{GridMode, GridModel, Record, RecordId};
use crate::store::UpdateError;

pub fn update_commit(model: &mut GridModel, msg: CommitMsg) -> Option<Cmd> {
    match msg {
        CommitMsg::Commit => start_commit(model),
        CommitMsg::RecordUpdated {
            batch,
            record,
            result,
        } => record_updated(model, batch, record, result),
    }
}

fn start_commit(model: &mut GridModel) -> Option<Cmd> {
    let diff = model.mass_edit()?.overlay.diff_for_commit();
    let schema = model.schema().clone();
    let date_format = model.config.date_format.clone();

    match model.commit.begin(diff, &schema, &date_format) {
        Ok(requests) => {
            model.set_status(format!("Committing {} record(s)...", requests.len()));
            if requests.is_empty() {
                // Every record failed coercion, nothing to send
                finish_batch(model);
                return Some(Cmd::Redraw);
            }
            Some(Cmd::batch(vec![Cmd::UpdateRecords(requests), Cmd::Redraw]))
        }
        Err(CommitError::NothingToCommit) => {
            model.set_status("Nothing to commit");
            Some(Cmd::Redraw)
        }
        Err(e @ CommitError::AlreadyInFlight(_)) => {
            model.set_status(e.to_string());
            Some(Cmd::Redraw)
        }
    }
}

fn record_updated(
    model: &mut GridModel,
    batch: BatchId,
    record: RecordId,
    result: Result<Record, UpdateError>,
) -> Option<Cmd> {
    match model.commit.record_outcome(batch, record, result)? {
        RecordOutcome::Succeeded { record, committed } => {
            if let GridMode::MassEdit(state) = &mut model.mode {
                state.overlay.settle_record(&record.id, &committed);
            }
            model.merge_record(record);
        }
        RecordOutcome::Failed => {}
    }

    finish_batch(model);
    Some(Cmd::Redraw)
}

/// Report a settled batch once, and leave mass-edit after a clean commit
fn finish_batch(model: &mut GridModel) {
    let Some(summary) = model.commit.take_settled() else {
        return;
    };

    model.set_status(summary.message());
    let overlay_empty = model.mass_edit().map_or(true, |s| s.overlay.is_empty());
    if summary.is_success() && overlay_empty {
        model.exit_mass_edit();
    }
}
