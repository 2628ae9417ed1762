//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use assetgrid::clipboard::MemoryClipboard;
use assetgrid::commands::Cmd;
use assetgrid::config::GridConfig;
use assetgrid::grid::CellCoord;
use assetgrid::keymap::{default_bindings, Keymap};
use assetgrid::messages::{Msg, SessionMsg};
use assetgrid::model::{FieldValue, GridModel, Record, RecordId};
use assetgrid::runtime::Runtime;
use assetgrid::store::MemoryStore;
use assetgrid::update::update;
use chrono::NaiveDate;

/// Build a record with text fields in the given column order
pub fn record(id: &str, fields: &[(&str, &str)]) -> Record {
    fields
        .iter()
        .fold(Record::new(id), |r, (column, value)| {
            r.with_field(*column, FieldValue::Text(value.to_string()))
        })
}

/// Five assets with text, boolean and date columns
pub fn sample_records() -> Vec<Record> {
    let rows = [
        ("A-1", "Laptop", "active", "alice", true, (2023, 1, 10)),
        ("A-2", "Monitor", "active", "bob", true, (2023, 2, 14)),
        ("A-3", "Keyboard", "retired", "carol", false, (2021, 6, 1)),
        ("A-4", "Laptop Pro", "repair", "alice", true, (2024, 3, 3)),
        ("A-5", "Dock", "active", "dave", false, (2022, 11, 30)),
    ];
    rows.iter()
        .map(|(id, name, status, owner, tracked, (y, m, d))| {
            Record::new(*id)
                .with_field("name", *name)
                .with_field("status", *status)
                .with_field("owner", *owner)
                .with_field("tracked", *tracked)
                .with_field(
                    "purchased",
                    NaiveDate::from_ymd_opt(*y, *m, *d).expect("valid date"),
                )
        })
        .collect()
}

pub fn coord(id: &str, column: &str) -> CellCoord {
    CellCoord::new(RecordId::new(id), column)
}

/// Model over the given records, still in browsing mode
pub fn test_model_with(records: Vec<Record>) -> GridModel {
    GridModel::with_baseline(GridConfig::default(), records).expect("valid baseline")
}

/// Model over `sample_records()` already in mass-edit mode with A-1/name selected
pub fn mass_edit_model() -> GridModel {
    let mut model = test_model_with(sample_records());
    update(&mut model, Msg::Session(SessionMsg::EnterMassEdit));
    model
}

/// Run a sequence of messages, returning the last command produced
pub fn send_all(model: &mut GridModel, msgs: impl IntoIterator<Item = Msg>) -> Option<Cmd> {
    let mut last = None;
    for msg in msgs {
        last = update(model, msg).or(last);
    }
    last
}

pub fn pending(model: &GridModel, id: &str, column: &str) -> Option<String> {
    model.pending_value(&coord(id, column)).map(str::to_string)
}

pub fn baseline_value(model: &GridModel, id: &str, column: &str) -> String {
    model
        .record(&RecordId::new(id))
        .map(|r| r.display(column))
        .unwrap_or_default()
}

/// Runtime over a shared store with default bindings and an in-memory clipboard
pub fn test_runtime(store: Arc<MemoryStore>, clipboard: MemoryClipboard) -> Runtime {
    test_runtime_with_config(store, clipboard, GridConfig::default())
}

pub fn test_runtime_with_config(
    store: Arc<MemoryStore>,
    clipboard: MemoryClipboard,
    config: GridConfig,
) -> Runtime {
    Runtime::open(store, config, None)
        .expect("initial fetch")
        .with_keymap(Keymap::with_bindings(default_bindings()))
        .with_clipboard(clipboard)
}

pub const WAIT: Duration = Duration::from_secs(10);
