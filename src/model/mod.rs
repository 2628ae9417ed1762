//! Session model - the complete state of one grid session
//!
//! All state lives in `GridModel` following the Elm Architecture pattern.
//! Only `update::update` mutates it.

mod record;
mod schema;
mod status;

pub use record::{FieldValue, PartialFields, Record, RecordId, DEFAULT_DATE_FORMAT};
pub use schema::{Column, ColumnKind, Schema, SchemaError};
pub use status::TransientMessage;

use crate::commit::{CommitCoordinator, CommitSummary};
use crate::config::GridConfig;
use crate::grid::{
    arrange_rows, CellCoord, CellPosition, ColumnFilters, GridView, MassEditState, SortKey,
};

/// Browsing shows the baseline; mass-edit adds a selection and an overlay
#[derive(Debug, Clone, Default)]
pub enum GridMode {
    #[default]
    Browsing,
    MassEdit(MassEditState),
}

#[derive(Debug, Default)]
pub struct GridModel {
    pub config: GridConfig,
    baseline: Vec<Record>,
    schema: Schema,
    filters: ColumnFilters,
    sort: Option<SortKey>,
    view: GridView,
    pub mode: GridMode,
    pub commit: CommitCoordinator,
    pub status: Option<TransientMessage>,
    /// Server-side filter passed to every list call
    pub query: Option<ColumnFilters>,
    /// A refresh fetch is outstanding
    pub refreshing: bool,
}

impl GridModel {
    pub fn new(config: GridConfig) -> Self {
        let config = config.sanitized();
        Self {
            filters: ColumnFilters::new().with_date_format(&config.date_format),
            config,
            ..Self::default()
        }
    }

    pub fn with_baseline(config: GridConfig, records: Vec<Record>) -> Result<Self, SchemaError> {
        let mut model = Self::new(config);
        model.replace_baseline(records)?;
        Ok(model)
    }

    /// Swap in a freshly fetched baseline. On a schema error the current
    /// baseline is kept.
    pub fn replace_baseline(&mut self, records: Vec<Record>) -> Result<(), SchemaError> {
        let schema = Schema::from_records(&records)?;
        tracing::debug!(
            records = records.len(),
            columns = schema.len(),
            "baseline replaced"
        );
        self.schema = schema;
        self.baseline = records;
        self.rebuild_view();
        Ok(())
    }

    /// Merge one updated record into the baseline by identity
    pub fn merge_record(&mut self, record: Record) {
        let columns_match = record.columns().count() == self.schema.len()
            && record.columns().all(|c| self.schema.index_of(c).is_some());
        if !columns_match {
            tracing::warn!(record = %record.id, "updated record does not match the grid columns");
        }

        match self.baseline.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => *slot = record,
            None => self.baseline.push(record),
        }
        self.rebuild_view();
    }

    /// Recompute the visible rows and re-derive the selection against them
    fn rebuild_view(&mut self) {
        self.filters.set_date_format(&self.config.date_format);
        let rows = arrange_rows(&self.baseline, &self.filters, self.sort.as_ref())
            .into_iter()
            .map(|r| r.id.clone())
            .collect();
        self.view = GridView::new(rows, self.schema.names());
        if let GridMode::MassEdit(state) = &mut self.mode {
            state.revalidate(&self.view);
        }
    }

    pub fn baseline(&self) -> &[Record] {
        &self.baseline
    }

    pub fn record(&self, id: &RecordId) -> Option<&Record> {
        self.baseline.iter().find(|r| r.id == *id)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn view(&self) -> &GridView {
        &self.view
    }

    pub fn filters(&self) -> &ColumnFilters {
        &self.filters
    }

    pub fn sort(&self) -> Option<&SortKey> {
        self.sort.as_ref()
    }

    pub fn set_filter(&mut self, column: &str, needle: &str) {
        self.filters.set(column, needle);
        self.rebuild_view();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.rebuild_view();
    }

    pub fn set_sort(&mut self, sort: Option<SortKey>) {
        self.sort = sort;
        self.rebuild_view();
    }

    pub fn is_mass_edit(&self) -> bool {
        matches!(self.mode, GridMode::MassEdit(_))
    }

    pub fn mass_edit(&self) -> Option<&MassEditState> {
        match &self.mode {
            GridMode::MassEdit(state) => Some(state),
            GridMode::Browsing => None,
        }
    }

    /// The view and the edit state, borrowed together for navigation
    pub fn edit_parts_mut(&mut self) -> Option<(&GridView, &mut MassEditState)> {
        match &mut self.mode {
            GridMode::MassEdit(state) => Some((&self.view, state)),
            GridMode::Browsing => None,
        }
    }

    /// Returns false if already in mass-edit mode
    pub fn enter_mass_edit(&mut self) -> bool {
        if self.is_mass_edit() {
            return false;
        }
        self.mode = GridMode::MassEdit(MassEditState::new(&self.view));
        true
    }

    /// Leave mass-edit mode, dropping selection and overlay.
    ///
    /// Refused (returns false) while a commit batch is in flight.
    pub fn exit_mass_edit(&mut self) -> bool {
        if self.commit.is_in_flight() {
            return false;
        }
        if let GridMode::MassEdit(state) = &self.mode {
            if !state.overlay.is_empty() {
                tracing::debug!(
                    pending = state.overlay.len(),
                    "leaving mass-edit with pending edits"
                );
            }
        }
        self.mode = GridMode::Browsing;
        true
    }

    /// Value pending in the overlay for a cell, if any
    pub fn pending_value(&self, coord: &CellCoord) -> Option<&str> {
        self.mass_edit()?.overlay.get(coord)
    }

    /// What the grid shows for a cell: the pending value, else the baseline
    pub fn display_value(&self, coord: &CellCoord) -> String {
        if let Some(pending) = self.pending_value(coord) {
            return pending.to_string();
        }
        self.record(&coord.record)
            .map(|r| r.display_as(&coord.column, &self.config.date_format))
            .unwrap_or_default()
    }

    /// Displayed values of the selection rectangle, row by row
    pub fn selection_values(&self) -> Vec<Vec<String>> {
        let Some(rect) = self.mass_edit().and_then(|s| s.selection.bounds()) else {
            return Vec::new();
        };
        (rect.top..=rect.bottom)
            .map(|row| {
                (rect.left..=rect.right)
                    .filter_map(|col| {
                        self.view
                            .coord_at(CellPosition::new(row, col))
                            .map(|coord| self.display_value(&coord))
                    })
                    .collect()
            })
            .collect()
    }

    pub fn last_commit(&self) -> Option<&CommitSummary> {
        self.commit.last_summary()
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::debug!(target: "status", "{}", text);
        self.status = Some(TransientMessage::new(text, self.config.status_timeout()));
    }

    /// Current status text, unless it has expired
    pub fn status_text(&self) -> Option<&str> {
        self.status
            .as_ref()
            .filter(|m| !m.is_expired())
            .map(|m| m.text.as_str())
    }
}
