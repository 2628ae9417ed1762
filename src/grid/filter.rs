//! Column filter layer
//!
//! Derives the visible rows from the baseline: per-column, case-insensitive
//! substring filters combined with AND, followed by an optional stable sort.
//! Columns are never hidden, only rows. Dates are matched as the grid shows
//! them, in the filters' date format.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::model::{FieldValue, Record, DEFAULT_DATE_FORMAT};

/// Per-column substring filters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFilters {
    /// column -> lowercased needle (never empty)
    needles: BTreeMap<String, String>,
    date_format: String,
}

impl Default for ColumnFilters {
    fn default() -> Self {
        Self {
            needles: BTreeMap::new(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl ColumnFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style date format for matching date cells
    pub fn with_date_format(mut self, date_format: &str) -> Self {
        self.set_date_format(date_format);
        self
    }

    pub fn set_date_format(&mut self, date_format: &str) {
        self.date_format = date_format.to_string();
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Set the filter for a column; an empty needle removes it
    pub fn set(&mut self, column: impl Into<String>, needle: &str) {
        let column = column.into();
        if needle.is_empty() {
            self.needles.remove(&column);
        } else {
            self.needles.insert(column, needle.to_lowercase());
        }
    }

    /// Builder-style setter
    pub fn with(mut self, column: impl Into<String>, needle: &str) -> Self {
        self.set(column, needle);
        self
    }

    pub fn clear(&mut self) {
        self.needles.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.needles.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.needles.get(column).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.needles.iter().map(|(c, n)| (c.as_str(), n.as_str()))
    }

    /// True if the record satisfies every active filter
    pub fn matches(&self, record: &Record) -> bool {
        self.needles
            .iter()
            .all(|(column, needle)| {
                record
                    .display_as(column, &self.date_format)
                    .to_lowercase()
                    .contains(needle)
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Descending,
        }
    }

    fn compare(&self, a: &Record, b: &Record) -> Ordering {
        // Dates order chronologically whatever format they are shown in
        let ord = match (a.get(&self.column), b.get(&self.column)) {
            (Some(FieldValue::Date(x)), Some(FieldValue::Date(y))) => x.cmp(y),
            _ => a
                .display(&self.column)
                .to_lowercase()
                .cmp(&b.display(&self.column).to_lowercase()),
        };
        match self.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

/// Rows of the baseline that pass every filter, in baseline order
pub fn visible_rows<'a>(baseline: &'a [Record], filters: &ColumnFilters) -> Vec<&'a Record> {
    baseline.iter().filter(|r| filters.matches(r)).collect()
}

/// Visible rows, then stably sorted if a sort key is given
pub fn arrange_rows<'a>(
    baseline: &'a [Record],
    filters: &ColumnFilters,
    sort: Option<&SortKey>,
) -> Vec<&'a Record> {
    let mut rows = visible_rows(baseline, filters);
    if let Some(key) = sort {
        rows.sort_by(|a, b| key.compare(a, b));
    }
    rows
}
