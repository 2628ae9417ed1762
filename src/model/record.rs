//! Record types for the onboarding dataset
//!
//! A record is an identity plus an ordered map of column values. The identity
//! is kept outside the field map so it can never be edited through the grid.

use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;

/// ISO date format, the default for display and the interchange format of seeds
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Stable, opaque identity of a record
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// A scalar column value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldValue {
    #[default]
    Null,
    Text(String),
    Bool(bool),
    Date(NaiveDate),
}

impl FieldValue {
    /// The string shown in (and edited through) a grid cell, with ISO dates
    pub fn display(&self) -> String {
        self.display_as(DEFAULT_DATE_FORMAT)
    }

    /// Display string with dates rendered in `date_format`
    pub fn display_as(&self, date_format: &str) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Date(d) => d.format(date_format).to_string(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        FieldValue::Date(d)
    }
}

/// Typed column values for a partial update, in schema column order
pub type PartialFields = IndexMap<String, FieldValue>;

/// A single onboarding record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: RecordId,
    fields: IndexMap<String, FieldValue>,
}

impl Record {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            fields: IndexMap::new(),
        }
    }

    /// Builder-style field setter
    pub fn with_field(mut self, column: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(column.into(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields.get(column)
    }

    /// Display string for a column; absent columns read as empty
    pub fn display(&self, column: &str) -> String {
        self.display_as(column, DEFAULT_DATE_FORMAT)
    }

    pub fn display_as(&self, column: &str, date_format: &str) -> String {
        self.fields
            .get(column)
            .map(|v| v.display_as(date_format))
            .unwrap_or_default()
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Column names in insertion order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn fields(&self) -> &IndexMap<String, FieldValue> {
        &self.fields
    }

    /// Apply a partial update in place, keeping column order for existing keys
    pub fn merge(&mut self, partial: &PartialFields) {
        for (column, value) in partial {
            self.fields.insert(column.clone(), value.clone());
        }
    }
}
