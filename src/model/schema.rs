//! Explicit column schema derived from the baseline
//!
//! The grid's column set is taken from the first record (schema-by-example),
//! then every other record is checked against it. A record whose key set
//! differs fails the load instead of being padded with empty strings. Each
//! column's kind comes from its first non-null value; a later value of a
//! different kind fails the load too.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use thiserror::Error;

use super::record::{FieldValue, PartialFields, Record, RecordId};

/// Value kind of a column, inferred from its first non-null value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Bool,
    Date,
}

impl ColumnKind {
    fn infer(value: &FieldValue) -> Self {
        match value {
            FieldValue::Bool(_) => ColumnKind::Bool,
            FieldValue::Date(_) => ColumnKind::Date,
            FieldValue::Text(_) | FieldValue::Null => ColumnKind::Text,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            ColumnKind::Text => "text",
            ColumnKind::Bool => "a boolean",
            ColumnKind::Date => "a date",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("record {record} diverges from the grid columns (missing: [{missing}], unexpected: [{unexpected}])")]
    Divergent {
        record: RecordId,
        missing: String,
        unexpected: String,
    },
    #[error("column `{column}` expects {expected} but record {record} has {found}")]
    ConflictingKinds {
        column: String,
        record: RecordId,
        expected: &'static str,
        found: &'static str,
    },
    #[error("unknown column `{0}`")]
    UnknownColumn(String),
    #[error("column `{column}` expects {expected}, got `{value}`")]
    InvalidValue {
        column: String,
        expected: &'static str,
        value: String,
    },
}

/// Ordered, typed column list for the whole grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Derive the schema from the first record and validate the rest against it
    pub fn from_records(records: &[Record]) -> Result<Self, SchemaError> {
        let Some(first) = records.first() else {
            return Ok(Self::default());
        };

        let mut columns: Vec<Column> = first
            .columns()
            .map(|name| Column {
                name: name.to_string(),
                kind: ColumnKind::Text,
            })
            .collect();

        let expected: BTreeSet<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        for record in &records[1..] {
            let actual: BTreeSet<&str> = record.columns().collect();
            if actual != expected {
                let missing: Vec<&str> = expected.difference(&actual).copied().collect();
                let unexpected: Vec<&str> = actual.difference(&expected).copied().collect();
                return Err(SchemaError::Divergent {
                    record: record.id.clone(),
                    missing: missing.join(", "),
                    unexpected: unexpected.join(", "),
                });
            }
        }

        for column in &mut columns {
            column.kind = infer_kind(&column.name, records)?;
        }

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == column)
    }

    pub fn column(&self, column: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == column)
    }

    /// Interpret a grid string as a typed value for `column`
    pub fn coerce(
        &self,
        column: &str,
        raw: &str,
        date_format: &str,
    ) -> Result<FieldValue, SchemaError> {
        let col = self
            .column(column)
            .ok_or_else(|| SchemaError::UnknownColumn(column.to_string()))?;
        let trimmed = raw.trim();
        let invalid = || SchemaError::InvalidValue {
            column: column.to_string(),
            expected: col.kind.describe(),
            value: raw.to_string(),
        };

        match col.kind {
            ColumnKind::Text => Ok(FieldValue::Text(raw.to_string())),
            ColumnKind::Bool => match trimmed.to_lowercase().as_str() {
                "true" | "yes" | "y" | "1" | "x" => Ok(FieldValue::Bool(true)),
                "false" | "no" | "n" | "0" | "" => Ok(FieldValue::Bool(false)),
                _ => Err(invalid()),
            },
            ColumnKind::Date => {
                if trimmed.is_empty() {
                    return Ok(FieldValue::Null);
                }
                NaiveDate::parse_from_str(trimmed, date_format)
                    .map(FieldValue::Date)
                    .map_err(|_| invalid())
            }
        }
    }

    /// Coerce one record's string diff into typed fields in schema order
    pub fn coerce_fields(
        &self,
        raw: &BTreeMap<String, String>,
        date_format: &str,
    ) -> Result<PartialFields, SchemaError> {
        if let Some(unknown) = raw.keys().find(|k| self.index_of(k).is_none()) {
            return Err(SchemaError::UnknownColumn(unknown.clone()));
        }

        let mut fields = PartialFields::new();
        for column in &self.columns {
            if let Some(value) = raw.get(&column.name) {
                fields.insert(
                    column.name.clone(),
                    self.coerce(&column.name, value, date_format)?,
                );
            }
        }
        Ok(fields)
    }
}

/// Kind of the first non-null value in `column`; all-null columns are text
fn infer_kind(column: &str, records: &[Record]) -> Result<ColumnKind, SchemaError> {
    let mut kind = None;
    for record in records {
        let Some(value) = record.get(column).filter(|v| !v.is_null()) else {
            continue;
        };
        let found = ColumnKind::infer(value);
        match kind {
            None => kind = Some(found),
            Some(expected) if expected != found => {
                return Err(SchemaError::ConflictingKinds {
                    column: column.to_string(),
                    record: record.id.clone(),
                    expected: expected.describe(),
                    found: found.describe(),
                });
            }
            Some(_) => {}
        }
    }
    Ok(kind.unwrap_or(ColumnKind::Text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Record> {
        vec![
            Record::new("1")
                .with_field("name", "laptop")
                .with_field("imaged", true)
                .with_field(
                    "shipped",
                    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                ),
            Record::new("2")
                .with_field("imaged", false)
                .with_field("name", "phone")
                .with_field("shipped", FieldValue::Null),
        ]
    }

    #[test]
    fn test_schema_from_first_record() {
        let schema = Schema::from_records(&sample()).unwrap();
        assert_eq!(schema.names(), vec!["name", "imaged", "shipped"]);
        assert_eq!(schema.column("imaged").unwrap().kind, ColumnKind::Bool);
        assert_eq!(schema.column("shipped").unwrap().kind, ColumnKind::Date);
        assert_eq!(schema.index_of("shipped"), Some(2));
    }

    #[test]
    fn test_schema_rejects_divergent_record() {
        let mut records = sample();
        records.push(Record::new("3").with_field("name", "tablet"));

        let err = Schema::from_records(&records).unwrap_err();
        match err {
            SchemaError::Divergent {
                record, missing, ..
            } => {
                assert_eq!(record, RecordId::from("3"));
                assert_eq!(missing, "imaged, shipped");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_kind_taken_from_first_non_null_value() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let records = vec![
            Record::new("1")
                .with_field("shipped", FieldValue::Null)
                .with_field("imaged", FieldValue::Null)
                .with_field("notes", FieldValue::Null),
            Record::new("2")
                .with_field("shipped", date)
                .with_field("imaged", true)
                .with_field("notes", FieldValue::Null),
        ];

        let schema = Schema::from_records(&records).unwrap();
        assert_eq!(schema.column("shipped").unwrap().kind, ColumnKind::Date);
        assert_eq!(schema.column("imaged").unwrap().kind, ColumnKind::Bool);
        assert_eq!(schema.column("notes").unwrap().kind, ColumnKind::Text);
    }

    #[test]
    fn test_schema_rejects_mixed_kinds() {
        let mut records = sample();
        records.push(
            Record::new("3")
                .with_field("name", "tablet")
                .with_field("imaged", "sometimes")
                .with_field("shipped", FieldValue::Null),
        );

        match Schema::from_records(&records).unwrap_err() {
            SchemaError::ConflictingKinds {
                column,
                record,
                expected,
                found,
            } => {
                assert_eq!(column, "imaged");
                assert_eq!(record, RecordId::from("3"));
                assert_eq!(expected, "a boolean");
                assert_eq!(found, "text");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_empty_baseline_has_empty_schema() {
        let schema = Schema::from_records(&[]).unwrap();
        assert!(schema.is_empty());
    }

    #[test]
    fn test_coerce_bool_and_date() {
        let schema = Schema::from_records(&sample()).unwrap();
        assert_eq!(
            schema.coerce("imaged", "Yes", "%Y-%m-%d").unwrap(),
            FieldValue::Bool(true)
        );
        assert_eq!(
            schema.coerce("imaged", "", "%Y-%m-%d").unwrap(),
            FieldValue::Bool(false)
        );
        assert!(schema.coerce("imaged", "maybe", "%Y-%m-%d").is_err());
        assert_eq!(
            schema.coerce("shipped", "", "%Y-%m-%d").unwrap(),
            FieldValue::Null
        );
        assert_eq!(
            schema.coerce("shipped", "03/04/2024", "%m/%d/%Y").unwrap(),
            FieldValue::Date(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap())
        );
    }

    #[test]
    fn test_coerce_fields_rejects_unknown_column() {
        let schema = Schema::from_records(&sample()).unwrap();
        let mut raw = BTreeMap::new();
        raw.insert("serial".to_string(), "abc".to_string());
        assert_eq!(
            schema.coerce_fields(&raw, "%Y-%m-%d"),
            Err(SchemaError::UnknownColumn("serial".to_string()))
        );
    }
}
