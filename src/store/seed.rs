//! Seed data for a `MemoryStore`
//!
//! JSON seeds are an array of flat objects; CSV seeds have a header row. In
//! both the `id` field is the record identity and is not a grid column.
//! Values that look like booleans or dates (in the configured date format, or
//! ISO) are typed so the schema can infer Bool and Date columns.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{FieldValue, Record, RecordId, DEFAULT_DATE_FORMAT};

const ID_FIELD: &str = "id";

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unsupported seed file {0} (expected .json, .csv or .tsv)")]
    UnsupportedFormat(PathBuf),
    #[error("invalid JSON seed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid CSV seed: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON seed must be an array of objects")]
    NotAnArray,
    #[error("seed entry {index} is not an object")]
    NotAnObject { index: usize },
    #[error("seed entry {index} has no `id`")]
    MissingId { index: usize },
}

/// Load seed records from a `.json`, `.csv` or `.tsv` file
pub fn load_seed(path: &Path, date_format: &str) -> Result<Vec<Record>, SeedError> {
    let content = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let records = match ext.as_str() {
        "json" => parse_seed_json(&content, date_format)?,
        "csv" | "tsv" => parse_seed_csv(&content, date_format)?,
        _ => return Err(SeedError::UnsupportedFormat(path.to_path_buf())),
    };

    tracing::info!(
        "Loaded {} seed records from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

/// Parse a JSON array of flat objects
pub fn parse_seed_json(content: &str, date_format: &str) -> Result<Vec<Record>, SeedError> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let entries = value.as_array().ok_or(SeedError::NotAnArray)?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let object = entry
                .as_object()
                .ok_or(SeedError::NotAnObject { index })?;
            let id = object
                .get(ID_FIELD)
                .and_then(json_id)
                .ok_or(SeedError::MissingId { index })?;

            let mut record = Record::new(id);
            for (key, value) in object.iter().filter(|(k, _)| k.as_str() != ID_FIELD) {
                record.set(key.clone(), json_value(value, date_format));
            }
            Ok(record)
        })
        .collect()
}

fn json_id(value: &serde_json::Value) -> Option<RecordId> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(RecordId::new(s.clone())),
        serde_json::Value::Number(n) => Some(RecordId::new(n.to_string())),
        _ => None,
    }
}

fn json_value(value: &serde_json::Value, date_format: &str) -> FieldValue {
    match value {
        serde_json::Value::Null => FieldValue::Null,
        serde_json::Value::Bool(b) => FieldValue::Bool(*b),
        serde_json::Value::String(s) => match parse_date(s, date_format) {
            Some(date) => FieldValue::Date(date),
            None => FieldValue::Text(s.clone()),
        },
        other => FieldValue::Text(other.to_string()),
    }
}

/// A date in the configured format, falling back to ISO
fn parse_date(raw: &str, date_format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, date_format)
        .or_else(|_| NaiveDate::parse_from_str(raw, DEFAULT_DATE_FORMAT))
        .ok()
}

/// Parse a delimited file with a header row
pub fn parse_seed_csv(content: &str, date_format: &str) -> Result<Vec<Record>, SeedError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(content) as u8)
        .has_headers(true)
        .from_reader(Cursor::new(content.as_bytes()));

    let headers = reader.headers()?.clone();
    let id_col = headers.iter().position(|h| h == ID_FIELD);

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        let id = id_col
            .and_then(|i| row.get(i))
            .filter(|id| !id.is_empty())
            .ok_or(SeedError::MissingId { index })?;

        let mut record = Record::new(id);
        for (header, value) in headers.iter().zip(row.iter()) {
            if header != ID_FIELD {
                record.set(header, text_value(value, date_format));
            }
        }
        records.push(record);
    }
    Ok(records)
}

fn text_value(raw: &str, date_format: &str) -> FieldValue {
    match raw {
        "" => FieldValue::Null,
        "true" => FieldValue::Bool(true),
        "false" => FieldValue::Bool(false),
        _ => match parse_date(raw, date_format) {
            Some(date) => FieldValue::Date(date),
            None => FieldValue::Text(raw.to_string()),
        },
    }
}

/// Pick the most frequent candidate delimiter in the first few lines
fn detect_delimiter(content: &str) -> char {
    let first_lines: String = content.lines().take(5).collect::<Vec<_>>().join("\n");

    [',', '\t', ';', '|']
        .into_iter()
        .map(|d| (d, first_lines.matches(d).count()))
        .filter(|(_, count)| *count > 0)
        // max_by_key keeps the last maximum; reverse so ties favour the comma
        .rev()
        .max_by_key(|(_, count)| *count)
        .map(|(d, _)| d)
        .unwrap_or(',')
}
