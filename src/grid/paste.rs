//! Clipboard grid parsing
//!
//! Spreadsheet-style clipboard text: rows separated by newlines, columns by a
//! single separator character (tab by default). There is no quoting, so a
//! value containing the separator or a newline cannot round-trip.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasteError {
    #[error("clipboard text contains no rows")]
    MalformedPaste,
}

/// Parse pasted text into a (possibly jagged) grid of strings.
///
/// A trailing `\r` on each line is stripped and trailing rows that are
/// entirely empty are dropped. Empty cells in the middle of the grid are kept.
pub fn parse_clipboard_grid(text: &str, separator: char) -> Result<Vec<Vec<String>>, PasteError> {
    let mut rows: Vec<Vec<String>> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .map(|line| line.split(separator).map(str::to_string).collect())
        .collect();

    while rows
        .last()
        .is_some_and(|row| row.iter().all(|cell| cell.is_empty()))
    {
        rows.pop();
    }

    if rows.is_empty() {
        return Err(PasteError::MalformedPaste);
    }
    Ok(rows)
}

/// Serialise a grid in the same format `parse_clipboard_grid` reads
pub fn format_clipboard_grid(rows: &[Vec<String>], separator: char) -> String {
    let sep = separator.to_string();
    rows.iter()
        .map(|row| row.join(&sep))
        .collect::<Vec<_>>()
        .join("\n")
}
