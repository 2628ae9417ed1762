//! Visible row/column matrix
//!
//! Maps between identity space (record id + column name), which is what the
//! overlay and selection store, and position space (visible row index,
//! column index), which is what rectangles and navigation work in.

use std::collections::HashMap;

use crate::model::RecordId;

/// Position of a cell in the visible grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
}

impl CellPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Identity of an editable cell: survives sorting and filtering
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellCoord {
    pub record: RecordId,
    pub column: String,
}

impl CellCoord {
    pub fn new(record: impl Into<RecordId>, column: impl Into<String>) -> Self {
        Self {
            record: record.into(),
            column: column.into(),
        }
    }
}

/// The current visible ordering of rows and the full column list
#[derive(Debug, Clone, Default)]
pub struct GridView {
    rows: Vec<RecordId>,
    row_index: HashMap<RecordId, usize>,
    columns: Vec<String>,
}

impl GridView {
    pub fn new(rows: Vec<RecordId>, columns: Vec<String>) -> Self {
        let row_index = rows
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        Self {
            rows,
            row_index,
            columns,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    pub fn rows(&self) -> &[RecordId] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_of(&self, record: &RecordId) -> Option<usize> {
        self.row_index.get(record).copied()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Position of a cell, or None if its row is hidden or its column unknown
    pub fn position_of(&self, coord: &CellCoord) -> Option<CellPosition> {
        Some(CellPosition::new(
            self.row_of(&coord.record)?,
            self.column_index(&coord.column)?,
        ))
    }

    pub fn coord_at(&self, pos: CellPosition) -> Option<CellCoord> {
        Some(CellCoord {
            record: self.rows.get(pos.row)?.clone(),
            column: self.columns.get(pos.col)?.clone(),
        })
    }

    /// First cell of the grid, if any
    pub fn first_cell(&self) -> Option<CellCoord> {
        self.coord_at(CellPosition::new(0, 0))
    }
}
