//! Sparse edit overlay
//!
//! Pending values keyed by cell identity, layered over the baseline. Values
//! are always strings here; typing happens at the commit boundary.

use std::collections::BTreeMap;

use super::selection::Selection;
use super::view::{CellCoord, CellPosition, GridView};
use crate::model::RecordId;

/// Per-record string diffs, ready for coercion and dispatch
pub type CommitDiff = BTreeMap<RecordId, BTreeMap<String, String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditOverlay {
    entries: BTreeMap<CellCoord, String>,
}

impl EditOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a value, broadcasting across the selection when the target is
    /// part of a multi-cell selection.
    ///
    /// The target set is read from `selection` at call time. Returns the
    /// number of cells written.
    pub fn set_value(&mut self, selection: &Selection, coord: &CellCoord, value: &str) -> usize {
        if selection.is_range() && selection.contains(coord) {
            for member in selection.members() {
                self.entries.insert(member.clone(), value.to_string());
            }
            selection.len()
        } else {
            self.entries.insert(coord.clone(), value.to_string());
            1
        }
    }

    /// Write an empty string to every given cell
    pub fn clear_cells<'a>(&mut self, coords: impl IntoIterator<Item = &'a CellCoord>) -> usize {
        let mut written = 0;
        for coord in coords {
            self.entries.insert(coord.clone(), String::new());
            written += 1;
        }
        written
    }

    /// Write a pasted grid anchored at `origin`.
    ///
    /// Cells that would land past the last visible row or last column are
    /// dropped. Rows may be jagged. Returns the number of cells written.
    pub fn apply_grid(&mut self, view: &GridView, origin: &CellCoord, grid: &[Vec<String>]) -> usize {
        let Some(start) = view.position_of(origin) else {
            return 0;
        };

        let mut written = 0;
        for (r, row) in grid.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                let pos = CellPosition::new(start.row + r, start.col + c);
                if let Some(coord) = view.coord_at(pos) {
                    self.entries.insert(coord, value.clone());
                    written += 1;
                }
            }
        }
        written
    }

    /// Group pending values by record: only the edited columns per record
    pub fn diff_for_commit(&self) -> CommitDiff {
        let mut diff = CommitDiff::new();
        for (coord, value) in &self.entries {
            diff.entry(coord.record.clone())
                .or_default()
                .insert(coord.column.clone(), value.clone());
        }
        diff
    }

    /// Drop the entries of a committed record whose value is still the one
    /// that was sent. Newer edits made while the update was in flight stay.
    pub fn settle_record(&mut self, record: &RecordId, committed: &BTreeMap<String, String>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|coord, value| {
            coord.record != *record || committed.get(&coord.column) != Some(&*value)
        });
        before - self.entries.len()
    }

    /// Revert specific cells to their baseline values
    pub fn discard<'a>(&mut self, coords: impl IntoIterator<Item = &'a CellCoord>) -> usize {
        coords
            .into_iter()
            .filter(|c| self.entries.remove(*c).is_some())
            .count()
    }

    pub fn discard_all(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, coord: &CellCoord) -> Option<&str> {
        self.entries.get(coord).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellCoord, &str)> {
        self.entries.iter().map(|(c, v)| (c, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(rows: usize, cols: usize) -> GridView {
        GridView::new(
            (0..rows).map(|r| RecordId::from(r as u64)).collect(),
            (0..cols).map(|c| format!("c{c}")).collect(),
        )
    }

    fn cell(row: u64, col: usize) -> CellCoord {
        CellCoord::new(row, format!("c{col}"))
    }

    #[test]
    fn test_single_cell_write() {
        let view = view(3, 3);
        let mut sel = Selection::new();
        sel.select_cell(&view, cell(0, 0));

        let mut overlay = EditOverlay::new();
        assert_eq!(overlay.set_value(&sel, &cell(0, 0), "v"), 1);
        assert_eq!(overlay.len(), 1);
        assert_eq!(overlay.get(&cell(0, 0)), Some("v"));
    }

    #[test]
    fn test_broadcast_write() {
        let view = view(3, 3);
        let mut sel = Selection::new();
        sel.select_cell(&view, cell(0, 0));
        sel.extend_to(&view, cell(1, 2));

        let mut overlay = EditOverlay::new();
        assert_eq!(overlay.set_value(&sel, &cell(1, 1), "v"), 6);
        assert_eq!(overlay.len(), 6);
        assert!(overlay.iter().all(|(_, v)| v == "v"));
    }

    #[test]
    fn test_write_outside_range_does_not_broadcast() {
        let view = view(3, 3);
        let mut sel = Selection::new();
        sel.select_cell(&view, cell(0, 0));
        sel.extend_to(&view, cell(1, 1));

        let mut overlay = EditOverlay::new();
        assert_eq!(overlay.set_value(&sel, &cell(2, 2), "v"), 1);
        assert_eq!(overlay.len(), 1);
    }

    #[test]
    fn test_apply_grid_clips_at_edges() {
        let view = view(3, 3);
        let grid = vec![
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec!["d".to_string()],
            vec!["e".to_string(), "f".to_string()],
        ];

        let mut overlay = EditOverlay::new();
        let written = overlay.apply_grid(&view, &cell(1, 1), &grid);

        // (1,1)=a (1,2)=b, c clipped; (2,1)=d; third row clipped entirely
        assert_eq!(written, 3);
        assert_eq!(overlay.get(&cell(1, 1)), Some("a"));
        assert_eq!(overlay.get(&cell(1, 2)), Some("b"));
        assert_eq!(overlay.get(&cell(2, 1)), Some("d"));
        assert_eq!(overlay.len(), 3);
    }

    #[test]
    fn test_apply_grid_with_hidden_origin_writes_nothing() {
        let view = view(2, 2);
        let mut overlay = EditOverlay::new();
        let grid = vec![vec!["a".to_string()]];
        assert_eq!(overlay.apply_grid(&view, &cell(5, 0), &grid), 0);
        assert!(overlay.is_empty());
    }

    #[test]
    fn test_diff_groups_by_record() {
        let mut overlay = EditOverlay::new();
        let sel = Selection::new();
        overlay.set_value(&sel, &cell(0, 0), "a");
        overlay.set_value(&sel, &cell(0, 2), "b");
        overlay.set_value(&sel, &cell(1, 1), "c");

        let diff = overlay.diff_for_commit();
        assert_eq!(diff.len(), 2);
        assert_eq!(diff[&RecordId::from(0u64)].len(), 2);
        assert_eq!(diff[&RecordId::from(1u64)]["c1"], "c");
        assert_eq!(diff, overlay.diff_for_commit());
    }

    #[test]
    fn test_clear_cells_writes_empty_strings() {
        let mut overlay = EditOverlay::new();
        let cells = [cell(0, 0), cell(0, 1)];
        assert_eq!(overlay.clear_cells(&cells), 2);
        assert_eq!(overlay.get(&cell(0, 1)), Some(""));
    }

    #[test]
    fn test_settle_keeps_newer_edits() {
        let mut overlay = EditOverlay::new();
        let sel = Selection::new();
        overlay.set_value(&sel, &cell(0, 0), "sent");
        overlay.set_value(&sel, &cell(0, 1), "sent");
        let committed = overlay.diff_for_commit().remove(&RecordId::from(0u64)).unwrap();

        // user keeps typing while the update is in flight
        overlay.set_value(&sel, &cell(0, 1), "newer");

        assert_eq!(overlay.settle_record(&RecordId::from(0u64), &committed), 1);
        assert_eq!(overlay.get(&cell(0, 0)), None);
        assert_eq!(overlay.get(&cell(0, 1)), Some("newer"));
    }

    #[test]
    fn test_discard() {
        let mut overlay = EditOverlay::new();
        overlay.clear_cells(&[cell(0, 0), cell(1, 0)]);
        assert_eq!(overlay.discard(&[cell(0, 0), cell(2, 2)]), 1);
        assert_eq!(overlay.len(), 1);
        overlay.discard_all();
        assert!(overlay.is_empty());
    }
}
