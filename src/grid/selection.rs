//! Rectangular cell selection
//!
//! A selection is empty, a single cell, or the rectangle spanned by an anchor
//! and a focus cell. Both corners are stored by identity; the membership set
//! is always recomputed from them against the current `GridView`, so a
//! filter or sort change can never leave a stale, non-rectangular set behind.

use indexmap::IndexSet;

use super::view::{CellCoord, CellPosition, GridView};

/// Inclusive rectangle in (visible row, column) space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRect {
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
}

impl GridRect {
    /// Rectangle spanned by two corners, in any order
    pub fn spanning(a: CellPosition, b: CellPosition) -> Self {
        Self {
            top: a.row.min(b.row),
            left: a.col.min(b.col),
            bottom: a.row.max(b.row),
            right: a.col.max(b.col),
        }
    }

    pub fn row_count(&self) -> usize {
        self.bottom - self.top + 1
    }

    pub fn col_count(&self) -> usize {
        self.right - self.left + 1
    }

    pub fn cell_count(&self) -> usize {
        self.row_count() * self.col_count()
    }

    pub fn contains(&self, pos: CellPosition) -> bool {
        (self.top..=self.bottom).contains(&pos.row) && (self.left..=self.right).contains(&pos.col)
    }

    pub fn top_left(&self) -> CellPosition {
        CellPosition::new(self.top, self.left)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Selection {
    anchor: Option<CellCoord>,
    focus: Option<CellCoord>,
    bounds: Option<GridRect>,
    /// Row-major membership, derived from anchor + focus
    members: IndexSet<CellCoord>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collapse to a single cell. Returns false (no change) if the cell is not visible.
    pub fn select_cell(&mut self, view: &GridView, coord: CellCoord) -> bool {
        if view.position_of(&coord).is_none() {
            return false;
        }
        self.anchor = Some(coord.clone());
        self.focus = Some(coord);
        self.recompute(view)
    }

    /// Move the focus corner, keeping the anchor.
    ///
    /// No-op if there is no anchor or the target is not visible; the caller
    /// must re-anchor in that case.
    pub fn extend_to(&mut self, view: &GridView, coord: CellCoord) -> bool {
        if self.anchor.is_none() || view.position_of(&coord).is_none() {
            return false;
        }
        self.focus = Some(coord);
        self.recompute(view)
    }

    /// Select every visible cell, anchored at the top-left
    pub fn select_all(&mut self, view: &GridView) -> bool {
        let last = CellPosition::new(
            view.row_count().saturating_sub(1),
            view.column_count().saturating_sub(1),
        );
        match (view.first_cell(), view.coord_at(last)) {
            (Some(first), Some(last)) => {
                self.anchor = Some(first);
                self.focus = Some(last);
                self.recompute(view)
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.anchor = None;
        self.focus = None;
        self.bounds = None;
        self.members.clear();
    }

    /// Re-derive membership after the visible rows changed.
    ///
    /// If either corner's row was filtered out the selection collapses to empty.
    pub fn revalidate(&mut self, view: &GridView) {
        if self.anchor.is_some() && !self.recompute(view) {
            tracing::debug!(target: "selection", "selection corner no longer visible, clearing");
            self.clear();
        }
    }

    fn recompute(&mut self, view: &GridView) -> bool {
        let (Some(anchor), Some(focus)) = (&self.anchor, &self.focus) else {
            return false;
        };
        let (Some(a), Some(f)) = (view.position_of(anchor), view.position_of(focus)) else {
            return false;
        };

        let rect = GridRect::spanning(a, f);
        self.members.clear();
        for row in rect.top..=rect.bottom {
            for col in rect.left..=rect.right {
                if let Some(coord) = view.coord_at(CellPosition::new(row, col)) {
                    self.members.insert(coord);
                }
            }
        }
        self.bounds = Some(rect);
        true
    }

    pub fn anchor(&self) -> Option<&CellCoord> {
        self.anchor.as_ref()
    }

    /// The moving corner; also the active cell for navigation and typing
    pub fn focus(&self) -> Option<&CellCoord> {
        self.focus.as_ref()
    }

    pub fn bounds(&self) -> Option<GridRect> {
        self.bounds
    }

    pub fn members(&self) -> impl Iterator<Item = &CellCoord> {
        self.members.iter()
    }

    pub fn contains(&self, coord: &CellCoord) -> bool {
        self.members.contains(coord)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// More than one cell selected
    pub fn is_range(&self) -> bool {
        self.members.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordId;

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
    fn test_select_cell_is_single() {
        let view = view(3, 3);
        let mut sel = Selection::new();
        assert!(sel.select_cell(&view, cell(1, 1)));
        assert_eq!(sel.len(), 1);
        assert!(!sel.is_range());
        assert_eq!(sel.anchor(), sel.focus());
    }

    #[test]
    fn test_extend_membership_matches_bounds() {
        let view = view(5, 4);
        for (ar, ac, fr, fc) in [(0, 0, 2, 3), (4, 3, 1, 0), (2, 1, 2, 1), (3, 0, 0, 2)] {
            let mut sel = Selection::new();
            sel.select_cell(&view, cell(ar, ac));
            assert!(sel.extend_to(&view, cell(fr, fc)));

            let rows = (ar as i64 - fr as i64).unsigned_abs() as usize + 1;
            let cols = (ac as i64 - fc as i64).unsigned_abs() as usize + 1;
            assert_eq!(sel.len(), rows * cols);

            let rect = sel.bounds().unwrap();
            assert_eq!(rect.top, (ar as usize).min(fr as usize));
            assert_eq!(rect.bottom, (ar as usize).max(fr as usize));
            assert_eq!(rect.left, ac.min(fc));
            assert_eq!(rect.right, ac.max(fc));
            assert_eq!(rect.cell_count(), sel.len());
        }
    }

    #[test]
    fn test_extend_without_anchor_is_noop() {
        let view = view(3, 3);
        let mut sel = Selection::new();
        assert!(!sel.extend_to(&view, cell(1, 1)));
        assert!(sel.is_empty());
    }

    #[test]
    fn test_extend_to_hidden_cell_is_noop() {
        let view = view(3, 3);
        let mut sel = Selection::new();
        sel.select_cell(&view, cell(0, 0));
        sel.extend_to(&view, cell(1, 1));

        assert!(!sel.extend_to(&view, cell(9, 0)));
        assert!(!sel.extend_to(&view, CellCoord::new(1u64, "nope")));
        assert_eq!(sel.len(), 4);
        assert_eq!(sel.focus(), Some(&cell(1, 1)));
    }

    #[test]
    fn test_membership_follows_visible_order() {
        let mut sel = Selection::new();
        let full = view(4, 1);
        sel.select_cell(&full, cell(0, 0));
        sel.extend_to(&full, cell(3, 0));
        assert_eq!(sel.len(), 4);

        // Row 1 filtered out: the rectangle now spans only three visible rows
        let filtered = GridView::new(
            vec![0u64, 2, 3].into_iter().map(RecordId::from).collect(),
            vec!["c0".to_string()],
        );
        sel.revalidate(&filtered);
        assert_eq!(sel.len(), 3);
        assert!(!sel.contains(&cell(1, 0)));
    }

    #[test]
    fn test_revalidate_clears_when_anchor_hidden() {
        let mut sel = Selection::new();
        let full = view(3, 2);
        sel.select_cell(&full, cell(0, 0));
        sel.extend_to(&full, cell(2, 1));

        let filtered = GridView::new(
            vec![1u64, 2].into_iter().map(RecordId::from).collect(),
            vec!["c0".to_string(), "c1".to_string()],
        );
        sel.revalidate(&filtered);
        assert!(sel.is_empty());
        assert!(sel.anchor().is_none());
    }

    #[test]
    fn test_select_all() {
        let view = view(3, 2);
        let mut sel = Selection::new();
        assert!(sel.select_all(&view));
        assert_eq!(sel.len(), 6);
        assert_eq!(sel.anchor(), Some(&cell(0, 0)));
        assert_eq!(sel.focus(), Some(&cell(2, 1)));
    }

    #[test]
    fn test_clear() {
        let view = view(2, 2);
        let mut sel = Selection::new();
        sel.select_all(&view);
        sel.clear();
        assert!(sel.is_empty());
        assert!(sel.bounds().is_none());
    }
}
