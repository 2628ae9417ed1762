//! Selection model tests

mod common;

use assetgrid::grid::{CellPosition, Direction, GridRect, GridView, Selection, SortKey};
use assetgrid::messages::{GridMsg, Msg, SessionMsg};
use assetgrid::model::RecordId;
use assetgrid::update::update;
use common::{coord, mass_edit_model, sample_records, test_model_with};

fn sample_view() -> GridView {
    test_model_with(sample_records()).view().clone()
}

// ========================================================================
// Rectangular membership
// ========================================================================

#[test]
fn test_extend_membership_is_rectangular_for_all_pairs() {
    let view = sample_view();
    let rows = view.row_count();
    let cols = view.column_count();

    for a in 0..rows * cols {
        for f in 0..rows * cols {
            let anchor = CellPosition::new(a / cols, a % cols);
            let focus = CellPosition::new(f / cols, f % cols);

            let mut selection = Selection::new();
            assert!(selection.select_cell(&view, view.coord_at(anchor).unwrap()));
            assert!(selection.extend_to(&view, view.coord_at(focus).unwrap()));

            let expected = (anchor.row.abs_diff(focus.row) + 1) * (anchor.col.abs_diff(focus.col) + 1);
            assert_eq!(selection.len(), expected);

            let bounds = selection.bounds().unwrap();
            assert_eq!(bounds, GridRect::spanning(anchor, focus));
            assert_eq!(bounds.top_left(), CellPosition::new(anchor.row.min(focus.row), anchor.col.min(focus.col)));
            for member in selection.members() {
                assert!(bounds.contains(view.position_of(member).unwrap()));
            }
        }
    }
}

#[test]
fn test_select_cell_clears_range() {
    let view = sample_view();
    let mut selection = Selection::new();
    selection.select_cell(&view, coord("A-1", "name"));
    selection.extend_to(&view, coord("A-3", "owner"));
    assert_eq!(selection.len(), 9);

    selection.select_cell(&view, coord("A-5", "status"));
    assert_eq!(selection.len(), 1);
    assert!(!selection.is_range());
    assert_eq!(selection.anchor(), selection.focus());
}

#[test]
fn test_extend_without_anchor_is_noop() {
    let view = sample_view();
    let mut selection = Selection::new();
    assert!(!selection.extend_to(&view, coord("A-2", "name")));
    assert!(selection.is_empty());
}

#[test]
fn test_extend_to_missing_cell_leaves_selection() {
    let view = sample_view();
    let mut selection = Selection::new();
    selection.select_cell(&view, coord("A-1", "name"));
    selection.extend_to(&view, coord("A-2", "status"));

    assert!(!selection.extend_to(&view, coord("A-2", "color")));
    assert!(!selection.extend_to(&view, coord("Z-9", "name")));
    assert_eq!(selection.len(), 4);
    assert_eq!(selection.focus(), Some(&coord("A-2", "status")));
}

#[test]
fn test_clear_empties_everything() {
    let view = sample_view();
    let mut selection = Selection::new();
    selection.select_cell(&view, coord("A-1", "name"));
    selection.clear();
    assert!(selection.is_empty());
    assert_eq!(selection.anchor(), None);
    assert_eq!(selection.bounds(), None);
}

// ========================================================================
// Selection after the visible rows change
// ========================================================================

#[test]
fn test_filter_hiding_anchor_collapses_selection() {
    let mut model = mass_edit_model();
    update(&mut model, Msg::extend(Direction::Down));
    assert_eq!(model.mass_edit().unwrap().selection.len(), 2);

    // A-1 is a Laptop; hide it
    update(&mut model, Msg::set_filter("name", "monitor"));
    let state = model.mass_edit().unwrap();
    assert!(state.selection.is_empty());
}

#[test]
fn test_sort_recomputes_membership_from_corners() {
    let mut model = mass_edit_model();
    update(&mut model, Msg::Grid(GridMsg::SelectCell(coord("A-1", "name"))));
    update(&mut model, Msg::Grid(GridMsg::ExtendTo(coord("A-2", "name"))));
    assert_eq!(model.mass_edit().unwrap().selection.len(), 2);

    // Descending by name: Monitor, Laptop Pro, Laptop, Keyboard, Dock
    update(
        &mut model,
        Msg::Session(SessionMsg::SortBy(Some(SortKey::descending("name")))),
    );
    let view = model.view();
    assert_eq!(view.rows()[0], RecordId::new("A-2"));

    let selection = &model.mass_edit().unwrap().selection;
    // A-2 is row 0 and A-1 row 2, so A-4 in between joins the range
    assert_eq!(selection.len(), 3);
    assert!(selection.contains(&coord("A-4", "name")));
    assert_eq!(selection.anchor(), Some(&coord("A-1", "name")));
}

#[test]
fn test_select_all_covers_visible_rows_only() {
    let mut model = mass_edit_model();
    update(&mut model, Msg::set_filter("status", "ACTIVE"));
    update(&mut model, Msg::Grid(GridMsg::SelectAll));

    let selection = &model.mass_edit().unwrap().selection;
    assert_eq!(selection.len(), 3 * 5);
    assert!(!selection.contains(&coord("A-3", "name")));
}

#[test]
fn test_grid_messages_ignored_while_browsing() {
    let mut model = test_model_with(sample_records());
    assert_eq!(update(&mut model, Msg::Grid(GridMsg::SelectAll)), None);
    assert_eq!(update(&mut model, Msg::move_active(Direction::Down)), None);
    assert!(model.mass_edit().is_none());
}
