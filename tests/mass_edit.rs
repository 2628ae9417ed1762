//! Edit overlay behaviour through the update loop

mod common;

use assetgrid::commands::Cmd;
use assetgrid::grid::Direction;
use assetgrid::messages::{GridMsg, Msg, SessionMsg};
use assetgrid::update::update;
use common::{baseline_value, coord, mass_edit_model, pending, send_all, test_model_with, record};

// ========================================================================
// Broadcast writes
// ========================================================================

#[test]
fn test_set_value_broadcasts_across_range() {
    let mut model = mass_edit_model();
    send_all(
        &mut model,
        [
            Msg::Grid(GridMsg::SelectCell(coord("A-1", "status"))),
            Msg::Grid(GridMsg::ExtendTo(coord("A-3", "owner"))),
            Msg::set_value(coord("A-2", "owner"), "pool"),
        ],
    );

    let overlay = &model.mass_edit().unwrap().overlay;
    assert_eq!(overlay.len(), 6);
    assert!(overlay.iter().all(|(_, v)| v == "pool"));
    assert_eq!(pending(&model, "A-1", "status").as_deref(), Some("pool"));
    assert_eq!(pending(&model, "A-4", "status"), None);
}

#[test]
fn test_set_value_outside_range_writes_one_cell() {
    let mut model = mass_edit_model();
    send_all(
        &mut model,
        [
            Msg::Grid(GridMsg::SelectCell(coord("A-1", "status"))),
            Msg::Grid(GridMsg::ExtendTo(coord("A-2", "status"))),
            Msg::set_value(coord("A-5", "owner"), "erin"),
        ],
    );
    assert_eq!(model.mass_edit().unwrap().overlay.len(), 1);
    assert_eq!(pending(&model, "A-5", "owner").as_deref(), Some("erin"));
}

#[test]
fn test_single_cell_selection_writes_one_cell() {
    let mut model = mass_edit_model();
    update(&mut model, Msg::set_value(coord("A-1", "name"), "Laptop Air"));
    assert_eq!(model.mass_edit().unwrap().overlay.len(), 1);
    assert_eq!(model.display_value(&coord("A-1", "name")), "Laptop Air");
    // Baseline is untouched until commit
    assert_eq!(baseline_value(&model, "A-1", "name"), "Laptop");
}

#[test]
fn test_broadcast_uses_selection_at_write_time() {
    let mut model = mass_edit_model();
    send_all(
        &mut model,
        [
            Msg::Grid(GridMsg::SelectCell(coord("A-1", "status"))),
            Msg::extend(Direction::Down),
            Msg::type_char('o'),
        ],
    );
    assert_eq!(pending(&model, "A-1", "status").as_deref(), Some("o"));
    assert_eq!(pending(&model, "A-2", "status").as_deref(), Some("o"));

    // Selection grows between keystrokes: the next write covers the new range
    send_all(&mut model, [Msg::extend(Direction::Down), Msg::type_char('k')]);
    assert_eq!(pending(&model, "A-3", "status").as_deref(), Some("k"));
    assert_eq!(pending(&model, "A-1", "status").as_deref(), Some("k"));

    // Selection shrinks: A-3 keeps its value, the remaining cells get the new one
    send_all(
        &mut model,
        [Msg::extend(Direction::Up), Msg::type_char('x'), Msg::type_char('y')],
    );
    assert_eq!(pending(&model, "A-1", "status").as_deref(), Some("xy"));
    assert_eq!(pending(&model, "A-2", "status").as_deref(), Some("xy"));
    assert_eq!(pending(&model, "A-3", "status").as_deref(), Some("k"));
}

#[test]
fn test_typing_appends_until_moved() {
    let mut model = mass_edit_model();
    send_all(&mut model, "Desk".chars().map(Msg::type_char));
    assert_eq!(pending(&model, "A-1", "name").as_deref(), Some("Desk"));

    send_all(&mut model, [Msg::move_active(Direction::Down), Msg::type_char('Z')]);
    assert_eq!(pending(&model, "A-2", "name").as_deref(), Some("Z"));

    // Coming back starts a fresh value
    send_all(&mut model, [Msg::move_active(Direction::Up), Msg::type_char('C')]);
    assert_eq!(pending(&model, "A-1", "name").as_deref(), Some("C"));
}

#[test]
fn test_write_to_unknown_column_ignored() {
    let mut model = mass_edit_model();
    assert_eq!(update(&mut model, Msg::set_value(coord("A-1", "color"), "red")), None);
    assert!(model.mass_edit().unwrap().overlay.is_empty());
}

// ========================================================================
// Clear and discard
// ========================================================================

#[test]
fn test_clear_cells_writes_empty_strings() {
    let mut model = mass_edit_model();
    send_all(
        &mut model,
        [
            Msg::Grid(GridMsg::SelectCell(coord("A-4", "owner"))),
            Msg::extend(Direction::Down),
            Msg::Grid(GridMsg::ClearCells),
        ],
    );
    assert_eq!(pending(&model, "A-4", "owner").as_deref(), Some(""));
    assert_eq!(pending(&model, "A-5", "owner").as_deref(), Some(""));
    assert_eq!(model.display_value(&coord("A-5", "owner")), "");
}

#[test]
fn test_discard_selected_reverts_to_baseline() {
    let mut model = mass_edit_model();
    send_all(
        &mut model,
        [
            Msg::set_value(coord("A-2", "owner"), "x"),
            Msg::set_value(coord("A-3", "owner"), "y"),
            Msg::Grid(GridMsg::SelectCell(coord("A-2", "owner"))),
            Msg::Grid(GridMsg::DiscardSelected),
        ],
    );
    assert_eq!(pending(&model, "A-2", "owner"), None);
    assert_eq!(model.display_value(&coord("A-2", "owner")), "bob");
    assert_eq!(pending(&model, "A-3", "owner").as_deref(), Some("y"));

    update(&mut model, Msg::Grid(GridMsg::DiscardAll));
    assert!(model.mass_edit().unwrap().overlay.is_empty());
}

#[test]
fn test_overlay_survives_filter_changes() {
    let mut model = mass_edit_model();
    update(&mut model, Msg::set_value(coord("A-3", "owner"), "zed"));
    update(&mut model, Msg::set_filter("status", "active"));
    assert_eq!(pending(&model, "A-3", "owner").as_deref(), Some("zed"));

    update(&mut model, Msg::Session(SessionMsg::ClearFilters));
    assert_eq!(model.display_value(&coord("A-3", "owner")), "zed");
}

#[test]
fn test_exit_mass_edit_drops_pending_edits() {
    let mut model = mass_edit_model();
    update(&mut model, Msg::set_value(coord("A-1", "owner"), "zed"));
    update(&mut model, Msg::Session(SessionMsg::ExitMassEdit));
    assert!(!model.is_mass_edit());
    assert_eq!(model.display_value(&coord("A-1", "owner")), "alice");

    update(&mut model, Msg::Session(SessionMsg::EnterMassEdit));
    assert!(model.mass_edit().unwrap().overlay.is_empty());
}

#[test]
fn test_escape_collapses_range_before_leaving() {
    let mut model = mass_edit_model();
    update(&mut model, Msg::extend(Direction::Right));
    update(&mut model, Msg::Grid(GridMsg::CollapseSelection));
    assert!(model.is_mass_edit());
    assert_eq!(model.mass_edit().unwrap().selection.len(), 1);

    update(&mut model, Msg::Grid(GridMsg::CollapseSelection));
    assert!(!model.is_mass_edit());
}

// ========================================================================
// Paste and copy
// ========================================================================

#[test]
fn test_paste_at_selection_origin_clips() {
    let mut model = mass_edit_model();
    send_all(
        &mut model,
        [
            Msg::Grid(GridMsg::SelectCell(coord("A-5", "tracked"))),
            Msg::Grid(GridMsg::ExtendTo(coord("A-4", "owner"))),
            Msg::Grid(GridMsg::Paste("a\tb\tc\td\r\ne\tf\r\ng\th\n\n".into())),
        ],
    );

    // Origin is the top-left of the range (A-4/owner); writes past the last
    // column and the last row are dropped
    assert_eq!(pending(&model, "A-4", "owner").as_deref(), Some("a"));
    assert_eq!(pending(&model, "A-4", "tracked").as_deref(), Some("b"));
    assert_eq!(pending(&model, "A-4", "purchased").as_deref(), Some("c"));
    assert_eq!(pending(&model, "A-5", "owner").as_deref(), Some("e"));
    assert_eq!(pending(&model, "A-5", "tracked").as_deref(), Some("f"));
    assert_eq!(model.mass_edit().unwrap().overlay.len(), 5);
}

#[test]
fn test_jagged_paste_writes_present_cells_only() {
    let mut model = mass_edit_model();
    update(
        &mut model,
        Msg::Grid(GridMsg::Paste("Tablet\nPhone\tactive\tzoe".into())),
    );
    assert_eq!(pending(&model, "A-1", "name").as_deref(), Some("Tablet"));
    assert_eq!(pending(&model, "A-1", "status"), None);
    assert_eq!(pending(&model, "A-2", "owner").as_deref(), Some("zoe"));
    assert_eq!(model.mass_edit().unwrap().overlay.len(), 4);
}

#[test]
fn test_blank_paste_is_noop() {
    let mut model = mass_edit_model();
    assert_eq!(update(&mut model, Msg::Grid(GridMsg::Paste("\n\r\n".into()))), None);
    assert_eq!(update(&mut model, Msg::Grid(GridMsg::Paste(String::new()))), None);
    assert!(model.mass_edit().unwrap().overlay.is_empty());
}

#[test]
fn test_copy_emits_pending_values() {
    let mut model = test_model_with(vec![
        record("1", &[("a", "x"), ("b", "y")]),
        record("2", &[("a", "p"), ("b", "q")]),
    ]);
    update(&mut model, Msg::Session(SessionMsg::EnterMassEdit));
    send_all(
        &mut model,
        [
            Msg::set_value(coord("2", "a"), "P"),
            Msg::Grid(GridMsg::SelectAll),
        ],
    );
    assert_eq!(
        update(&mut model, Msg::Grid(GridMsg::Copy)),
        Some(Cmd::WriteClipboard("x\ty\nP\tq".into()))
    );
}
