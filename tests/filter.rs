//! Column filter layer tests

mod common;

use assetgrid::grid::{arrange_rows, visible_rows, ColumnFilters, SortKey};
use assetgrid::messages::{Msg, SessionMsg};
use assetgrid::model::RecordId;
use assetgrid::update::update;
use common::{sample_records, test_model_with};

fn ids(records: &[&assetgrid::model::Record]) -> Vec<String> {
    records.iter().map(|r| r.id.to_string()).collect()
}

#[test]
fn test_filters_combine_with_and() {
    let records = sample_records();
    let filters = ColumnFilters::new()
        .with("name", "LAPTOP")
        .with("owner", "ali");
    assert_eq!(ids(&visible_rows(&records, &filters)), vec!["A-1", "A-4"]);

    let filters = filters.with("status", "repair");
    assert_eq!(ids(&visible_rows(&records, &filters)), vec!["A-4"]);
}

#[test]
fn test_empty_filters_keep_baseline_order() {
    let records = sample_records();
    let visible = visible_rows(&records, &ColumnFilters::new());
    assert_eq!(ids(&visible), vec!["A-1", "A-2", "A-3", "A-4", "A-5"]);
}

#[test]
fn test_empty_needle_removes_filter() {
    let mut filters = ColumnFilters::new().with("owner", "bob");
    filters.set("owner", "");
    assert!(filters.is_empty());
}

#[test]
fn test_filter_matches_displayed_booleans_and_dates() {
    let records = sample_records();
    let tracked = ColumnFilters::new().with("tracked", "false");
    assert_eq!(ids(&visible_rows(&records, &tracked)), vec!["A-3", "A-5"]);

    let year = ColumnFilters::new().with("purchased", "2023-");
    assert_eq!(ids(&visible_rows(&records, &year)), vec!["A-1", "A-2"]);
}

#[test]
fn test_sort_is_stable() {
    let records = sample_records();
    let sorted = arrange_rows(&records, &ColumnFilters::new(), Some(&SortKey::ascending("status")));
    // active rows keep their baseline order
    assert_eq!(ids(&sorted), vec!["A-1", "A-2", "A-5", "A-4", "A-3"]);
}

#[test]
fn test_filter_never_hides_columns() {
    let mut model = test_model_with(sample_records());
    update(&mut model, Msg::set_filter("owner", "dave"));
    assert_eq!(model.view().rows(), &[RecordId::new("A-5")]);
    assert_eq!(model.view().column_count(), 5);

    update(&mut model, Msg::Session(SessionMsg::ClearFilters));
    assert_eq!(model.view().row_count(), 5);
}

#[test]
fn test_unknown_filter_column_reports_status() {
    let mut model = test_model_with(sample_records());
    update(&mut model, Msg::set_filter("colour", "red"));
    assert!(model.filters().is_empty());
    assert_eq!(model.status_text(), Some("Unknown column `colour`"));
}
