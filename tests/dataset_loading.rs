//! Behavior tests for loading the clean dataset.
//!
//! These tests cover what a dashboard operator sees when the clean file is
//! well formed, when it uses aliases, and when it is broken.

use std::fs;

use tempfile::tempdir;
use tradeboard_core::{
    Category, DataLoadError, LoadOptions, Region, TradeTable, TradeType, PROVINCES_AND_TERRITORIES,
};
use tradeboard_tests::clean_sample_path;

// =============================================================================
// Loading: well-formed input
// =============================================================================

#[test]
fn when_clean_file_loads_every_row_is_indexed() {
    // Given / When: the sample clean dataset
    let table = TradeTable::load(clean_sample_path()).expect("fixture should load");

    // Then: every row is available and nothing was skipped
    assert_eq!(table.len(), 27);
    assert_eq!(table.report().rows_loaded, 27);
    assert_eq!(table.report().rows_skipped, 0);
}

#[test]
fn filter_options_are_ordered_for_dropdowns() {
    let table = TradeTable::load(clean_sample_path()).expect("fixture should load");
    let options = table.filter_options();

    assert_eq!(options.years, vec![2024, 2023], "newest year first");

    let geos = options
        .geos
        .iter()
        .map(Region::as_str)
        .collect::<Vec<_>>();
    assert_eq!(geos, vec!["Canada", "Alberta", "Ontario", "Québec", "Yukon"]);

    let categories = options
        .categories
        .iter()
        .map(Category::as_str)
        .collect::<Vec<_>>();
    assert_eq!(
        categories,
        vec!["All sections", "Consumer goods", "Energy products"]
    );

    assert_eq!(
        options.trade_types,
        vec![TradeType::Export, TradeType::Import, TradeType::NetTrade]
    );
}

#[test]
fn quebec_without_accent_is_stored_under_canonical_name() {
    // Given: the fixture spells the province "Quebec"
    let table = TradeTable::load(clean_sample_path()).expect("fixture should load");

    // Then: lookups by either spelling land on the same rows
    let accented = Region::parse("Québec").expect("region");
    let plain = Region::parse("quebec").expect("region");
    assert_eq!(accented, plain);

    let record = table
        .get(2024, &plain, &Category::rollup(), TradeType::Export)
        .expect("Québec export row");
    assert_eq!(record.geo.as_str(), "Québec");
    assert_eq!(record.value, 100.0);
}

#[test]
fn every_loaded_region_is_canada_or_a_known_province() {
    let table = TradeTable::load(clean_sample_path()).expect("fixture should load");

    for record in table.records() {
        assert!(
            record.geo.is_canada() || PROVINCES_AND_TERRITORIES.contains(&record.geo.as_str()),
            "unexpected region {}",
            record.geo
        );
    }
}

#[test]
fn category_codes_and_spacing_are_normalized_at_load() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("clean.csv");
    fs::write(
        &path,
        "year,geo,category,trade,value\n\
         2024,Canada,Energy  products [C12],Export,5\n\
         2024,Canada,ENERGY PRODUCTS,Import,-2\n",
    )
    .expect("write csv");

    let table = TradeTable::load(&path).expect("should load");
    let categories = table.distinct_categories();

    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].as_str(), "Energy products");
}

#[test]
fn tab_separated_file_is_detected_by_extension() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("clean.tsv");
    fs::write(
        &path,
        "YEAR\tGEO\tCATEGORY\tTRADE\tVALUE\n2024\tNunavut\tAll sections\tExport\t7\n",
    )
    .expect("write tsv");

    let table = TradeTable::load_with(&path, LoadOptions::for_path(&path)).expect("should load");
    assert_eq!(table.len(), 1);
    assert_eq!(table.records()[0].geo.as_str(), "Nunavut");
}

// =============================================================================
// Loading: broken input
// =============================================================================

#[test]
fn missing_file_reports_the_path() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("absent.csv");

    let err = TradeTable::load(&path).expect_err("must fail");

    assert!(matches!(err, DataLoadError::Open { .. }));
    assert!(err.to_string().contains("absent.csv"));
}

#[test]
fn missing_columns_are_all_listed() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("clean.csv");
    fs::write(&path, "year,geo,category\n2024,Canada,All sections\n").expect("write csv");

    let err = TradeTable::load(&path).expect_err("must fail");

    match err {
        DataLoadError::MissingColumns { missing } => {
            assert_eq!(missing, vec![String::from("trade"), String::from("value")]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_row_reports_its_line() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("clean.csv");
    fs::write(
        &path,
        "year,geo,category,trade,value\n2024,Canada,All sections,Export,1\nnext,Canada,All sections,Import,-1\n",
    )
    .expect("write csv");

    let err = TradeTable::load(&path).expect_err("must fail");

    assert!(matches!(err, DataLoadError::InvalidRow { line: 3, .. }));
}

#[test]
fn unknown_region_is_rejected() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("clean.csv");
    fs::write(
        &path,
        "year,geo,category,trade,value\n2024,Michigan,All sections,Export,1\n",
    )
    .expect("write csv");

    let err = TradeTable::load(&path).expect_err("must fail");

    assert!(matches!(err, DataLoadError::InvalidRow { line: 2, .. }));
    assert!(err.to_string().contains("Michigan"));
}

#[test]
fn truncated_row_fails_the_load_instead_of_being_skipped() {
    // Given: the second data row stops after the geo column
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("clean.csv");
    fs::write(
        &path,
        "year,geo,category,trade,value
2024,Canada,All sections,Export,5
2024,Canada
",
    )
    .expect("write csv");

    // When: the file is loaded
    let err = TradeTable::load(&path).expect_err("must fail");

    // Then: the short row is reported by line, not counted as an empty value
    assert!(matches!(err, DataLoadError::InvalidRow { line: 3, .. }));
    assert!(err.to_string().contains("category"));
}

#[test]
fn present_but_empty_value_is_still_skipped() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("clean.csv");
    fs::write(
        &path,
        "year,geo,category,trade,value
2024,Canada,All sections,Export,5
2024,Canada,All sections,Import,
",
    )
    .expect("write csv");

    let table = TradeTable::load(&path).expect("should load");

    assert_eq!(table.len(), 1);
    assert_eq!(table.report().rows_skipped, 1);
}

#[test]
fn header_only_file_is_empty() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("clean.csv");
    fs::write(&path, "year,geo,category,trade,value\n").expect("write csv");

    let err = TradeTable::load(&path).expect_err("must fail");

    assert!(matches!(err, DataLoadError::Empty { .. }));
}
