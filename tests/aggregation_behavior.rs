//! Behavior tests for the summary, composition and trend views, and for the
//! dashboard service that renders them together.

use tradeboard_core::{
    composition, summarize, trend, CacheMode, Category, CoreError, Dashboard, DashboardConfig,
    FilterField, FilterSelection, Region, ShapeSet, Theme, TradeSummary, TradeTable, TradeType,
};
use tradeboard_tests::clean_sample_path;

fn table() -> TradeTable {
    TradeTable::load(clean_sample_path()).expect("fixture should load")
}

fn region(name: &str) -> Region {
    Region::parse(name).expect("region")
}

// =============================================================================
// Summary cards
// =============================================================================

#[test]
fn summary_reads_each_card_from_its_own_row() {
    // Given: Canada 2024 with Export 500, Import -300, Net trade 200
    let table = table();

    // When: the landing selection is summarized
    let summary =
        summarize(&table, 2024, &Region::canada(), &Category::rollup()).expect("summary");

    // Then: the cards show the stored values, import sign included
    assert_eq!(
        summary,
        TradeSummary {
            exports: 500.0,
            imports: -300.0,
            net_trade: 200.0,
        }
    );
}

#[test]
fn net_trade_equals_exports_plus_signed_imports() {
    let table = table();

    for year in table.distinct_years() {
        for geo in table.distinct_geos() {
            for category in table.distinct_categories() {
                let Ok(summary) = summarize(&table, year, &geo, &category) else {
                    continue;
                };
                assert!(summary.exports >= 0.0);
                assert!(summary.imports <= 0.0);
                assert!(
                    (summary.net_trade - (summary.exports + summary.imports)).abs() < 1e-6,
                    "{year} / {geo} / {category}"
                );
            }
        }
    }
}

#[test]
fn quebec_and_quebec_with_accent_summarize_identically() {
    let table = table();

    let plain = summarize(&table, 2024, &region("Quebec"), &Category::rollup()).expect("summary");
    let accented =
        summarize(&table, 2024, &region("Québec"), &Category::rollup()).expect("summary");

    assert_eq!(plain, accented);
    assert_eq!(plain.net_trade, -20.0);
}

#[test]
fn valid_selection_without_rows_is_no_data() {
    // Given: Alberta and 2023 both exist, but not together
    let table = table();

    let err = summarize(&table, 2023, &region("Alberta"), &Category::rollup())
        .expect_err("must fail");

    assert!(matches!(err, CoreError::NoData { .. }));
    assert!(err.is_recoverable());
}

#[test]
fn category_absent_from_dataset_is_unknown_filter_value() {
    let table = table();
    let category = Category::parse("Aircraft").expect("category");

    let err = summarize(&table, 2024, &Region::canada(), &category).expect_err("must fail");

    assert!(matches!(
        err,
        CoreError::UnknownFilterValue {
            field: FilterField::Category,
            ..
        }
    ));
}

// =============================================================================
// Composition
// =============================================================================

#[test]
fn composition_excludes_rollup_and_drops_import_sign() {
    let table = table();

    let view = composition(&table, 2024, &Region::canada(), TradeType::Import).expect("view");

    let names = view
        .slices
        .iter()
        .map(|slice| slice.category.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Consumer goods", "Energy products"]);
    assert!(view.slices.iter().all(|slice| slice.value >= 0.0));
    assert_eq!(view.total, 300.0);
    assert_eq!(view.slices[0].label, "$200");
}

#[test]
fn composition_without_detail_rows_is_empty() {
    // Given: Ontario only has the rollup row
    let table = table();

    let view = composition(&table, 2024, &region("Ontario"), TradeType::Export).expect("view");

    assert!(view.slices.is_empty());
    assert_eq!(view.total, 0.0);
}

// =============================================================================
// Trend
// =============================================================================

#[test]
fn trend_separates_bars_from_net_trade_line() {
    let table = table();
    let theme = Theme::default();

    let view = trend(&table, &Region::canada(), &Category::rollup(), &theme).expect("trend");

    assert_eq!(view.series.len(), 4);
    assert!(view
        .series
        .iter()
        .all(|bar| bar.trade_type != TradeType::NetTrade));
    assert_eq!(
        view.net_trade_line
            .iter()
            .map(|point| (point.year, point.value))
            .collect::<Vec<_>>(),
        vec![(2023, 300.0), (2024, 200.0)]
    );
}

#[test]
fn trend_for_single_year_region_has_one_year() {
    let table = table();

    let view =
        trend(&table, &region("Yukon"), &Category::rollup(), &Theme::default()).expect("trend");

    assert!(view.series.iter().all(|bar| bar.year == 2023));
    assert_eq!(view.net_trade_line.len(), 1);
}

// =============================================================================
// Dashboard service
// =============================================================================

#[tokio::test]
async fn landing_render_fills_every_panel() {
    // Given: a dashboard over the fixture with no boundaries
    let config = DashboardConfig::with_home(std::env::temp_dir());
    let dashboard = Dashboard::new(table(), ShapeSet::new(), &config);

    // When: the landing selection is rendered
    let selection = dashboard.landing_selection().expect("landing");
    let render = dashboard.render(&selection, CacheMode::Use).await;

    // Then: nothing failed and the map covers every province
    assert!(render.failures().is_empty());
    assert_eq!(selection, FilterSelection::landing(2024));
    let map = render.map.expect("map");
    assert_eq!(map.view.regions.len(), 13);
    assert!(!render.summary.expect("summary").cache_hit);
}

#[tokio::test]
async fn repeated_render_is_served_from_cache() {
    let config = DashboardConfig::with_home(std::env::temp_dir());
    let dashboard = Dashboard::new(table(), ShapeSet::new(), &config);
    let selection = FilterSelection::parse(2024, "Quebec", "All sections", "Import")
        .expect("selection");

    let first = dashboard.render(&selection, CacheMode::Use).await;
    let second = dashboard.render(&selection, CacheMode::Use).await;

    assert!(!first.cache_hit());
    assert!(second.cache_hit());
}
