use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::format::{format_currency, truncate_label, wrap_label};
use crate::{Category, CoreError, Region, TradeTable, TradeType};

const LABEL_WIDTH: usize = 18;
const SHORT_LABEL_CHARS: usize = 24;

/// One treemap tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionSlice {
    pub category: Category,
    /// Absolute magnitude; composition is part-of-whole so the sign is dropped.
    pub value: f64,
    pub label: String,
    /// Fraction of the total, `0.0` when the total is zero.
    pub share: f64,
    pub display_lines: Vec<String>,
    /// Category name cut to fit a small tile.
    pub short_label: String,
}

/// Per-category breakdown for one (year, geo, trade type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionView {
    pub year: i32,
    pub geo: Region,
    pub trade_type: TradeType,
    pub total: f64,
    pub slices: Vec<CompositionSlice>,
    /// Continuous color domain `[min, max]` over slice values.
    pub color_domain: [f64; 2],
}

/// Detail categories only; the rollup row is never part of the breakdown.
pub fn composition(
    table: &TradeTable,
    year: i32,
    geo: &Region,
    trade_type: TradeType,
) -> Result<CompositionView, CoreError> {
    table.ensure_year(year)?;
    table.ensure_geo(geo)?;

    let mut parts = table
        .records()
        .iter()
        .filter(|record| {
            record.year == year
                && &record.geo == geo
                && record.trade == trade_type
                && !record.category.is_rollup()
        })
        .map(|record| (record.category.clone(), record.value.abs()))
        .collect::<Vec<_>>();

    parts.sort_by(|(left_category, left), (right_category, right)| {
        right
            .partial_cmp(left)
            .unwrap_or(Ordering::Equal)
            .then_with(|| left_category.cmp(right_category))
    });

    let total = parts.iter().map(|(_, value)| value).sum::<f64>();
    let color_domain = parts.iter().fold(None, |domain: Option<[f64; 2]>, (_, value)| {
        Some(match domain {
            Some([min, max]) => [min.min(*value), max.max(*value)],
            None => [*value, *value],
        })
    });

    let slices = parts
        .into_iter()
        .map(|(category, value)| CompositionSlice {
            label: format_currency(value),
            share: if total > 0.0 { value / total } else { 0.0 },
            display_lines: wrap_label(category.as_str(), LABEL_WIDTH),
            short_label: truncate_label(category.as_str(), SHORT_LABEL_CHARS),
            category,
            value,
        })
        .collect::<Vec<_>>();

    tracing::debug!(year, geo = %geo, trade = %trade_type, slices = slices.len(), "built composition");

    Ok(CompositionView {
        year,
        geo: geo.clone(),
        trade_type,
        total,
        slices,
        color_domain: color_domain.unwrap_or([0.0, 0.0]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TradeRecord;

    fn record(category: &str, trade: TradeType, value: f64) -> TradeRecord {
        TradeRecord {
            year: 2024,
            geo: Region::canada(),
            category: Category::parse(category).expect("category"),
            trade,
            value,
        }
    }

    fn table() -> TradeTable {
        TradeTable::from_records(vec![
            record("All sections", TradeType::Import, -100.0),
            record("Energy products", TradeType::Import, -60.0),
            record("Consumer goods", TradeType::Import, -20.0),
            record("Aircraft", TradeType::Import, -20.0),
            record("Energy products", TradeType::Export, 90.0),
        ])
        .expect("table")
    }

    #[test]
    fn strips_sign_and_excludes_rollup() {
        let view = composition(&table(), 2024, &Region::canada(), TradeType::Import)
            .expect("composition");

        assert_eq!(view.slices.len(), 3);
        assert!(view.slices.iter().all(|slice| !slice.category.is_rollup()));
        assert!(view.slices.iter().all(|slice| slice.value >= 0.0));
        assert_eq!(view.total, 100.0);
        assert_eq!(view.color_domain, [20.0, 60.0]);
    }

    #[test]
    fn equal_values_are_ordered_by_category_name() {
        let view = composition(&table(), 2024, &Region::canada(), TradeType::Import)
            .expect("composition");
        let names = view
            .slices
            .iter()
            .map(|slice| slice.category.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Energy products", "Aircraft", "Consumer goods"]);
    }

    #[test]
    fn labels_and_shares() {
        let view = composition(&table(), 2024, &Region::canada(), TradeType::Import)
            .expect("composition");
        let energy = &view.slices[0];
        assert_eq!(energy.label, "$60");
        assert!((energy.share - 0.6).abs() < 1e-12);
    }

    #[test]
    fn long_category_names_get_a_short_tile_label() {
        let table = TradeTable::from_records(vec![
            record(
                "Motor vehicles and parts for passenger transport",
                TradeType::Export,
                40.0,
            ),
            record("Energy products", TradeType::Export, 90.0),
        ])
        .expect("table");

        let view =
            composition(&table, 2024, &Region::canada(), TradeType::Export).expect("composition");

        assert_eq!(view.slices[0].short_label, "Energy products");
        let vehicles = &view.slices[1];
        assert_eq!(vehicles.short_label, "Motor vehicles and part…");
        assert_eq!(vehicles.short_label.chars().count(), SHORT_LABEL_CHARS);
        assert!(vehicles.display_lines.len() > 1);
    }

    #[test]
    fn trade_type_without_detail_rows_is_empty_not_error() {
        let view = composition(&table(), 2024, &Region::canada(), TradeType::NetTrade)
            .expect("composition");
        assert!(view.slices.is_empty());
        assert_eq!(view.total, 0.0);
        assert_eq!(view.color_domain, [0.0, 0.0]);
    }
}
