use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::geometry::ShapeLookup;
use crate::{Category, CoreError, MapOptions, Region, Theme, TradeTable, TradeType};

/// Choropleth color scale family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleKind {
    Diverging,
    Sequential,
}

/// Color scale shared by every region drawn in one map render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScale {
    pub kind: ScaleKind,
    /// `[-m, 0, m]` for diverging scales, `[min, max]` for sequential ones.
    pub domain: Vec<f64>,
    /// Explicit colors, set for diverging scales.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Vec<String>>,
    /// Named scheme, set for sequential scales.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
}

/// One province/territory on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapRegion {
    pub geo: Region,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_id: Option<String>,
    /// Dataset value; imports are already made non-negative.
    pub raw_value: f64,
    pub log_value: f64,
    /// `false` when the region had no row and was filled with zero.
    pub has_data: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub year: i32,
    pub trade_type: TradeType,
    pub category: Category,
    pub geo_filter: Region,
    pub title: String,
    pub regions: Vec<MapRegion>,
    pub color_scale: ColorScale,
}

/// Rendering inputs for [`map_data`] that do not come from the filters.
#[derive(Clone, Copy)]
pub struct MapContext<'a> {
    pub shapes: &'a dyn ShapeLookup,
    pub options: &'a MapOptions,
    pub theme: &'a Theme,
}

/// Sign-preserving `log10(|v| + 1)`; zero maps to zero.
pub fn signed_log(value: f64) -> f64 {
    if value == 0.0 {
        return 0.0;
    }
    value.signum() * (value.abs() + 1.0).log10()
}

/// Per-province values for a choropleth of one (year, trade type, category).
///
/// Every province and territory is joined, missing ones at zero. The color
/// scale is computed over all of them and kept when `geo_filter` narrows the
/// regions to a single province, so a one-province view is colored against
/// the national spread.
pub fn map_data(
    table: &TradeTable,
    year: i32,
    trade_type: TradeType,
    category: &Category,
    geo_filter: &Region,
    context: MapContext<'_>,
) -> Result<MapView, CoreError> {
    table.ensure_year(year)?;
    table.ensure_category(category)?;

    let mut regions = Region::provinces()
        .map(|geo| {
            let found = table.get(year, &geo, category, trade_type).map(|record| record.value);
            let raw_value = match (trade_type, found) {
                (TradeType::Import, Some(value)) => value.abs(),
                (_, Some(value)) => value,
                (_, None) => 0.0,
            };
            MapRegion {
                shape_id: context.shapes.shape_id(&geo).map(str::to_owned),
                log_value: signed_log(raw_value),
                has_data: found.is_some(),
                raw_value,
                geo,
            }
        })
        .collect::<Vec<_>>();

    let missing = regions.iter().filter(|region| !region.has_data).count();
    if missing > 0 {
        tracing::debug!(year, trade = %trade_type, category = %category, missing, "filled regions without data with zero");
    }

    let log_values = regions.iter().map(|region| region.log_value).collect::<Vec<_>>();
    let color_scale = color_scale(trade_type, &log_values, context.options, context.theme);

    if !geo_filter.is_canada() {
        regions.retain(|region| &region.geo == geo_filter);
    }

    Ok(MapView {
        year,
        trade_type,
        title: format!("Trade Flow: {trade_type} in {year} ({category})"),
        category: category.clone(),
        geo_filter: geo_filter.clone(),
        regions,
        color_scale,
    })
}

fn color_scale(
    trade_type: TradeType,
    log_values: &[f64],
    options: &MapOptions,
    theme: &Theme,
) -> ColorScale {
    match trade_type {
        TradeType::NetTrade => {
            let magnitudes = log_values.iter().map(|value| value.abs()).collect::<Vec<_>>();
            let bound = match options.clamp_percentile {
                Some(percentile) => percentile_of(&magnitudes, percentile),
                None => max_of(&magnitudes),
            };
            ColorScale {
                kind: ScaleKind::Diverging,
                domain: vec![-bound, 0.0, bound],
                range: Some(theme.net_trade_diverging_palette.to_vec()),
                scheme: None,
            }
        }
        TradeType::Export | TradeType::Import => {
            let min = log_values.iter().copied().fold(f64::INFINITY, f64::min);
            let upper = match options.clamp_percentile {
                Some(percentile) => percentile_of(log_values, percentile),
                None => max_of(log_values),
            };
            let scheme = if trade_type == TradeType::Export {
                &options.export_scheme
            } else {
                &options.import_scheme
            };
            ColorScale {
                kind: ScaleKind::Sequential,
                domain: vec![if min.is_finite() { min } else { 0.0 }, upper],
                range: None,
                scheme: Some(scheme.clone()),
            }
        }
    }
}

fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(0.0, f64::max)
}

/// Nearest-rank percentile; `percentile` is a fraction in `(0, 1]`.
fn percentile_of(values: &[f64], percentile: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|left, right| left.partial_cmp(right).unwrap_or(Ordering::Equal));
    let rank = (percentile * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::NoShapes;
    use crate::TradeRecord;

    fn record(geo: &str, trade: TradeType, value: f64) -> TradeRecord {
        TradeRecord {
            year: 2024,
            geo: Region::parse(geo).expect("region"),
            category: Category::rollup(),
            trade,
            value,
        }
    }

    fn context<'a>(options: &'a MapOptions, theme: &'a Theme) -> MapContext<'a> {
        MapContext {
            shapes: &NoShapes,
            options,
            theme,
        }
    }

    #[test]
    fn signed_log_preserves_sign_and_zero() {
        assert_eq!(signed_log(0.0), 0.0);
        assert!((signed_log(999.0) - 3.0).abs() < 1e-12);
        assert!((signed_log(-999.0) + 3.0).abs() < 1e-12);
    }

    #[test]
    fn imports_are_made_positive_before_transform() {
        let table = TradeTable::from_records(vec![record("Ontario", TradeType::Import, -99.0)])
            .expect("table");
        let (options, theme) = (MapOptions::default(), Theme::default());
        let view = map_data(
            &table,
            2024,
            TradeType::Import,
            &Category::rollup(),
            &Region::canada(),
            context(&options, &theme),
        )
        .expect("map");

        let ontario = view
            .regions
            .iter()
            .find(|region| region.geo.as_str() == "Ontario")
            .expect("ontario");
        assert_eq!(ontario.raw_value, 99.0);
        assert!((ontario.log_value - 2.0).abs() < 1e-12);
        assert_eq!(view.color_scale.scheme.as_deref(), Some("blues"));
    }

    #[test]
    fn net_trade_domain_is_symmetric_around_zero() {
        let table = TradeTable::from_records(vec![
            record("Ontario", TradeType::NetTrade, 999.0),
            record("Alberta", TradeType::NetTrade, -9_999.0),
        ])
        .expect("table");
        let (options, theme) = (MapOptions::default(), Theme::default());
        let view = map_data(
            &table,
            2024,
            TradeType::NetTrade,
            &Category::rollup(),
            &Region::canada(),
            context(&options, &theme),
        )
        .expect("map");

        assert_eq!(view.color_scale.kind, ScaleKind::Diverging);
        assert_eq!(view.color_scale.domain.len(), 3);
        assert!((view.color_scale.domain[0] + 4.0).abs() < 1e-12);
        assert_eq!(view.color_scale.domain[1], 0.0);
        assert!((view.color_scale.domain[2] - 4.0).abs() < 1e-12);
        assert_eq!(
            view.color_scale.range.as_deref(),
            Some(theme.net_trade_diverging_palette.as_slice())
        );
    }

    #[test]
    fn percentile_clamp_narrows_sequential_domain() {
        let mut records = Region::provinces()
            .map(|geo| TradeRecord {
                year: 2024,
                geo,
                category: Category::rollup(),
                trade: TradeType::Export,
                value: 9.0,
            })
            .collect::<Vec<_>>();
        records[0].value = 999_999.0;
        let table = TradeTable::from_records(records).expect("table");

        let options = MapOptions {
            clamp_percentile: Some(0.9),
            ..MapOptions::default()
        };
        let theme = Theme::default();
        let view = map_data(
            &table,
            2024,
            TradeType::Export,
            &Category::rollup(),
            &Region::canada(),
            context(&options, &theme),
        )
        .expect("map");

        assert!((view.color_scale.domain[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn title_names_the_selection() {
        let table = TradeTable::from_records(vec![record("Ontario", TradeType::Export, 1.0)])
            .expect("table");
        let (options, theme) = (MapOptions::default(), Theme::default());
        let view = map_data(
            &table,
            2024,
            TradeType::Export,
            &Category::rollup(),
            &Region::canada(),
            context(&options, &theme),
        )
        .expect("map");
        assert_eq!(view.title, "Trade Flow: Export in 2024 (All sections)");
    }
}
