use serde::{Deserialize, Serialize};

use crate::format::format_millions;
use crate::{Category, CoreError, Region, Theme, TradeTable, TradeType};

/// Line color of the net-trade overlay.
pub const NET_TRADE_LINE_COLOR: &str = "black";

/// One export or import bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendBar {
    pub year: i32,
    pub trade_type: TradeType,
    pub value: f64,
    pub color: String,
}

/// One point of the net-trade overlay, colored by sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetTradePoint {
    pub year: i32,
    pub value: f64,
    pub color: String,
    pub axis_label: String,
}

/// Multi-year series for one (geo, category).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendView {
    pub geo: Region,
    pub category: Category,
    pub series: Vec<TrendBar>,
    pub net_trade_line: Vec<NetTradePoint>,
    pub line_color: String,
}

/// Export/import bars by year plus the separately read net-trade line.
pub fn trend(
    table: &TradeTable,
    geo: &Region,
    category: &Category,
    theme: &Theme,
) -> Result<TrendView, CoreError> {
    table.ensure_geo(geo)?;
    table.ensure_category(category)?;

    let matching = table
        .records()
        .iter()
        .filter(|record| &record.geo == geo && &record.category == category);

    let mut series = Vec::new();
    let mut net_trade_line = Vec::new();
    for record in matching {
        match record.trade {
            TradeType::Export | TradeType::Import => series.push(TrendBar {
                year: record.year,
                trade_type: record.trade,
                value: record.value,
                color: bar_color(record.trade, theme).to_owned(),
            }),
            TradeType::NetTrade => net_trade_line.push(NetTradePoint {
                year: record.year,
                value: record.value,
                color: sign_color(record.value, theme).to_owned(),
                axis_label: format_millions(record.value),
            }),
        }
    }

    series.sort_by_key(|bar| (bar.year, bar.trade_type));
    net_trade_line.sort_by_key(|point| point.year);

    tracing::debug!(geo = %geo, category = %category, bars = series.len(), "built trend");

    Ok(TrendView {
        geo: geo.clone(),
        category: category.clone(),
        series,
        net_trade_line,
        line_color: String::from(NET_TRADE_LINE_COLOR),
    })
}

fn bar_color(trade: TradeType, theme: &Theme) -> &str {
    match trade {
        TradeType::Import => &theme.import_color,
        _ => &theme.export_color,
    }
}

fn sign_color(value: f64, theme: &Theme) -> &str {
    if value > 0.0 {
        theme.surplus_color()
    } else if value < 0.0 {
        theme.deficit_color()
    } else {
        theme.neutral_color()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TradeRecord;

    fn record(year: i32, trade: TradeType, value: f64) -> TradeRecord {
        TradeRecord {
            year,
            geo: Region::parse("Ontario").expect("region"),
            category: Category::rollup(),
            trade,
            value,
        }
    }

    fn table() -> TradeTable {
        TradeTable::from_records(vec![
            record(2024, TradeType::NetTrade, -10.0),
            record(2024, TradeType::Import, -40.0),
            record(2024, TradeType::Export, 30.0),
            record(2023, TradeType::Import, -20.0),
            record(2023, TradeType::Export, 50.0),
            record(2023, TradeType::NetTrade, 30.0),
        ])
        .expect("table")
    }

    #[test]
    fn bars_are_year_ascending_with_export_first() {
        let ontario = Region::parse("Ontario").expect("region");
        let view = trend(&table(), &ontario, &Category::rollup(), &Theme::default())
            .expect("trend");

        let order = view
            .series
            .iter()
            .map(|bar| (bar.year, bar.trade_type))
            .collect::<Vec<_>>();
        assert_eq!(
            order,
            vec![
                (2023, TradeType::Export),
                (2023, TradeType::Import),
                (2024, TradeType::Export),
                (2024, TradeType::Import),
            ]
        );
        assert!(view.series.iter().all(|bar| bar.trade_type.is_flow()));
    }

    #[test]
    fn net_trade_points_are_colored_by_sign() {
        let ontario = Region::parse("Ontario").expect("region");
        let theme = Theme::default();
        let view = trend(&table(), &ontario, &Category::rollup(), &theme).expect("trend");

        assert_eq!(view.net_trade_line.len(), 2);
        assert_eq!(view.net_trade_line[0].year, 2023);
        assert_eq!(view.net_trade_line[0].color, theme.surplus_color());
        assert_eq!(view.net_trade_line[1].color, theme.deficit_color());
        assert_eq!(view.line_color, "black");
    }

    #[test]
    fn bars_use_trade_type_colors() {
        let ontario = Region::parse("Ontario").expect("region");
        let theme = Theme::default();
        let view = trend(&table(), &ontario, &Category::rollup(), &theme).expect("trend");
        assert_eq!(view.series[0].color, theme.export_color);
        assert_eq!(view.series[1].color, theme.import_color);
    }
}
