use serde::{Deserialize, Serialize};

use crate::format::format_large_number;
use crate::{Category, CoreError, Region, TradeTable, TradeType};

/// Values shown on the summary cards.
///
/// `imports` keeps the stored negative sign; `net_trade` is read from its own
/// row rather than recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeSummary {
    pub exports: f64,
    pub imports: f64,
    pub net_trade: f64,
}

/// Card labels for a [`TradeSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedSummary {
    pub exports: String,
    pub imports: String,
    pub net_trade: String,
}

/// Summary cards for one (year, geo, category) selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryView {
    pub year: i32,
    pub geo: Region,
    pub category: Category,
    pub values: TradeSummary,
    pub labels: FormattedSummary,
}

impl TradeSummary {
    pub fn formatted(&self) -> FormattedSummary {
        FormattedSummary {
            exports: format_large_number(self.exports),
            imports: format_large_number(self.imports),
            net_trade: format_large_number(self.net_trade),
        }
    }
}

/// Export, import and net trade totals for one (year, geo, category).
pub fn summarize(
    table: &TradeTable,
    year: i32,
    geo: &Region,
    category: &Category,
) -> Result<TradeSummary, CoreError> {
    table.ensure_year(year)?;
    table.ensure_geo(geo)?;
    table.ensure_category(category)?;

    let lookup = |trade: TradeType| {
        table
            .get(year, geo, category, trade)
            .map(|record| record.value)
            .ok_or_else(|| CoreError::NoData {
                year,
                geo: geo.to_string(),
                category: category.to_string(),
                missing: trade.to_string(),
            })
    };

    let summary = TradeSummary {
        exports: lookup(TradeType::Export)?,
        imports: lookup(TradeType::Import)?,
        net_trade: lookup(TradeType::NetTrade)?,
    };

    tracing::debug!(year, geo = %geo, category = %category, "summarized trade");
    Ok(summary)
}

/// [`summarize`] plus the card labels.
pub fn summary_view(
    table: &TradeTable,
    year: i32,
    geo: &Region,
    category: &Category,
) -> Result<SummaryView, CoreError> {
    let values = summarize(table, year, geo, category)?;
    Ok(SummaryView {
        year,
        geo: geo.clone(),
        category: category.clone(),
        labels: values.formatted(),
        values,
    })
}
