use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{Category, Region, TradeType, ValidationError};

/// One row of the clean dataset.
///
/// Sign convention: exports are non-negative, imports are stored negative and
/// net trade is `export + import`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub year: i32,
    pub geo: Region,
    pub category: Category,
    pub trade: TradeType,
    pub value: f64,
}

impl TradeRecord {
    pub fn key(&self) -> TradeKey {
        TradeKey {
            year: self.year,
            geo: self.geo.clone(),
            category: self.category.clone(),
            trade: self.trade,
        }
    }
}

/// Identity of a record; unique within a loaded table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TradeKey {
    pub year: i32,
    pub geo: Region,
    pub category: Category,
    pub trade: TradeType,
}

impl Display for TradeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} / {} / {} / {}",
            self.year, self.geo, self.category, self.trade
        )
    }
}

/// The four dropdown values of one render request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSelection {
    pub year: i32,
    pub geo: Region,
    pub category: Category,
    pub trade_type: TradeType,
}

impl FilterSelection {
    pub fn new(year: i32, geo: Region, category: Category, trade_type: TradeType) -> Self {
        Self {
            year,
            geo,
            category,
            trade_type,
        }
    }

    /// Build a selection from raw widget strings.
    pub fn parse(
        year: i32,
        geo: &str,
        category: &str,
        trade_type: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            year,
            geo: Region::parse(geo)?,
            category: Category::parse(category)?,
            trade_type: trade_type.parse()?,
        })
    }

    /// Dashboard landing state: whole country, every category, exports.
    pub fn landing(year: i32) -> Self {
        Self::new(year, Region::canada(), Category::rollup(), TradeType::Export)
    }
}
