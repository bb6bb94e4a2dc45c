//! # Domain Models
//!
//! Canonical domain types for the trade dataset.
//!
//! Every filter axis has a validated type so the aggregators only ever see
//! canonical values:
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Region`] | Province/territory or `Canada`, with the `Quebec` alias resolved |
//! | [`Category`] | Goods/services classification compared case-insensitively |
//! | [`TradeType`] | `Export`, `Import` or `Net trade` |
//! | [`TradeRecord`] | One row of the clean dataset |
//! | [`FilterSelection`] | The four dropdown values of a render request |

mod category;
mod record;
mod region;
mod trade_type;

pub use category::{normalize_category, Category, ROLLUP};
pub use record::{FilterSelection, TradeKey, TradeRecord};
pub use region::{Region, CANADA, PROVINCES_AND_TERRITORIES};
pub use trade_type::TradeType;
