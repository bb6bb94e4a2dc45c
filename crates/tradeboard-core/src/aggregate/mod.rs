//! View aggregators.
//!
//! Each function reads the immutable [`crate::TradeTable`] and returns a
//! render-ready structure for one dashboard panel.

mod composition;
mod map;
mod summary;
mod trend;

pub use composition::{composition, CompositionSlice, CompositionView};
pub use map::{map_data, signed_log, ColorScale, MapContext, MapRegion, MapView, ScaleKind};
pub use summary::{summarize, summary_view, FormattedSummary, SummaryView, TradeSummary};
pub use trend::{trend, NetTradePoint, TrendBar, TrendView, NET_TRADE_LINE_COLOR};
