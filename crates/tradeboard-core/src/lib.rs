//! Core contracts for tradeboard.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - Clean dataset loading and filter option discovery
//! - The four view aggregators (summary, composition, trend, map)
//! - Response envelope and structured errors
//! - Configuration, view caching and the dashboard render service

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod format;
pub mod geometry;

pub use aggregate::{
    composition, map_data, signed_log, summarize, summary_view, trend, ColorScale,
    CompositionSlice, CompositionView, FormattedSummary, MapContext, MapRegion, MapView,
    NetTradePoint, ScaleKind, SummaryView, TradeSummary, TrendBar, TrendView,
};
pub use cache::{CacheMode, ViewCache, ViewKey};
pub use config::{ConfigError, DashboardConfig, MapOptions, Theme, DEFAULT_GEOMETRY_URL};
pub use dashboard::{Dashboard, DashboardRender, Panel, Rendered};
pub use dataset::{FilterOptions, LoadOptions, LoadReport, TradeTable, REQUIRED_COLUMNS};
pub use domain::{
    normalize_category, Category, FilterSelection, Region, TradeKey, TradeRecord, TradeType,
    CANADA, PROVINCES_AND_TERRITORIES, ROLLUP,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};
pub use error::{CoreError, DataLoadError, FilterField, ValidationError};
pub use geometry::{NoShapes, Shape, ShapeLookup, ShapeSet};
