//! Render service tying the dataset, boundary set and view caches together.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::aggregate::{
    composition, map_data, summary_view, trend, CompositionView, MapContext, MapView, SummaryView,
    TrendView,
};
use crate::cache::{CacheMode, ViewCache, ViewKey};
use crate::geometry::ShapeSet;
use crate::{
    CoreError, DashboardConfig, FilterOptions, FilterSelection, MapOptions, Theme, TradeTable,
    ValidationError,
};

/// One panel of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    Summary,
    Composition,
    Trend,
    Map,
}

impl Panel {
    pub const ALL: [Self; 4] = [Self::Summary, Self::Composition, Self::Trend, Self::Map];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Composition => "composition",
            Self::Trend => "trend",
            Self::Map => "map",
        }
    }
}

impl Display for Panel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Panel {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|panel| panel.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ValidationError::UnknownPanel {
                value: value.to_owned(),
            })
    }
}

/// A computed view and whether it came from the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered<T> {
    pub view: T,
    pub cache_hit: bool,
}

/// Outcome of one full dashboard render. Each panel fails on its own.
#[derive(Debug)]
pub struct DashboardRender {
    pub selection: FilterSelection,
    pub summary: Result<Rendered<SummaryView>, CoreError>,
    pub composition: Result<Rendered<CompositionView>, CoreError>,
    pub trend: Result<Rendered<TrendView>, CoreError>,
    pub map: Result<Rendered<MapView>, CoreError>,
}

impl DashboardRender {
    /// True when every successful panel was served from the cache.
    pub fn cache_hit(&self) -> bool {
        let hits = [
            self.summary.as_ref().map(|rendered| rendered.cache_hit).ok(),
            self.composition.as_ref().map(|rendered| rendered.cache_hit).ok(),
            self.trend.as_ref().map(|rendered| rendered.cache_hit).ok(),
            self.map.as_ref().map(|rendered| rendered.cache_hit).ok(),
        ];
        let served = hits.iter().flatten().collect::<Vec<_>>();
        !served.is_empty() && served.into_iter().all(|hit| *hit)
    }

    pub fn failures(&self) -> Vec<(Panel, &CoreError)> {
        [
            (Panel::Summary, self.summary.as_ref().err()),
            (Panel::Composition, self.composition.as_ref().err()),
            (Panel::Trend, self.trend.as_ref().err()),
            (Panel::Map, self.map.as_ref().err()),
        ]
        .into_iter()
        .filter_map(|(panel, error)| error.map(|error| (panel, error)))
        .collect()
    }
}

/// Shared, cheaply clonable render service.
#[derive(Debug, Clone)]
pub struct Dashboard {
    table: Arc<TradeTable>,
    shapes: Arc<ShapeSet>,
    map_options: MapOptions,
    theme: Theme,
    summaries: ViewCache<SummaryView>,
    compositions: ViewCache<CompositionView>,
    trends: ViewCache<TrendView>,
    maps: ViewCache<MapView>,
}

impl Dashboard {
    pub fn new(table: TradeTable, shapes: ShapeSet, config: &DashboardConfig) -> Self {
        Self {
            table: Arc::new(table),
            shapes: Arc::new(shapes),
            map_options: config.map.clone(),
            theme: config.theme.clone(),
            summaries: ViewCache::new(),
            compositions: ViewCache::new(),
            trends: ViewCache::new(),
            maps: ViewCache::new(),
        }
    }

    pub fn table(&self) -> &TradeTable {
        &self.table
    }

    pub fn shapes(&self) -> &ShapeSet {
        &self.shapes
    }

    pub fn filter_options(&self) -> FilterOptions {
        self.table.filter_options()
    }

    /// Landing selection: latest year, Canada, all sections, exports.
    pub fn landing_selection(&self) -> Option<FilterSelection> {
        self.table
            .distinct_years()
            .first()
            .map(|year| FilterSelection::landing(*year))
    }

    pub async fn summary(
        &self,
        selection: &FilterSelection,
        mode: CacheMode,
    ) -> Result<Rendered<SummaryView>, CoreError> {
        cached(&self.summaries, ViewKey::summary(selection), mode, || {
            summary_view(
                &self.table,
                selection.year,
                &selection.geo,
                &selection.category,
            )
        })
        .await
    }

    pub async fn composition(
        &self,
        selection: &FilterSelection,
        mode: CacheMode,
    ) -> Result<Rendered<CompositionView>, CoreError> {
        cached(&self.compositions, ViewKey::composition(selection), mode, || {
            composition(
                &self.table,
                selection.year,
                &selection.geo,
                selection.trade_type,
            )
        })
        .await
    }

    pub async fn trend(
        &self,
        selection: &FilterSelection,
        mode: CacheMode,
    ) -> Result<Rendered<TrendView>, CoreError> {
        cached(&self.trends, ViewKey::trend(selection), mode, || {
            trend(&self.table, &selection.geo, &selection.category, &self.theme)
        })
        .await
    }

    pub async fn map(
        &self,
        selection: &FilterSelection,
        mode: CacheMode,
    ) -> Result<Rendered<MapView>, CoreError> {
        let context = MapContext {
            shapes: self.shapes.as_ref(),
            options: &self.map_options,
            theme: &self.theme,
        };
        cached(&self.maps, ViewKey::map(selection), mode, || {
            map_data(
                &self.table,
                selection.year,
                selection.trade_type,
                &selection.category,
                &selection.geo,
                context,
            )
        })
        .await
    }

    /// Compute all four panels for one filter change.
    ///
    /// The panels are polled on the caller's task; the aggregators are
    /// synchronous, so they run in sequence. A failing panel does not stop
    /// the others.
    pub async fn render(&self, selection: &FilterSelection, mode: CacheMode) -> DashboardRender {
        let (summary, composition, trend, map) = tokio::join!(
            self.summary(selection, mode),
            self.composition(selection, mode),
            self.trend(selection, mode),
            self.map(selection, mode),
        );

        let render = DashboardRender {
            selection: selection.clone(),
            summary,
            composition,
            trend,
            map,
        };

        for (panel, error) in render.failures() {
            tracing::warn!(panel = %panel, code = error.code(), error = %error, "panel failed to render");
        }

        render
    }
}

async fn cached<V: Clone>(
    cache: &ViewCache<V>,
    key: ViewKey,
    mode: CacheMode,
    compute: impl FnOnce() -> Result<V, CoreError>,
) -> Result<Rendered<V>, CoreError> {
    if mode.reads() {
        if let Some(view) = cache.get(&key).await {
            return Ok(Rendered {
                view,
                cache_hit: true,
            });
        }
    }

    let view = compute()?;
    if mode.writes() {
        cache.put(key, view.clone()).await;
    }

    Ok(Rendered {
        view,
        cache_hit: false,
    })
}
