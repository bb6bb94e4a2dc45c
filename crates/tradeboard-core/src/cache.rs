//! In-memory memoization of computed views.
//!
//! The dataset never changes while the process runs, so entries have no
//! expiry; a view is a pure function of the filter axes it depends on.

use std::collections::HashMap;
use std::sync::Arc;

use crate::{Category, FilterSelection, Region, TradeType};

/// Defines how a view request interacts with the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheMode {
    /// Read a cached view if present; otherwise compute it and store it. (Default)
    #[default]
    Use,
    /// Always recompute and overwrite the cached entry.
    Refresh,
    /// Always recompute; never read or write the cache.
    Bypass,
}

impl CacheMode {
    pub const fn reads(self) -> bool {
        matches!(self, Self::Use)
    }

    pub const fn writes(self) -> bool {
        !matches!(self, Self::Bypass)
    }
}

/// Filter axes a view depends on. Axes a view ignores stay `None` so that,
/// for example, changing the category does not invalidate the composition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewKey {
    pub year: Option<i32>,
    pub geo: Option<Region>,
    pub category: Option<Category>,
    pub trade_type: Option<TradeType>,
}

impl ViewKey {
    pub fn summary(selection: &FilterSelection) -> Self {
        Self {
            year: Some(selection.year),
            geo: Some(selection.geo.clone()),
            category: Some(selection.category.clone()),
            trade_type: None,
        }
    }

    pub fn composition(selection: &FilterSelection) -> Self {
        Self {
            year: Some(selection.year),
            geo: Some(selection.geo.clone()),
            category: None,
            trade_type: Some(selection.trade_type),
        }
    }

    pub fn trend(selection: &FilterSelection) -> Self {
        Self {
            year: None,
            geo: Some(selection.geo.clone()),
            category: Some(selection.category.clone()),
            trade_type: None,
        }
    }

    pub fn map(selection: &FilterSelection) -> Self {
        Self {
            year: Some(selection.year),
            geo: Some(selection.geo.clone()),
            category: Some(selection.category.clone()),
            trade_type: Some(selection.trade_type),
        }
    }
}

/// Thread-safe cache for one kind of view.
#[derive(Debug)]
pub struct ViewCache<V> {
    inner: Arc<tokio::sync::RwLock<HashMap<ViewKey, V>>>,
}

impl<V> Clone for ViewCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: Clone> Default for ViewCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> ViewCache<V> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(tokio::sync::RwLock::new(HashMap::new())),
        }
    }

    pub async fn get(&self, key: &ViewKey) -> Option<V> {
        let store = self.inner.read().await;
        store.get(key).cloned()
    }

    pub async fn put(&self, key: ViewKey, view: V) {
        let mut store = self.inner.write().await;
        store.insert(key, view);
    }

    pub async fn len(&self) -> usize {
        let store = self.inner.read().await;
        store.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
