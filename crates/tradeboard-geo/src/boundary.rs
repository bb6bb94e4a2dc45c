//! Province boundary retrieval.
//!
//! Boundaries are downloaded once per process. A successful download is
//! mirrored to disk and that copy is used whenever the network is not.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tradeboard_core::{DashboardConfig, ShapeSet};

use crate::http_client::{HttpClient, HttpRequest};
use crate::retry::RetryPolicy;
use crate::GeoError;

/// Where a [`LoadedBoundaries`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryOrigin {
    Network,
    DiskCache,
}

#[derive(Debug, Clone)]
pub struct LoadedBoundaries {
    pub shapes: ShapeSet,
    pub origin: BoundaryOrigin,
    pub warnings: Vec<String>,
}

/// Location of the boundary file and how hard to try fetching it.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundarySource {
    pub url: String,
    pub cache_path: PathBuf,
    pub retry: RetryPolicy,
    pub timeout_ms: u64,
}

impl BoundarySource {
    pub fn new(url: impl Into<String>, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            cache_path: cache_path.into(),
            retry: RetryPolicy::default(),
            timeout_ms: 10_000,
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(config.geometry_url.clone(), config.geometry_cache_path.clone())
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

pub struct BoundaryLoader<C> {
    client: C,
    source: BoundarySource,
}

impl<C: HttpClient> BoundaryLoader<C> {
    pub fn new(client: C, source: BoundarySource) -> Self {
        Self { client, source }
    }

    pub fn source(&self) -> &BoundarySource {
        &self.source
    }

    /// Download the boundaries, falling back to the disk copy.
    pub async fn load(&self) -> Result<LoadedBoundaries, GeoError> {
        let fetch_error = match self.load_remote().await {
            Ok(loaded) => return Ok(loaded),
            Err(error) => error,
        };

        tracing::warn!(url = %self.source.url, error = %fetch_error, "boundary download failed, trying disk cache");
        match self.load_cached() {
            Ok(mut loaded) => {
                loaded
                    .warnings
                    .push(format!("using cached boundaries: {fetch_error}"));
                Ok(loaded)
            }
            Err(cache_error) => Err(GeoError::Unavailable {
                fetch: fetch_error.to_string(),
                cache: cache_error.to_string(),
            }),
        }
    }

    /// Read only the disk copy; never touches the network.
    pub fn load_cached(&self) -> Result<LoadedBoundaries, GeoError> {
        let path = &self.source.cache_path;
        let body = fs::read_to_string(path).map_err(|source| GeoError::CacheRead {
            path: path.clone(),
            source,
        })?;
        let shapes = parse_boundaries(&body, &path.display().to_string())?;
        tracing::debug!(path = %path.display(), regions = shapes.len(), "loaded cached boundaries");

        Ok(LoadedBoundaries {
            warnings: missing_warnings(&shapes),
            shapes,
            origin: BoundaryOrigin::DiskCache,
        })
    }

    async fn load_remote(&self) -> Result<LoadedBoundaries, GeoError> {
        let body = self.fetch().await?;
        let shapes = parse_boundaries(&body, &self.source.url)?;
        let mut warnings = missing_warnings(&shapes);

        if let Err(error) = write_cache(&self.source.cache_path, &body) {
            tracing::warn!(path = %self.source.cache_path.display(), error = %error, "failed to write boundary cache");
            warnings.push(format!(
                "boundary cache '{}' not updated: {error}",
                self.source.cache_path.display()
            ));
        }

        tracing::info!(url = %self.source.url, regions = shapes.len(), "downloaded boundaries");
        Ok(LoadedBoundaries {
            shapes,
            origin: BoundaryOrigin::Network,
            warnings,
        })
    }

    async fn fetch(&self) -> Result<String, GeoError> {
        let url = &self.source.url;
        let retry = &self.source.retry;
        let mut attempt = 0;

        loop {
            let request = HttpRequest::get(url.clone()).with_timeout_ms(self.source.timeout_ms);
            let (error, retryable) = match self.client.execute(request).await {
                Ok(response) if response.is_success() => return Ok(response.body),
                Ok(response) => (
                    GeoError::Status {
                        url: url.clone(),
                        status: response.status,
                    },
                    retry.should_retry_status(response.status),
                ),
                Err(error) => (
                    GeoError::Transport {
                        url: url.clone(),
                        message: error.message().to_owned(),
                    },
                    error.retryable(),
                ),
            };

            if !retryable || attempt >= retry.max_retries {
                return Err(error);
            }

            let delay = retry.delay_for_attempt(attempt);
            tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, error = %error, "retrying boundary download");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

fn parse_boundaries(body: &str, source_name: &str) -> Result<ShapeSet, GeoError> {
    let collection: serde_json::Value =
        serde_json::from_str(body).map_err(|source| GeoError::InvalidJson {
            source_name: source_name.to_owned(),
            source,
        })?;

    let shapes = ShapeSet::from_geojson(&collection);
    if shapes.is_empty() {
        return Err(GeoError::NoCanadianFeatures {
            source_name: source_name.to_owned(),
        });
    }
    Ok(shapes)
}

fn missing_warnings(shapes: &ShapeSet) -> Vec<String> {
    shapes
        .missing_regions()
        .into_iter()
        .map(|region| format!("no boundary for {region}; it will not be drawn"))
        .collect()
}

fn write_cache(path: &Path, body: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, body)
}
