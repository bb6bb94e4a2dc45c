//! Dashboard configuration: file locations, map options and theme colors.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ValidationError;

/// Public Natural Earth admin-1 boundaries, GeoJSON flavour.
pub const DEFAULT_GEOMETRY_URL: &str = "https://raw.githubusercontent.com/nvkelso/natural-earth-vector/master/geojson/ne_50m_admin_1_states_provinces.geojson";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Style constants handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Theme {
    pub header_color: String,
    pub sidebar_color: String,
    pub text_color: String,
    pub export_color: String,
    pub import_color: String,
    /// Deficit, neutral and surplus colors, in that order.
    pub net_trade_diverging_palette: Vec<String>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header_color: String::from("#343A40"),
            sidebar_color: String::from("#FFFFFF"),
            text_color: String::from("black"),
            export_color: String::from("#28A745"),
            import_color: String::from("#DC3545"),
            net_trade_diverging_palette: vec![
                String::from("red"),
                String::from("white"),
                String::from("green"),
            ],
        }
    }
}

impl Theme {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for color in [
            &self.header_color,
            &self.sidebar_color,
            &self.text_color,
            &self.export_color,
            &self.import_color,
        ] {
            validate_color(color)?;
        }

        if self.net_trade_diverging_palette.len() != 3 {
            return Err(ValidationError::InvalidPalette {
                len: self.net_trade_diverging_palette.len(),
            });
        }
        for color in &self.net_trade_diverging_palette {
            validate_color(color)?;
        }
        Ok(())
    }

    pub fn deficit_color(&self) -> &str {
        self.palette_color(0, "red")
    }

    pub fn neutral_color(&self) -> &str {
        self.palette_color(1, "white")
    }

    pub fn surplus_color(&self) -> &str {
        self.palette_color(2, "green")
    }

    fn palette_color<'a>(&'a self, index: usize, fallback: &'a str) -> &'a str {
        self.net_trade_diverging_palette
            .get(index)
            .map_or(fallback, String::as_str)
    }
}

/// Choropleth scale options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapOptions {
    /// Clamp the color domain to this percentile of log values.
    pub clamp_percentile: Option<f64>,
    pub export_scheme: String,
    pub import_scheme: String,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            clamp_percentile: None,
            export_scheme: String::from("greens"),
            import_scheme: String::from("blues"),
        }
    }
}

impl MapOptions {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(value) = self.clamp_percentile {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ValidationError::InvalidPercentile { value });
            }
        }
        Ok(())
    }
}

/// Top-level dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardConfig {
    /// Root directory for tradeboard data and caches.
    pub home: PathBuf,
    /// Clean dataset consumed by the aggregators.
    pub data_path: PathBuf,
    pub geometry_url: String,
    /// Disk copy of the boundary set, used when the fetch fails.
    pub geometry_cache_path: PathBuf,
    pub map: MapOptions,
    pub theme: Theme,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::with_home(resolve_tradeboard_home())
    }
}

impl DashboardConfig {
    /// Defaults rooted at an explicit home directory.
    pub fn with_home(home: PathBuf) -> Self {
        Self {
            data_path: home.join("data").join("clean").join("clean.csv"),
            geometry_cache_path: home.join("cache").join("provinces.geojson"),
            geometry_url: String::from(DEFAULT_GEOMETRY_URL),
            home,
            map: MapOptions::default(),
            theme: Theme::default(),
        }
    }

    /// Read a JSON config file; absent fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let body = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&body).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.map.validate()?;
        self.theme.validate()
    }
}

fn resolve_tradeboard_home() -> PathBuf {
    if let Some(path) = env::var_os("TRADEBOARD_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".tradeboard");
    }

    PathBuf::from(".tradeboard")
}

fn validate_color(value: &str) -> Result<(), ValidationError> {
    let valid = match value.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 6) && hex.chars().all(|ch| ch.is_ascii_hexdigit()),
        None => !value.is_empty() && value.chars().all(|ch| ch.is_ascii_alphabetic()),
    };

    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidColor {
            value: value.to_owned(),
        })
    }
}
