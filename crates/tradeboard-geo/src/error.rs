use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("boundary download from '{url}' returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("boundary download from '{url}' failed: {message}")]
    Transport { url: String, message: String },

    #[error("boundary file '{source_name}' is not valid JSON: {source}")]
    InvalidJson {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("boundary file '{source_name}' contains no Canadian provinces or territories")]
    NoCanadianFeatures { source_name: String },

    #[error("failed to read cached boundaries '{}': {source}", path.display())]
    CacheRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("boundaries unavailable: download failed ({fetch}); cache unusable ({cache})")]
    Unavailable { fetch: String, cache: String },
}

impl GeoError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Status { .. } | Self::Transport { .. } => "geometry_fetch_failed",
            Self::InvalidJson { .. } | Self::NoCanadianFeatures { .. } => "geometry_invalid",
            Self::CacheRead { .. } => "geometry_cache_error",
            Self::Unavailable { .. } => "geometry_unavailable",
        }
    }
}
