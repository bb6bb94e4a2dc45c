use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation and contract errors exposed by `tradeboard-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("invalid trade type '{value}', expected one of Export, Import, Net trade")]
    InvalidTradeType { value: String },
    #[error("unknown province/territory '{value}'")]
    UnknownRegion { value: String },
    #[error("category cannot be empty")]
    EmptyCategory,
    #[error("unknown dashboard panel '{value}', expected one of summary, composition, trend, map")]
    UnknownPanel { value: String },

    #[error("color '{value}' must be a CSS color name or #RGB/#RRGGBB hex")]
    InvalidColor { value: String },
    #[error("diverging palette needs exactly 3 colors, got {len}")]
    InvalidPalette { len: usize },
    #[error("clamp percentile must be within (0, 1], got {value}")]
    InvalidPercentile { value: f64 },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Failure to read or parse the clean dataset. Fatal at startup.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to open dataset '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("dataset '{source_name}' contains no data rows")]
    Empty { source_name: String },

    #[error("dataset is missing required column(s): {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("line {line}: {message}")]
    InvalidRow { line: u64, message: String },

    #[error("line {line}: duplicate record for {key}")]
    DuplicateRecord { line: u64, key: String },
}

/// Filter axis named by an [`CoreError::UnknownFilterValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Year,
    Geo,
    Category,
    TradeType,
}

impl FilterField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Geo => "geo",
            Self::Category => "category",
            Self::TradeType => "trade_type",
        }
    }
}

impl Display for FilterField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    DataLoad(#[from] DataLoadError),

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error("no data for {year} / {geo} / {category}: missing {missing}")]
    NoData {
        year: i32,
        geo: String,
        category: String,
        missing: String,
    },

    #[error("{field} '{value}' is not present in the dataset")]
    UnknownFilterValue { field: FilterField, value: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Stable machine-readable code used in envelopes.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "invalid_input",
            Self::DataLoad(_) => "data_load_error",
            Self::Config(_) => "config_error",
            Self::NoData { .. } => "no_data",
            Self::UnknownFilterValue { .. } => "unknown_filter_value",
            Self::Serialization(_) => "serialization_error",
        }
    }

    /// Whether the rendering layer can show a placeholder and carry on.
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NoData { .. } | Self::UnknownFilterValue { .. } | Self::Validation(_)
        )
    }
}
