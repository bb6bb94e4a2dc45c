use thiserror::Error;
use tradeboard_core::CoreError;

use crate::prepare::PrepareError;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] tradeboard_core::ValidationError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Prepare(#[from] PrepareError),

    #[error("dataset has no years to select from")]
    EmptySelection,

    #[error("strict mode failed: warnings={warning_count}, errors={error_count}")]
    StrictModeViolation {
        warning_count: usize,
        error_count: usize,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<tradeboard_core::DataLoadError> for CliError {
    fn from(error: tradeboard_core::DataLoadError) -> Self {
        Self::Core(CoreError::DataLoad(error))
    }
}

impl From<tradeboard_core::ConfigError> for CliError {
    fn from(error: tradeboard_core::ConfigError) -> Self {
        Self::Core(CoreError::Config(error))
    }
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Core(error) => match error {
                CoreError::Validation(_)
                | CoreError::UnknownFilterValue { .. }
                | CoreError::Config(_) => 2,
                CoreError::NoData { .. } => 3,
                CoreError::DataLoad(_) => 4,
                CoreError::Serialization(_) => 10,
            },
            Self::Prepare(_) | Self::EmptySelection => 4,
            Self::StrictModeViolation { .. } => 5,
            Self::Serialization(_) | Self::Io(_) => 10,
        }
    }
}
