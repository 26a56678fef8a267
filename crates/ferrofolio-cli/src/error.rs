use ferrofolio_core::{ConfigError, ConvertError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ferrofolio_core::ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Config(_) => 2,
            Self::Convert(error) => match error {
                ConvertError::Config(_) => 2,
                ConvertError::Parse(_) => 3,
                ConvertError::UnknownFormat => 4,
                ConvertError::Remote(_) => 5,
                ConvertError::Busy => 6,
            },
            Self::Read { .. } | Self::Serialization(_) | Self::Io(_) => 10,
        }
    }
}
