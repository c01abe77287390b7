//! CLI error type

use std::path::PathBuf;

use crate::error::StorageError;

/// Errors reported by the CLI before or around a driver call
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error("Invalid configuration file {0}: {1}")]
    ConfigError(PathBuf, String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
