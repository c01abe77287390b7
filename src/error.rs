//! Error types for storage operations
//!
//! `StorageError` is the typed failure used inside the crate. At the public
//! driver boundary (`save`, `del`, `has`) it is folded into a failing
//! [`FileResult`](crate::result::FileResult) carrying an [`ErrorKind`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "api-backend")]
use crate::transport::TransportError;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// No payload was attached to the upload
    #[error("uploaded file does not exist")]
    MissingFile,

    /// Upload is larger than its declared maximum
    #[error("uploaded file is too large ({size} bytes, max {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    /// Extension is not in the allow-list
    #[error("uploaded file type is not allowed: {0}")]
    InvalidExtension(String),

    /// Target path is taken and overwriting was not requested
    #[error("file already exists: {0}")]
    DuplicateFile(String),

    /// Driver configuration is unusable for this backend
    #[error("invalid driver configuration: {0}")]
    ConfigInvalid(String),

    /// Path escapes the storage root
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Write/delete/existence check failed at the storage layer
    #[error("storage backend error: {0}")]
    BackendIo(String),

    /// Outbound HTTP failed without a usable response
    #[cfg(feature = "api-backend")]
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Discriminant of a failure, carried by results crossing the driver boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingFile,
    FileTooLarge,
    InvalidExtension,
    DuplicateFile,
    ConfigInvalid,
    PermissionDenied,
    BackendIo,
    Transport,
}

impl StorageError {
    /// Get the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            StorageError::MissingFile => ErrorKind::MissingFile,
            StorageError::FileTooLarge { .. } => ErrorKind::FileTooLarge,
            StorageError::InvalidExtension(_) => ErrorKind::InvalidExtension,
            StorageError::DuplicateFile(_) => ErrorKind::DuplicateFile,
            StorageError::ConfigInvalid(_) => ErrorKind::ConfigInvalid,
            StorageError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            StorageError::BackendIo(_) => ErrorKind::BackendIo,
            #[cfg(feature = "api-backend")]
            StorageError::Transport(_) => ErrorKind::Transport,
        }
    }

    /// Message shown to the caller of a failed operation.
    ///
    /// Validation failures use fixed, short messages; everything else uses
    /// the full error text.
    pub fn user_message(&self) -> String {
        match self {
            StorageError::MissingFile => "uploaded file does not exist".to_string(),
            StorageError::FileTooLarge { .. } => "uploaded file is too large".to_string(),
            StorageError::InvalidExtension(_) => "uploaded file type is not allowed".to_string(),
            StorageError::DuplicateFile(_) => "file already exists".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::BackendIo(err.to_string())
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
