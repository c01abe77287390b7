//! Operation result returned across the driver boundary

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, StorageError};

/// Outcome of `save`, `del`, `has` and the validation pipeline
///
/// For `has`, `success` only says the probe ran; `exists` carries the answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileResult {
    pub success: bool,
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    #[serde(default)]
    pub exists: bool,
    /// Storage-relative path of the file the operation touched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Public link to the stored file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl FileResult {
    /// Create a successful result
    pub fn ok(msg: impl Into<String>) -> Self {
        Self {
            success: true,
            msg: msg.into(),
            kind: None,
            exists: false,
            path: None,
            url: None,
        }
    }

    /// Create a failed result from an error
    pub fn failure(err: &StorageError) -> Self {
        Self {
            success: false,
            msg: err.user_message(),
            kind: Some(err.kind()),
            exists: false,
            path: None,
            url: None,
        }
    }

    /// Result of an existence probe that ran
    pub fn existence(path: impl Into<String>, exists: bool) -> Self {
        let msg = if exists { "file exists" } else { "file not found" };
        Self::ok(msg).with_path(path).with_exists(exists)
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_exists(mut self, exists: bool) -> Self {
        self.exists = exists;
        self
    }

    /// Check whether this result failed with the given kind
    pub fn is_kind(&self, kind: ErrorKind) -> bool {
        self.kind == Some(kind)
    }
}

impl From<StorageError> for FileResult {
    fn from(err: StorageError) -> Self {
        FileResult::failure(&err)
    }
}
