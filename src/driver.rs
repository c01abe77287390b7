//! Storage driver contract
//!
//! Defines the `StorageDriver` trait implemented by every backend:
//! - LocalDriver: native file system
//! - RemoteDriver: object store reachable over HTTP
//! - MemoryDriver: in-process map

use serde_json::Value;

use crate::config::{ConfigOverrides, DriverConfig};
use crate::error::StorageError;
use crate::file::FileObject;
use crate::result::FileResult;
use crate::validation;

/// Trait for storage drivers
///
/// Public operations never return `Err`: failures are reported through a
/// failing [`FileResult`]. Only configuration changes, which happen at
/// construction time, surface a typed error.
pub trait StorageDriver {
    /// Current configuration
    fn config(&self) -> &DriverConfig;

    /// Mutable access to the configuration, used by [`set_config`](Self::set_config)
    fn config_mut(&mut self) -> &mut DriverConfig;

    /// Upload attached by [`set_file_object`](Self::set_file_object)
    fn file_object(&self) -> Option<&FileObject>;

    /// Attach the upload the next `save` will write
    ///
    /// Nothing is validated here; validation happens inside `save`.
    fn set_file_object(&mut self, file: FileObject);

    /// Check that the stored configuration is usable by this backend
    fn check_config(&self) -> Result<(), StorageError>;

    /// Validate and write the attached upload
    ///
    /// Implementations must call [`before_save`](Self::before_save) first and
    /// return its result unchanged when it fails.
    fn save(&mut self) -> FileResult;

    /// Delete the file at `path`
    ///
    /// Deleting an absent file succeeds with `exists == false`.
    fn del(&self, path: &str) -> FileResult;

    /// Probe whether a file exists at `path`
    fn has(&self, path: &str) -> FileResult;

    /// Merge configuration overrides, then re-check the configuration
    fn set_config(&mut self, overrides: ConfigOverrides) -> Result<(), StorageError> {
        self.config_mut().merge(overrides);
        self.check_config()
    }

    fn get_config(&self) -> &DriverConfig {
        self.config()
    }

    fn get_config_value(&self, key: &str) -> Option<Value> {
        self.config().get(key)
    }

    fn get_config_or(&self, key: &str, default: Value) -> Value {
        self.config().get_or(key, default)
    }

    /// Run the shared validation pipeline against the attached upload
    fn before_save(&self) -> FileResult {
        validation::before_save(self)
    }

    /// Public link for a stored path
    fn file_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config().domain.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
