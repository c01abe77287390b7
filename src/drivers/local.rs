//! Local file system driver
//!
//! Stores uploads below `save_path` on the native file system.
//!
//! ## Security
//!
//! All path operations are validated to prevent path traversal attacks.
//! Paths containing ".." are rejected, and all resolved paths are verified
//! to remain within `save_path`.

use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{ConfigOverrides, DriverConfig};
use crate::driver::StorageDriver;
use crate::error::StorageError;
use crate::file::FileObject;
use crate::result::FileResult;

/// File system storage driver
#[derive(Debug, Clone)]
pub struct LocalDriver {
    config: DriverConfig,
    file: Option<FileObject>,
}

impl LocalDriver {
    /// Create a new local driver
    ///
    /// # Arguments
    ///
    /// * `overrides` - configuration; `save_path` is required
    ///
    /// # Example
    ///
    /// ```rust
    /// use storage_drivers::{ConfigOverrides, LocalDriver, StorageDriver};
    ///
    /// let dir = std::env::temp_dir();
    /// let driver = LocalDriver::new(
    ///     ConfigOverrides::new()
    ///         .with_domain("https://files.example.com")
    ///         .with_save_path(dir.to_string_lossy()),
    /// )
    /// .unwrap();
    /// assert!(driver.has("surely/not/here.txt").success);
    /// ```
    pub fn new(overrides: ConfigOverrides) -> Result<Self, StorageError> {
        let mut driver = Self {
            config: DriverConfig::default(),
            file: None,
        };
        if overrides.is_empty() {
            driver.check_config()?;
        } else {
            driver.set_config(overrides)?;
        }
        Ok(driver)
    }

    fn base_path(&self) -> PathBuf {
        PathBuf::from(&self.config.save_path)
    }

    /// Resolve a path relative to `save_path` with security checks.
    ///
    /// # Security
    ///
    /// - Rejects paths containing ".." components
    /// - Verifies the resolved path stays within `save_path`
    /// - Handles both existing and non-existing paths safely
    fn resolve_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        let normalized = path.replace('\\', "/");
        let normalized = normalized.trim_start_matches('/');

        if normalized.is_empty() {
            return Err(StorageError::PermissionDenied(
                "Empty path not allowed".to_string(),
            ));
        }

        if normalized.split('/').any(|segment| segment == "..") {
            return Err(StorageError::PermissionDenied(
                "Path traversal (..) not allowed".to_string(),
            ));
        }

        let base = self.base_path();
        let full = base.join(normalized);

        if full
            .components()
            .any(|component| matches!(component, Component::ParentDir))
        {
            return Err(StorageError::PermissionDenied(
                "Path traversal not allowed".to_string(),
            ));
        }

        // The nearest existing ancestor below the base must canonicalize
        // inside it, which catches symlinks pointing elsewhere
        let probe = full
            .ancestors()
            .take_while(|ancestor| ancestor.starts_with(&base))
            .find(|ancestor| fs::symlink_metadata(ancestor).is_ok());
        if let Some(probe) = probe {
            let canonical = probe
                .canonicalize()
                .map_err(|e| StorageError::BackendIo(format!("Failed to resolve path: {}", e)))?;
            let base_canonical = base.canonicalize().unwrap_or_else(|_| base.clone());
            if !canonical.starts_with(&base_canonical) {
                return Err(StorageError::PermissionDenied(
                    "Path escapes base directory".to_string(),
                ));
            }
        }

        Ok(full)
    }

    fn file_exists(&self, path: &str) -> Result<bool, StorageError> {
        let full_path = self.resolve_path(path)?;

        match fs::metadata(&full_path) {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::BackendIo(format!(
                "Failed to check file existence {}: {}",
                path, e
            ))),
        }
    }

    fn write_file(&self, path: &str, content: &[u8]) -> Result<PathBuf, StorageError> {
        let full_path = self.resolve_path(path)?;

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StorageError::BackendIo(format!("Failed to create directory for {}: {}", path, e))
            })?;
        }

        fs::write(&full_path, content)
            .map_err(|e| StorageError::BackendIo(format!("Failed to write file {}: {}", path, e)))?;
        Ok(full_path)
    }

    /// Remove the file, reporting whether it was there
    fn delete_file(&self, path: &str) -> Result<bool, StorageError> {
        let full_path = self.resolve_path(path)?;

        match fs::remove_file(&full_path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::BackendIo(format!(
                "Failed to delete file {}: {}",
                path, e
            ))),
        }
    }
}

impl StorageDriver for LocalDriver {
    fn config(&self) -> &DriverConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut DriverConfig {
        &mut self.config
    }

    fn file_object(&self) -> Option<&FileObject> {
        self.file.as_ref()
    }

    fn set_file_object(&mut self, file: FileObject) {
        self.file = Some(file);
    }

    fn check_config(&self) -> Result<(), StorageError> {
        if self.config.save_path.is_empty() {
            return Err(StorageError::ConfigInvalid(
                "save_path is required for the local driver".to_string(),
            ));
        }
        let base = Path::new(&self.config.save_path);
        if base.exists() && !base.is_dir() {
            return Err(StorageError::ConfigInvalid(format!(
                "{} is not a directory",
                base.display()
            )));
        }
        Ok(())
    }

    fn save(&mut self) -> FileResult {
        let checked = self.before_save();
        if !checked.success {
            return checked;
        }
        let Some(file) = self.file.as_ref() else {
            return FileResult::failure(&StorageError::MissingFile);
        };

        match self.write_file(&file.file_path, &file.data) {
            Ok(full_path) => {
                info!(path = %full_path.display(), size = file.size, "Saved file");
                FileResult::ok("file saved")
                    .with_path(file.file_path.clone())
                    .with_url(self.file_url(&file.file_path))
                    .with_exists(true)
            }
            Err(err) => {
                warn!(path = %file.file_path, error = %err, "Failed to save file");
                FileResult::failure(&err)
            }
        }
    }

    fn del(&self, path: &str) -> FileResult {
        match self.delete_file(path) {
            Ok(true) => {
                info!(path, "Deleted file");
                FileResult::ok("file deleted").with_path(path).with_exists(true)
            }
            Ok(false) => {
                debug!(path, "Nothing to delete");
                FileResult::ok("file not found, nothing deleted").with_path(path)
            }
            Err(err) => {
                warn!(path, error = %err, "Failed to delete file");
                FileResult::failure(&err).with_path(path)
            }
        }
    }

    fn has(&self, path: &str) -> FileResult {
        match self.file_exists(path) {
            Ok(exists) => FileResult::existence(path, exists),
            Err(err) => FileResult::failure(&err).with_path(path),
        }
    }
}
