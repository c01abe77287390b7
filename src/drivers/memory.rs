//! In-memory driver
//!
//! Keeps files in a map keyed by their normalized path. Nothing survives the
//! driver; useful for tests and dry runs.

use std::cell::RefCell;
use std::collections::BTreeMap;

use tracing::debug;

use crate::config::{ConfigOverrides, DriverConfig};
use crate::driver::StorageDriver;
use crate::error::StorageError;
use crate::file::FileObject;
use crate::result::FileResult;

#[derive(Debug, Default)]
pub struct MemoryDriver {
    config: DriverConfig,
    file: Option<FileObject>,
    files: RefCell<BTreeMap<String, Vec<u8>>>,
}

impl MemoryDriver {
    pub fn new(overrides: ConfigOverrides) -> Result<Self, StorageError> {
        let mut driver = Self::default();
        if !overrides.is_empty() {
            driver.set_config(overrides)?;
        }
        Ok(driver)
    }

    /// Store a file directly, bypassing validation
    pub fn insert(&self, path: &str, data: impl Into<Vec<u8>>) {
        self.files.borrow_mut().insert(key(path), data.into());
    }

    /// Contents of a stored file
    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.files.borrow().get(&key(path)).cloned()
    }

    /// Number of stored files
    pub fn len(&self) -> usize {
        self.files.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.borrow().is_empty()
    }
}

fn key(path: &str) -> String {
    path.replace('\\', "/").trim_start_matches('/').to_string()
}

impl StorageDriver for MemoryDriver {
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

        self.insert(&file.file_path, file.data.clone());
        debug!(path = %file.file_path, size = file.size, "Stored file in memory");
        FileResult::ok("file saved")
            .with_path(file.file_path.clone())
            .with_url(self.file_url(&file.file_path))
            .with_exists(true)
    }

    fn del(&self, path: &str) -> FileResult {
        let removed = self.files.borrow_mut().remove(&key(path)).is_some();
        let msg = if removed {
            "file deleted"
        } else {
            "file not found, nothing deleted"
        };
        FileResult::ok(msg).with_path(path).with_exists(removed)
    }

    fn has(&self, path: &str) -> FileResult {
        let exists = self.files.borrow().contains_key(&key(path));
        FileResult::existence(path, exists)
    }
}
