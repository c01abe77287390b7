//! Upload validation pipeline
//!
//! Runs before any driver writes a file. Checks run in a fixed order and the
//! first failure wins:
//! 1. presence of a payload
//! 2. size against the declared maximum
//! 3. extension against the allow-list
//! 4. existing file at the target path, unless overwriting is allowed

use tracing::debug;

use crate::driver::StorageDriver;
use crate::error::StorageError;
use crate::file::FileObject;
use crate::result::FileResult;

/// Run the full pipeline against the upload attached to `driver`
///
/// A failing existence probe is returned as-is, so the caller sees the
/// backend's own kind and message.
pub fn before_save<D: StorageDriver + ?Sized>(driver: &D) -> FileResult {
    let Some(file) = driver.file_object() else {
        return FileResult::failure(&StorageError::MissingFile);
    };

    if let Err(err) = check_file(file) {
        debug!(path = %file.file_path, error = %err, "Upload rejected");
        return FileResult::failure(&err);
    }

    if !file.is_cover {
        let probe = driver.has(&file.file_path);
        if !probe.success {
            debug!(path = %file.file_path, msg = %probe.msg, "Existence probe failed");
            return probe;
        }
        if probe.exists {
            let err = StorageError::DuplicateFile(file.file_path.clone());
            debug!(path = %file.file_path, "Upload rejected, target exists");
            return FileResult::failure(&err);
        }
    }

    FileResult::ok("ok")
}

/// Checks that only need the descriptor itself (steps 1 to 3)
pub fn check_file(file: &FileObject) -> Result<(), StorageError> {
    if file.data.is_empty() {
        return Err(StorageError::MissingFile);
    }
    if file.size > file.max_size {
        return Err(StorageError::FileTooLarge {
            size: file.size,
            max_size: file.max_size,
        });
    }
    if !file.ext_allowed() {
        return Err(StorageError::InvalidExtension(file.ext.clone()));
    }
    Ok(())
}
