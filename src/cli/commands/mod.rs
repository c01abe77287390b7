//! CLI command implementations

use std::path::PathBuf;

use tracing::info;

use super::error::CliError;
use crate::config::ConfigOverrides;
use crate::driver::StorageDriver;
use crate::drivers::{DriverKind, create_driver};
use crate::file::FileObject;
use crate::result::FileResult;

/// Arguments for the `upload` command
pub struct UploadArgs {
    /// Local file to upload
    pub source: PathBuf,
    /// Target path relative to the driver's save_path
    pub target: String,
    /// Replace an existing file at the target
    pub overwrite: bool,
    /// Largest accepted size in bytes
    pub max_size: Option<u64>,
    /// Accepted extensions; empty accepts everything
    pub allow_exts: Vec<String>,
}

/// Build the driver selected by the merged configuration
pub fn open_driver(
    kind: DriverKind,
    overrides: ConfigOverrides,
) -> Result<Box<dyn StorageDriver>, CliError> {
    let driver = create_driver(kind, overrides)?;
    info!(driver = %kind, "Driver ready");
    Ok(driver)
}

/// Handle the upload command
pub fn handle_upload(
    driver: &mut dyn StorageDriver,
    args: UploadArgs,
) -> Result<FileResult, CliError> {
    let mut file = FileObject::from_local(&args.source, args.target)
        .map_err(|e| CliError::FileReadError(args.source.clone(), e.to_string()))?
        .with_cover(args.overwrite)
        .with_allow_exts(args.allow_exts);
    if let Some(max_size) = args.max_size {
        file = file.with_max_size(max_size);
    }

    info!(source = %args.source.display(), target = %file.file_path, "Uploading");
    driver.set_file_object(file);
    Ok(driver.save())
}

/// Handle the delete command
pub fn handle_delete(driver: &dyn StorageDriver, path: &str) -> Result<FileResult, CliError> {
    check_path(path)?;
    Ok(driver.del(path))
}

/// Handle the exists command
pub fn handle_exists(driver: &dyn StorageDriver, path: &str) -> Result<FileResult, CliError> {
    check_path(path)?;
    Ok(driver.has(path))
}

fn check_path(path: &str) -> Result<(), CliError> {
    if path.trim().is_empty() {
        return Err(CliError::InvalidArgument("Path cannot be empty".to_string()));
    }
    Ok(())
}
