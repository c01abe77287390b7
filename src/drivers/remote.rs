//! Remote object store driver
//!
//! Talks to an HTTP object store where objects live at
//! `{domain}/{save_path}/{path}`: `PUT` writes, `HEAD` probes, `DELETE`
//! removes.
//!
//! Backend-specific configuration keys:
//! - `token`: bearer token sent in the `Authorization` header
//! - `timeout`: per-request timeout in seconds
//!
//! ## Security
//!
//! Object keys are validated before use and every path segment is
//! percent-encoded, so a key cannot inject query strings or climb out of
//! `save_path`.

use std::time::Duration;

use reqwest::{StatusCode, Url};
use tracing::{debug, info, warn};

use crate::config::{ConfigOverrides, DriverConfig};
use crate::driver::StorageDriver;
use crate::error::StorageError;
use crate::file::FileObject;
use crate::result::FileResult;
use crate::transport::{HttpResponse, HttpTransport, RequestOptions};

/// Maximum allowed length for object keys
const MAX_KEY_LENGTH: usize = 1024;

/// Key of the bearer token
pub const TOKEN_KEY: &str = "token";

/// Key of the request timeout, in seconds
pub const TIMEOUT_KEY: &str = "timeout";

/// Validate an object key for safe use in request URLs.
///
/// # Security
///
/// Rejects empty keys, `..` segments, control characters and excessively
/// long values.
fn validate_object_key(path: &str) -> Result<(), StorageError> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return Err(StorageError::PermissionDenied(
            "Object key cannot be empty".to_string(),
        ));
    }

    if trimmed.len() > MAX_KEY_LENGTH {
        return Err(StorageError::PermissionDenied(format!(
            "Object key too long (max {} characters)",
            MAX_KEY_LENGTH
        )));
    }

    if trimmed.split('/').any(|segment| segment == "..") {
        return Err(StorageError::PermissionDenied(
            "Path traversal (..) not allowed".to_string(),
        ));
    }

    if trimmed.chars().any(char::is_control) {
        return Err(StorageError::PermissionDenied(
            "Object key contains control characters".to_string(),
        ));
    }

    Ok(())
}

fn encode_segments(path: &str) -> impl Iterator<Item = String> + '_ {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| urlencoding::encode(segment).into_owned())
}

/// HTTP object store driver
#[derive(Debug, Clone)]
pub struct RemoteDriver {
    config: DriverConfig,
    file: Option<FileObject>,
    transport: HttpTransport,
}

impl RemoteDriver {
    /// Create a new remote driver
    ///
    /// # Example
    ///
    /// ```rust
    /// use storage_drivers::{ConfigOverrides, RemoteDriver, StorageDriver};
    ///
    /// let driver = RemoteDriver::new(
    ///     ConfigOverrides::new()
    ///         .with_domain("https://objects.example.com")
    ///         .with_save_path("media")
    ///         .with("token", "bearer_token_here"),
    /// )
    /// .unwrap();
    /// assert_eq!(
    ///     driver.object_url("a b/c.png").unwrap(),
    ///     "https://objects.example.com/media/a%20b/c.png"
    /// );
    /// ```
    pub fn new(overrides: ConfigOverrides) -> Result<Self, StorageError> {
        Self::with_transport(overrides, HttpTransport::new())
    }

    /// Create a driver that sends its requests through `transport`
    pub fn with_transport(
        overrides: ConfigOverrides,
        transport: HttpTransport,
    ) -> Result<Self, StorageError> {
        let mut driver = Self {
            config: DriverConfig::default(),
            file: None,
            transport,
        };
        if overrides.is_empty() {
            driver.check_config()?;
        } else {
            driver.set_config(overrides)?;
        }
        Ok(driver)
    }

    /// Absolute URL of the object stored at `path`
    pub fn object_url(&self, path: &str) -> Result<String, StorageError> {
        validate_object_key(path)?;
        Ok(self.join_url(path))
    }

    fn join_url(&self, path: &str) -> String {
        let mut url = self.config.domain.trim_end_matches('/').to_string();
        for segment in encode_segments(&self.config.save_path).chain(encode_segments(path)) {
            url.push('/');
            url.push_str(&segment);
        }
        url
    }

    fn options(&self) -> RequestOptions {
        let mut options = RequestOptions::new();
        if let Some(token) = self.config.get_str(TOKEN_KEY) {
            options = options.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(secs) = self.config.get_u64(TIMEOUT_KEY) {
            options = options.timeout(Duration::from_secs(secs));
        }
        options
    }

    fn send(
        &self,
        method: &str,
        path: &str,
        options: RequestOptions,
    ) -> Result<HttpResponse, StorageError> {
        let url = self.object_url(path)?;
        let response = self.transport.request(method, &url, options)?;
        debug!(method, %url, status = response.status.as_u16(), "Remote call finished");
        Ok(response)
    }

    fn file_exists(&self, path: &str) -> Result<bool, StorageError> {
        let response = self.send("HEAD", path, self.options())?;
        match response.status {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(StorageError::BackendIo(format!(
                "Existence check for {} failed: {}",
                path, status
            ))),
        }
    }

    fn write_file(&self, file: &FileObject) -> Result<(), StorageError> {
        let content_type = mime_guess::from_path(&file.file_path).first_or_octet_stream();
        let options = self
            .options()
            .header("Content-Type", content_type.essence_str())
            .body(file.data.clone());

        let response = self.send("PUT", &file.file_path, options)?;
        if !response.is_success() {
            return Err(StorageError::BackendIo(format!(
                "Upload of {} failed: {} {}",
                file.file_path,
                response.status,
                response.text().trim()
            )));
        }
        Ok(())
    }

    fn delete_file(&self, path: &str) -> Result<bool, StorageError> {
        let response = self.send("DELETE", path, self.options())?;
        match response.status {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(StorageError::BackendIo(format!(
                "Delete of {} failed: {}",
                path, status
            ))),
        }
    }
}

impl StorageDriver for RemoteDriver {
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
        let domain = &self.config.domain;
        let url = Url::parse(domain).map_err(|e| {
            StorageError::ConfigInvalid(format!("domain {:?} is not a URL: {}", domain, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") || url.host().is_none() {
            return Err(StorageError::ConfigInvalid(format!(
                "domain {:?} must be an http(s) URL with a host",
                domain
            )));
        }
        if let Some(token) = self.config.extra.get(TOKEN_KEY)
            && !token.is_null()
            && !token.is_string()
        {
            return Err(StorageError::ConfigInvalid(
                "token must be a string".to_string(),
            ));
        }
        if self.config.extra.contains_key(TIMEOUT_KEY)
            && self.config.get_u64(TIMEOUT_KEY).is_none()
        {
            return Err(StorageError::ConfigInvalid(
                "timeout must be a whole number of seconds".to_string(),
            ));
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

        match self.write_file(file) {
            Ok(()) => {
                info!(path = %file.file_path, size = file.size, "Uploaded file");
                FileResult::ok("file saved")
                    .with_path(file.file_path.clone())
                    .with_url(self.file_url(&file.file_path))
                    .with_exists(true)
            }
            Err(err) => {
                warn!(path = %file.file_path, error = %err, "Failed to upload file");
                FileResult::failure(&err).with_path(file.file_path.clone())
            }
        }
    }

    fn del(&self, path: &str) -> FileResult {
        match self.delete_file(path) {
            Ok(true) => {
                info!(path, "Deleted remote file");
                FileResult::ok("file deleted").with_path(path).with_exists(true)
            }
            Ok(false) => FileResult::ok("file not found, nothing deleted").with_path(path),
            Err(err) => {
                warn!(path, error = %err, "Failed to delete remote file");
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

    /// Objects are served from their storage URL. Keys that fail validation
    /// are still encoded below `save_path`, but no request is ever sent for
    /// them.
    fn file_url(&self, path: &str) -> String {
        self.join_url(path)
    }
}
