//! Upload descriptor
//!
//! A [`FileObject`] describes one in-flight upload: the payload, where it
//! should land, and the limits it must satisfy before any driver writes it.

use std::path::Path;

/// Default maximum upload size (10 MiB)
pub const DEFAULT_MAX_SIZE: u64 = 10 * 1024 * 1024;

/// File to be saved by a storage driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileObject {
    /// Raw payload
    pub data: Vec<u8>,
    /// Declared size in bytes
    pub size: u64,
    /// Extension without the leading dot, lower-cased
    pub ext: String,
    /// Target path relative to the driver's `save_path`
    pub file_path: String,
    /// Largest accepted size in bytes
    pub max_size: u64,
    /// Accepted extensions; empty accepts everything
    pub allow_exts: Vec<String>,
    /// Whether an existing file at `file_path` may be overwritten
    pub is_cover: bool,
}

impl FileObject {
    /// Create a descriptor for `data` to be stored at `file_path`
    ///
    /// `size` is taken from the payload length and `ext` from the path.
    ///
    /// # Example
    ///
    /// ```rust
    /// use storage_drivers::FileObject;
    ///
    /// let file = FileObject::new("avatars/Me.PNG", b"\x89PNG".to_vec())
    ///     .with_allow_exts(["png", "jpg"])
    ///     .with_max_size(1024);
    /// assert_eq!(file.ext, "png");
    /// assert_eq!(file.size, 4);
    /// ```
    pub fn new(file_path: impl Into<String>, data: Vec<u8>) -> Self {
        let file_path = file_path.into();
        let ext = extension_of(&file_path);
        Self {
            size: data.len() as u64,
            data,
            ext,
            file_path,
            max_size: DEFAULT_MAX_SIZE,
            allow_exts: Vec::new(),
            is_cover: false,
        }
    }

    /// Read a local file into a descriptor targeting `file_path`
    pub fn from_local(
        source: impl AsRef<Path>,
        file_path: impl Into<String>,
    ) -> std::io::Result<Self> {
        let data = std::fs::read(source)?;
        Ok(Self::new(file_path, data))
    }

    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_allow_exts<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_exts = exts.into_iter().map(Into::into).collect();
        self
    }

    /// Allow replacing an existing file at the target path
    pub fn with_cover(mut self, is_cover: bool) -> Self {
        self.is_cover = is_cover;
        self
    }

    /// Override the extension derived from the path
    pub fn with_ext(mut self, ext: impl Into<String>) -> Self {
        self.ext = ext.into().trim_start_matches('.').to_lowercase();
        self
    }

    /// Override the declared size
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Check whether the extension passes the allow-list
    pub fn ext_allowed(&self) -> bool {
        self.allow_exts.is_empty()
            || self
                .allow_exts
                .iter()
                .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(&self.ext))
    }
}

fn extension_of(path: &str) -> String {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default()
}
