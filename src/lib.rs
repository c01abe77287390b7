//! Storage Drivers - pluggable file storage with shared upload validation
//!
//! Provides:
//! - A driver contract (`StorageDriver`) for save/delete/exists
//! - Local file system, HTTP object store and in-memory drivers
//! - Driver configuration with `save_path` normalization
//! - A pre-upload validation pipeline (presence, size, extension, duplicates)
//! - A blocking HTTP transport helper for remote drivers
//!
//! # Example
//!
//! ```rust
//! use storage_drivers::{ConfigOverrides, FileObject, MemoryDriver, StorageDriver};
//!
//! let mut driver = MemoryDriver::new(ConfigOverrides::new()).unwrap();
//! driver.set_file_object(FileObject::new("a/b.jpg", b"jpeg bytes".to_vec()));
//! assert!(driver.save().success);
//!
//! // Same path again without overwrite is rejected
//! driver.set_file_object(FileObject::new("a/b.jpg", b"other".to_vec()));
//! let result = driver.save();
//! assert!(!result.success);
//! assert_eq!(result.msg, "file already exists");
//! ```

pub mod cli;
pub mod config;
pub mod driver;
pub mod drivers;
pub mod error;
pub mod file;
pub mod result;
#[cfg(feature = "api-backend")]
pub mod transport;
pub mod validation;

// Re-export commonly used types
pub use config::{ConfigOverrides, DriverConfig};
pub use driver::StorageDriver;
#[cfg(feature = "api-backend")]
pub use drivers::RemoteDriver;
pub use drivers::{DriverKind, LocalDriver, MemoryDriver, create_driver};
pub use error::{ErrorKind, StorageError, StorageResult};
pub use file::FileObject;
pub use result::FileResult;
#[cfg(feature = "api-backend")]
pub use transport::{HttpResponse, HttpTransport, RequestOptions, TransportError};
