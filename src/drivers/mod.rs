//! Storage driver implementations
//!
//! - LocalDriver: native file system
//! - RemoteDriver: HTTP object store (default `api-backend` feature)
//! - MemoryDriver: in-process map

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigOverrides;
use crate::driver::StorageDriver;
use crate::error::StorageError;

pub mod local;
pub mod memory;
#[cfg(feature = "api-backend")]
pub mod remote;

pub use local::LocalDriver;
pub use memory::MemoryDriver;
#[cfg(feature = "api-backend")]
pub use remote::RemoteDriver;

/// Available driver backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    #[default]
    Local,
    Remote,
    Memory,
}

impl FromStr for DriverKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "fs" => Ok(DriverKind::Local),
            "remote" | "http" => Ok(DriverKind::Remote),
            "memory" | "mem" => Ok(DriverKind::Memory),
            _ => Err(format!(
                "Invalid driver: {}. Expected: local, remote, memory",
                s
            )),
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DriverKind::Local => "local",
            DriverKind::Remote => "remote",
            DriverKind::Memory => "memory",
        };
        f.write_str(name)
    }
}

/// Build a driver of the given kind, checking its configuration
pub fn create_driver(
    kind: DriverKind,
    overrides: ConfigOverrides,
) -> Result<Box<dyn StorageDriver>, StorageError> {
    match kind {
        DriverKind::Local => Ok(Box::new(LocalDriver::new(overrides)?)),
        DriverKind::Memory => Ok(Box::new(MemoryDriver::new(overrides)?)),
        #[cfg(feature = "api-backend")]
        DriverKind::Remote => Ok(Box::new(RemoteDriver::new(overrides)?)),
        #[cfg(not(feature = "api-backend"))]
        DriverKind::Remote => Err(StorageError::ConfigInvalid(
            "Remote driver not enabled. Build with --features api-backend".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_driver_kind_from_str() {
        assert_eq!("local".parse::<DriverKind>().unwrap(), DriverKind::Local);
        assert_eq!("HTTP".parse::<DriverKind>().unwrap(), DriverKind::Remote);
        assert_eq!("mem".parse::<DriverKind>().unwrap(), DriverKind::Memory);
        assert!("s3".parse::<DriverKind>().is_err());
    }

    #[test]
    fn test_driver_kind_display_roundtrips() {
        for kind in [DriverKind::Local, DriverKind::Remote, DriverKind::Memory] {
            assert_eq!(kind.to_string().parse::<DriverKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_create_driver_checks_config() {
        let err = create_driver(DriverKind::Local, ConfigOverrides::new())
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

        let driver = create_driver(DriverKind::Memory, ConfigOverrides::new()).unwrap();
        assert_eq!(driver.get_config().domain, "http://127.0.0.1");
    }
}
