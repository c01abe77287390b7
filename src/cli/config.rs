//! CLI configuration file
//!
//! ```toml
//! driver = "local"
//!
//! [storage]
//! domain = "https://files.example.com"
//! save_path = "/var/uploads"
//! ```
//!
//! Keys under `[storage]` other than `domain` and `save_path` are passed to
//! the driver as backend-specific settings.

use std::path::Path;

use serde::Deserialize;

use super::error::CliError;
use crate::config::ConfigOverrides;
use crate::drivers::DriverKind;

/// Parsed configuration file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub driver: Option<DriverKind>,
    #[serde(default)]
    pub storage: ConfigOverrides,
}

impl CliConfig {
    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::FileReadError(path.to_path_buf(), e.to_string()))?;
        Self::parse(&content).map_err(|e| CliError::ConfigError(path.to_path_buf(), e.to_string()))
    }

    /// Apply command-line values on top of the file, command line winning
    pub fn with_cli_overrides(
        mut self,
        driver: Option<DriverKind>,
        domain: Option<String>,
        save_path: Option<String>,
    ) -> Self {
        if driver.is_some() {
            self.driver = driver;
        }
        if domain.is_some() {
            self.storage.domain = domain;
        }
        if save_path.is_some() {
            self.storage.save_path = save_path;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_config() {
        let config = CliConfig::parse(
            r#"
driver = "remote"

[storage]
domain = "https://objects.example.com"
save_path = "media/"
token = "secret"
timeout = 30
"#,
        )
        .unwrap();

        assert_eq!(config.driver, Some(DriverKind::Remote));
        assert_eq!(
            config.storage.domain.as_deref(),
            Some("https://objects.example.com")
        );
        assert_eq!(config.storage.save_path.as_deref(), Some("media/"));
        assert_eq!(config.storage.extra.get("token"), Some(&json!("secret")));
        assert_eq!(config.storage.extra.get("timeout"), Some(&json!(30)));
    }

    #[test]
    fn test_parse_empty_config() {
        let config = CliConfig::parse("").unwrap();
        assert_eq!(config.driver, None);
        assert!(config.storage.is_empty());
    }

    #[test]
    fn test_parse_rejects_unknown_driver() {
        assert!(CliConfig::parse("driver = \"ftp\"").is_err());
    }

    #[test]
    fn test_cli_overrides_win() {
        let config = CliConfig::parse("driver = \"memory\"\n[storage]\nsave_path = \"a\"")
            .unwrap()
            .with_cli_overrides(Some(DriverKind::Local), None, Some("b".to_string()));
        assert_eq!(config.driver, Some(DriverKind::Local));
        assert_eq!(config.storage.save_path.as_deref(), Some("b"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = CliConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, CliError::FileReadError(_, _)));
    }
}
