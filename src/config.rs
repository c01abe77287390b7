//! Driver configuration
//!
//! Every driver carries a [`DriverConfig`]: the two keys all backends share
//! (`domain`, `save_path`) as typed fields, plus an extension map for
//! backend-specific settings such as a remote token or timeout.
//!
//! Changes are applied through [`ConfigOverrides`]. Merging normalizes
//! `save_path` to forward slashes without a trailing separator.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Default public base URL
pub const DEFAULT_DOMAIN: &str = "http://127.0.0.1";

/// Key of the public base URL
pub const DOMAIN_KEY: &str = "domain";

/// Key of the storage root
pub const SAVE_PATH_KEY: &str = "save_path";

/// Configuration held by a storage driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Base URL used to build public links to stored files
    #[serde(default = "default_domain")]
    pub domain: String,
    /// Root directory or object-key prefix, forward slashes, no trailing slash
    #[serde(default)]
    pub save_path: String,
    /// Backend-specific keys
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn default_domain() -> String {
    DEFAULT_DOMAIN.to_string()
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            save_path: String::new(),
            extra: BTreeMap::new(),
        }
    }
}

impl DriverConfig {
    /// Merge overrides onto this configuration, override values winning
    pub fn merge(&mut self, overrides: ConfigOverrides) {
        let ConfigOverrides {
            domain,
            save_path,
            extra,
        } = overrides;

        if let Some(domain) = domain {
            self.domain = domain;
        }
        if let Some(save_path) = save_path {
            self.save_path = if save_path.is_empty() {
                save_path
            } else {
                normalize_save_path(&save_path)
            };
        }
        self.extra.extend(extra);
    }

    /// Look up a key in the flat view of this configuration
    ///
    /// `domain` and `save_path` are always present. Extension keys holding
    /// JSON `null` count as absent.
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            DOMAIN_KEY => Some(Value::String(self.domain.clone())),
            SAVE_PATH_KEY => Some(Value::String(self.save_path.clone())),
            _ => self.extra.get(key).filter(|v| !v.is_null()).cloned(),
        }
    }

    /// Look up a key, falling back to `default` when it is absent
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    /// Look up an extension key as a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }

    /// Look up an extension key as an unsigned integer
    ///
    /// Numeric strings are accepted, since configuration read from env-like
    /// sources is often stringly typed.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        match self.extra.get(key)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Flat key/value view of the whole configuration
    pub fn to_map(&self) -> BTreeMap<String, Value> {
        let mut map = self.extra.clone();
        map.insert(DOMAIN_KEY.to_string(), Value::String(self.domain.clone()));
        map.insert(
            SAVE_PATH_KEY.to_string(),
            Value::String(self.save_path.clone()),
        );
        map
    }
}

/// A set of configuration changes to merge onto a [`DriverConfig`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_path: Option<String>,
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ConfigOverrides {
    /// Create an empty set of overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Build overrides from a generic key/value map
    ///
    /// `domain` and `save_path` land in their typed fields when they hold
    /// strings; every other entry becomes an extension key.
    pub fn from_map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut overrides = Self::default();
        for (key, value) in entries {
            let key: String = key.into();
            match (key.as_str(), value.as_str()) {
                (DOMAIN_KEY, Some(s)) => overrides.domain = Some(s.to_string()),
                (SAVE_PATH_KEY, Some(s)) => overrides.save_path = Some(s.to_string()),
                _ => {
                    overrides.extra.insert(key, value);
                }
            }
        }
        overrides
    }

    /// Set the public base URL
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set the storage root
    pub fn with_save_path(mut self, save_path: impl Into<String>) -> Self {
        self.save_path = Some(save_path.into());
        self
    }

    /// Set a backend-specific key
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Check whether these overrides change nothing
    pub fn is_empty(&self) -> bool {
        self.domain.is_none() && self.save_path.is_none() && self.extra.is_empty()
    }
}

/// Normalize a storage root: backslashes become slashes, trailing slashes go
pub fn normalize_save_path(path: &str) -> String {
    path.replace('\\', "/").trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = DriverConfig::default();
        assert_eq!(config.domain, "http://127.0.0.1");
        assert_eq!(config.save_path, "");
        assert!(config.extra.is_empty());
    }

    #[test]
    fn test_normalize_save_path() {
        assert_eq!(normalize_save_path("C:\\data\\"), "C:/data");
        assert_eq!(normalize_save_path("/var/uploads/"), "/var/uploads");
        assert_eq!(normalize_save_path("uploads//"), "uploads");
        assert_eq!(normalize_save_path("a\\b/c"), "a/b/c");
        assert_eq!(normalize_save_path("/"), "");
    }

    #[test]
    fn test_merge_override_wins() {
        let mut config = DriverConfig::default();
        config.merge(
            ConfigOverrides::new()
                .with_domain("https://cdn.example.com")
                .with("token", "abc"),
        );
        config.merge(ConfigOverrides::new().with("token", "xyz").with("timeout", 30));

        assert_eq!(config.domain, "https://cdn.example.com");
        assert_eq!(config.get_str("token"), Some("xyz"));
        assert_eq!(config.get_u64("timeout"), Some(30));
    }

    #[test]
    fn test_merge_empty_save_path_is_stored_as_is() {
        let mut config = DriverConfig::default();
        config.merge(ConfigOverrides::new().with_save_path("/data"));
        config.merge(ConfigOverrides::new().with_save_path(""));
        assert_eq!(config.save_path, "");
    }

    #[test]
    fn test_get_treats_null_as_absent() {
        let mut config = DriverConfig::default();
        config.merge(ConfigOverrides::new().with("region", Value::Null));
        assert_eq!(config.get("region"), None);
        assert_eq!(config.get_or("region", json!("eu")), json!("eu"));
        assert_eq!(config.get("domain"), Some(json!("http://127.0.0.1")));
    }

    #[test]
    fn test_get_u64_accepts_numeric_strings() {
        let mut config = DriverConfig::default();
        config.merge(ConfigOverrides::new().with("timeout", " 15 ").with("bad", "soon"));
        assert_eq!(config.get_u64("timeout"), Some(15));
        assert_eq!(config.get_u64("bad"), None);
    }

    #[test]
    fn test_from_map_splits_typed_keys() {
        let overrides = ConfigOverrides::from_map([
            ("domain", json!("https://files.example.com")),
            ("save_path", json!("uploads\\")),
            ("token", json!("secret")),
        ]);
        assert_eq!(overrides.domain.as_deref(), Some("https://files.example.com"));
        assert_eq!(overrides.save_path.as_deref(), Some("uploads\\"));
        assert_eq!(overrides.extra.get("token"), Some(&json!("secret")));
    }

    #[test]
    fn test_deserialize_flattens_extra_keys() {
        let config: DriverConfig =
            serde_json::from_value(json!({"save_path": "data", "bucket": "media"})).unwrap();
        assert_eq!(config.domain, DEFAULT_DOMAIN);
        assert_eq!(config.save_path, "data");
        assert_eq!(config.get_str("bucket"), Some("media"));
    }
}
