//! Directory configuration.
//!
//! Designed to be easily serializable and loadable from JSON or TOML while
//! keeping complexity minimal.

use serde::de::Error;
use serde::{Deserialize, Serialize};

/// Configuration for a [`Directory`](crate::Directory).
///
/// # Example
///
/// ```rust
/// use geodir::Config;
///
/// let config = Config::default();
/// assert_eq!(config.default_page_limit, 100);
///
/// // Load from JSON
/// let json = r#"{ "default_page_limit": 25, "default_tree_depth": 2 }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.default_tree_depth, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Page size used by listings when the caller does not pass a limit.
    #[serde(default = "Config::default_page_limit")]
    pub default_page_limit: usize,

    /// Depth used by activity tree materialization when the caller does
    /// not request a level explicitly.
    #[serde(default = "Config::default_tree_depth")]
    pub default_tree_depth: usize,
}

impl Config {
    const fn default_page_limit() -> usize {
        100
    }

    const fn default_tree_depth() -> usize {
        3
    }

    pub fn with_default_page_limit(mut self, limit: usize) -> Self {
        assert!(limit > 0, "Page limit must be greater than zero");
        self.default_page_limit = limit;
        self
    }

    pub fn with_default_tree_depth(mut self, depth: usize) -> Self {
        self.default_tree_depth = depth;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.default_page_limit == 0 {
            return Err("Default page limit must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Load configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load configuration from a TOML string (requires the `toml` feature).
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as a TOML string (requires the `toml` feature).
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_page_limit: Self::default_page_limit(),
            default_tree_depth: Self::default_tree_depth(),
        }
    }
}
