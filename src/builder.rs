//! Directory builder for flexible configuration.

use crate::config::Config;
use crate::directory::Directory;
use crate::error::{DirectoryError, Result};
use crate::store::{MemoryStore, Store};
use std::sync::Arc;

/// Builder for a [`Directory`] with a custom store or configuration.
///
/// # Examples
///
/// ```rust
/// use geodir::{Config, Directory};
///
/// let dir = Directory::builder()
///     .config(Config::default().with_default_tree_depth(2))
///     .build()
///     .unwrap();
/// assert_eq!(dir.config().default_tree_depth, 2);
/// ```
pub struct DirectoryBuilder {
    store: Option<Arc<dyn Store>>,
    config: Config,
}

impl DirectoryBuilder {
    /// Create a builder with default in-memory configuration.
    pub fn new() -> Self {
        Self {
            store: None,
            config: Config::default(),
        }
    }

    /// Use an existing store instead of a fresh in-memory one.
    pub fn store(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the directory configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Build the directory, validating the configuration.
    pub fn build(self) -> Result<Directory> {
        self.config
            .validate()
            .map_err(DirectoryError::InvalidInput)?;
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));
        Ok(Directory::with_store(store, self.config))
    }
}

impl Default for DirectoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
