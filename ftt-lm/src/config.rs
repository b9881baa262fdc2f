//! Bootstrap configuration for ftt-lm
//!
//! Loaded once from `~/.config/ftt/ftt-lm.toml` (or `--config`). Every field
//! has a built-in default, so a missing file starts the service with defaults.

use crate::services::capture_scheduler::DEFAULT_CAPTURE_INTERVAL;
use crate::services::product_catalog::ProductCatalog;
use crate::services::recognition_client::{DEFAULT_RECOGNITION_URL, DEFAULT_TIMEOUT_SECS};
use crate::session::SessionConfig;
use ftt_common::config::{load_toml_config, LoggingConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5731;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LmConfig {
    /// HTTP server port
    pub port: u16,

    /// Root folder; resolved with CLI/env priority when absent
    pub root_folder: Option<PathBuf>,

    /// SQLite file; defaults to `<root>/ftt.db`
    pub database_path: Option<PathBuf>,

    /// Base URL of the recognition service
    pub recognition_url: String,

    pub recognition_timeout_secs: u64,

    pub capture_interval_secs: u64,

    /// Folder the directory camera replays; defaults to `<root>/captures`
    pub capture_folder: Option<PathBuf>,

    /// Keep only labels whose product is in the catalog
    pub catalog_filter: bool,

    /// Catalog override; the built-in product list is used when absent
    pub catalog_products: Option<Vec<String>>,

    /// Reload committed keys from the database at startup
    pub reload_committed: bool,

    pub logging: LoggingConfig,
}

impl Default for LmConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            root_folder: None,
            database_path: None,
            recognition_url: DEFAULT_RECOGNITION_URL.to_string(),
            recognition_timeout_secs: DEFAULT_TIMEOUT_SECS,
            capture_interval_secs: DEFAULT_CAPTURE_INTERVAL.as_secs(),
            capture_folder: None,
            catalog_filter: false,
            catalog_products: None,
            reload_committed: true,
            logging: LoggingConfig::default(),
        }
    }
}

/// Where the loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// No config file; built-in defaults. Holds the path that was looked up.
    Defaults(Option<PathBuf>),
}

impl LmConfig {
    /// Load from `path`, falling back to defaults when there is no file
    ///
    /// Nothing is logged here: this runs before the tracing subscriber exists,
    /// so the caller logs the returned [`ConfigSource`] once logging is up.
    pub fn load(path: Option<&Path>) -> ftt_common::Result<(Self, ConfigSource)> {
        let Some(path) = path else {
            return Ok((Self::default(), ConfigSource::Defaults(None)));
        };

        Ok(match load_toml_config(path)? {
            Some(config) => (config, ConfigSource::File(path.to_path_buf())),
            None => (Self::default(), ConfigSource::Defaults(Some(path.to_path_buf()))),
        })
    }

    pub fn recognition_timeout(&self) -> Duration {
        ftt_common::time::secs_to_duration(self.recognition_timeout_secs.max(1))
    }

    pub fn capture_interval(&self) -> Duration {
        ftt_common::time::secs_to_duration(self.capture_interval_secs.max(1))
    }

    /// Product catalog when filtering is enabled
    ///
    /// An override list with no usable names disables filtering rather than
    /// rejecting every label.
    pub fn catalog(&self) -> Option<ProductCatalog> {
        if !self.catalog_filter {
            return None;
        }

        let catalog = match &self.catalog_products {
            Some(products) => ProductCatalog::new(products),
            None => ProductCatalog::with_defaults(),
        };
        if catalog.is_empty() {
            warn!("catalog_filter is enabled but catalog_products is empty; filter disabled");
            return None;
        }

        info!(products = catalog.len(), "Product catalog filter enabled");
        Some(catalog)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            capture_interval: self.capture_interval(),
            reload_committed: self.reload_committed,
            catalog: self.catalog(),
        }
    }
}
