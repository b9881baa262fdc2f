//! Bootstrap configuration loading and root folder resolution
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`FTT_ROOT_FOLDER`)
//! 3. `root_folder` key in the module's TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing TOML file is never fatal: the loader reports it as `None` and the
//! caller falls back to built-in defaults. Config is loaded before logging is
//! set up, so the caller is the one that logs the fallback.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable consulted for the root folder
pub const ROOT_FOLDER_ENV: &str = "FTT_ROOT_FOLDER";

/// Default database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "ftt.db";

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Resolves the root folder for a service
pub struct RootFolderResolver {
    module_name: String,
}

impl RootFolderResolver {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
        }
    }

    /// Resolve the root folder
    ///
    /// `cli_arg` wins over the environment, which wins over `toml_root`.
    pub fn resolve(&self, cli_arg: Option<&Path>, toml_root: Option<&Path>) -> PathBuf {
        if let Some(path) = cli_arg {
            debug!(module = %self.module_name, path = %path.display(), "Root folder from command line");
            return path.to_path_buf();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                debug!(module = %self.module_name, %path, "Root folder from environment");
                return PathBuf::from(path);
            }
        }

        if let Some(path) = toml_root {
            debug!(module = %self.module_name, path = %path.display(), "Root folder from TOML config");
            return path.to_path_buf();
        }

        default_root_folder()
    }

    /// Default TOML config path for this module (`~/.config/ftt/<module>.toml`)
    pub fn default_config_path(&self) -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("ftt").join(format!("{}.toml", self.module_name)))
    }
}

/// Creates the root folder and derives paths inside it
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    /// Create the root folder if missing
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!(path = %self.root_folder.display(), "Created root folder");
        }
        Ok(())
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    /// Path of the SQLite database inside the root folder
    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }
}

/// Load a TOML config file
///
/// Returns `Ok(None)` when the file does not exist. A file that exists but
/// does not parse is a configuration error.
pub fn load_toml_config<T>(path: &Path) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;

    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    Ok(Some(config))
}

/// OS-dependent default root folder
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("ftt"))
        .unwrap_or_else(|| PathBuf::from("./ftt_data"))
}
