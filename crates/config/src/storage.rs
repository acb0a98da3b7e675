//! Locations of the files newtab writes at runtime.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::persistence::user_data_dir;

/// Default store file name inside the data directory.
pub const STORE_FILE_NAME: &str = "store.json";

/// Default log file name inside the data directory.
pub const LOG_FILE_NAME: &str = "newtab.log";

/// Default tracing filter directive.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Where widget settings, tokens and caches are persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Store file path. Defaults to `<data_dir>/newtab/store.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Returns the configured store path, or the default one.
    ///
    /// # Errors
    ///
    /// Returns an error if no path is configured and the data directory
    /// cannot be determined.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use newtab_config::StorageConfig;
    ///
    /// let storage = StorageConfig { path: Some(PathBuf::from("/tmp/store.json")) };
    /// assert_eq!(storage.resolve().unwrap(), PathBuf::from("/tmp/store.json"));
    /// ```
    pub fn resolve(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Ok(user_data_dir()?.join(STORE_FILE_NAME)),
        }
    }
}

/// Diagnostic log settings.
///
/// Logs go to a file because the terminal belongs to the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info,newtab_widgets=debug`.
    /// `RUST_LOG` takes precedence when set.
    pub filter: String,
    /// Log file path. Defaults to `<data_dir>/newtab/newtab.log`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Returns the configured log file path, or the default one.
    ///
    /// # Errors
    ///
    /// Returns an error if no path is configured and the data directory
    /// cannot be determined.
    pub fn resolve_file(&self) -> Result<PathBuf> {
        match &self.file {
            Some(path) => Ok(path.clone()),
            None => Ok(user_data_dir()?.join(LOG_FILE_NAME)),
        }
    }
}
