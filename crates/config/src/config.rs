//! Core configuration struct and loading logic.
//!
//! This module provides the main [`Config`] struct which aggregates all
//! configuration options for the newtab dashboard.

use std::collections::HashSet;
use std::path::PathBuf;

use newtab_protocol::WidgetKind;
use serde::{Deserialize, Serialize};

use crate::endpoints::EndpointsConfig;
use crate::error::{ConfigError, Result};
use crate::http::HttpConfig;
use crate::persistence::{find_config_file, read_config_file, write_config_file};
use crate::storage::{LoggingConfig, StorageConfig};

/// Environment variable overriding the store file path.
pub const STORE_ENV: &str = "NEWTAB_STORE";

/// Environment variable overriding the log file path.
pub const LOG_FILE_ENV: &str = "NEWTAB_LOG";

/// The main configuration struct for the newtab dashboard.
///
/// Widget credentials are not part of this file: they are entered through
/// each widget's onboarding form and persisted in the widget store.
///
/// # Examples
///
/// ```
/// use newtab_config::Config;
/// use newtab_protocol::WidgetKind;
///
/// // Create a default config
/// let config = Config::default();
/// assert_eq!(config.widgets, WidgetKind::all());
///
/// // Only show the weather widget
/// let config = Config {
///     widgets: vec![WidgetKind::Weather],
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Widgets to show, in display order.
    #[serde(default = "default_widgets")]
    pub widgets: Vec<WidgetKind>,

    /// Remote service base URLs.
    #[serde(default)]
    pub endpoints: EndpointsConfig,

    /// Outgoing request settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Store file location.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Diagnostic log settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_widgets() -> Vec<WidgetKind> {
    WidgetKind::all().to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            widgets: default_widgets(),
            endpoints: EndpointsConfig::default(),
            http: HttpConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Creates a configuration with every widget enabled.
    ///
    /// This is equivalent to `Config::default()`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from the default file locations.
    ///
    /// Searches for configuration files in the following order:
    ///
    /// 1. Local: `./newtab.json5` or `./newtab.json`
    /// 2. User: `~/.config/newtab/config.json5` or `~/.config/newtab/config.json`
    ///
    /// If no configuration file is found, returns a default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is found but cannot be
    /// read, parsed or validated.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use newtab_config::Config;
    ///
    /// # fn example() -> newtab_config::Result<()> {
    /// let config = Config::load()?;
    /// println!("Showing {} widgets", config.widgets.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn load() -> Result<Self> {
        match find_config_file() {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    /// Loads configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let config: Config = read_config_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration to a file as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        write_config_file(path, self)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the widget list is empty or has duplicates, if
    /// an endpoint is not an http(s) URL, or if the HTTP timeout is out of
    /// range.
    ///
    /// # Examples
    ///
    /// ```
    /// use newtab_config::Config;
    /// use newtab_protocol::WidgetKind;
    ///
    /// let mut config = Config::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.widgets = vec![WidgetKind::Mail, WidgetKind::Mail];
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.widgets.is_empty() {
            return Err(ConfigError::NoWidgets);
        }
        let mut seen = HashSet::new();
        if let Some(kind) = self.widgets.iter().find(|kind| !seen.insert(**kind)) {
            return Err(ConfigError::DuplicateWidget(*kind));
        }
        self.endpoints.validate()?;
        self.http.validate()?;
        Ok(())
    }

    /// Applies overrides from the process environment.
    ///
    /// See [`Config::apply_overrides`].
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies overrides looked up by variable name.
    ///
    /// | Variable | Overrides |
    /// |----------|-----------|
    /// | `NEWTAB_STORE` | `storage.path` |
    /// | `NEWTAB_LOG` | `logging.file` |
    ///
    /// Empty values are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use newtab_config::Config;
    ///
    /// let mut config = Config::default();
    /// config.apply_overrides(|name| (name == "NEWTAB_STORE").then(|| "/tmp/s.json".to_string()));
    /// assert_eq!(config.storage.path, Some(PathBuf::from("/tmp/s.json")));
    /// assert_eq!(config.logging.file, None);
    /// ```
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(path) = non_empty(STORE_ENV) {
            self.storage.path = Some(PathBuf::from(path));
        }
        if let Some(path) = non_empty(LOG_FILE_ENV) {
            self.logging.file = Some(PathBuf::from(path));
        }
    }
}
