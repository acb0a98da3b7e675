//! Configuration management for the newtab dashboard.
//!
//! This crate handles loading, validating, and persisting the application
//! configuration from files, environment variables and defaults. Widget
//! credentials and preferences are not configured here; each widget keeps
//! its own settings in the widget store.
//!
//! # Overview
//!
//! - [`config`]: Core configuration struct and loading logic
//! - [`endpoints`]: Remote service base URLs
//! - [`http`]: Request timeout and user agent
//! - [`storage`]: Store and log file locations
//! - [`persistence`]: Config file reading and writing
//! - [`error`]: Error types for configuration operations
//!
//! # Configuration Sources (Priority)
//!
//! 1. Environment variables (`NEWTAB_STORE`, `NEWTAB_LOG`)
//! 2. Local config (`./newtab.json5` or `./newtab.json`)
//! 3. User config (`~/.config/newtab/config.json5` or `~/.config/newtab/config.json`)
//! 4. Built-in defaults
//!
//! # Example File
//!
//! ```json5
//! {
//!   // Display order; omit a widget to hide it
//!   widgets: ["weather", "football", "mail"],
//!   http: { timeout_secs: 10 },
//!   logging: { filter: "info,newtab_widgets=debug" },
//! }
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use newtab_config::Config;
//!
//! # fn example() -> newtab_config::Result<()> {
//! let mut config = Config::load()?;
//! config.apply_env_overrides();
//!
//! println!("Store at {}", config.storage.resolve()?.display());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod persistence;
pub mod storage;

// Re-export primary types at crate root for convenience
pub use config::Config;
pub use endpoints::{EndpointsConfig, OAuthEndpoints};
pub use error::{ConfigError, Result};
pub use http::HttpConfig;
pub use storage::{LoggingConfig, StorageConfig};
