//! Error types for configuration operations.
//!
//! This module defines the error types that can occur during configuration
//! loading, parsing, and validation.

use std::path::PathBuf;

use newtab_protocol::WidgetKind;

/// Errors that can occur during configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file at {path}: {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a configuration file.
    #[error("failed to write config file at {path}: {source}")]
    WriteFile {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse JSON5 configuration.
    #[error("failed to parse config: {0}")]
    ParseJson5(#[from] serde_json5::Error),

    /// Failed to serialize configuration to JSON.
    #[error("failed to serialize config: {0}")]
    SerializeJson(#[from] serde_json::Error),

    /// The widget list is empty.
    #[error("at least one widget must be enabled")]
    NoWidgets,

    /// A widget is listed more than once.
    #[error("widget \"{0}\" is listed more than once")]
    DuplicateWidget(WidgetKind),

    /// Invalid HTTP timeout.
    #[error("invalid http timeout: {reason}")]
    InvalidTimeout {
        /// The reason the timeout is invalid.
        reason: String,
    },

    /// An endpoint is not an http(s) URL.
    #[error("invalid {name} endpoint: \"{url}\" is not an http(s) URL")]
    InvalidEndpoint {
        /// Which endpoint.
        name: &'static str,
        /// The configured value.
        url: String,
    },

    /// Failed to determine the per-user data directory.
    #[error("could not determine data directory")]
    NoDataDirectory,
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
