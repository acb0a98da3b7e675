//! Error types shared by all widgets.
//!
//! This module defines the closed failure taxonomy every fetcher maps its
//! transport errors into, the view each failure routes to, and the error
//! type for protocol-level validation (settings forms, widget names).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of reasons a widget could not show data.
///
/// Fetchers never surface raw transport errors; every failure is mapped
/// into one of these kinds so the presenter can route it.
///
/// # Examples
///
/// ```
/// use newtab_protocol::{ErrorKind, ErrorRoute};
///
/// assert_eq!(ErrorKind::from_status(403), ErrorKind::InvalidCredentials);
/// assert_eq!(ErrorKind::NotFound.route(), ErrorRoute::Settings);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The widget has no stored credentials yet.
    MissingCredentials,
    /// The remote service rejected the stored credentials.
    InvalidCredentials,
    /// The configured entity (team, location) does not exist, or the
    /// request returned nothing to show.
    NotFound,
    /// The remote service asked us to slow down.
    RateLimited,
    /// A network failure, a server error or an undecodable response.
    Transient,
    /// A bearer token expired mid-session.
    AuthExpired,
}

impl ErrorKind {
    /// Maps a non-success HTTP status code to an error kind.
    ///
    /// | Status | Kind |
    /// |--------|------|
    /// | 401, 403 | `InvalidCredentials` |
    /// | 404 | `NotFound` |
    /// | 429 | `RateLimited` |
    /// | anything else | `Transient` |
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::InvalidCredentials,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            _ => Self::Transient,
        }
    }

    /// Returns the view a failure of this kind routes to.
    #[must_use]
    pub const fn route(self) -> ErrorRoute {
        match self {
            Self::MissingCredentials | Self::AuthExpired => ErrorRoute::Onboarding,
            Self::InvalidCredentials | Self::NotFound => ErrorRoute::Settings,
            Self::RateLimited | Self::Transient => ErrorRoute::Error,
        }
    }

    /// Returns a generic user-facing description of this kind.
    ///
    /// Fetchers usually attach a more specific message; this is the
    /// fallback when they don't.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::MissingCredentials => "Credentials are required to load this widget.",
            Self::InvalidCredentials => "The credentials were rejected.",
            Self::NotFound => "Nothing was found for the configured settings.",
            Self::RateLimited => "Rate limit reached. Try again in a minute.",
            Self::Transient => "Could not load data. Check your connection.",
            Self::AuthExpired => "Session expired. Please sign in again.",
        }
    }
}

/// The view a failed activation transitions to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorRoute {
    /// Show the onboarding form.
    Onboarding,
    /// Show the settings panel with an inline message.
    Settings,
    /// Show an error view with a retry affordance.
    Error,
}

/// Errors that can occur during protocol operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The widget name is not one of the known kinds.
    #[error("unknown widget: {0}")]
    UnknownWidget(String),

    /// A form field holds a value that cannot be applied.
    #[error("{label}: {reason}")]
    InvalidField {
        /// The label of the offending field.
        label: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// A specialized Result type for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
