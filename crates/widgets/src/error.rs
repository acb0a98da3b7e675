//! Error types for the widget engine.
//!
//! Two families live here. [`Error`] covers local failures (store I/O,
//! serialization, the OAuth loopback flow) and is propagated with `?`.
//! [`FetchError`] is what a fetcher reports to the presenter: it always
//! carries an [`ErrorKind`] so the failure can be routed to a view.

use newtab_protocol::ErrorKind;

/// Errors that can occur during store, cache or sign-in operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred while reading or writing the store.
    #[error("I/O error during store operation: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be encoded or decoded.
    #[error("failed to (de)serialize stored value: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// The OAuth sign-in flow did not produce a token.
    #[error("sign-in failed: {reason}")]
    OAuth {
        /// A description of what went wrong.
        reason: String,
    },
}

impl Error {
    /// Creates an [`Error::OAuth`] with the given reason.
    pub(crate) fn oauth(reason: impl Into<String>) -> Self {
        Self::OAuth {
            reason: reason.into(),
        }
    }
}

/// A specialized Result type for widget engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A classified fetch failure.
///
/// The message is user-facing and shown verbatim in the settings panel or
/// the error view.
///
/// # Examples
///
/// ```
/// use newtab_protocol::ErrorKind;
/// use newtab_widgets::FetchError;
///
/// let err = FetchError::new(ErrorKind::NotFound, "Team ID not found.");
/// assert_eq!(err.to_string(), "Team ID not found.");
///
/// let err = FetchError::from_kind(ErrorKind::RateLimited);
/// assert_eq!(err.message, ErrorKind::RateLimited.describe());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FetchError {
    /// How the failure is routed.
    pub kind: ErrorKind,
    /// What the user is told.
    pub message: String,
    /// The HTTP status that caused the failure, if there was one.
    pub status: Option<u16>,
}

impl FetchError {
    /// Creates a fetch error with a specific message.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    /// Creates a fetch error classified from a non-success HTTP status,
    /// with the kind's generic message.
    ///
    /// # Examples
    ///
    /// ```
    /// use newtab_protocol::ErrorKind;
    /// use newtab_widgets::FetchError;
    ///
    /// let err = FetchError::from_status(403);
    /// assert_eq!(err.kind, ErrorKind::InvalidCredentials);
    /// assert_eq!(err.status, Some(403));
    /// ```
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        Self {
            status: Some(status),
            ..Self::from_kind(ErrorKind::from_status(status))
        }
    }

    /// Creates a fetch error with the kind's generic message.
    #[must_use]
    pub fn from_kind(kind: ErrorKind) -> Self {
        Self::new(kind, kind.describe())
    }

    /// Creates a [`ErrorKind::Transient`] error.
    #[must_use]
    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transient, message)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::from_status(status.as_u16()),
            None => Self::from_kind(ErrorKind::Transient),
        }
    }
}
