//! HTTP client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default request timeout (10 seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Minimum allowed request timeout (1 second).
pub const MIN_TIMEOUT_SECS: u64 = 1;

/// Maximum allowed request timeout (2 minutes).
pub const MAX_TIMEOUT_SECS: u64 = 120;

/// Settings shared by every outgoing request.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use newtab_config::HttpConfig;
///
/// let http = HttpConfig::default();
/// assert_eq!(http.timeout(), Duration::from_secs(10));
/// assert!(http.user_agent.starts_with("newtab/"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: concat!("newtab/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    /// Returns the timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validates the timeout range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimeout`] if the timeout is outside
    /// [`MIN_TIMEOUT_SECS`]..=[`MAX_TIMEOUT_SECS`].
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs < MIN_TIMEOUT_SECS {
            return Err(ConfigError::InvalidTimeout {
                reason: format!(
                    "timeout {} is below minimum of {} seconds",
                    self.timeout_secs, MIN_TIMEOUT_SECS
                ),
            });
        }

        if self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::InvalidTimeout {
                reason: format!(
                    "timeout {} exceeds maximum of {} seconds",
                    self.timeout_secs, MAX_TIMEOUT_SECS
                ),
            });
        }

        Ok(())
    }
}
