//! Widget identifiers.
//!
//! Every data-backed widget on the dashboard is identified by a
//! [`WidgetKind`]. The kind also namespaces the widget's entries in the
//! durable key-value store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// The data-backed widgets that can appear on the dashboard.
///
/// # Examples
///
/// ```
/// use newtab_protocol::WidgetKind;
///
/// let kind: WidgetKind = "football".parse().unwrap();
/// assert_eq!(kind, WidgetKind::Football);
/// assert_eq!(kind.settings_key(), "football.settings");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    /// Current conditions and a five day forecast.
    Weather,
    /// The next scheduled match of a followed team.
    Football,
    /// The most recent inbox messages.
    Mail,
}

impl WidgetKind {
    /// Returns the stable identifier used in config files and store keys.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Football => "football",
            Self::Mail => "mail",
        }
    }

    /// Returns the display name for this widget.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Weather => "Weather",
            Self::Football => "Football",
            Self::Mail => "Inbox",
        }
    }

    /// Returns all widget kinds in their default dashboard order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::Weather, Self::Football, Self::Mail]
    }

    /// Returns the store key holding this widget's settings.
    #[must_use]
    pub fn settings_key(self) -> String {
        format!("{}.settings", self.key())
    }

    /// Returns the store key holding this widget's cached result.
    #[must_use]
    pub fn cache_key(self) -> String {
        format!("{}.cache", self.key())
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for WidgetKind {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ProtocolError::UnknownWidget(s.to_string()))
    }
}
