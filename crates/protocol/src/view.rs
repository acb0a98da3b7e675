//! What a widget slot displays.
//!
//! Every widget is always in exactly one [`WidgetView`]. Presenters produce
//! views; the TUI only renders them.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::football::{Fixture, Phase};
use crate::form::Form;
use crate::mail::EmailSummary;
use crate::weather::WeatherReport;

/// Where rendered data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataOrigin {
    /// A cache entry still within its TTL.
    Cached,
    /// A successful fetch during this activation.
    Fresh,
}

/// Data ready to be rendered by one of the widget renderers.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetData {
    /// Current conditions and forecast.
    Weather(WeatherReport),
    /// The next match.
    Football {
        /// The fixture.
        fixture: Fixture,
        /// Offset used for the kickoff labels.
        utc_offset_hours: i32,
    },
    /// The newest inbox messages.
    Mail(Vec<EmailSummary>),
}

impl WidgetData {
    /// Returns how often the rendered data needs a re-render, if at all.
    ///
    /// Only the football widget ticks: its countdown and live badge depend
    /// on the wall clock.
    #[must_use]
    pub fn tick_interval(&self, now: DateTime<Utc>) -> Option<Duration> {
        match self {
            Self::Football { fixture, .. } => fixture.phase(now).tick_interval(),
            Self::Weather(_) | Self::Mail(_) => None,
        }
    }

    /// Returns `true` once the data no longer describes anything worth
    /// showing, so the widget should re-activate instead of re-rendering.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self {
            Self::Football { fixture, .. } => fixture.phase(now) == Phase::Past,
            Self::Weather(_) | Self::Mail(_) => false,
        }
    }
}

/// The current state of a widget slot.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetView {
    /// An activation is in flight.
    Loading,
    /// First-run credential prompt.
    Onboarding(Form),
    /// Settings panel, possibly with an inline message.
    Settings(Form),
    /// Rendered data.
    Data {
        /// The data.
        data: WidgetData,
        /// Whether it came from the cache.
        origin: DataOrigin,
        /// The user's accent colour text.
        accent: String,
    },
    /// A failure with a retry affordance.
    Error {
        /// User-facing message.
        message: String,
    },
}

impl WidgetView {
    /// Returns the form shown by this view, if any.
    #[must_use]
    pub fn form(&self) -> Option<&Form> {
        match self {
            Self::Onboarding(form) | Self::Settings(form) => Some(form),
            _ => None,
        }
    }

    /// Returns `true` while an activation is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns a short name for the view, used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Onboarding(_) => "onboarding",
            Self::Settings(_) => "settings",
            Self::Data { .. } => "data",
            Self::Error { .. } => "error",
        }
    }
}
