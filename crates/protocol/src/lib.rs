//! Shared protocol types for the newtab dashboard.
//!
//! This crate defines the types every other newtab crate agrees on: widget
//! identities, the failure taxonomy, payloads, settings forms, the views a
//! widget slot can be in, and TUI messages. It performs no I/O.
//!
//! # Overview
//!
//! - [`widget`]: widget identities and their store keys
//! - [`error`]: the failure taxonomy and its routing
//! - [`activation`]: activation tokens guarding against stale results
//! - [`form`] and [`settings`]: onboarding/settings forms and the records they edit
//! - [`weather`], [`football`], [`mail`]: payloads and their formatting
//! - [`view`]: what a widget slot shows
//! - [`message`]: TUI event messages
//!
//! # Examples
//!
//! Turning a submitted onboarding form into settings:
//!
//! ```
//! use newtab_protocol::{Configurable, WeatherSettings};
//!
//! let mut form = WeatherSettings::default().onboarding_form();
//! form.set_value("api_key", "0123456789abcdef");
//! form.set_value("location", "Lyon,FR");
//! assert!(form.missing_required().is_none());
//!
//! let settings = WeatherSettings::default().apply_form(&form).unwrap();
//! assert!(settings.has_credentials());
//! ```

pub mod activation;
pub mod error;
pub mod football;
pub mod form;
pub mod mail;
pub mod message;
pub mod settings;
pub mod view;
pub mod weather;
pub mod widget;

// Re-export primary types at crate root for convenience
pub use activation::{Activation, ActivationCounter, ActivationToken};
pub use error::{ErrorKind, ErrorRoute, ProtocolError, Result};
pub use football::{Fixture, Phase, Team};
pub use form::{Form, FormAction, FormField, FormKind};
pub use mail::EmailSummary;
pub use message::Message;
pub use settings::{Configurable, FootballSettings, Location, MailSettings, WeatherSettings};
pub use view::{DataOrigin, WidgetData, WidgetView};
pub use weather::{CurrentConditions, DailyForecast, Units, WeatherReport};
pub use widget::WidgetKind;
