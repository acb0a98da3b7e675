//! Per-widget settings.
//!
//! Each widget persists one settings record in the durable store. Settings
//! are created on the first onboarding submit and overwritten wholesale on
//! every settings save. The [`Configurable`] trait ties a settings record to
//! the forms used to edit it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};
use crate::football::UTC_OFFSET_RANGE;
use crate::form::{Form, FormAction, FormField};
use crate::weather::Units;
use crate::widget::WidgetKind;

/// Hint shown under every accent field.
const ACCENT_HINT: &str = "Colour name (e.g. cyan) or #rrggbb; empty for default";

/// A widget settings record that can be edited through forms.
pub trait Configurable:
    Default + Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The widget these settings belong to.
    const KIND: WidgetKind;

    /// Returns `true` once the minimum credentials are present.
    fn has_credentials(&self) -> bool;

    /// Returns the user's accent colour text (may be empty).
    fn accent(&self) -> &str;

    /// Returns the first-run form asking for the minimum credentials.
    fn onboarding_form(&self) -> Form;

    /// Returns the full settings panel, prefilled with the current values.
    fn settings_form(&self) -> Form;

    /// Applies the fields of a submitted form on top of these settings.
    ///
    /// Fields missing from the form keep their current value.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidField`] if a value cannot be applied.
    fn apply_form(&self, form: &Form) -> Result<Self>;
}

/// Where to fetch weather for.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    /// A city query, e.g. `Paris,FR`.
    City(String),
    /// A latitude/longitude pair.
    Coordinates {
        /// Latitude in degrees.
        lat: f64,
        /// Longitude in degrees.
        lon: f64,
    },
}

impl Location {
    /// Parses a location setting.
    ///
    /// Two comma separated numbers within range are coordinates; any other
    /// non-empty text is a city query.
    ///
    /// # Examples
    ///
    /// ```
    /// use newtab_protocol::Location;
    ///
    /// assert_eq!(
    ///     Location::parse("48.85, 2.35"),
    ///     Some(Location::Coordinates { lat: 48.85, lon: 2.35 })
    /// );
    /// assert_eq!(Location::parse("Paris,FR"), Some(Location::City("Paris,FR".into())));
    /// assert_eq!(Location::parse("  "), None);
    /// ```
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        if let Some((lat, lon)) = value.split_once(',') {
            if let (Ok(lat), Ok(lon)) = (lat.trim().parse::<f64>(), lon.trim().parse::<f64>()) {
                if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
                    return Some(Self::Coordinates { lat, lon });
                }
            }
        }
        Some(Self::City(value.to_string()))
    }

    /// Returns the query parameters selecting this location.
    #[must_use]
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::City(name) => vec![("q", name.clone())],
            Self::Coordinates { lat, lon } => vec![("lat", lat.to_string()), ("lon", lon.to_string())],
        }
    }
}

/// Weather widget settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSettings {
    /// OpenWeatherMap API key.
    pub api_key: String,
    /// Measurement system.
    pub units: Units,
    /// City query or `lat,lon`.
    pub location: String,
    /// Accent colour text.
    pub accent: String,
}

impl WeatherSettings {
    /// Returns the parsed location, if one is set.
    #[must_use]
    pub fn location(&self) -> Option<Location> {
        Location::parse(&self.location)
    }
}

impl Configurable for WeatherSettings {
    const KIND: WidgetKind = WidgetKind::Weather;

    fn has_credentials(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    fn accent(&self) -> &str {
        &self.accent
    }

    fn onboarding_form(&self) -> Form {
        Form::onboarding(
            "Set up Weather",
            vec![
                FormField::text("api_key", "API key", &self.api_key)
                    .required()
                    .with_hint("Get a free key at home.openweathermap.org/api_keys"),
                FormField::text("location", "Location", &self.location)
                    .required()
                    .with_hint("City (e.g. Paris,FR) or lat,lon"),
            ],
            "Save Key",
        )
        .with_intro("Enter your free OpenWeatherMap API key to get started.")
    }

    fn settings_form(&self) -> Form {
        Form::settings(
            "Weather Settings",
            vec![
                FormField::text("api_key", "API key", &self.api_key).secret(),
                FormField::text("units", "Units", self.units.as_str())
                    .with_hint("metric (°C) or imperial (°F)"),
                FormField::text("location", "Location", &self.location)
                    .with_hint("City (e.g. Paris,FR) or lat,lon"),
                FormField::text("accent", "Accent", &self.accent).with_hint(ACCENT_HINT),
            ],
        )
    }

    fn apply_form(&self, form: &Form) -> Result<Self> {
        let mut next = self.clone();
        for field in &form.fields {
            let value = field.value.trim();
            match field.key {
                "api_key" => next.api_key = value.to_string(),
                "units" => next.units = value.parse()?,
                "location" => next.location = value.to_string(),
                "accent" => next.accent = value.to_string(),
                _ => {}
            }
        }
        Ok(next)
    }
}

/// Football widget settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootballSettings {
    /// football-data.org API key.
    pub api_key: String,
    /// The followed team's identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<u64>,
    /// Offset used to display kickoff times, in whole hours.
    pub utc_offset_hours: i32,
    /// Accent colour text.
    pub accent: String,
}

impl FootballSettings {
    fn team_id_text(&self) -> String {
        self.team_id.map(|id| id.to_string()).unwrap_or_default()
    }
}

impl Configurable for FootballSettings {
    const KIND: WidgetKind = WidgetKind::Football;

    fn has_credentials(&self) -> bool {
        !self.api_key.trim().is_empty() && self.team_id.is_some()
    }

    fn accent(&self) -> &str {
        &self.accent
    }

    fn onboarding_form(&self) -> Form {
        Form::onboarding(
            "Football Tracker",
            vec![
                FormField::text("api_key", "API key", &self.api_key)
                    .required()
                    .with_hint("Register at football-data.org/client/register"),
                FormField::text("team_id", "Team ID", self.team_id_text())
                    .required()
                    .with_hint("e.g. 66 = Manchester United"),
            ],
            "Save & Load",
        )
        .with_intro("Enter your free football-data.org API key and your team's ID.")
    }

    fn settings_form(&self) -> Form {
        Form::settings(
            "Football Settings",
            vec![
                FormField::text("api_key", "API key", &self.api_key).secret(),
                FormField::text("team_id", "Team ID", self.team_id_text())
                    .with_hint("See football-data.org/coverage"),
                FormField::text("utc_offset_hours", "GMT offset", self.utc_offset_hours.to_string())
                    .with_hint("Whole hours, -12 to 14"),
                FormField::text("accent", "Accent", &self.accent).with_hint(ACCENT_HINT),
            ],
        )
    }

    fn apply_form(&self, form: &Form) -> Result<Self> {
        let mut next = self.clone();
        for field in &form.fields {
            let value = field.value.trim();
            match field.key {
                "api_key" => next.api_key = value.to_string(),
                "team_id" if value.is_empty() => next.team_id = None,
                "team_id" => {
                    let id = value.parse::<u64>().map_err(|_| ProtocolError::InvalidField {
                        label: field.label,
                        reason: format!("\"{value}\" is not a number"),
                    })?;
                    next.team_id = Some(id);
                }
                "utc_offset_hours" => {
                    let hours = value
                        .trim_start_matches('+')
                        .parse::<i32>()
                        .ok()
                        .filter(|h| UTC_OFFSET_RANGE.contains(h))
                        .ok_or_else(|| ProtocolError::InvalidField {
                            label: field.label,
                            reason: format!(
                                "expected whole hours between {} and {}",
                                UTC_OFFSET_RANGE.start(),
                                UTC_OFFSET_RANGE.end()
                            ),
                        })?;
                    next.utc_offset_hours = hours;
                }
                "accent" => next.accent = value.to_string(),
                _ => {}
            }
        }
        Ok(next)
    }
}

/// Inbox widget settings.
///
/// The OAuth token is stored separately so signing out can drop it without
/// forgetting the client id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailSettings {
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret, for providers that require one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// Accent colour text.
    pub accent: String,
}

impl Configurable for MailSettings {
    const KIND: WidgetKind = WidgetKind::Mail;

    fn has_credentials(&self) -> bool {
        !self.client_id.trim().is_empty()
    }

    fn accent(&self) -> &str {
        &self.accent
    }

    fn onboarding_form(&self) -> Form {
        Form::onboarding(
            "Connect your inbox",
            vec![
                FormField::text("client_id", "Client ID", &self.client_id)
                    .required()
                    .with_hint("xxxx.apps.googleusercontent.com"),
                FormField::text(
                    "client_secret",
                    "Client secret",
                    self.client_secret.clone().unwrap_or_default(),
                )
                .secret()
                .with_hint("Optional, for desktop OAuth clients"),
            ],
            "Sign in",
        )
        .with_intro("Paste your OAuth client ID. A browser window opens to sign in.")
    }

    fn settings_form(&self) -> Form {
        Form::settings(
            "Inbox Settings",
            vec![
                FormField::text("client_id", "Client ID", &self.client_id),
                FormField::text(
                    "client_secret",
                    "Client secret",
                    self.client_secret.clone().unwrap_or_default(),
                )
                .secret(),
                FormField::text("accent", "Accent", &self.accent).with_hint(ACCENT_HINT),
            ],
        )
        .with_action(FormAction::SignOut)
    }

    fn apply_form(&self, form: &Form) -> Result<Self> {
        let mut next = self.clone();
        for field in &form.fields {
            let value = field.value.trim();
            match field.key {
                "client_id" => next.client_id = value.to_string(),
                "client_secret" => {
                    next.client_secret = (!value.is_empty()).then(|| value.to_string());
                }
                "accent" => next.accent = value.to_string(),
                _ => {}
            }
        }
        Ok(next)
    }
}
