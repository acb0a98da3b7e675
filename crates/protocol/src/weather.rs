//! Weather payload types.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Measurement system requested from the weather service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Celsius and metres per second.
    #[default]
    Metric,
    /// Fahrenheit and miles per hour.
    Imperial,
}

impl Units {
    /// Returns the value sent as the `units` query parameter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    /// Returns the temperature suffix, e.g. `°C`.
    #[must_use]
    pub fn temperature_suffix(self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
        }
    }

    /// Returns the wind speed suffix, e.g. `m/s`.
    #[must_use]
    pub fn wind_suffix(self) -> &'static str {
        match self {
            Self::Metric => "m/s",
            Self::Imperial => "mph",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" | "c" | "celsius" => Ok(Self::Metric),
            "imperial" | "f" | "fahrenheit" => Ok(Self::Imperial),
            _ => Err(ProtocolError::InvalidField {
                label: "Units",
                reason: format!("expected \"metric\" or \"imperial\", got \"{}\"", s.trim()),
            }),
        }
    }
}

/// Conditions at the configured location right now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// City name as reported by the service.
    pub location: String,
    /// ISO country code.
    pub country: String,
    /// Temperature in the requested units.
    pub temperature: f64,
    /// Human readable description, e.g. "light rain".
    pub description: String,
    /// Service icon code, e.g. `10d`.
    pub icon: String,
    /// Relative humidity in percent.
    pub humidity: u8,
    /// Wind speed in the requested units.
    pub wind_speed: f64,
}

/// One aggregated forecast day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// The calendar day, in the location's timezone.
    pub date: NaiveDate,
    /// Icon code of the middle slot of the day.
    pub icon: String,
    /// Description of the middle slot of the day.
    pub description: String,
    /// Rounded minimum temperature.
    pub min: i32,
    /// Rounded maximum temperature.
    pub max: i32,
}

impl DailyForecast {
    /// Returns the short weekday name, e.g. `Mon`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use newtab_protocol::DailyForecast;
    ///
    /// let day = DailyForecast {
    ///     date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
    ///     icon: "01d".into(),
    ///     description: "clear sky".into(),
    ///     min: 3,
    ///     max: 11,
    /// };
    /// assert_eq!(day.weekday(), "Mon");
    /// ```
    #[must_use]
    pub fn weekday(&self) -> String {
        self.date.weekday().to_string()
    }
}

/// The normalized weather payload cached and rendered by the weather widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// Current conditions.
    pub current: CurrentConditions,
    /// Up to five aggregated days.
    pub daily: Vec<DailyForecast>,
    /// Units the temperatures are expressed in.
    pub units: Units,
}

/// Returns a single-glyph symbol for a weather service icon code.
///
/// Only the two-digit condition prefix matters; the day/night suffix is
/// ignored.
///
/// # Examples
///
/// ```
/// use newtab_protocol::weather::icon_symbol;
///
/// assert_eq!(icon_symbol("01d"), "☀");
/// assert_eq!(icon_symbol("10n"), "☂");
/// assert_eq!(icon_symbol(""), "·");
/// ```
#[must_use]
pub fn icon_symbol(icon: &str) -> &'static str {
    match icon.get(..2) {
        Some("01") => "☀",
        Some("02") => "⛅",
        Some("03" | "04") => "☁",
        Some("09" | "10") => "☂",
        Some("11") => "⚡",
        Some("13") => "❄",
        Some("50") => "≡",
        _ => "·",
    }
}
