//! Weather widget backed by the OpenWeatherMap 2.5 API.
//!
//! Current conditions come from `/weather`, the five day outlook from the
//! three-hourly `/forecast` list aggregated into calendar days. Both
//! requests run concurrently.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use newtab_protocol::{
    CurrentConditions, DailyForecast, ErrorKind, Location, WeatherReport, WeatherSettings,
    WidgetData,
};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::FetchError;
use crate::http::get_json;
use crate::widget::Widget;

/// Number of forecast days kept.
const FORECAST_DAYS: usize = 5;

const INVALID_KEY: &str = "API key rejected. If your key is new, wait up to 2 hours for it to activate, then try again.";
const NO_LOCATION: &str = "Set a location (city or lat,lon) to load the weather.";
const UNKNOWN_LOCATION: &str = "Location not found. Check the city name.";
const UNREACHABLE: &str = "Could not load weather. Check your connection and try reloading.";

/// The weather widget.
#[derive(Debug, Clone)]
pub struct WeatherWidget {
    client: Client,
    base_url: String,
}

impl WeatherWidget {
    /// Creates the widget against the given API base URL.
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn request(
        &self,
        endpoint: &str,
        settings: &WeatherSettings,
        location: &Location,
    ) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}/{endpoint}", self.base_url))
            .query(&location.query())
            .query(&[
                ("appid", settings.api_key.trim()),
                ("units", settings.units.as_str()),
            ])
    }
}

impl Widget for WeatherWidget {
    type Settings = WeatherSettings;
    type Payload = WeatherReport;
    type Auth = ();

    const TTL: Duration = Duration::from_secs(30 * 60);

    async fn authorize(
        &self,
        _settings: &WeatherSettings,
        _interactive: bool,
    ) -> Result<(), FetchError> {
        Ok(())
    }

    #[instrument(skip_all, fields(units = %settings.units))]
    async fn fetch(
        &self,
        settings: &WeatherSettings,
        _auth: &(),
    ) -> Result<WeatherReport, FetchError> {
        let location = settings
            .location()
            .ok_or_else(|| FetchError::new(ErrorKind::NotFound, NO_LOCATION))?;

        let (current, forecast) = tokio::join!(
            get_json::<CurrentResponse>(self.request("weather", settings, &location)),
            get_json::<ForecastResponse>(self.request("forecast", settings, &location)),
        );

        let (current, forecast) = match (current, forecast) {
            (Ok(current), Ok(forecast)) => (current, forecast),
            (Err(a), Err(b)) => return Err(weather_error(most_actionable(a.kind, b.kind))),
            (Err(e), _) | (_, Err(e)) => return Err(weather_error(e.kind)),
        };

        let report = normalize(current, forecast, settings);
        debug!(
            location = %report.current.location,
            days = report.daily.len(),
            "fetched weather"
        );
        Ok(report)
    }

    fn present(payload: WeatherReport, _settings: &WeatherSettings) -> WidgetData {
        WidgetData::Weather(payload)
    }
}

/// Picks the error kind that says the most about what the user must fix.
fn most_actionable(a: ErrorKind, b: ErrorKind) -> ErrorKind {
    let rank = |kind: ErrorKind| match kind {
        ErrorKind::InvalidCredentials => 3,
        ErrorKind::NotFound => 2,
        ErrorKind::RateLimited => 1,
        _ => 0,
    };
    if rank(b) > rank(a) { b } else { a }
}

fn weather_error(kind: ErrorKind) -> FetchError {
    match kind {
        ErrorKind::InvalidCredentials => FetchError::new(kind, INVALID_KEY),
        ErrorKind::NotFound => FetchError::new(kind, UNKNOWN_LOCATION),
        ErrorKind::RateLimited => FetchError::from_kind(kind),
        _ => FetchError::transient(UNREACHABLE),
    }
}

#[derive(Debug, Deserialize)]
struct Condition {
    icon: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct CurrentMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct Sys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    name: String,
    sys: Sys,
    main: CurrentMain,
    wind: Wind,
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct SlotMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct Slot {
    dt: i64,
    main: SlotMain,
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize, Default)]
struct City {
    /// Shift from UTC in seconds.
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<Slot>,
    #[serde(default)]
    city: City,
}

fn normalize(
    current: CurrentResponse,
    forecast: ForecastResponse,
    settings: &WeatherSettings,
) -> WeatherReport {
    let (icon, description) = current
        .weather
        .into_iter()
        .next()
        .map(|c| (c.icon, c.description))
        .unwrap_or_default();

    let offset = FixedOffset::east_opt(forecast.city.timezone).unwrap_or_else(|| Utc.fix());

    WeatherReport {
        current: CurrentConditions {
            location: current.name,
            country: current.sys.country,
            temperature: current.main.temp,
            description,
            icon,
            humidity: current.main.humidity,
            wind_speed: current.wind.speed,
        },
        daily: aggregate_daily(&forecast.list, offset),
        units: settings.units,
    }
}

/// Groups three-hourly slots into local calendar days, in order of first
/// appearance, keeping at most five days.
///
/// Each day takes the icon and description of its middle slot and the
/// rounded extremes of its temperatures.
fn aggregate_daily(slots: &[Slot], offset: FixedOffset) -> Vec<DailyForecast> {
    let mut order: Vec<NaiveDate> = Vec::new();
    let mut days: HashMap<NaiveDate, Vec<&Slot>> = HashMap::new();

    for slot in slots {
        let Some(at) = DateTime::<Utc>::from_timestamp(slot.dt, 0) else {
            continue;
        };
        let date = at.with_timezone(&offset).date_naive();
        let bucket = days.entry(date).or_default();
        if bucket.is_empty() {
            order.push(date);
        }
        bucket.push(slot);
    }

    order
        .into_iter()
        .take(FORECAST_DAYS)
        .filter_map(|date| {
            let slots = days.get(&date)?;
            let middle = slots.get(slots.len() / 2)?;
            let condition = middle.weather.first();
            let temps = slots.iter().map(|s| s.main.temp);
            let min = temps.clone().fold(f64::INFINITY, f64::min);
            let max = temps.fold(f64::NEG_INFINITY, f64::max);
            Some(DailyForecast {
                date,
                icon: condition.map(|c| c.icon.clone()).unwrap_or_default(),
                description: condition.map(|c| c.description.clone()).unwrap_or_default(),
                min: round_half_up(min),
                max: round_half_up(max),
            })
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation)]
fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use newtab_protocol::Units;
    use serde_json::{Value, json};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn slot(dt: i64, temp: f64, icon: &str) -> Value {
        json!({
            "dt": dt,
            "main": { "temp": temp },
            "weather": [{ "icon": icon, "description": format!("sky {icon}") }]
        })
    }

    fn current_body() -> Value {
        json!({
            "name": "Lyon",
            "sys": { "country": "FR" },
            "main": { "temp": 12.6, "humidity": 71 },
            "wind": { "speed": 3.4 },
            "weather": [{ "icon": "03d", "description": "scattered clouds" }]
        })
    }

    fn settings() -> WeatherSettings {
        WeatherSettings {
            api_key: "k".into(),
            units: Units::Metric,
            location: "Lyon,FR".into(),
            accent: String::new(),
        }
    }

    fn widget(server: &MockServer) -> WeatherWidget {
        let client = crate::http::build_client(Duration::from_secs(5), "test").unwrap();
        WeatherWidget::new(client, server.uri())
    }

    #[test]
    fn aggregate_groups_by_local_day() {
        // 2024-03-04 00:00 UTC
        let base = 1_709_510_400;
        let slots: Vec<Slot> = serde_json::from_value(json!([
            slot(base, 4.4, "01n"),
            slot(base + 3 * 3600, 2.5, "02n"),
            slot(base + 6 * 3600, -0.5, "03d"),
            slot(base + 24 * 3600, 8.0, "10d"),
        ]))
        .unwrap();

        let days = aggregate_daily(&slots, Utc.fix());
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(days[0].icon, "02n");
        assert_eq!(days[0].min, 0);
        assert_eq!(days[0].max, 4);
        assert_eq!(days[1].icon, "10d");

        // Two hours ahead nothing changes day.
        let shifted = aggregate_daily(&slots, FixedOffset::east_opt(2 * 3600).unwrap());
        assert_eq!(shifted[0].date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());

        // Five hours behind, the first two slots belong to March 3.
        let behind = aggregate_daily(&slots, FixedOffset::west_opt(5 * 3600).unwrap());
        assert_eq!(behind.len(), 2);
        assert_eq!(behind[0].date, NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
        assert_eq!(behind[0].min, 3);
        assert_eq!(behind[0].max, 4);
    }

    #[test]
    fn aggregate_keeps_five_days() {
        let base = 1_709_510_400;
        let slots: Vec<Slot> = serde_json::from_value(Value::Array(
            (0..7).map(|d| slot(base + d * 86_400, 1.0, "01d")).collect(),
        ))
        .unwrap();
        assert_eq!(aggregate_daily(&slots, Utc.fix()).len(), 5);
    }

    #[test]
    fn rounding_matches_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-0.4), 0);
    }

    #[tokio::test]
    async fn fetch_combines_both_endpoints() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Lyon,FR"))
            .and(query_param("appid", "k"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "list": [slot(1_709_510_400, 5.0, "01d")],
                "city": { "timezone": 3600 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let report = widget(&server).fetch(&settings(), &()).await.unwrap();
        assert_eq!(report.current.location, "Lyon");
        assert_eq!(report.current.humidity, 71);
        assert_eq!(report.daily.len(), 1);
        assert_eq!(report.units, Units::Metric);
    }

    #[tokio::test]
    async fn unauthorized_on_either_endpoint_is_invalid_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = widget(&server).fetch(&settings(), &()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCredentials);
        assert_eq!(err.message, INVALID_KEY);
    }

    #[tokio::test]
    async fn forbidden_key_is_invalid_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = widget(&server).fetch(&settings(), &()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCredentials);
        assert_eq!(err.message, INVALID_KEY);
        assert!(!err.message.contains("401"));
    }

    #[tokio::test]
    async fn server_error_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = widget(&server).fetch(&settings(), &()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Transient);
        assert_eq!(err.message, UNREACHABLE);
    }

    #[tokio::test]
    async fn missing_location_routes_to_settings() {
        let server = MockServer::start().await;
        let mut settings = settings();
        settings.location.clear();

        let err = widget(&server).fetch(&settings, &()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[test]
    fn invalid_key_outranks_not_found() {
        assert_eq!(
            most_actionable(ErrorKind::NotFound, ErrorKind::InvalidCredentials),
            ErrorKind::InvalidCredentials
        );
        assert_eq!(
            most_actionable(ErrorKind::NotFound, ErrorKind::Transient),
            ErrorKind::NotFound
        );
    }
}
