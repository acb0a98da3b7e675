//! Remote service base URLs.
//!
//! Every widget talks to a single HTTP API. The base URLs are configurable
//! so tests and self-hosted proxies can point the widgets elsewhere.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default OpenWeatherMap API base.
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Default football-data.org API base.
pub const DEFAULT_FOOTBALL_URL: &str = "https://api.football-data.org/v4";

/// Default Gmail API base for the signed-in user.
pub const DEFAULT_MAIL_URL: &str = "https://gmail.googleapis.com/gmail/v1/users/me";

/// Default Google OAuth consent page.
pub const DEFAULT_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Default Google OAuth token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Base URLs of the services the widgets fetch from.
///
/// # Examples
///
/// ```
/// use newtab_config::EndpointsConfig;
///
/// let endpoints = EndpointsConfig::default();
/// assert!(endpoints.validate().is_ok());
/// assert!(endpoints.weather.starts_with("https://"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    /// Weather API base URL.
    pub weather: String,
    /// Football API base URL.
    pub football: String,
    /// Mail API base URL.
    pub mail: String,
    /// OAuth endpoints used by the mail widget.
    pub oauth: OAuthEndpoints,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            weather: DEFAULT_WEATHER_URL.to_string(),
            football: DEFAULT_FOOTBALL_URL.to_string(),
            mail: DEFAULT_MAIL_URL.to_string(),
            oauth: OAuthEndpoints::default(),
        }
    }
}

impl EndpointsConfig {
    /// Checks that every endpoint is an http(s) URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] naming the first bad entry.
    pub fn validate(&self) -> Result<()> {
        check_url("weather", &self.weather)?;
        check_url("football", &self.football)?;
        check_url("mail", &self.mail)?;
        check_url("oauth.authorize_url", &self.oauth.authorize_url)?;
        check_url("oauth.token_url", &self.oauth.token_url)?;
        Ok(())
    }
}

/// OAuth authorization-code endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthEndpoints {
    /// Consent page the browser is sent to.
    pub authorize_url: String,
    /// Endpoint exchanging the authorization code for a token.
    pub token_url: String,
    /// Loopback port receiving the redirect. `0` picks a free port.
    pub redirect_port: u16,
}

impl Default for OAuthEndpoints {
    fn default() -> Self {
        Self {
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            redirect_port: 0,
        }
    }
}

fn check_url(name: &'static str, url: &str) -> Result<()> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidEndpoint {
            name,
            url: url.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_endpoints_are_accepted() {
        let endpoints = EndpointsConfig {
            weather: "http://127.0.0.1:8080".to_string(),
            ..Default::default()
        };
        assert!(endpoints.validate().is_ok());
    }

    #[test]
    fn non_http_endpoint_is_rejected() {
        let mut endpoints = EndpointsConfig::default();
        endpoints.oauth.token_url = "ftp://example.com/token".to_string();

        let err = endpoints.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEndpoint {
                name: "oauth.token_url",
                ..
            }
        ));
    }

    #[test]
    fn partial_endpoints_keep_defaults() {
        let endpoints: EndpointsConfig =
            serde_json::from_str(r#"{"football": "http://localhost:9000"}"#).unwrap();
        assert_eq!(endpoints.football, "http://localhost:9000");
        assert_eq!(endpoints.weather, DEFAULT_WEATHER_URL);
        assert_eq!(endpoints.oauth.redirect_port, 0);
    }
}
