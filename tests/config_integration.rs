//! Integration tests for the newtab-config crate.

use std::fs;
use std::path::PathBuf;

use newtab_config::{Config, ConfigError};
use newtab_protocol::WidgetKind;
use tempfile::TempDir;

#[tokio::test]
async fn config_load_from_json5_file() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("newtab.json5");

    fs::write(
        &config_path,
        r#"
        {
            // Configuration for newtab
            widgets: ["football", "weather"],
            endpoints: {
                football: "http://127.0.0.1:9000/v4",
                oauth: { redirect_port: 8765 },
            },
            http: {
                timeout_secs: 30,
                user_agent: "newtab-tests",
            },
            storage: { path: "/tmp/newtab/store.json" },
        }
        "#,
    )
    .unwrap();

    let config = Config::load_from(&config_path).unwrap();

    assert_eq!(config.widgets, vec![WidgetKind::Football, WidgetKind::Weather]);
    assert_eq!(config.endpoints.football, "http://127.0.0.1:9000/v4");
    assert_eq!(
        config.endpoints.weather,
        newtab_config::endpoints::DEFAULT_WEATHER_URL
    );
    assert_eq!(config.endpoints.oauth.redirect_port, 8765);
    assert_eq!(config.http.timeout_secs, 30);
    assert_eq!(config.http.user_agent, "newtab-tests");
    assert_eq!(
        config.storage.resolve().unwrap(),
        PathBuf::from("/tmp/newtab/store.json")
    );
}

#[tokio::test]
async fn config_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("nested").join("config.json");

    let mut original = Config {
        widgets: vec![WidgetKind::Mail],
        ..Default::default()
    };
    original.endpoints.mail = "http://localhost:8080/gmail".to_string();
    original.logging.filter = "newtab_widgets=trace".to_string();
    original.logging.file = Some(dir.path().join("newtab.log"));

    original.save_to(&config_path).unwrap();
    let loaded = Config::load_from(&config_path).unwrap();

    assert_eq!(original, loaded);
}

#[tokio::test]
async fn config_load_nonexistent_file_fails() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("missing.json5");

    let result = Config::load_from(&config_path);
    assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
}

#[tokio::test]
async fn config_load_invalid_syntax() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("invalid.json5");

    fs::write(&config_path, "{ widgets: [ ").unwrap();

    let result = Config::load_from(&config_path);
    assert!(matches!(result, Err(ConfigError::ParseJson5(_))));
}

#[tokio::test]
async fn config_load_unknown_widget_fails() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.json5");

    fs::write(&config_path, r#"{ widgets: ["weather", "stocks"] }"#).unwrap();

    assert!(Config::load_from(&config_path).is_err());
}

#[tokio::test]
async fn config_load_validates() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.json5");

    fs::write(
        &config_path,
        r#"{ widgets: ["mail"], endpoints: { weather: "openweathermap.org" } }"#,
    )
    .unwrap();

    let err = Config::load_from(&config_path).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidEndpoint {
            name: "weather",
            ..
        }
    ));
    assert!(err.to_string().contains("openweathermap.org"));
}

#[tokio::test]
async fn overrides_replace_file_locations() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.json5");
    fs::write(&config_path, r#"{ storage: { path: "/from/file.json" } }"#).unwrap();

    let mut config = Config::load_from(&config_path).unwrap();
    config.apply_overrides(|name| match name {
        "NEWTAB_STORE" => Some("/from/env.json".to_string()),
        "NEWTAB_LOG" => Some("/from/env.log".to_string()),
        _ => None,
    });

    assert_eq!(config.storage.resolve().unwrap(), PathBuf::from("/from/env.json"));
    assert_eq!(
        config.logging.resolve_file().unwrap(),
        PathBuf::from("/from/env.log")
    );
}
