//! newtab - a terminal new-tab dashboard.
//!
//! This is the main binary: it loads the configuration, sets up file
//! logging, builds one presenter per configured widget and launches the
//! TUI application.

use std::fs::{self, File};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use newtab_config::Config;
use newtab_protocol::WidgetKind;
use newtab_tui::{App, terminal};
use newtab_widgets::{
    Controller, FootballWidget, GoogleAuth, LocalStore, LoopbackFlow, MailWidget, Presenter,
    WeatherWidget, build_client,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = Config::load().context("failed to load configuration")?;
    config.apply_env_overrides();

    init_logging(&config)?;
    let controllers = build_controllers(&config).await?;

    // Install panic hook to restore terminal on panic
    terminal::install_panic_hook();

    let mut terminal = terminal::setup_terminal()?;
    let mut app = App::new(controllers);

    // Run the main loop
    let result = app.run(&mut terminal).await;

    // Always restore terminal, even if app.run() failed
    terminal::restore_terminal(&mut terminal)?;

    result
}

/// Sends logs to the configured file; the terminal belongs to the TUI.
///
/// `RUST_LOG` takes precedence over the configured filter.
fn init_logging(config: &Config) -> anyhow::Result<()> {
    let path = config.logging.resolve_file()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .context("invalid log filter")?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .init();
    Ok(())
}

/// Builds one controller per configured widget, all sharing one store and
/// one HTTP client.
async fn build_controllers(config: &Config) -> anyhow::Result<Vec<Arc<dyn Controller>>> {
    let store_path = config.storage.resolve()?;
    let store = LocalStore::open(store_path).await;
    let client = build_client(config.http.timeout(), &config.http.user_agent)?;
    let endpoints = &config.endpoints;

    let controllers = config
        .widgets
        .iter()
        .map(|kind| -> Arc<dyn Controller> {
            match kind {
                WidgetKind::Weather => Arc::new(Presenter::new(
                    WeatherWidget::new(client.clone(), &endpoints.weather),
                    store.clone(),
                )),
                WidgetKind::Football => Arc::new(Presenter::new(
                    FootballWidget::new(client.clone(), &endpoints.football),
                    store.clone(),
                )),
                WidgetKind::Mail => {
                    let flow = LoopbackFlow::new(
                        client.clone(),
                        &endpoints.oauth.authorize_url,
                        &endpoints.oauth.token_url,
                    )
                    .with_redirect_port(endpoints.oauth.redirect_port);
                    let auth = GoogleAuth::new(store.clone(), flow);
                    Arc::new(Presenter::new(
                        MailWidget::new(client.clone(), &endpoints.mail, auth),
                        store.clone(),
                    ))
                }
            }
        })
        .collect();

    info!(widgets = ?config.widgets, "dashboard configured");
    Ok(controllers)
}
