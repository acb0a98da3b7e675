//! Terminal UI for the newtab dashboard.
//!
//! This crate provides a Ratatui-based dashboard that shows one slot per
//! configured widget, side by side.
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`app`]: Main application struct, event dispatch and run loop
//! - [`state`]: Dashboard state (focus, help overlay)
//! - [`slot`]: Per-widget slots: view, activation counter, ticker
//! - [`form_state`]: Cursor and edit mode of onboarding/settings forms
//! - [`ticker`]: Periodic re-render timers
//! - [`terminal`]: Terminal setup, teardown, and panic handling
//! - [`event`]: Event handling and key mappings
//! - [`widgets`]: Rendering functions
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use newtab_tui::{App, terminal};
//! use newtab_widgets::{Controller, MemoryStore, Presenter, WeatherWidget, build_client};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = build_client(std::time::Duration::from_secs(10), "newtab")?;
//!     let weather = WeatherWidget::new(client, "https://api.openweathermap.org/data/2.5");
//!     let controller: Arc<dyn Controller> = Arc::new(Presenter::new(weather, MemoryStore::new()));
//!
//!     terminal::install_panic_hook();
//!     let mut terminal = terminal::setup_terminal()?;
//!
//!     let mut app = App::new(vec![controller]);
//!     let result = app.run(&mut terminal).await;
//!
//!     terminal::restore_terminal(&mut terminal)?;
//!     result
//! }
//! ```

pub mod app;
pub mod event;
pub mod form_state;
pub mod layout;
pub mod slot;
pub mod state;
pub mod terminal;
pub mod ticker;
pub mod widgets;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export primary types at crate root for convenience
pub use app::{App, AppEvent};
pub use slot::Slot;
pub use state::AppState;
