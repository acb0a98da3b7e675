//! Widget engine for newtab.
//!
//! This crate holds everything between the terminal UI and the remote
//! services:
//!
//! - [`KvStore`] and its implementations: [`MemoryStore`], the JSON-file
//!   backed [`FileStore`], and [`LocalStore`] which degrades to memory when
//!   the disk is unavailable
//! - [`ResponseCache`]: one TTL-bounded cache slot per widget
//! - [`Widget`]: the fetcher contract, implemented by [`WeatherWidget`],
//!   [`FootballWidget`] and [`MailWidget`]
//! - [`Presenter`]: the per-widget state machine, exposed to the UI as a
//!   [`Controller`]
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use newtab_protocol::ActivationCounter;
//! use newtab_widgets::{Controller, LocalStore, Presenter, Transition, WeatherWidget, build_client};
//!
//! # async fn example() -> newtab_widgets::Result<()> {
//! let store = LocalStore::open("/tmp/newtab/store.json").await;
//! let client = build_client(Duration::from_secs(10), "newtab")?;
//! let weather = WeatherWidget::new(client, "https://api.openweathermap.org/data/2.5");
//! let controller: Arc<dyn Controller> = Arc::new(Presenter::new(weather, store));
//!
//! let counter = ActivationCounter::new();
//! let outcome = controller
//!     .run(counter.begin(), Transition::Activate { interactive: false })
//!     .await;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod football;
mod http;
pub mod mail;
pub mod presenter;
pub mod store;
pub mod weather;
pub mod widget;

pub use cache::{CacheEntry, ResponseCache};
pub use error::{Error, FetchError, Result};
pub use football::FootballWidget;
pub use http::build_client;
pub use mail::{AuthProvider, GoogleAuth, LoopbackFlow, MailWidget};
pub use presenter::{Clock, Controller, Outcome, Presenter, Transition};
pub use store::{FileStore, KvStore, LocalStore, MemoryStore};
pub use weather::WeatherWidget;
pub use widget::Widget;
