//! Widget components for the newtab TUI.
//!
//! Every renderer is a pure function from state to a buffer, which keeps
//! them easy to test and compose.
//!
//! # Modules
//!
//! - [`slot`]: Draws one widget slot, picking the body for its view
//! - [`panel`]: The slot frame and accent colours
//! - [`status`]: Loading and error bodies
//! - [`form`]: Onboarding and settings forms
//! - [`weather`], [`football`], [`mail`]: Data bodies
//! - [`help`]: The keybinding overlay
//!
//! # Example
//!
//! ```
//! use ratatui::buffer::Buffer;
//! use ratatui::layout::Rect;
//! use newtab_tui::widgets;
//!
//! let area = Rect::new(0, 0, 30, 8);
//! let mut buf = Buffer::empty(area);
//!
//! let inner = widgets::render_panel("Weather", "#ff8800", true, area, &mut buf);
//! widgets::render_loading(inner, &mut buf);
//! ```

pub mod football;
pub mod form;
pub mod help;
pub mod mail;
pub mod panel;
pub mod slot;
pub mod status;
pub mod weather;

// Re-export primary rendering functions for convenience
pub use football::render_football;
pub use form::render_form;
pub use help::render_help_overlay;
pub use mail::render_mail;
pub use panel::{accent_color, render_panel};
pub use slot::render_slot;
pub use status::{render_error, render_loading};
pub use weather::render_weather;
