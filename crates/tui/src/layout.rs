//! Centralized layout measurements for the TUI.
//!
//! This module defines shared constants for layout dimensions used across
//! the dashboard.

/// Height of the header bar in rows.
///
/// The header displays the application title, the clock and the help cue.
pub const HEADER_HEIGHT: u16 = 3;

/// Minimum terminal height for useful rendering (content area).
///
/// Below this height, we display a "terminal too small" message. It fits
/// the tallest widget body: a settings form with four fields, a hint line,
/// the buttons, an inline message and the key hints, inside the panel
/// borders.
pub const MIN_HEIGHT: u16 = 14;

/// Minimum terminal height for rendering with header.
///
/// When terminal height is between `MIN_HEIGHT` and `MIN_HEIGHT_WITH_HEADER`,
/// we hide the header to reclaim 3 rows of content space.
pub const MIN_HEIGHT_WITH_HEADER: u16 = MIN_HEIGHT + HEADER_HEIGHT;

/// Minimum width of one widget slot.
pub const MIN_SLOT_WIDTH: u16 = 30;

/// Minimum terminal width for useful rendering.
///
/// Slots are laid out side by side; narrower terminals stack them instead,
/// so a single slot's width is enough.
pub const MIN_WIDTH: u16 = MIN_SLOT_WIDTH;
