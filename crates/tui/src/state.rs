//! Application state management.
//!
//! This module defines the dashboard-level state: which widget slot has
//! focus and whether the help overlay is shown. Per-widget state lives in
//! [`Slot`](crate::slot::Slot).

/// The dashboard state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    /// Number of widget slots.
    pub slot_count: usize,
    /// Index of the focused slot.
    pub focus: usize,
    /// Whether the help overlay is visible.
    pub help_visible: bool,
}

impl AppState {
    /// Creates the state for a dashboard of `slot_count` widgets, focusing
    /// the first.
    ///
    /// # Examples
    ///
    /// ```
    /// use newtab_tui::AppState;
    ///
    /// let state = AppState::new(3);
    /// assert_eq!(state.focus, 0);
    /// assert!(!state.help_visible);
    /// ```
    #[must_use]
    pub fn new(slot_count: usize) -> Self {
        Self {
            slot_count,
            focus: 0,
            help_visible: false,
        }
    }

    /// Toggles the help overlay visibility.
    ///
    /// When help is shown, other interactions are blocked until
    /// help is dismissed.
    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }

    /// Dismisses the help overlay if it is visible.
    ///
    /// Returns `true` if help was visible and has been dismissed,
    /// `false` if help was not visible.
    #[must_use]
    pub fn dismiss_help(&mut self) -> bool {
        if self.help_visible {
            self.help_visible = false;
            true
        } else {
            false
        }
    }

    /// Moves focus to the next slot, wrapping around.
    pub fn focus_next(&mut self) {
        if self.slot_count > 0 {
            self.focus = (self.focus + 1) % self.slot_count;
        }
    }

    /// Moves focus to the previous slot, wrapping around.
    pub fn focus_prev(&mut self) {
        if self.slot_count > 0 {
            self.focus = (self.focus + self.slot_count - 1) % self.slot_count;
        }
    }
}
