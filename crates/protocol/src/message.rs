//! TUI message types for event handling.
//!
//! This module defines the message enum used for communication between
//! the TUI input handler and the application state.

use serde::{Deserialize, Serialize};

/// Messages that represent user actions in the TUI.
///
/// These messages are produced by the input handler and consumed by
/// the application state to update the UI.
///
/// # Examples
///
/// ```
/// use newtab_protocol::Message;
///
/// let msg = Message::FocusNext;
/// assert!(msg.is_navigation());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Message {
    /// Quit the application.
    Quit,
    /// Move focus to the next widget.
    FocusNext,
    /// Move focus to the previous widget.
    FocusPrev,
    /// Clear the focused widget's cache and reload it.
    Refresh,
    /// Open the focused widget's settings panel.
    OpenSettings,
    /// Toggle help overlay.
    ToggleHelp,
    /// Escape: close the help overlay (contextual).
    Escape,
    /// Retry the focused widget after an error.
    Select,

    // --- Form messages ---
    /// Move the form cursor.
    FormNavigate {
        /// Direction to navigate (positive = down, negative = up).
        delta: i32,
    },
    /// Edit the selected field, or trigger the selected action.
    FormActivate,
    /// Confirm the current edit.
    FormConfirm,
    /// Cancel the current edit, or leave the settings panel.
    FormCancel,
    /// Input a character while editing.
    FormInput {
        /// The character that was input.
        ch: char,
    },
    /// Delete the character before the cursor while editing.
    FormBackspace,
}

impl Message {
    /// Returns `true` if this message moves focus or the form cursor.
    ///
    /// # Examples
    ///
    /// ```
    /// use newtab_protocol::Message;
    ///
    /// assert!(Message::FocusPrev.is_navigation());
    /// assert!(Message::FormNavigate { delta: 1 }.is_navigation());
    /// assert!(!Message::Refresh.is_navigation());
    /// ```
    #[must_use]
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::FocusNext | Self::FocusPrev | Self::FormNavigate { .. }
        )
    }

    /// Returns `true` if this message should terminate the application.
    ///
    /// # Examples
    ///
    /// ```
    /// use newtab_protocol::Message;
    ///
    /// assert!(Message::Quit.is_terminating());
    /// assert!(!Message::Escape.is_terminating());
    /// ```
    #[must_use]
    pub fn is_terminating(&self) -> bool {
        matches!(self, Self::Quit)
    }

    /// Returns `true` if this message targets the focused widget's form.
    #[must_use]
    pub fn is_form(&self) -> bool {
        matches!(
            self,
            Self::FormNavigate { .. }
                | Self::FormActivate
                | Self::FormConfirm
                | Self::FormCancel
                | Self::FormInput { .. }
                | Self::FormBackspace
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_navigation_detection() {
        assert!(Message::FocusNext.is_navigation());
        assert!(Message::FocusPrev.is_navigation());
        assert!(Message::FormNavigate { delta: -1 }.is_navigation());
        assert!(!Message::Select.is_navigation());
        assert!(!Message::Quit.is_navigation());
    }

    #[test]
    fn message_form_detection() {
        assert!(Message::FormActivate.is_form());
        assert!(Message::FormInput { ch: 'a' }.is_form());
        assert!(Message::FormBackspace.is_form());
        assert!(!Message::OpenSettings.is_form());
        assert!(!Message::Refresh.is_form());
    }

    #[test]
    fn message_json_format() {
        let json = serde_json::to_string(&Message::OpenSettings).expect("serialize");
        assert_eq!(json, r#""open_settings""#);

        let json = serde_json::to_string(&Message::FormInput { ch: 'x' }).expect("serialize");
        assert_eq!(json, r#"{"form_input":{"ch":"x"}}"#);
    }
}
