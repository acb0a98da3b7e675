//! Event handling and key mappings.
//!
//! This module provides event polling and conversion from terminal events
//! to application messages.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use newtab_protocol::Message;

/// Default poll timeout for events.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Polls for a terminal event with the default timeout.
///
/// Returns `Some(Event)` if an event is available within the timeout,
/// or `None` if the timeout expires without an event.
///
/// # Errors
///
/// Returns an error if polling the terminal fails.
pub fn poll_event() -> std::io::Result<Option<Event>> {
    if event::poll(POLL_TIMEOUT)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// How keys are interpreted for the focused slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// The slot shows data, an error or a loading indicator.
    Dashboard,
    /// The slot shows a form; the cursor is on a row.
    Form,
    /// The slot shows a form and a field is being edited.
    Editing,
}

/// Converts a terminal event to an application message.
///
/// Only key presses are handled; releases, repeats on platforms that report
/// them, mouse and resize events yield `None`.
#[must_use]
pub fn event_to_message(event: &Event, mode: InputMode) -> Option<Message> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match mode {
            InputMode::Dashboard => key_to_message(*key),
            InputMode::Form => key_to_form_message(*key, false),
            InputMode::Editing => key_to_form_message(*key, true),
        },
        _ => None,
    }
}

/// Converts a terminal key event to a dashboard message.
///
/// # Key Bindings
///
/// | Key | Action |
/// |-----|--------|
/// | `Ctrl+C` | Quit |
/// | `Esc` | Escape (close help) |
/// | `Tab` or `Right` | Focus next widget |
/// | `Shift+Tab` or `Left` | Focus previous widget |
/// | `Enter` | Retry after an error |
/// | `r` | Refresh |
/// | `s` | Open settings |
/// | `?` | Toggle help |
#[must_use]
pub fn key_to_message(key: KeyEvent) -> Option<Message> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Message::Quit);
    }

    match key.code {
        KeyCode::Esc => Some(Message::Escape),

        KeyCode::Tab | KeyCode::Right => Some(Message::FocusNext),
        KeyCode::BackTab | KeyCode::Left => Some(Message::FocusPrev),

        KeyCode::Enter => Some(Message::Select),

        KeyCode::Char('r') => Some(Message::Refresh),
        KeyCode::Char('s' | 'S') => Some(Message::OpenSettings),
        KeyCode::Char('?') => Some(Message::ToggleHelp),

        _ => None,
    }
}

/// Converts a key event to a form message.
///
/// # Key Bindings (Form Mode)
///
/// | Key | Action |
/// |-----|--------|
/// | `Up` / `Down` | Move between rows |
/// | `Enter` or `Space` | Edit field / trigger action |
/// | `Esc` | Leave the settings panel |
/// | `Tab` / `Shift+Tab` | Focus next / previous widget |
///
/// # Key Bindings (Editing)
///
/// | Key | Action |
/// |-----|--------|
/// | `Enter` | Confirm |
/// | `Esc` | Cancel |
/// | `Backspace` | Delete before cursor |
/// | Any char | Input |
#[must_use]
pub fn key_to_form_message(key: KeyEvent, is_editing: bool) -> Option<Message> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Message::Quit);
    }

    if is_editing {
        match key.code {
            KeyCode::Enter => Some(Message::FormConfirm),
            KeyCode::Esc => Some(Message::FormCancel),
            KeyCode::Backspace => Some(Message::FormBackspace),
            KeyCode::Char(ch) => Some(Message::FormInput { ch }),
            _ => None,
        }
    } else {
        match key.code {
            KeyCode::Up => Some(Message::FormNavigate { delta: -1 }),
            KeyCode::Down => Some(Message::FormNavigate { delta: 1 }),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Message::FormActivate),
            KeyCode::Esc => Some(Message::FormCancel),
            KeyCode::Tab => Some(Message::FocusNext),
            KeyCode::BackTab => Some(Message::FocusPrev),
            KeyCode::Char('?') => Some(Message::ToggleHelp),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn make_key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn make_key_with_modifiers(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn quit_keys() {
        let ctrl_c = make_key_with_modifiers(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_message(ctrl_c), Some(Message::Quit));
        assert_eq!(key_to_form_message(ctrl_c, false), Some(Message::Quit));
        assert_eq!(key_to_form_message(ctrl_c, true), Some(Message::Quit));
        assert_eq!(key_to_message(make_key(KeyCode::Char('q'))), None);
    }

    #[test]
    fn focus_keys() {
        assert_eq!(key_to_message(make_key(KeyCode::Tab)), Some(Message::FocusNext));
        assert_eq!(key_to_message(make_key(KeyCode::Right)), Some(Message::FocusNext));
        assert_eq!(key_to_message(make_key(KeyCode::BackTab)), Some(Message::FocusPrev));
        assert_eq!(key_to_message(make_key(KeyCode::Left)), Some(Message::FocusPrev));
    }

    #[test]
    fn action_keys() {
        assert_eq!(key_to_message(make_key(KeyCode::Char('r'))), Some(Message::Refresh));
        assert_eq!(key_to_message(make_key(KeyCode::Char('s'))), Some(Message::OpenSettings));
        assert_eq!(
            key_to_message(make_key_with_modifiers(KeyCode::Char('S'), KeyModifiers::SHIFT)),
            Some(Message::OpenSettings)
        );
        assert_eq!(key_to_message(make_key(KeyCode::Char('?'))), Some(Message::ToggleHelp));
        assert_eq!(key_to_message(make_key(KeyCode::Enter)), Some(Message::Select));
        assert_eq!(key_to_message(make_key(KeyCode::Esc)), Some(Message::Escape));
    }

    #[test]
    fn unmapped_keys_return_none() {
        assert_eq!(key_to_message(make_key(KeyCode::Char('x'))), None);
        assert_eq!(key_to_message(make_key(KeyCode::F(1))), None);
        assert_eq!(key_to_form_message(make_key(KeyCode::Char('x')), false), None);
    }

    #[test]
    fn form_navigation_mode() {
        assert_eq!(
            key_to_form_message(make_key(KeyCode::Up), false),
            Some(Message::FormNavigate { delta: -1 })
        );
        assert_eq!(
            key_to_form_message(make_key(KeyCode::Down), false),
            Some(Message::FormNavigate { delta: 1 })
        );
        assert_eq!(
            key_to_form_message(make_key(KeyCode::Enter), false),
            Some(Message::FormActivate)
        );
        assert_eq!(
            key_to_form_message(make_key(KeyCode::Esc), false),
            Some(Message::FormCancel)
        );
        assert_eq!(
            key_to_form_message(make_key(KeyCode::Tab), false),
            Some(Message::FocusNext)
        );
    }

    #[test]
    fn form_edit_mode() {
        assert_eq!(
            key_to_form_message(make_key(KeyCode::Char('a')), true),
            Some(Message::FormInput { ch: 'a' })
        );
        // Letters bound in other modes are plain input while editing.
        assert_eq!(
            key_to_form_message(make_key(KeyCode::Char('r')), true),
            Some(Message::FormInput { ch: 'r' })
        );
        assert_eq!(
            key_to_form_message(make_key(KeyCode::Backspace), true),
            Some(Message::FormBackspace)
        );
        assert_eq!(
            key_to_form_message(make_key(KeyCode::Enter), true),
            Some(Message::FormConfirm)
        );
        assert_eq!(
            key_to_form_message(make_key(KeyCode::Esc), true),
            Some(Message::FormCancel)
        );
    }

    #[test]
    fn event_to_message_routes_by_mode() {
        let event = Event::Key(make_key(KeyCode::Enter));
        assert_eq!(event_to_message(&event, InputMode::Dashboard), Some(Message::Select));
        assert_eq!(event_to_message(&event, InputMode::Form), Some(Message::FormActivate));
        assert_eq!(event_to_message(&event, InputMode::Editing), Some(Message::FormConfirm));
    }

    #[test]
    fn event_to_message_ignores_releases_and_resizes() {
        let mut release = make_key(KeyCode::Enter);
        release.kind = KeyEventKind::Release;
        assert_eq!(event_to_message(&Event::Key(release), InputMode::Dashboard), None);
        assert_eq!(event_to_message(&Event::Resize(80, 24), InputMode::Dashboard), None);
    }
}
