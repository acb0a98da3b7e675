//! Terminal setup and teardown utilities.
//!
//! [`setup_terminal`] switches the terminal into raw mode on the alternate
//! screen; [`restore_terminal`] undoes it. [`install_panic_hook`] makes sure
//! a panic leaves the terminal usable.

use std::io::{self, Stdout};

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

/// The terminal type used by the application.
pub type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Error type for terminal operations.
#[derive(Debug, thiserror::Error)]
pub enum TerminalError {
    /// Failed to initialize the terminal.
    #[error("failed to setup terminal: {0}")]
    Setup(#[source] io::Error),

    /// Failed to restore the terminal.
    #[error("failed to restore terminal: {0}")]
    Restore(#[source] io::Error),
}

/// Enters raw mode on the alternate screen and returns the terminal.
///
/// # Errors
///
/// Returns [`TerminalError::Setup`] if any terminal operation fails. Raw
/// mode is switched off again when entering the alternate screen fails.
///
/// # Examples
///
/// ```no_run
/// use newtab_tui::terminal;
///
/// let mut terminal = terminal::setup_terminal().expect("failed to setup terminal");
/// // Use terminal...
/// terminal::restore_terminal(&mut terminal).expect("failed to restore terminal");
/// ```
pub fn setup_terminal() -> Result<AppTerminal, TerminalError> {
    enable_raw_mode().map_err(TerminalError::Setup)?;
    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(TerminalError::Setup(err));
    }
    Terminal::new(CrosstermBackend::new(stdout)).map_err(TerminalError::Setup)
}

/// Leaves the alternate screen, disables raw mode and shows the cursor.
///
/// # Errors
///
/// Returns [`TerminalError::Restore`] if any terminal operation fails.
pub fn restore_terminal(terminal: &mut AppTerminal) -> Result<(), TerminalError> {
    disable_raw_mode().map_err(TerminalError::Restore)?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).map_err(TerminalError::Restore)?;
    terminal.show_cursor().map_err(TerminalError::Restore)
}

/// Installs a panic hook that restores the terminal, then chains to the
/// hook that was installed before.
///
/// Call it once at startup, before [`setup_terminal`].
///
/// # Examples
///
/// ```no_run
/// use newtab_tui::terminal;
///
/// terminal::install_panic_hook();
/// let mut terminal = terminal::setup_terminal().expect("failed to setup terminal");
/// ```
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn terminal_error_keeps_source() {
        let err = TerminalError::Restore(io::Error::other("tty gone"));
        assert_eq!(err.to_string(), "failed to restore terminal: tty gone");
        assert!(err.source().is_some());
    }
}
