//! Test utilities for the TUI crate.
//!
//! This module provides common helpers used across test modules: buffer
//! rendering verification and a scripted widget controller.

use std::pin::Pin;
use std::sync::{Arc, Mutex};

use newtab_protocol::{Activation, WidgetKind};
use newtab_widgets::{Controller, Outcome, Transition};
use ratatui::buffer::Buffer;

/// Converts a ratatui [`Buffer`] to a string representation.
///
/// Each row of the buffer becomes a line in the output string. Trailing
/// whitespace is trimmed from each line to produce cleaner output suitable
/// for snapshot testing.
///
/// # Arguments
///
/// * `buf` - The buffer to convert
///
/// # Returns
///
/// A string representation of the buffer contents with one line per row.
///
/// # Example
///
/// ```ignore
/// use ratatui::buffer::Buffer;
/// use ratatui::layout::Rect;
///
/// let area = Rect::new(0, 0, 10, 2);
/// let mut buf = Buffer::empty(area);
/// buf.set_string(0, 0, "Hello", ratatui::style::Style::default());
///
/// let output = buffer_to_string(&buf);
/// assert!(output.contains("Hello"));
/// ```
#[must_use]
pub(crate) fn buffer_to_string(buf: &Buffer) -> String {
    let mut result = String::new();
    for y in 0..buf.area.height {
        for x in 0..buf.area.width {
            if let Some(cell) = buf.cell((x, y)) {
                result.push_str(cell.symbol());
            }
        }
        // Trim trailing whitespace from each line
        let trimmed = result.trim_end_matches(' ');
        result.truncate(trimmed.len());
        result.push('\n');
    }
    result
}

/// A controller whose outcomes are scripted per transition.
///
/// Every transition it runs is recorded so tests can assert on what the
/// app dispatched.
pub(crate) struct StubController {
    kind: WidgetKind,
    respond: Box<dyn Fn(&Transition) -> Outcome + Send + Sync>,
    calls: Mutex<Vec<Transition>>,
}

impl StubController {
    pub(crate) fn new(
        kind: WidgetKind,
        respond: impl Fn(&Transition) -> Outcome + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            kind,
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Returns the transitions run so far.
    pub(crate) fn calls(&self) -> Vec<Transition> {
        self.calls.lock().unwrap().clone()
    }
}

impl Controller for StubController {
    fn kind(&self) -> WidgetKind {
        self.kind
    }

    fn run(
        &self,
        activation: Activation,
        transition: Transition,
    ) -> Pin<Box<dyn Future<Output = Outcome> + Send + '_>> {
        let outcome = (self.respond)(&transition);
        self.calls.lock().unwrap().push(transition);
        Box::pin(async move {
            if activation.is_current() {
                outcome
            } else {
                Outcome::Superseded
            }
        })
    }
}
