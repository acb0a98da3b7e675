//! Help overlay widget.
//!
//! The help overlay lists every keybinding; `?` toggles it.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

/// The width of the help overlay panel.
const HELP_WIDTH: u16 = 36;

/// The height of the help overlay panel.
const HELP_HEIGHT: u16 = 18;

/// Renders a centered help overlay displaying all keybindings.
///
/// The overlay is drawn on top of the dashboard after clearing the area
/// behind it.
///
/// # Arguments
///
/// * `area` - The full terminal area (the overlay will be centered within it)
/// * `buf` - The buffer to render into
///
/// # Examples
///
/// ```
/// use ratatui::buffer::Buffer;
/// use ratatui::layout::Rect;
/// use newtab_tui::widgets::render_help_overlay;
///
/// let area = Rect::new(0, 0, 80, 24);
/// let mut buf = Buffer::empty(area);
///
/// render_help_overlay(area, &mut buf);
/// ```
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    let popup_area = centered_rect(HELP_WIDTH, HELP_HEIGHT, area);

    Clear.render(popup_area, buf);

    let lines = build_help_lines();

    let help_block = Block::default()
        .title(Span::styled(
            " Help ",
            Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::LightYellow));

    let help_text = Paragraph::new(lines)
        .block(help_block)
        .alignment(Alignment::Left);

    help_text.render(popup_area, buf);
}

/// Builds the lines of help content.
fn build_help_lines() -> Vec<Line<'static>> {
    let header_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(Color::Green);
    let text_style = Style::default().fg(Color::White);
    let hint_style = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC);

    let entry = |key: &'static str, text: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {key:<11}"), key_style),
            Span::styled(text, text_style),
        ])
    };

    vec![
        Line::from(""),
        Line::from(Span::styled("  Dashboard", header_style)),
        entry("Tab / →", "Next widget"),
        entry("S-Tab / ←", "Previous widget"),
        entry("r", "Refresh widget"),
        entry("s", "Widget settings"),
        entry("Enter", "Retry after error"),
        entry("Ctrl+C", "Quit"),
        entry("?", "Toggle help"),
        Line::from(""),
        Line::from(Span::styled("  Forms", header_style)),
        entry("↑ / ↓", "Select row"),
        entry("Enter", "Edit / press"),
        entry("Esc", "Cancel / close"),
        Line::from(""),
        Line::from(Span::styled("  Press any key to close", hint_style)),
    ]
}

/// Creates a centered rectangle within a given area.
///
/// If the requested dimensions exceed the available area, the rectangle
/// will be clamped to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    // Clamp dimensions to available area
    let popup_width = width.min(area.width);
    let popup_height = height.min(area.height);

    // Calculate centered position
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;

    Rect::new(x, y, popup_width, popup_height)
}
