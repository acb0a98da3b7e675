//! Loading and error views.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

/// Renders the loading indicator.
pub fn render_loading(area: Rect, buf: &mut Buffer) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        "Loading…",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )))
    .alignment(Alignment::Center);

    paragraph.render(vertically_centered(area, 1), buf);
}

/// Renders an error message with its retry hint.
///
/// # Arguments
///
/// * `message` - The user-facing error message
/// * `area` - The inner area of the slot
/// * `buf` - The buffer to render into
pub fn render_error(message: &str, area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::from(Span::styled(message, Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::styled(" to retry", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    paragraph.render(vertically_centered(area, 3), buf);
}

/// Returns the part of `area` starting roughly `height` rows above its
/// middle.
fn vertically_centered(area: Rect, height: u16) -> Rect {
    let offset = area.height.saturating_sub(height) / 2;
    Rect {
        y: area.y + offset,
        height: area.height.saturating_sub(offset),
        ..area
    }
}
