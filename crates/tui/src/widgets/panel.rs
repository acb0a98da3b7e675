//! Widget slot frame.
//!
//! Every slot is drawn inside a rounded panel whose border and title take
//! the widget's accent colour when one is configured.

use std::str::FromStr;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Widget},
};

/// Border colour of an unfocused panel without an accent.
const DEFAULT_BORDER: Color = Color::DarkGray;

/// Border colour of the focused panel without an accent.
const FOCUSED_BORDER: Color = Color::Cyan;

/// Parses an accent setting: a colour name (`"magenta"`, `"light-blue"`) or
/// `#rrggbb`.
///
/// Returns `None` for a blank or unrecognized value, in which case the
/// default colours apply.
///
/// # Examples
///
/// ```
/// use ratatui::style::Color;
/// use newtab_tui::widgets::accent_color;
///
/// assert_eq!(accent_color("#ff8800"), Some(Color::Rgb(0xff, 0x88, 0x00)));
/// assert_eq!(accent_color("magenta"), Some(Color::Magenta));
/// assert_eq!(accent_color("not a colour"), None);
/// assert_eq!(accent_color(""), None);
/// ```
#[must_use]
pub fn accent_color(accent: &str) -> Option<Color> {
    let accent = accent.trim();
    if accent.is_empty() {
        return None;
    }
    Color::from_str(accent).ok()
}

/// Draws the panel frame and returns the inner area.
///
/// # Arguments
///
/// * `title` - Widget name shown in the top border
/// * `accent` - The widget's accent setting (may be empty)
/// * `focused` - Whether the slot has keyboard focus
/// * `area` - The slot area
/// * `buf` - The buffer to render into
pub fn render_panel(
    title: &str,
    accent: &str,
    focused: bool,
    area: Rect,
    buf: &mut Buffer,
) -> Rect {
    let color = accent_color(accent).unwrap_or(if focused {
        FOCUSED_BORDER
    } else {
        DEFAULT_BORDER
    });

    let mut title_style = Style::default().fg(color);
    let mut border_type = BorderType::Rounded;
    if focused {
        title_style = title_style.add_modifier(Modifier::BOLD);
        border_type = BorderType::Thick;
    }

    let block = Block::default()
        .title(Span::styled(format!(" {title} "), title_style))
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(color));

    let inner = block.inner(area);
    block.render(area, buf);
    inner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    #[test]
    fn accent_color_parses_names_and_hex() {
        assert_eq!(accent_color("red"), Some(Color::Red));
        assert_eq!(accent_color("  #000000 "), Some(Color::Rgb(0, 0, 0)));
        assert_eq!(accent_color("#12"), None);
    }

    #[test]
    fn panel_uses_accent_for_border() {
        let area = Rect::new(0, 0, 20, 5);
        let mut buf = Buffer::empty(area);

        let inner = render_panel("Weather", "magenta", false, area, &mut buf);

        assert_eq!(inner, Rect::new(1, 1, 18, 3));
        assert_eq!(buf[(0, 0)].fg, Color::Magenta);
        assert!(buffer_to_string(&buf).contains(" Weather "));
    }

    #[test]
    fn invalid_accent_falls_back() {
        let area = Rect::new(0, 0, 20, 5);
        let mut buf = Buffer::empty(area);

        render_panel("Mail", "#zzzzzz", true, area, &mut buf);

        assert_eq!(buf[(0, 0)].fg, FOCUSED_BORDER);
    }
}
