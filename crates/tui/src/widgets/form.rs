//! Onboarding and settings form widget.
//!
//! Forms are rendered generically inside the widget slot: heading, intro,
//! one row per field, the action buttons, then the inline message and a
//! key hint line.

use newtab_protocol::{FormField, FormKind};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::form_state::{EditMode, FormState};

/// Renders a form.
///
/// # Arguments
///
/// * `state` - The form and its cursor
/// * `area` - The inner area of the slot
/// * `buf` - The buffer to render into
///
/// # Examples
///
/// ```
/// use ratatui::buffer::Buffer;
/// use ratatui::layout::Rect;
/// use newtab_protocol::{Configurable, WeatherSettings};
/// use newtab_tui::form_state::FormState;
/// use newtab_tui::widgets::render_form;
///
/// let state = FormState::new(WeatherSettings::default().onboarding_form());
/// let area = Rect::new(0, 0, 40, 16);
/// let mut buf = Buffer::empty(area);
///
/// render_form(&state, area, &mut buf);
/// ```
pub fn render_form(state: &FormState, area: Rect, buf: &mut Buffer) {
    let [content_area, help_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    let paragraph = Paragraph::new(build_form_lines(state)).wrap(Wrap { trim: false });
    paragraph.render(content_area, buf);

    render_form_help(state, help_area, buf);
}

/// Builds the lines of the form body.
fn build_form_lines(state: &FormState) -> Vec<Line<'static>> {
    let form = state.form();
    let selected = state.selected();
    let mut lines = Vec::new();

    let title_color = match form.kind {
        FormKind::Onboarding => Color::LightGreen,
        FormKind::Settings => Color::LightCyan,
    };
    lines.push(Line::from(Span::styled(
        form.title.clone(),
        Style::default()
            .fg(title_color)
            .add_modifier(Modifier::BOLD),
    )));
    if let Some(intro) = form.intro {
        lines.push(Line::from(Span::styled(
            intro,
            Style::default().fg(Color::Gray),
        )));
    }
    lines.push(Line::from(""));

    for (i, field) in form.fields.iter().enumerate() {
        let is_selected = i == selected;
        let edit = if is_selected {
            state.edit_mode()
        } else {
            &EditMode::None
        };
        lines.push(field_line(field, is_selected, edit));
        if is_selected {
            if let Some(hint) = field.hint {
                lines.push(Line::from(Span::styled(
                    format!("    {hint}"),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                )));
            }
        }
    }
    lines.push(Line::from(""));

    let mut buttons = Vec::with_capacity(form.actions.len() * 2);
    for (i, action) in form.actions.iter().enumerate() {
        if i > 0 {
            buttons.push(Span::raw(" "));
        }
        let style = if form.fields.len() + i == selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        buttons.push(Span::styled(format!("[ {} ]", action.label()), style));
    }
    lines.push(Line::from(buttons));

    if let Some(message) = &form.message {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::LightRed),
        )));
    }

    lines
}

/// Builds the line for one field.
fn field_line(field: &FormField, selected: bool, edit: &EditMode) -> Line<'static> {
    let style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let prefix = if selected { "> " } else { "  " };

    let value = match edit {
        EditMode::Text { value, cursor } => {
            let before = &value[..*cursor];
            if field.secret {
                format!("{}_", "*".repeat(before.chars().count()))
            } else {
                format!("{before}_")
            }
        }
        EditMode::None if field.value.is_empty() => {
            if field.required {
                "(required)".to_string()
            } else {
                "(not set)".to_string()
            }
        }
        EditMode::None => field.display_value(),
    };

    Line::from(vec![
        Span::styled(prefix, style),
        Span::styled(format!("{}: ", field.label), Style::default().fg(Color::Gray)),
        Span::styled(value, style),
    ])
}

/// Renders the key hint line at the bottom of the form.
fn render_form_help(state: &FormState, area: Rect, buf: &mut Buffer) {
    let help_text = if state.is_pending() {
        "Working…"
    } else if state.is_editing() {
        "Enter: confirm | Esc: cancel"
    } else if state.form().kind == FormKind::Settings {
        "↑↓: navigate | Enter: edit | Esc: close"
    } else {
        "↑↓: navigate | Enter: edit"
    };

    let help = Paragraph::new(Line::from(Span::styled(
        help_text,
        Style::default().fg(Color::DarkGray),
    )));
    help.render(area, buf);
}
