//! Widget slot rendering.
//!
//! Picks the body renderer for the slot's current view and draws it inside
//! the slot's panel.

use chrono::{DateTime, Local, Utc};
use newtab_protocol::{DataOrigin, WidgetData, WidgetView};
use ratatui::{buffer::Buffer, layout::Rect};

use crate::slot::Slot;

use super::{
    render_error, render_football, render_form, render_loading, render_mail, render_panel,
    render_weather,
};

/// Renders one widget slot.
///
/// # Arguments
///
/// * `slot` - The slot to render
/// * `focused` - Whether the slot has keyboard focus
/// * `now` - The wall-clock time countdowns and received times are relative to
/// * `area` - The slot area
/// * `buf` - The buffer to render into
pub fn render_slot(
    slot: &Slot,
    focused: bool,
    now: DateTime<Utc>,
    area: Rect,
    buf: &mut Buffer,
) {
    let name = slot.kind().name();
    let (title, accent) = match slot.view() {
        WidgetView::Data {
            origin: DataOrigin::Cached,
            accent,
            ..
        } => (format!("{name} · cached"), accent.as_str()),
        WidgetView::Data { accent, .. } => (name.to_string(), accent.as_str()),
        _ => (name.to_string(), ""),
    };
    let inner = render_panel(&title, accent, focused, area, buf);

    match slot.view() {
        WidgetView::Loading => render_loading(inner, buf),
        WidgetView::Onboarding(_) | WidgetView::Settings(_) => {
            if let Some(form) = slot.form() {
                render_form(form, inner, buf);
            }
        }
        WidgetView::Data { data, .. } => render_data(data, now, inner, buf),
        WidgetView::Error { message } => render_error(message, inner, buf),
    }
}

fn render_data(data: &WidgetData, now: DateTime<Utc>, area: Rect, buf: &mut Buffer) {
    match data {
        WidgetData::Weather(report) => render_weather(report, area, buf),
        WidgetData::Football {
            fixture,
            utc_offset_hours,
        } => render_football(fixture, *utc_offset_hours, now, area, buf),
        WidgetData::Mail(emails) => render_mail(emails, &now.with_timezone(&Local), area, buf),
    }
}
