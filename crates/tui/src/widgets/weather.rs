//! Weather widget body.

use newtab_protocol::{WeatherReport, weather::icon_symbol};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Renders current conditions followed by the daily forecast.
///
/// # Layout
///
/// ```text
/// ☂ 14°C  light rain
/// Paris, FR
/// Humidity 81% · Wind 4.1 m/s
///
/// Mon  ☂   9° / 14°
/// Tue  ☁  10° / 16°
/// ```
pub fn render_weather(report: &WeatherReport, area: Rect, buf: &mut Buffer) {
    let current = &report.current;
    let units = report.units;

    let mut lines = vec![
        Line::from(vec![
            Span::raw(format!("{} ", icon_symbol(&current.icon))),
            Span::styled(
                format!(
                    "{}{}",
                    current.temperature.round(),
                    units.temperature_suffix()
                ),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", current.description),
                Style::default().fg(Color::Gray),
            ),
        ]),
        Line::from(Span::styled(
            location_label(&current.location, &current.country),
            Style::default().fg(Color::LightBlue),
        )),
        Line::from(Span::styled(
            format!(
                "Humidity {}% · Wind {:.1} {}",
                current.humidity,
                current.wind_speed,
                units.wind_suffix()
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    if !report.daily.is_empty() {
        lines.push(Line::from(""));
    }
    for day in &report.daily {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<4} ", day.weekday()), Style::default().fg(Color::Gray)),
            Span::raw(format!("{}  ", icon_symbol(&day.icon))),
            Span::styled(format!("{:>3}°", day.min), Style::default().fg(Color::LightBlue)),
            Span::styled(" / ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{:>3}°", day.max), Style::default().fg(Color::LightRed)),
        ]));
    }

    Paragraph::new(lines).render(area, buf);
}

fn location_label(location: &str, country: &str) -> String {
    if country.is_empty() {
        location.to_string()
    } else {
        format!("{location}, {country}")
    }
}
