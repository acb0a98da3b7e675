//! Football widget body.

use chrono::{DateTime, Utc};
use newtab_protocol::{Fixture, Phase};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

/// Renders the next fixture as of `now`.
///
/// The last line depends on the fixture's phase: the kickoff date for an
/// upcoming match, a countdown within 24 hours, and a live badge while the
/// match is being played.
///
/// # Layout
///
/// ```text
///       Premier League
///  Man United  vs  Liverpool
///    Sun, 3 Mar · 15:00 GMT+1
///     Kickoff in 3h 4m 5s
/// ```
pub fn render_football(
    fixture: &Fixture,
    utc_offset_hours: i32,
    now: DateTime<Utc>,
    area: Rect,
    buf: &mut Buffer,
) {
    let mut lines = vec![
        Line::from(Span::styled(
            fixture.competition.clone(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(vec![
            Span::styled(
                fixture.home.display_name().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  vs  ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                fixture.away.display_name().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            format!(
                "{} · {}",
                fixture.kickoff_date_label(utc_offset_hours),
                fixture.kickoff_time_label(utc_offset_hours)
            ),
            Style::default().fg(Color::LightBlue),
        )),
        Line::from(""),
    ];

    lines.push(match fixture.phase(now) {
        Phase::Live => Line::from(Span::styled(
            "● LIVE",
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        )),
        Phase::Soon => Line::from(vec![
            Span::styled("Kickoff in ", Style::default().fg(Color::Gray)),
            Span::styled(
                fixture.countdown(now).unwrap_or_default(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Phase::Upcoming => Line::from(Span::styled(
            "Upcoming",
            Style::default().fg(Color::DarkGray),
        )),
        Phase::Past => Line::from(Span::styled(
            "Full time",
            Style::default().fg(Color::DarkGray),
        )),
    });

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;
    use chrono::{TimeDelta, TimeZone};
    use newtab_protocol::Team;

    fn fixture() -> Fixture {
        Fixture {
            id: 1,
            kickoff: Utc.with_ymd_and_hms(2024, 3, 3, 14, 0, 0).unwrap(),
            competition: "Premier League".into(),
            home: Team {
                id: 66,
                name: "Manchester United FC".into(),
                short_name: Some("Man United".into()),
            },
            away: Team {
                id: 64,
                name: "Liverpool FC".into(),
                short_name: Some("Liverpool".into()),
            },
        }
    }

    fn render(now: DateTime<Utc>) -> String {
        let fixture = fixture();
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        render_football(&fixture, 1, now, area, &mut buf);
        buffer_to_string(&buf)
    }

    #[test]
    fn soon_shows_countdown() {
        let kickoff = fixture().kickoff;
        let content = render(kickoff - TimeDelta::seconds(3 * 3600 + 4 * 60 + 5));

        assert!(content.contains("Premier League"));
        assert!(content.contains("Man United  vs  Liverpool"));
        assert!(content.contains("Sun, 3 Mar · 15:00 GMT+1"));
        assert!(content.contains("Kickoff in 3h 4m 5s"));
    }

    #[test]
    fn countdown_advances_with_now() {
        let kickoff = fixture().kickoff;
        let first = render(kickoff - TimeDelta::seconds(10));
        let second = render(kickoff - TimeDelta::seconds(9));

        assert!(first.contains("Kickoff in 10s"));
        assert!(second.contains("Kickoff in 9s"));
    }

    #[test]
    fn live_shows_badge() {
        let kickoff = fixture().kickoff;
        let content = render(kickoff + TimeDelta::minutes(30));

        assert!(content.contains("LIVE"));
        assert!(!content.contains("Kickoff in"));
    }

    #[test]
    fn upcoming_has_no_countdown() {
        let kickoff = fixture().kickoff;
        let content = render(kickoff - TimeDelta::days(3));

        assert!(content.contains("Upcoming"));
        assert!(!content.contains("Kickoff in"));
    }
}
