//! Mail widget body.

use chrono::{DateTime, TimeZone};
use newtab_protocol::EmailSummary;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Renders the inbox preview, two lines per message.
///
/// Unread messages are marked with a dot and drawn in bold. Received
/// times are relative to `now`, whose timezone decides what "today" is.
pub fn render_mail<Tz: TimeZone>(
    emails: &[EmailSummary],
    now: &DateTime<Tz>,
    area: Rect,
    buf: &mut Buffer,
) where
    Tz::Offset: std::fmt::Display,
{
    if emails.is_empty() {
        Paragraph::new(Line::from(Span::styled(
            "Inbox zero",
            Style::default().fg(Color::DarkGray),
        )))
        .render(area, buf);
        return;
    }

    let mut lines = Vec::with_capacity(emails.len() * 2);
    for email in emails {
        let (marker, sender_style) = if email.unread {
            (
                Span::styled("● ", Style::default().fg(Color::LightCyan)),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            (Span::raw("  "), Style::default().fg(Color::Gray))
        };

        let received = email.received_label(now);
        let sender_width = usize::from(area.width).saturating_sub(received.chars().count() + 3);

        lines.push(Line::from(vec![
            marker,
            Span::styled(
                format!(
                    "{:<width$}",
                    truncate(&email.sender, sender_width),
                    width = sender_width
                ),
                sender_style,
            ),
            Span::styled(format!(" {received}"), Style::default().fg(Color::DarkGray)),
        ]));
        lines.push(Line::from(Span::styled(
            format!("  {}", email.subject),
            Style::default().fg(Color::Gray),
        )));
    }

    Paragraph::new(lines).render(area, buf);
}

/// Truncates `text` to at most `max` characters, marking the cut with `…`.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;
    use chrono::{TimeDelta, Utc};

    fn email(sender: &str, subject: &str, received_at: DateTime<Utc>, unread: bool) -> EmailSummary {
        EmailSummary {
            id: sender.to_string(),
            sender: sender.to_string(),
            subject: subject.to_string(),
            received_at,
            unread,
        }
    }

    fn render(emails: &[EmailSummary], now: DateTime<Utc>) -> String {
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        render_mail(emails, &now, area, &mut buf);
        buffer_to_string(&buf)
    }

    #[test]
    fn renders_sender_subject_and_time() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
        let emails = vec![
            email("Jane Doe", "Lunch?", now - TimeDelta::hours(2), true),
            email("Build Bot", "(no subject)", now - TimeDelta::days(3), false),
        ];

        let content = render(&emails, now);
        let lines: Vec<&str> = content.lines().collect();

        assert!(lines[0].starts_with("● Jane Doe"));
        assert!(lines[0].ends_with("10:00"));
        assert_eq!(lines[1], "  Lunch?");
        assert!(lines[2].starts_with("  Build Bot"));
        assert!(lines[2].ends_with("Mar 2"));
        assert_eq!(lines[3], "  (no subject)");
    }

    #[test]
    fn empty_inbox() {
        let content = render(&[], Utc::now());
        assert!(content.contains("Inbox zero"));
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long sender name", 8), "a very …");
        assert_eq!(truncate("abc", 0), "");
    }
}
