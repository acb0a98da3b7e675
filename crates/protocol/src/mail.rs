//! Inbox payload types.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder shown for messages without a subject.
pub const NO_SUBJECT: &str = "(no subject)";

/// One message in the inbox preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailSummary {
    /// Provider message identifier.
    pub id: String,
    /// Sender display name (see [`parse_sender`]).
    pub sender: String,
    /// Subject line, or [`NO_SUBJECT`].
    pub subject: String,
    /// When the provider received the message.
    pub received_at: DateTime<Utc>,
    /// Whether the message is still unread.
    pub unread: bool,
}

impl EmailSummary {
    /// Returns the received time formatted relative to `now`.
    #[must_use]
    pub fn received_label<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        format_received(self.received_at, now)
    }
}

/// Extracts a display name from a `From` header.
///
/// `"Jane Doe" <jane@example.com>` yields `Jane Doe`; a bare address is
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use newtab_protocol::mail::parse_sender;
///
/// assert_eq!(parse_sender(r#""Jane Doe" <jane@example.com>"#), "Jane Doe");
/// assert_eq!(parse_sender("Build Bot <ci@example.com>"), "Build Bot");
/// assert_eq!(parse_sender("ops@example.com"), "ops@example.com");
/// ```
#[must_use]
pub fn parse_sender(from: &str) -> String {
    let from = from.trim();
    match from.find('<') {
        Some(idx) => {
            let name = from[..idx].trim().trim_matches('"').trim();
            if name.is_empty() {
                from[idx..]
                    .trim_start_matches('<')
                    .trim_end_matches('>')
                    .trim()
                    .to_string()
            } else {
                name.to_string()
            }
        }
        None => from.to_string(),
    }
}

/// Formats a received timestamp: `HH:MM` on the same local day as `now`,
/// `Mon D` otherwise.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use newtab_protocol::mail::format_received;
///
/// let now = Utc.with_ymd_and_hms(2024, 3, 4, 18, 0, 0).unwrap();
/// let today = Utc.with_ymd_and_hms(2024, 3, 4, 9, 5, 0).unwrap();
/// let earlier = Utc.with_ymd_and_hms(2024, 2, 28, 9, 5, 0).unwrap();
///
/// assert_eq!(format_received(today, &now), "09:05");
/// assert_eq!(format_received(earlier, &now), "Feb 28");
/// ```
#[must_use]
pub fn format_received<Tz: TimeZone>(received: DateTime<Utc>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let local = received.with_timezone(&now.timezone());
    if local.date_naive() == now.date_naive() {
        local.format("%H:%M").to_string()
    } else {
        local.format("%b %-d").to_string()
    }
}
