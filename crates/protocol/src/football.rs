//! Football payload types and the kickoff liveness predicate.
//!
//! A cached fixture is only worth showing until the match is over, so the
//! football widget classifies its fixture into a [`Phase`] relative to the
//! current time. The phase drives cache staleness, the badge shown next to
//! the kickoff time, and how often the widget re-renders.
//!
//! | Phase | Condition | Re-render |
//! |-------|-----------|-----------|
//! | `Upcoming` | kickoff more than 24h away | every 60s |
//! | `Soon` | kickoff within 24h | every second (countdown) |
//! | `Live` | `kickoff <= now < kickoff + 2h` | every 60s |
//! | `Past` | two hours or more after kickoff | never; the cache entry is stale |

use std::ops::RangeInclusive;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Offset, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// How long after kickoff a match is considered live, in seconds.
pub const LIVE_WINDOW_SECS: i64 = 2 * 60 * 60;

/// How long before kickoff a match is considered imminent, in seconds.
pub const SOON_WINDOW_SECS: i64 = 24 * 60 * 60;

/// Accepted range for the display offset, in whole hours from UTC.
pub const UTC_OFFSET_RANGE: RangeInclusive<i32> = -12..=14;

/// Where a fixture stands relative to now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Kickoff is more than 24 hours away.
    Upcoming,
    /// Kickoff is within the next 24 hours.
    Soon,
    /// The match is in progress.
    Live,
    /// The match is over.
    Past,
}

impl Phase {
    /// Classifies a kickoff time relative to `now`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeDelta, Utc};
    /// use newtab_protocol::Phase;
    ///
    /// let now = Utc::now();
    /// assert_eq!(Phase::of(now + TimeDelta::hours(30), now), Phase::Upcoming);
    /// assert_eq!(Phase::of(now + TimeDelta::hours(3), now), Phase::Soon);
    /// assert_eq!(Phase::of(now - TimeDelta::minutes(30), now), Phase::Live);
    /// assert_eq!(Phase::of(now - TimeDelta::hours(3), now), Phase::Past);
    /// ```
    #[must_use]
    pub fn of(kickoff: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let until_kickoff = kickoff - now;
        if now >= kickoff && now < kickoff + TimeDelta::seconds(LIVE_WINDOW_SECS) {
            Self::Live
        } else if until_kickoff > TimeDelta::zero()
            && until_kickoff <= TimeDelta::seconds(SOON_WINDOW_SECS)
        {
            Self::Soon
        } else if until_kickoff > TimeDelta::zero() {
            Self::Upcoming
        } else {
            Self::Past
        }
    }

    /// Returns how often a fixture in this phase should be re-rendered.
    ///
    /// `None` means no timer: a past fixture is re-fetched instead.
    #[must_use]
    pub fn tick_interval(self) -> Option<Duration> {
        match self {
            Self::Soon => Some(Duration::from_secs(1)),
            Self::Upcoming | Self::Live => Some(Duration::from_secs(60)),
            Self::Past => None,
        }
    }
}

/// A team taking part in a fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Provider identifier.
    pub id: u64,
    /// Full name, e.g. "Manchester United FC".
    pub name: String,
    /// Short name, e.g. "Man United".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
}

impl Team {
    /// Returns the short name when known, the full name otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.short_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.name)
    }
}

/// The next scheduled match of the followed team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    /// Provider identifier.
    pub id: u64,
    /// Kickoff time.
    pub kickoff: DateTime<Utc>,
    /// Competition name, e.g. "Premier League".
    pub competition: String,
    /// Home side.
    pub home: Team,
    /// Away side.
    pub away: Team,
}

impl Fixture {
    /// Returns the fixture's phase at `now`.
    #[must_use]
    pub fn phase(&self, now: DateTime<Utc>) -> Phase {
        Phase::of(self.kickoff, now)
    }

    /// Returns the time left before kickoff, formatted for display.
    ///
    /// Returns `None` once kickoff has passed.
    #[must_use]
    pub fn countdown(&self, now: DateTime<Utc>) -> Option<String> {
        let remaining = self.kickoff - now;
        (remaining > TimeDelta::zero()).then(|| format_countdown(remaining))
    }

    /// Returns the kickoff date in the given offset, e.g. `Sun, 3 Mar`.
    #[must_use]
    pub fn kickoff_date_label(&self, utc_offset_hours: i32) -> String {
        self.kickoff
            .with_timezone(&fixed_offset(utc_offset_hours))
            .format("%a, %-d %b")
            .to_string()
    }

    /// Returns the kickoff time in the given offset, e.g. `15:00 GMT+1`.
    #[must_use]
    pub fn kickoff_time_label(&self, utc_offset_hours: i32) -> String {
        let local = self.kickoff.with_timezone(&fixed_offset(utc_offset_hours));
        format!("{} {}", local.format("%H:%M"), format_offset(utc_offset_hours))
    }
}

/// Formats a positive duration as `Xh Ym Zs`, `Ym Zs` or `Zs`.
///
/// # Examples
///
/// ```
/// use chrono::TimeDelta;
/// use newtab_protocol::football::format_countdown;
///
/// assert_eq!(format_countdown(TimeDelta::seconds(3 * 3600 + 4 * 60 + 5)), "3h 4m 5s");
/// assert_eq!(format_countdown(TimeDelta::seconds(65)), "1m 5s");
/// assert_eq!(format_countdown(TimeDelta::seconds(9)), "9s");
/// ```
#[must_use]
pub fn format_countdown(remaining: TimeDelta) -> String {
    let total = remaining.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Formats a whole-hour UTC offset, e.g. `GMT+1` or `GMT-5`.
#[must_use]
pub fn format_offset(utc_offset_hours: i32) -> String {
    if utc_offset_hours >= 0 {
        format!("GMT+{utc_offset_hours}")
    } else {
        format!("GMT{utc_offset_hours}")
    }
}

fn fixed_offset(utc_offset_hours: i32) -> FixedOffset {
    FixedOffset::east_opt(utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix())
}
