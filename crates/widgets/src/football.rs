//! Next-match widget backed by the football-data.org v4 API.

use std::time::Duration;

use chrono::{DateTime, Utc};
use newtab_protocol::{ErrorKind, Fixture, FootballSettings, Team, WidgetData};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::FetchError;
use crate::http::get_json;
use crate::widget::Widget;

/// Header carrying the API key.
const AUTH_HEADER: &str = "X-Auth-Token";

const INVALID_KEY: &str =
    "API key rejected. Check your key. New keys take up to 2 hours to activate.";
const TEAM_NOT_FOUND: &str = "Team ID not found. Verify it on football-data.org.";
const NO_MATCHES: &str = "No upcoming matches found for this team.";
const UNREACHABLE: &str = "Could not load match data. Check your connection.";

/// The football widget: the followed team's next scheduled match.
#[derive(Debug, Clone)]
pub struct FootballWidget {
    client: Client,
    base_url: String,
}

impl FootballWidget {
    /// Creates the widget against the given API base URL.
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Widget for FootballWidget {
    type Settings = FootballSettings;
    type Payload = Fixture;
    type Auth = ();

    const TTL: Duration = Duration::from_secs(24 * 60 * 60);

    async fn authorize(
        &self,
        _settings: &FootballSettings,
        _interactive: bool,
    ) -> Result<(), FetchError> {
        Ok(())
    }

    #[instrument(skip_all, fields(team_id = ?settings.team_id))]
    async fn fetch(&self, settings: &FootballSettings, _auth: &()) -> Result<Fixture, FetchError> {
        let team_id = settings
            .team_id
            .ok_or_else(|| FetchError::new(ErrorKind::NotFound, TEAM_NOT_FOUND))?;

        let request = self
            .client
            .get(format!("{}/teams/{team_id}/matches", self.base_url))
            .header(AUTH_HEADER, settings.api_key.trim())
            .query(&[("status", "SCHEDULED"), ("limit", "5")]);

        let response: MatchesResponse = get_json(request).await.map_err(|e| match e.kind {
            ErrorKind::InvalidCredentials => FetchError::new(e.kind, INVALID_KEY),
            ErrorKind::NotFound => FetchError::new(e.kind, TEAM_NOT_FOUND),
            ErrorKind::RateLimited => e,
            _ => FetchError::transient(UNREACHABLE),
        })?;

        let fixture = response
            .matches
            .into_iter()
            .map(Fixture::from)
            .min_by_key(|fixture| fixture.kickoff)
            .ok_or_else(|| FetchError::new(ErrorKind::NotFound, NO_MATCHES))?;

        debug!(fixture = fixture.id, kickoff = %fixture.kickoff, "fetched next match");
        Ok(fixture)
    }

    /// A fixture is only worth serving from the cache until kickoff.
    fn is_stale(fixture: &Fixture, now: DateTime<Utc>) -> bool {
        now > fixture.kickoff
    }

    fn present(fixture: Fixture, settings: &FootballSettings) -> WidgetData {
        WidgetData::Football {
            fixture,
            utc_offset_hours: settings.utc_offset_hours,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MatchesResponse {
    #[serde(default)]
    matches: Vec<MatchResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchResponse {
    id: u64,
    utc_date: DateTime<Utc>,
    competition: CompetitionResponse,
    home_team: TeamResponse,
    away_team: TeamResponse,
}

#[derive(Debug, Deserialize)]
struct CompetitionResponse {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamResponse {
    id: u64,
    name: String,
    #[serde(default)]
    short_name: Option<String>,
}

impl From<TeamResponse> for Team {
    fn from(team: TeamResponse) -> Self {
        Self {
            id: team.id,
            name: team.name,
            short_name: team.short_name,
        }
    }
}

impl From<MatchResponse> for Fixture {
    fn from(m: MatchResponse) -> Self {
        Self {
            id: m.id,
            kickoff: m.utc_date,
            competition: m.competition.name,
            home: m.home_team.into(),
            away: m.away_team.into(),
        }
    }
}
