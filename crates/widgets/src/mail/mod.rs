//! Inbox preview widget backed by the Gmail REST API.
//!
//! Lists the five most recent inbox messages, then fetches the `From` and
//! `Subject` headers of each one concurrently. Bearer tokens come from an
//! [`AuthProvider`].

mod oauth;
mod token;

use std::time::Duration;

use chrono::{DateTime, Utc};
use newtab_protocol::mail::{NO_SUBJECT, parse_sender};
use newtab_protocol::{EmailSummary, ErrorKind, MailSettings, WidgetData};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::task::JoinSet;
use tracing::{debug, instrument, warn};

pub use oauth::{DEFAULT_EXPIRES_IN, GrantedToken, Launcher, LoopbackFlow, SCOPE};
pub use token::{AuthProvider, AuthToken, EXPIRY_MARGIN, GoogleAuth, TOKEN_KEY};

use crate::error::{FetchError, Result};
use crate::http::get_json;
use crate::widget::Widget;

/// How many messages the preview shows.
pub const PREVIEW_SIZE: usize = 5;

const SESSION_EXPIRED: &str = "Session expired. Please sign in again.";
const UNREACHABLE: &str = "Could not load emails. Try refreshing.";

/// The mail widget.
#[derive(Debug, Clone)]
pub struct MailWidget<A> {
    client: Client,
    base_url: String,
    auth: A,
}

impl<A: AuthProvider> MailWidget<A> {
    /// Creates the widget against the given API base URL
    /// (`.../gmail/v1/users/me`).
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>, auth: A) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
        }
    }

    /// A 401 means the bearer token was refused. A 403 (API disabled,
    /// missing scope) does not go away by signing in again.
    fn map_error(err: FetchError) -> FetchError {
        match (err.status, err.kind) {
            (Some(401), _) => FetchError::new(ErrorKind::AuthExpired, SESSION_EXPIRED),
            (_, ErrorKind::RateLimited) => err,
            _ => FetchError {
                status: err.status,
                ..FetchError::transient(UNREACHABLE)
            },
        }
    }
}

impl<A: AuthProvider> Widget for MailWidget<A> {
    type Settings = MailSettings;
    type Payload = Vec<EmailSummary>;
    type Auth = SecretString;

    const TTL: Duration = Duration::from_secs(3 * 60);

    async fn authorize(
        &self,
        settings: &MailSettings,
        interactive: bool,
    ) -> std::result::Result<SecretString, FetchError> {
        self.auth.token(settings, interactive).await
    }

    #[instrument(skip_all)]
    async fn fetch(
        &self,
        _settings: &MailSettings,
        token: &SecretString,
    ) -> std::result::Result<Vec<EmailSummary>, FetchError> {
        let bearer = token.expose_secret();
        let list = self
            .client
            .get(format!("{}/messages", self.base_url))
            .bearer_auth(bearer)
            .query(&[
                ("maxResults", PREVIEW_SIZE.to_string().as_str()),
                ("labelIds", "INBOX"),
            ]);
        let listing: ListResponse = get_json(list).await.map_err(Self::map_error)?;
        debug!(count = listing.messages.len(), "listed inbox");

        let mut tasks = JoinSet::new();
        for (index, message) in listing.messages.into_iter().take(PREVIEW_SIZE).enumerate() {
            let request = self
                .client
                .get(format!("{}/messages/{}", self.base_url, message.id))
                .bearer_auth(bearer)
                .query(&[
                    ("format", "metadata"),
                    ("metadataHeaders", "From"),
                    ("metadataHeaders", "Subject"),
                ]);
            tasks.spawn(async move { (index, get_json::<MessageResponse>(request).await) });
        }

        let mut summaries = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            let (index, result) = joined.map_err(|e| {
                warn!(error = %e, "message task failed");
                FetchError::transient(UNREACHABLE)
            })?;
            summaries.push((index, EmailSummary::from(result.map_err(Self::map_error)?)));
        }
        summaries.sort_by_key(|(index, _)| *index);

        Ok(summaries.into_iter().map(|(_, summary)| summary).collect())
    }

    fn present(messages: Vec<EmailSummary>, _settings: &MailSettings) -> WidgetData {
        WidgetData::Mail(messages)
    }

    async fn forget_auth(&self) -> Result<()> {
        self.auth.revoke().await
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageResponse {
    id: String,
    #[serde(default)]
    label_ids: Vec<String>,
    #[serde(default)]
    payload: Option<PayloadResponse>,
    #[serde(default)]
    internal_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PayloadResponse {
    #[serde(default)]
    headers: Vec<Header>,
}

#[derive(Debug, Deserialize)]
struct Header {
    name: String,
    value: String,
}

impl MessageResponse {
    fn header(&self, name: &str) -> Option<&str> {
        self.payload
            .as_ref()?
            .headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    fn received_at(&self) -> DateTime<Utc> {
        self.internal_date
            .as_deref()
            .and_then(|millis| millis.parse::<i64>().ok())
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .unwrap_or(DateTime::UNIX_EPOCH)
    }
}

impl From<MessageResponse> for EmailSummary {
    fn from(message: MessageResponse) -> Self {
        let sender = parse_sender(message.header("From").unwrap_or_default());
        let subject = match message.header("Subject").map(str::trim) {
            Some(subject) if !subject.is_empty() => subject.to_string(),
            _ => NO_SUBJECT.to_string(),
        };
        let received_at = message.received_at();
        let unread = message.label_ids.iter().any(|label| label == "UNREAD");
        Self {
            id: message.id,
            sender,
            subject,
            received_at,
            unread,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Hands out a fixed token.
    #[derive(Debug, Clone)]
    struct FixedAuth;

    impl AuthProvider for FixedAuth {
        async fn token(
            &self,
            _settings: &MailSettings,
            _interactive: bool,
        ) -> std::result::Result<SecretString, FetchError> {
            Ok(SecretString::from("token".to_string()))
        }

        async fn revoke(&self) -> Result<()> {
            Ok(())
        }
    }

    fn widget(server: &MockServer) -> MailWidget<FixedAuth> {
        let client = crate::http::build_client(Duration::from_secs(5), "test").unwrap();
        MailWidget::new(client, server.uri(), FixedAuth)
    }

    fn token() -> SecretString {
        SecretString::from("token".to_string())
    }

    fn message_json(id: &str, from: &str, subject: Option<&str>, unread: bool) -> Value {
        let mut headers = vec![json!({ "name": "from", "value": from })];
        if let Some(subject) = subject {
            headers.push(json!({ "name": "Subject", "value": subject }));
        }
        let labels = if unread {
            vec!["INBOX", "UNREAD"]
        } else {
            vec!["INBOX"]
        };
        json!({
            "id": id,
            "labelIds": labels,
            "internalDate": "1709542800000",
            "payload": { "headers": headers }
        })
    }

    async fn mount_message(server: &MockServer, id: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/messages/{id}")))
            .and(query_param("format", "metadata"))
            .and(header("authorization", "Bearer token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn fetch_keeps_listing_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/messages"))
            .and(query_param("maxResults", "5"))
            .and(query_param("labelIds", "INBOX"))
            .and(header("authorization", "Bearer token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "messages": [{ "id": "b", "threadId": "t1" }, { "id": "a", "threadId": "t2" }]
            })))
            .mount(&server)
            .await;
        mount_message(
            &server,
            "b",
            message_json("b", "\"Jane Doe\" <jane@example.com>", Some("Lunch?"), true),
        )
        .await;
        mount_message(&server, "a", message_json("a", "ops@example.com", None, false)).await;

        let messages = widget(&server).fetch(&MailSettings::default(), &token()).await.unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, "b");
        assert_eq!(messages[0].sender, "Jane Doe");
        assert_eq!(messages[0].subject, "Lunch?");
        assert!(messages[0].unread);
        assert_eq!(messages[1].sender, "ops@example.com");
        assert_eq!(messages[1].subject, NO_SUBJECT);
        assert!(!messages[1].unread);
        assert_eq!(messages[1].received_at.timestamp(), 1_709_542_800);
    }

    #[tokio::test]
    async fn empty_inbox_is_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "resultSizeEstimate": 0 })))
            .mount(&server)
            .await;

        let messages = widget(&server).fetch(&MailSettings::default(), &token()).await.unwrap();
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn unauthorized_is_auth_expired() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = widget(&server).fetch(&MailSettings::default(), &token()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::AuthExpired);
        assert_eq!(err.message, SESSION_EXPIRED);
    }

    #[tokio::test]
    async fn forbidden_is_not_auth_expired() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = widget(&server).fetch(&MailSettings::default(), &token()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Transient);
        assert_eq!(err.message, UNREACHABLE);
        assert_eq!(err.status, Some(403));
    }

    #[tokio::test]
    async fn failing_message_fails_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "messages": [{ "id": "a" }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/messages/a"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = widget(&server).fetch(&MailSettings::default(), &token()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Transient);
        assert_eq!(err.message, UNREACHABLE);
    }

    #[test]
    fn missing_date_falls_back_to_epoch() {
        let message: MessageResponse = serde_json::from_value(json!({ "id": "x" })).unwrap();
        let summary = EmailSummary::from(message);
        assert_eq!(summary.received_at, DateTime::UNIX_EPOCH);
        assert_eq!(summary.sender, "");
        assert_eq!(summary.subject, NO_SUBJECT);
    }
}
