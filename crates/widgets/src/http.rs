//! Shared HTTP plumbing for the fetchers.

use std::time::Duration;

use newtab_protocol::ErrorKind;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{FetchError, Result};

/// Builds the HTTP client shared by every widget.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use newtab_widgets::build_client;
///
/// let client = build_client(Duration::from_secs(10), "newtab/test").unwrap();
/// # drop(client);
/// ```
pub fn build_client(timeout: Duration, user_agent: &str) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Sends `request` and decodes a JSON response body.
///
/// Non-success statuses are classified with [`ErrorKind::from_status`];
/// connection failures and undecodable bodies are transient. The returned
/// error carries the kind's generic message, callers usually replace it.
pub(crate) async fn get_json<T: DeserializeOwned>(
    request: RequestBuilder,
) -> std::result::Result<T, FetchError> {
    let response = request.send().await.map_err(|e| {
        warn!(error = %e, "request failed");
        FetchError::from_kind(ErrorKind::Transient)
    })?;

    let status = response.status();
    if !status.is_success() {
        let err = FetchError::from_status(status.as_u16());
        warn!(status = status.as_u16(), kind = ?err.kind, url = %response.url().path(), "request rejected");
        return Err(err);
    }

    debug!(status = status.as_u16(), url = %response.url().path(), "request succeeded");
    response.json::<T>().await.map_err(|e| {
        warn!(error = %e, "failed to decode response body");
        FetchError::from_kind(ErrorKind::Transient)
    })
}
