//! Browser sign-in through a loopback redirect.
//!
//! The flow binds a listener on `127.0.0.1`, opens the provider's consent
//! page in the user's browser with that listener as the redirect target,
//! waits for the redirect carrying an authorization code, and exchanges the
//! code for an access token.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Url};
use secrecy::SecretString;
use serde::Deserialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Read-only access to the mailbox.
pub const SCOPE: &str = "https://www.googleapis.com/auth/gmail.readonly";

/// Token lifetime assumed when the provider does not say.
pub const DEFAULT_EXPIRES_IN: Duration = Duration::from_secs(3600);

const SIGN_IN_TIMEOUT: Duration = Duration::from_secs(5 * 60);

const SIGNED_IN_PAGE: &str = "Signed in. You can close this tab and return to newtab.";
const FAILED_PAGE: &str = "Sign-in failed. You can close this tab and try again from newtab.";

/// Opens a URL for the user, usually in their browser.
pub type Launcher = Arc<dyn Fn(&str) -> std::io::Result<()> + Send + Sync>;

/// An access token granted by the provider.
#[derive(Debug)]
pub struct GrantedToken {
    /// The bearer token.
    pub access_token: SecretString,
    /// How long the token is valid from now.
    pub expires_in: Duration,
}

/// The loopback authorization-code flow.
#[derive(Clone)]
pub struct LoopbackFlow {
    client: Client,
    authorize_url: String,
    token_url: String,
    redirect_port: u16,
    timeout: Duration,
    launcher: Launcher,
}

impl fmt::Debug for LoopbackFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopbackFlow")
            .field("authorize_url", &self.authorize_url)
            .field("token_url", &self.token_url)
            .field("redirect_port", &self.redirect_port)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl LoopbackFlow {
    /// Creates a flow against the given provider endpoints.
    ///
    /// The redirect listener picks a free port and the consent page opens
    /// in the default browser.
    #[must_use]
    pub fn new(
        client: Client,
        authorize_url: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            authorize_url: authorize_url.into(),
            token_url: token_url.into(),
            redirect_port: 0,
            timeout: SIGN_IN_TIMEOUT,
            launcher: Arc::new(|url: &str| open::that(url)),
        }
    }

    /// Listens for the redirect on a fixed port (0 picks a free one).
    #[must_use]
    pub fn with_redirect_port(mut self, port: u16) -> Self {
        self.redirect_port = port;
        self
    }

    /// Sets how long to wait for the user to finish signing in.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replaces the browser launcher.
    #[must_use]
    pub fn with_launcher(
        mut self,
        launcher: impl Fn(&str) -> std::io::Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.launcher = Arc::new(launcher);
        self
    }

    /// Runs the flow to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound, the browser cannot
    /// be opened, the user denies consent, nothing arrives before the
    /// timeout, or the token exchange fails.
    #[instrument(skip_all, fields(port = self.redirect_port))]
    pub async fn run(&self, client_id: &str, client_secret: Option<&str>) -> Result<GrantedToken> {
        let listener = TcpListener::bind(("127.0.0.1", self.redirect_port)).await?;
        let port = listener.local_addr()?.port();
        let redirect_uri = format!("http://127.0.0.1:{port}");
        let state = Uuid::new_v4().to_string();

        let url = Url::parse_with_params(
            &self.authorize_url,
            &[
                ("client_id", client_id),
                ("redirect_uri", redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", SCOPE),
                ("prompt", "select_account"),
                ("state", state.as_str()),
            ],
        )
        .map_err(|e| Error::oauth(format!("invalid authorization URL: {e}")))?;

        debug!(port, "waiting for sign-in redirect");
        (self.launcher)(url.as_str())
            .map_err(|e| Error::oauth(format!("could not open the browser: {e}")))?;

        let code = tokio::time::timeout(self.timeout, wait_for_code(&listener, &state))
            .await
            .map_err(|_| Error::oauth("timed out waiting for the browser"))??;

        self.exchange(&code, client_id, client_secret, &redirect_uri)
            .await
    }

    async fn exchange(
        &self,
        code: &str,
        client_id: &str,
        client_secret: Option<&str>,
        redirect_uri: &str,
    ) -> Result<GrantedToken> {
        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", client_id),
            ("redirect_uri", redirect_uri),
        ];
        if let Some(secret) = client_secret {
            form.push(("client_secret", secret));
        }

        let response = self.client.post(&self.token_url).form(&form).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "token exchange rejected");
            return Err(Error::oauth(format!("token exchange failed ({status})")));
        }

        let token: TokenResponse = response.json().await?;
        debug!(expires_in = ?token.expires_in, "token granted");
        Ok(GrantedToken {
            access_token: SecretString::from(token.access_token),
            expires_in: token
                .expires_in
                .map_or(DEFAULT_EXPIRES_IN, Duration::from_secs),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Accepts connections until one carries the redirect parameters.
///
/// Requests without a query (favicon probes and the like) get a 404.
async fn wait_for_code(listener: &TcpListener, state: &str) -> Result<String> {
    loop {
        let (mut stream, _) = listener.accept().await?;
        let mut buf = vec![0u8; 8192];
        let n = stream.read(&mut buf).await?;
        let request = String::from_utf8_lossy(&buf[..n]);

        let Some(target) = request
            .lines()
            .next()
            .and_then(|line| line.split_whitespace().nth(1))
        else {
            respond(&mut stream, "400 Bad Request", "").await;
            continue;
        };

        let params: HashMap<String, String> = match Url::parse(&format!("http://127.0.0.1{target}"))
        {
            Ok(url) => url.query_pairs().into_owned().collect(),
            Err(_) => HashMap::new(),
        };
        if params.is_empty() {
            respond(&mut stream, "404 Not Found", "").await;
            continue;
        }

        let outcome = if params.get("state").map(String::as_str) != Some(state) {
            Err(Error::oauth("state mismatch"))
        } else if let Some(error) = params.get("error") {
            Err(Error::oauth(error.clone()))
        } else if let Some(code) = params.get("code") {
            Ok(code.clone())
        } else {
            Err(Error::oauth("no authorization code in redirect"))
        };

        let page = if outcome.is_ok() {
            SIGNED_IN_PAGE
        } else {
            FAILED_PAGE
        };
        respond(&mut stream, "200 OK", page).await;
        return outcome;
    }
}

async fn respond(stream: &mut TcpStream, status: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    if let Err(e) = stream.write_all(response.as_bytes()).await {
        warn!(error = %e, "failed to answer redirect");
    }
    let _ = stream.shutdown().await;
}
