//! Bearer token storage and acquisition.

use std::future::Future;

use chrono::{DateTime, TimeDelta, Utc};
use newtab_protocol::{ErrorKind, MailSettings};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::{FetchError, Result};
use crate::mail::oauth::LoopbackFlow;
use crate::store::KvStore;

/// Store key of the mail access token.
pub const TOKEN_KEY: &str = "mail.token";

/// A token this close to its expiry is treated as expired.
pub const EXPIRY_MARGIN: TimeDelta = TimeDelta::minutes(2);

/// A bearer token and when it stops working.
#[derive(Debug)]
pub struct AuthToken {
    token: SecretString,
    expiry: DateTime<Utc>,
}

impl AuthToken {
    /// Creates a token expiring at `expiry`.
    #[must_use]
    pub fn new(token: SecretString, expiry: DateTime<Utc>) -> Self {
        Self { token, expiry }
    }

    /// Returns the bearer token.
    #[must_use]
    pub fn token(&self) -> &SecretString {
        &self.token
    }

    /// Returns when the token expires.
    #[must_use]
    pub fn expiry(&self) -> DateTime<Utc> {
        self.expiry
    }

    /// Returns `true` if the token is still good for more than
    /// [`EXPIRY_MARGIN`] at `now`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeDelta, Utc};
    /// use newtab_widgets::mail::AuthToken;
    ///
    /// let now = Utc::now();
    /// let fresh = AuthToken::new("t".to_string().into(), now + TimeDelta::minutes(30));
    /// let closing = AuthToken::new("t".to_string().into(), now + TimeDelta::minutes(2));
    /// assert!(fresh.is_usable_at(now));
    /// assert!(!closing.is_usable_at(now));
    /// ```
    #[must_use]
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry - now > EXPIRY_MARGIN
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    expiry: DateTime<Utc>,
}

impl From<StoredToken> for AuthToken {
    fn from(stored: StoredToken) -> Self {
        Self::new(SecretString::from(stored.token), stored.expiry)
    }
}

/// Produces bearer tokens for the mail widget.
pub trait AuthProvider: Send + Sync + 'static {
    /// Returns a usable token.
    ///
    /// A stored token is reused while it has more than [`EXPIRY_MARGIN`]
    /// left. Otherwise a non-interactive call fails with
    /// [`ErrorKind::MissingCredentials`] and an empty message, and an
    /// interactive call runs the sign-in flow.
    fn token(
        &self,
        settings: &MailSettings,
        interactive: bool,
    ) -> impl Future<Output = std::result::Result<SecretString, FetchError>> + Send;

    /// Forgets the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn revoke(&self) -> impl Future<Output = Result<()>> + Send;
}

/// Google sign-in backed by a [`KvStore`].
#[derive(Debug, Clone)]
pub struct GoogleAuth<S> {
    store: S,
    flow: LoopbackFlow,
}

impl<S: KvStore> GoogleAuth<S> {
    /// Creates the provider.
    #[must_use]
    pub fn new(store: S, flow: LoopbackFlow) -> Self {
        Self { store, flow }
    }

    /// Returns the stored token, usable or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn stored_token(&self) -> Result<Option<AuthToken>> {
        let stored: Option<StoredToken> = self.store.get_as(TOKEN_KEY).await?;
        Ok(stored.map(AuthToken::from))
    }

    /// Persists `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub async fn save_token(&self, token: &AuthToken) -> Result<()> {
        let stored = StoredToken {
            token: token.token.expose_secret().to_string(),
            expiry: token.expiry,
        };
        self.store.set_as(TOKEN_KEY, &stored).await
    }
}

impl<S: KvStore> AuthProvider for GoogleAuth<S> {
    #[instrument(skip_all, fields(interactive = interactive))]
    async fn token(
        &self,
        settings: &MailSettings,
        interactive: bool,
    ) -> std::result::Result<SecretString, FetchError> {
        let now = Utc::now();
        match self.stored_token().await {
            Ok(Some(token)) if token.is_usable_at(now) => {
                debug!(expiry = %token.expiry, "reusing stored token");
                return Ok(token.token);
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "could not read stored token"),
        }

        if !interactive {
            debug!("no usable token, sign-in required");
            return Err(FetchError::new(ErrorKind::MissingCredentials, ""));
        }

        let granted = self
            .flow
            .run(
                settings.client_id.trim(),
                settings.client_secret.as_deref().map(str::trim),
            )
            .await
            .map_err(|e| {
                warn!(error = %e, "sign-in failed");
                FetchError::new(ErrorKind::MissingCredentials, e.to_string())
            })?;

        let lifetime = TimeDelta::from_std(granted.expires_in).unwrap_or(TimeDelta::hours(1));
        let token = AuthToken::new(granted.access_token, now + lifetime);
        if let Err(e) = self.save_token(&token).await {
            warn!(error = %e, "could not persist token");
        }
        Ok(token.token)
    }

    async fn revoke(&self) -> Result<()> {
        self.store.remove(TOKEN_KEY).await
    }
}
