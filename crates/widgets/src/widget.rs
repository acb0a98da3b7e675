//! The contract every dashboard widget implements.
//!
//! A widget knows how to obtain credentials for a fetch, how to fetch and
//! normalize its remote data, when a cached payload stops being worth
//! showing, and how to turn a payload into renderable [`WidgetData`]. The
//! generic [`Presenter`](crate::Presenter) owns everything else: settings,
//! cache policy, error routing and activation guarding.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use newtab_protocol::{Configurable, WidgetData};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{FetchError, Result};

/// A dashboard widget.
pub trait Widget: Send + Sync + 'static {
    /// The persisted settings record.
    type Settings: Configurable;

    /// The normalized fetch result stored in the cache.
    type Payload: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    /// Credentials produced by [`Widget::authorize`] and used by
    /// [`Widget::fetch`].
    type Auth: Send + Sync + 'static;

    /// How long a cached payload stays servable.
    const TTL: Duration;

    /// Produces the credentials for a fetch.
    ///
    /// `interactive` is `true` right after the user submitted the
    /// onboarding form, in which case the widget may prompt the user (for
    /// instance by opening a browser). Widgets whose settings already are
    /// the credentials simply return them.
    fn authorize(
        &self,
        settings: &Self::Settings,
        interactive: bool,
    ) -> impl Future<Output = std::result::Result<Self::Auth, FetchError>> + Send;

    /// Fetches and normalizes the remote data.
    fn fetch(
        &self,
        settings: &Self::Settings,
        auth: &Self::Auth,
    ) -> impl Future<Output = std::result::Result<Self::Payload, FetchError>> + Send;

    /// Returns `true` if a cached payload must not be shown at `now`,
    /// regardless of its age.
    fn is_stale(_payload: &Self::Payload, _now: DateTime<Utc>) -> bool {
        false
    }

    /// Turns a payload into renderable data.
    fn present(payload: Self::Payload, settings: &Self::Settings) -> WidgetData;

    /// Drops any stored credentials that are not part of the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn forget_auth(&self) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }
}
