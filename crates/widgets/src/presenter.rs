//! The per-widget state machine.
//!
//! A [`Presenter`] drives one widget through its views. Every transition
//! runs under an [`Activation`]: once a newer activation has begun, the old
//! one finishes without touching the cache or the settings and reports
//! [`Outcome::Superseded`].
//!
//! ```text
//!                 no credentials
//!   Activate ──────────────────────────────▶ Onboarding
//!      │                                        │ SubmitOnboarding
//!      ├── cache hit ─────────▶ Data(cached)    ▼
//!      └── fetch ─┬─ ok ──────▶ Data(fresh)   Activate (interactive)
//!                 └─ err ─────▶ Onboarding | Settings | Error
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use newtab_protocol::{
    Activation, Configurable, DataOrigin, ErrorKind, ErrorRoute, Form, WidgetKind, WidgetView,
};
use tracing::{debug, info, instrument, warn};

use crate::cache::ResponseCache;
use crate::error::{FetchError, Result};
use crate::store::KvStore;
use crate::widget::Widget;

/// Source of the current time.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// A user or timer driven request to a widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Load the widget, from the cache when possible.
    Activate {
        /// Whether the widget may prompt the user (e.g. open a browser).
        interactive: bool,
    },
    /// Drop the cache and load again.
    Refresh,
    /// Show the settings panel.
    OpenSettings,
    /// Apply and persist the submitted settings panel.
    SaveSettings(Form),
    /// Leave the settings panel without saving.
    CancelSettings,
    /// Apply and persist the submitted onboarding form.
    SubmitOnboarding(Form),
    /// Forget the stored sign-in and go back to onboarding.
    SignOut,
}

impl Transition {
    /// Returns `true` if the slot should show the loading view while this
    /// transition runs.
    ///
    /// Form submissions keep the form on screen until they resolve.
    #[must_use]
    pub fn shows_loading(&self) -> bool {
        matches!(
            self,
            Self::Activate { .. } | Self::Refresh | Self::CancelSettings
        )
    }
}

/// What a transition produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Show this view.
    View(WidgetView),
    /// Nothing happened (e.g. a required field was blank).
    Ignored,
    /// A newer activation took over; keep whatever is on screen.
    Superseded,
}

impl Outcome {
    /// Returns the view, if any.
    #[must_use]
    pub fn into_view(self) -> Option<WidgetView> {
        match self {
            Self::View(view) => Some(view),
            Self::Ignored | Self::Superseded => None,
        }
    }
}

/// An object-safe handle on a presenter, so the dashboard can hold widgets
/// of different types side by side.
pub trait Controller: Send + Sync {
    /// The widget this controller drives.
    fn kind(&self) -> WidgetKind;

    /// Runs `transition` under `activation`.
    fn run(
        &self,
        activation: Activation,
        transition: Transition,
    ) -> Pin<Box<dyn Future<Output = Outcome> + Send + '_>>;
}

/// Drives one widget: settings, cache, fetch and error routing.
pub struct Presenter<W, S> {
    widget: W,
    store: S,
    cache: ResponseCache<S>,
    clock: Clock,
}

impl<W, S> fmt::Debug for Presenter<W, S>
where
    W: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Presenter")
            .field("widget", &self.widget)
            .finish_non_exhaustive()
    }
}

impl<W: Widget, S: KvStore> Presenter<W, S> {
    /// Creates a presenter storing settings and cache in `store`.
    #[must_use]
    pub fn new(widget: W, store: S) -> Self {
        let cache = ResponseCache::new(store.clone(), W::Settings::KIND, W::TTL);
        Self {
            widget,
            store,
            cache,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replaces the clock used for cache ages.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Returns the widget.
    #[must_use]
    pub fn widget(&self) -> &W {
        &self.widget
    }

    /// Returns the stored settings, or the defaults if none were saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the record no
    /// longer decodes.
    pub async fn settings(&self) -> Result<W::Settings> {
        let settings = self
            .store
            .get_as::<W::Settings>(&W::Settings::KIND.settings_key())
            .await?;
        Ok(settings.unwrap_or_default())
    }

    async fn save(&self, settings: &W::Settings) -> Result<()> {
        self.store
            .set_as(&W::Settings::KIND.settings_key(), settings)
            .await
    }

    async fn clear_cache(&self) {
        if let Err(e) = self.cache.clear().await {
            warn!(error = %e, "failed to clear cache");
        }
    }

    /// Runs `transition` under `activation`.
    #[instrument(skip_all, fields(widget = W::Settings::KIND.key(), activation = activation.token().get()))]
    pub async fn transition(&self, activation: Activation, transition: Transition) -> Outcome {
        debug!(?transition, "transition");
        match transition {
            Transition::Activate { interactive } => self.activate(&activation, interactive).await,
            Transition::Refresh => {
                self.clear_cache().await;
                self.activate(&activation, false).await
            }
            Transition::OpenSettings => match self.settings().await {
                Ok(settings) => finish(&activation, WidgetView::Settings(settings.settings_form())),
                Err(e) => finish(&activation, store_error(&e)),
            },
            Transition::CancelSettings => self.activate(&activation, false).await,
            Transition::SaveSettings(form) => self.save_settings(&activation, form).await,
            Transition::SubmitOnboarding(form) => self.submit_onboarding(&activation, form).await,
            Transition::SignOut => self.sign_out(&activation).await,
        }
    }

    async fn activate(&self, activation: &Activation, interactive: bool) -> Outcome {
        let settings = match self.settings().await {
            Ok(settings) => settings,
            Err(e) => return finish(activation, store_error(&e)),
        };
        if !settings.has_credentials() {
            debug!("no credentials");
            return finish(activation, WidgetView::Onboarding(settings.onboarding_form()));
        }

        let auth = match self.widget.authorize(&settings, interactive).await {
            Ok(auth) => auth,
            Err(e) => return self.fail(activation, &settings, e).await,
        };
        if !activation.is_current() {
            return Outcome::Superseded;
        }

        match self.cache.read((self.clock)(), W::is_stale).await {
            Ok(Some(payload)) => {
                return finish(activation, data_view(W::present(payload, &settings), DataOrigin::Cached, &settings));
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "cache unreadable, fetching"),
        }

        let payload = match self.widget.fetch(&settings, &auth).await {
            Ok(payload) => payload,
            Err(e) => return self.fail(activation, &settings, e).await,
        };
        if !activation.is_current() {
            debug!("activation superseded, dropping response");
            return Outcome::Superseded;
        }

        if let Err(e) = self.cache.write(&payload, (self.clock)()).await {
            warn!(error = %e, "failed to cache response");
        }
        finish(activation, data_view(W::present(payload, &settings), DataOrigin::Fresh, &settings))
    }

    async fn fail(&self, activation: &Activation, settings: &W::Settings, err: FetchError) -> Outcome {
        if !activation.is_current() {
            return Outcome::Superseded;
        }
        info!(kind = ?err.kind, message = %err.message, "fetch failed");

        let view = match err.kind.route() {
            ErrorRoute::Onboarding => {
                if err.kind == ErrorKind::AuthExpired {
                    if let Err(e) = self.widget.forget_auth().await {
                        warn!(error = %e, "failed to forget credentials");
                    }
                    self.clear_cache().await;
                }
                WidgetView::Onboarding(settings.onboarding_form().with_message(err.message))
            }
            ErrorRoute::Settings => {
                WidgetView::Settings(settings.settings_form().with_message(err.message))
            }
            ErrorRoute::Error => WidgetView::Error {
                message: err.message,
            },
        };
        finish(activation, view)
    }

    async fn save_settings(&self, activation: &Activation, form: Form) -> Outcome {
        let current = match self.settings().await {
            Ok(settings) => settings,
            Err(e) => return finish(activation, store_error(&e)),
        };
        let next = match current.apply_form(&form) {
            Ok(next) => next,
            Err(e) => {
                debug!(error = %e, "rejected settings");
                return finish(activation, WidgetView::Settings(form.with_message(e.to_string())));
            }
        };

        if !activation.is_current() {
            return Outcome::Superseded;
        }
        if let Err(e) = self.save(&next).await {
            warn!(error = %e, "failed to save settings");
            let message = format!("Could not save settings: {e}");
            return finish(activation, WidgetView::Settings(form.with_message(message)));
        }
        info!("settings saved");
        self.clear_cache().await;
        self.activate(activation, true).await
    }

    async fn submit_onboarding(&self, activation: &Activation, form: Form) -> Outcome {
        if let Some(field) = form.missing_required() {
            debug!(field = field.key, "required field blank");
            return Outcome::Ignored;
        }

        let current = match self.settings().await {
            Ok(settings) => settings,
            Err(e) => return finish(activation, store_error(&e)),
        };
        let next = match current.apply_form(&form) {
            Ok(next) => next,
            Err(e) => {
                return finish(activation, WidgetView::Onboarding(form.with_message(e.to_string())));
            }
        };

        if !activation.is_current() {
            return Outcome::Superseded;
        }
        if let Err(e) = self.save(&next).await {
            warn!(error = %e, "failed to save settings");
            let message = format!("Could not save settings: {e}");
            return finish(activation, WidgetView::Onboarding(form.with_message(message)));
        }
        info!("onboarding complete");
        self.clear_cache().await;
        self.activate(activation, true).await
    }

    async fn sign_out(&self, activation: &Activation) -> Outcome {
        if !activation.is_current() {
            return Outcome::Superseded;
        }
        if let Err(e) = self.widget.forget_auth().await {
            warn!(error = %e, "failed to forget credentials");
        }
        self.clear_cache().await;
        info!("signed out");

        match self.settings().await {
            Ok(settings) => finish(activation, WidgetView::Onboarding(settings.onboarding_form())),
            Err(e) => finish(activation, store_error(&e)),
        }
    }
}

impl<W: Widget, S: KvStore> Controller for Presenter<W, S> {
    fn kind(&self) -> WidgetKind {
        W::Settings::KIND
    }

    fn run(
        &self,
        activation: Activation,
        transition: Transition,
    ) -> Pin<Box<dyn Future<Output = Outcome> + Send + '_>> {
        Box::pin(self.transition(activation, transition))
    }
}

fn finish(activation: &Activation, view: WidgetView) -> Outcome {
    if activation.is_current() {
        Outcome::View(view)
    } else {
        Outcome::Superseded
    }
}

fn data_view<C: Configurable>(
    data: newtab_protocol::WidgetData,
    origin: DataOrigin,
    settings: &C,
) -> WidgetView {
    WidgetView::Data {
        data,
        origin,
        accent: settings.accent().trim().to_string(),
    }
}

fn store_error(err: &crate::Error) -> WidgetView {
    WidgetView::Error {
        message: format!("Could not read settings: {err}"),
    }
}
