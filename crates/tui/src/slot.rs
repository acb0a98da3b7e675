//! Widget slots.
//!
//! A [`Slot`] is everything the dashboard keeps for one widget: the
//! controller that produces its views, the activation counter guarding
//! against stale results, the view currently shown, the editing state of
//! a form view and the tick timer of a data view.
//!
//! Replacing the view always drops the previous ticker, so a timer never
//! outlives the view that started it.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use newtab_protocol::{Activation, ActivationCounter, ActivationToken, WidgetKind, WidgetView};
use newtab_widgets::Controller;
use tokio::sync::mpsc;
use tracing::debug;

use crate::app::AppEvent;
use crate::event::InputMode;
use crate::form_state::FormState;
use crate::ticker::Ticker;

/// One widget's place on the dashboard.
pub struct Slot {
    index: usize,
    controller: Arc<dyn Controller>,
    counter: ActivationCounter,
    view: WidgetView,
    form: Option<FormState>,
    ticker: Option<Ticker>,
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("index", &self.index)
            .field("kind", &self.kind())
            .field("view", &self.view.name())
            .field("ticker", &self.ticker)
            .finish_non_exhaustive()
    }
}

impl Slot {
    /// Creates slot `index` driven by `controller`, showing the loading
    /// view.
    #[must_use]
    pub fn new(index: usize, controller: Arc<dyn Controller>) -> Self {
        Self {
            index,
            controller,
            counter: ActivationCounter::new(),
            view: WidgetView::Loading,
            form: None,
            ticker: None,
        }
    }

    /// Returns the widget shown in this slot.
    #[must_use]
    pub fn kind(&self) -> WidgetKind {
        self.controller.kind()
    }

    /// Returns a handle on the slot's controller.
    #[must_use]
    pub fn controller(&self) -> Arc<dyn Controller> {
        Arc::clone(&self.controller)
    }

    /// Returns the current view.
    #[must_use]
    pub fn view(&self) -> &WidgetView {
        &self.view
    }

    /// Returns the editing state of a form view.
    #[must_use]
    pub fn form(&self) -> Option<&FormState> {
        self.form.as_ref()
    }

    /// Returns the editing state of a form view, mutably.
    pub fn form_mut(&mut self) -> Option<&mut FormState> {
        self.form.as_mut()
    }

    /// Returns the running ticker, if any.
    #[must_use]
    pub fn ticker(&self) -> Option<&Ticker> {
        self.ticker.as_ref()
    }

    /// Returns how keys should be interpreted while this slot has focus.
    #[must_use]
    pub fn input_mode(&self) -> InputMode {
        match &self.form {
            Some(form) if form.is_editing() => InputMode::Editing,
            Some(_) => InputMode::Form,
            None => InputMode::Dashboard,
        }
    }

    /// Starts a new activation, superseding in-flight work and stopping the
    /// ticker.
    pub fn begin(&mut self) -> Activation {
        self.ticker = None;
        self.counter.begin()
    }

    /// Returns the token of the latest activation.
    #[must_use]
    pub fn token(&self) -> ActivationToken {
        self.counter.current()
    }

    /// Returns `true` if `token` belongs to the latest activation.
    #[must_use]
    pub fn is_current(&self, token: ActivationToken) -> bool {
        self.counter.is_current(token)
    }

    /// Shows the loading view.
    pub fn show_loading(&mut self) {
        self.set_view(WidgetView::Loading);
    }

    /// Replaces the view.
    ///
    /// A form view gets a fresh editing state. A data view that needs
    /// periodic re-rendering starts a ticker tagged with `token`.
    pub fn show(
        &mut self,
        view: WidgetView,
        token: ActivationToken,
        now: DateTime<Utc>,
        events: &mpsc::UnboundedSender<AppEvent>,
    ) {
        debug!(slot = self.index, view = view.name(), "showing view");
        self.set_view(view);
        self.retick(token, now, events);
    }

    /// Makes the ticker match what the current view needs at `now`.
    ///
    /// The ticker is left alone when its period is still right.
    pub fn retick(
        &mut self,
        token: ActivationToken,
        now: DateTime<Utc>,
        events: &mpsc::UnboundedSender<AppEvent>,
    ) {
        let wanted = match &self.view {
            WidgetView::Data { data, .. } => data.tick_interval(now),
            _ => None,
        };
        if self.ticker.as_ref().map(Ticker::period) == wanted {
            return;
        }
        self.ticker =
            wanted.map(|period| Ticker::spawn(self.index, token, period, events.clone()));
    }

    /// Returns `true` if the shown data has run out at `now` and the widget
    /// should re-activate.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(&self.view, WidgetView::Data { data, .. } if data.is_expired(now))
    }

    /// Detaches the slot: in-flight work finishes without effect and the
    /// ticker stops.
    pub fn detach(&mut self) {
        self.counter.invalidate();
        self.ticker = None;
    }

    fn set_view(&mut self, view: WidgetView) {
        self.ticker = None;
        self.form = view.form().cloned().map(FormState::new);
        self.view = view;
    }
}
