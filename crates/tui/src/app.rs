//! Main application struct and run loop.
//!
//! This module provides the `App` struct which orchestrates the dashboard:
//! it turns key presses into widget transitions, runs those transitions on
//! spawned tasks, applies their outcomes as they come back, and renders
//! every slot.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use newtab_protocol::{ActivationToken, FormAction, FormKind, Message, WidgetView};
use newtab_widgets::{Clock, Controller, Outcome, Transition};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::{
    AppState,
    event::{InputMode, event_to_message, poll_event},
    layout::{HEADER_HEIGHT, MIN_HEIGHT, MIN_HEIGHT_WITH_HEADER, MIN_SLOT_WIDTH, MIN_WIDTH},
    slot::Slot,
    terminal::AppTerminal,
    widgets::{render_help_overlay, render_slot},
};

/// Something that happened off the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    /// A transition finished.
    Outcome {
        /// The slot the transition ran for.
        slot: usize,
        /// The activation the transition ran under.
        token: ActivationToken,
        /// What the transition produced.
        outcome: Outcome,
    },
    /// A slot's ticker fired.
    Tick {
        /// The ticking slot.
        slot: usize,
        /// The activation whose view started the ticker.
        token: ActivationToken,
    },
}

/// The main application struct.
///
/// Owns one [`Slot`] per widget and provides the main event loop.
pub struct App {
    state: AppState,
    slots: Vec<Slot>,
    should_quit: bool,
    clock: Clock,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("state", &self.state)
            .field("slots", &self.slots)
            .field("should_quit", &self.should_quit)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Creates a dashboard with one slot per controller, in order.
    ///
    /// Nothing is loaded until [`App::start`] (or [`App::run`]) is called.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use newtab_tui::App;
    /// use newtab_widgets::{Controller, MemoryStore, Presenter, WeatherWidget, build_client};
    ///
    /// # fn main() -> newtab_widgets::Result<()> {
    /// let client = build_client(std::time::Duration::from_secs(10), "newtab")?;
    /// let weather = WeatherWidget::new(client, "https://api.openweathermap.org/data/2.5");
    /// let controller: Arc<dyn Controller> = Arc::new(Presenter::new(weather, MemoryStore::new()));
    ///
    /// let app = App::new(vec![controller]);
    /// assert_eq!(app.slots().len(), 1);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn new(controllers: Vec<Arc<dyn Controller>>) -> Self {
        let slots: Vec<Slot> = controllers
            .into_iter()
            .enumerate()
            .map(|(index, controller)| Slot::new(index, controller))
            .collect();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::new(slots.len()),
            slots,
            should_quit: false,
            clock: Arc::new(Utc::now),
            events_tx,
            events_rx,
        }
    }

    /// Replaces the wall clock.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Returns a reference to the dashboard state.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Returns the widget slots, in display order.
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Returns `true` once the user asked to quit.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Starts the initial, non-interactive activation of every slot.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) {
        info!(widgets = self.slots.len(), "starting dashboard");
        for index in 0..self.slots.len() {
            self.dispatch(index, Transition::Activate { interactive: false });
        }
    }

    /// Updates the application state based on a message.
    ///
    /// When the help overlay is visible, most messages are intercepted to
    /// dismiss the help instead of their normal action. Only `Quit` and
    /// `ToggleHelp` work normally when help is shown.
    ///
    /// # Arguments
    ///
    /// * `msg` - The message to process.
    pub fn update(&mut self, msg: Message) {
        if msg.is_terminating() {
            self.should_quit = true;
            return;
        }

        // When help is visible, most keys should dismiss it
        if self.state.help_visible {
            match msg {
                Message::ToggleHelp | Message::Escape => self.state.toggle_help(),
                _ => {
                    let _ = self.state.dismiss_help();
                }
            }
            return;
        }

        if msg.is_form() {
            self.update_form(msg);
            return;
        }

        let focus = self.state.focus;
        let focused_view = self.slots.get(focus).map(Slot::view);
        let settled = matches!(
            focused_view,
            Some(WidgetView::Data { .. } | WidgetView::Error { .. })
        );
        let failed = matches!(focused_view, Some(WidgetView::Error { .. }));

        match msg {
            Message::FocusNext => self.state.focus_next(),
            Message::FocusPrev => self.state.focus_prev(),
            Message::ToggleHelp => self.state.toggle_help(),
            Message::Refresh if settled => self.dispatch(focus, Transition::Refresh),
            Message::OpenSettings if settled => self.dispatch(focus, Transition::OpenSettings),
            Message::Select if failed => self.dispatch(focus, Transition::Refresh),
            _ => {}
        }
    }

    /// Applies a form message to the focused slot's form.
    fn update_form(&mut self, msg: Message) {
        let focus = self.state.focus;
        let Some(slot) = self.slots.get_mut(focus) else {
            return;
        };
        let kind = slot.view().form().map(|form| form.kind);
        let Some(form) = slot.form_mut() else {
            return;
        };

        let transition = match msg {
            Message::FormNavigate { delta } => {
                form.navigate(delta);
                None
            }
            Message::FormActivate if form.is_pending() => None,
            Message::FormActivate => match form.activate() {
                Some(FormAction::Submit { .. }) => {
                    form.mark_pending();
                    Some(Transition::SubmitOnboarding(form.form().clone()))
                }
                Some(FormAction::Save) => {
                    form.mark_pending();
                    Some(Transition::SaveSettings(form.form().clone()))
                }
                Some(FormAction::Cancel) => Some(Transition::CancelSettings),
                Some(FormAction::SignOut) => Some(Transition::SignOut),
                None => None,
            },
            Message::FormConfirm => {
                form.confirm_edit();
                None
            }
            Message::FormCancel if form.is_editing() => {
                form.cancel_edit();
                None
            }
            Message::FormCancel if kind == Some(FormKind::Settings) => {
                Some(Transition::CancelSettings)
            }
            Message::FormInput { ch } => {
                form.input_char(ch);
                None
            }
            Message::FormBackspace => {
                form.backspace();
                None
            }
            _ => None,
        };

        if let Some(transition) = transition {
            self.dispatch(focus, transition);
        }
    }

    /// Runs `transition` for slot `index` on a spawned task.
    ///
    /// Starting the transition supersedes whatever the slot was doing; the
    /// outcome comes back as an [`AppEvent::Outcome`].
    fn dispatch(&mut self, index: usize, transition: Transition) {
        let Some(slot) = self.slots.get_mut(index) else {
            return;
        };
        let activation = slot.begin();
        if transition.shows_loading() {
            slot.show_loading();
        }

        let token = activation.token();
        debug!(
            slot = index,
            kind = %slot.kind(),
            token = token.get(),
            "dispatching transition"
        );

        let controller = slot.controller();
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = controller.run(activation, transition).await;
            let _ = events.send(AppEvent::Outcome {
                slot: index,
                token,
                outcome,
            });
        });
    }

    /// Applies an event from a transition or a ticker.
    ///
    /// Events tagged with a superseded activation are dropped.
    pub fn handle_event(&mut self, event: AppEvent) {
        let now = (self.clock)();
        match event {
            AppEvent::Outcome {
                slot: index,
                token,
                outcome,
            } => {
                let Some(slot) = self.slots.get_mut(index) else {
                    return;
                };
                if !slot.is_current(token) {
                    debug!(slot = index, token = token.get(), "dropping stale outcome");
                    return;
                }
                match outcome {
                    Outcome::View(view) => slot.show(view, token, now, &self.events_tx),
                    Outcome::Ignored => {
                        if let Some(form) = slot.form_mut() {
                            form.clear_pending();
                        }
                    }
                    Outcome::Superseded => {}
                }
            }
            AppEvent::Tick { slot: index, token } => {
                let Some(slot) = self.slots.get_mut(index) else {
                    return;
                };
                if !slot.is_current(token) {
                    return;
                }
                if slot.is_expired(now) {
                    info!(slot = index, kind = %slot.kind(), "shown data expired, reloading");
                    self.dispatch(index, Transition::Activate { interactive: false });
                } else {
                    slot.retick(token, now, &self.events_tx);
                }
            }
        }
    }

    /// Applies every event that has already arrived.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
        }
    }

    /// Waits for the next event and applies it.
    ///
    /// Returns `false` if no more events can arrive.
    pub async fn process_next_event(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    /// Returns how keys should be interpreted right now.
    #[must_use]
    pub fn input_mode(&self) -> InputMode {
        self.slots
            .get(self.state.focus)
            .map_or(InputMode::Dashboard, Slot::input_mode)
    }

    /// Renders the application UI to the given frame.
    ///
    /// Implements graceful degradation for small terminal sizes:
    /// - If terminal is below minimum dimensions, shows a "terminal too small" message.
    /// - If terminal is tight (below `MIN_HEIGHT_WITH_HEADER`), hides the header to reclaim space.
    /// - Slots sit side by side when they fit, stacked otherwise.
    ///
    /// # Arguments
    ///
    /// * `frame` - The frame to render into.
    pub fn view(&self, frame: &mut Frame) {
        let area = frame.area();
        let now = (self.clock)();

        if area.height < MIN_HEIGHT || area.width < MIN_WIDTH {
            self.render_terminal_too_small(frame, area);
            return;
        }

        let content_area = if area.height >= MIN_HEIGHT_WITH_HEADER {
            let [header_area, content_area] =
                Layout::vertical([Constraint::Length(HEADER_HEIGHT), Constraint::Min(0)])
                    .areas(area);
            self.render_header(frame, header_area, now);
            content_area
        } else {
            area
        };

        self.render_slots(frame, content_area, now);

        if self.state.help_visible {
            render_help_overlay(area, frame.buffer_mut());
        }
    }

    /// Renders every slot into `area`.
    fn render_slots(&self, frame: &mut Frame, area: Rect, now: DateTime<Utc>) {
        if self.slots.is_empty() {
            let paragraph = Paragraph::new("No widgets configured")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
            return;
        }

        let count = self.slots.len();
        let fits_side_by_side = usize::from(area.width) >= count * usize::from(MIN_SLOT_WIDTH);
        let direction = if fits_side_by_side {
            Direction::Horizontal
        } else {
            Direction::Vertical
        };
        let ratio = u32::try_from(count).unwrap_or(u32::MAX);
        let areas = Layout::default()
            .direction(direction)
            .constraints(vec![Constraint::Ratio(1, ratio); count])
            .split(area);

        let buf = frame.buffer_mut();
        for (index, (slot, slot_area)) in self.slots.iter().zip(areas.iter()).enumerate() {
            render_slot(slot, index == self.state.focus, now, *slot_area, buf);
        }
    }

    /// Renders a message indicating the terminal is too small.
    fn render_terminal_too_small(&self, frame: &mut Frame, area: Rect) {
        let message = format!(
            "Terminal too small ({}×{})\nMinimum: {}×{} (w×h)",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );

        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .wrap(ratatui::widgets::Wrap { trim: false });

        // Center the message vertically
        let vertical_offset = area.height.saturating_sub(2) / 2;
        let centered_area = Rect {
            x: area.x,
            y: area.y + vertical_offset,
            width: area.width,
            height: area.height.saturating_sub(vertical_offset),
        };

        frame.render_widget(paragraph, centered_area);
    }

    /// Renders the header bar with title, clock and help cue.
    fn render_header(&self, frame: &mut Frame, area: Rect, now: DateTime<Utc>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        // Split inner area: title left, help cue right
        let [title_area, help_area] = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(17), // "Press ? for help" = 16 chars + padding
        ])
        .areas(inner);

        let local = now.with_timezone(&Local);
        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                "newtab",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" - "),
            Span::styled(
                local.format("%a %-d %b %H:%M").to_string(),
                Style::default().fg(Color::White),
            ),
        ]));
        frame.render_widget(title, title_area);

        let help_cue = Paragraph::new(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::DarkGray)),
            Span::styled("?", Style::default().fg(Color::Yellow)),
            Span::styled(" for help", Style::default().fg(Color::DarkGray)),
        ]))
        .alignment(Alignment::Right);
        frame.render_widget(help_cue, help_area);
    }

    /// Runs the main application loop.
    ///
    /// Starts every widget, then polls for key presses and transition
    /// outcomes until the user quits. On exit every slot is detached so
    /// in-flight work finishes without touching the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal operations fail.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use newtab_tui::{App, terminal};
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let mut terminal = terminal::setup_terminal()?;
    ///     let mut app = App::new(Vec::new());
    ///     app.run(&mut terminal).await?;
    ///     terminal::restore_terminal(&mut terminal)?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn run(&mut self, terminal: &mut AppTerminal) -> anyhow::Result<()> {
        self.start();

        loop {
            terminal.draw(|frame| self.view(frame))?;

            if let Some(event) = poll_event()? {
                if let Some(msg) = event_to_message(&event, self.input_mode()) {
                    self.update(msg);
                }
            }

            self.drain_events();

            if self.should_quit {
                break;
            }
        }

        for slot in &mut self.slots {
            slot.detach();
        }
        info!("dashboard closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{StubController, buffer_to_string};
    use chrono::{TimeDelta, TimeZone};
    use newtab_protocol::{
        Configurable, DataOrigin, Fixture, Team, WeatherSettings, WidgetData, WidgetKind,
    };
    use ratatui::{Terminal, backend::TestBackend};
    use std::sync::Mutex;
    use std::time::Duration;

    fn error(message: &str) -> Outcome {
        Outcome::View(WidgetView::Error {
            message: message.to_string(),
        })
    }

    fn onboarding() -> Outcome {
        Outcome::View(WidgetView::Onboarding(
            WeatherSettings::default().onboarding_form(),
        ))
    }

    fn kickoff() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 3, 14, 0, 0).unwrap()
    }

    fn football_data() -> Outcome {
        let team = |id, name: &str| Team {
            id,
            name: name.to_string(),
            short_name: None,
        };
        Outcome::View(WidgetView::Data {
            data: WidgetData::Football {
                fixture: Fixture {
                    id: 1,
                    kickoff: kickoff(),
                    competition: "Premier League".into(),
                    home: team(66, "Home"),
                    away: team(64, "Away"),
                },
                utc_offset_hours: 0,
            },
            origin: DataOrigin::Fresh,
            accent: String::new(),
        })
    }

    fn app_with(controller: Arc<StubController>) -> App {
        App::new(vec![controller as Arc<dyn Controller>])
    }

    fn type_text(app: &mut App, text: &str) {
        app.update(Message::FormActivate);
        for ch in text.chars() {
            app.update(Message::FormInput { ch });
        }
        app.update(Message::FormConfirm);
    }

    #[tokio::test]
    async fn start_activates_every_slot() {
        let weather = StubController::new(WidgetKind::Weather, |_| onboarding());
        let mail = StubController::new(WidgetKind::Mail, |_| error("offline"));
        let mut app = App::new(vec![
            Arc::clone(&weather) as Arc<dyn Controller>,
            Arc::clone(&mail) as Arc<dyn Controller>,
        ]);

        app.start();
        assert!(app.slots().iter().all(|s| s.view().is_loading()));

        assert!(app.process_next_event().await);
        assert!(app.process_next_event().await);

        assert_eq!(app.slots()[0].view().name(), "onboarding");
        assert_eq!(app.slots()[1].view().name(), "error");
        assert_eq!(
            weather.calls(),
            vec![Transition::Activate { interactive: false }]
        );
    }

    #[tokio::test]
    async fn superseded_outcome_is_dropped() {
        let stub = StubController::new(WidgetKind::Weather, |t| match t {
            Transition::Activate { .. } => error("first"),
            _ => error("second"),
        });
        let mut app = app_with(stub);

        app.dispatch(0, Transition::Activate { interactive: false });
        app.dispatch(0, Transition::Refresh);
        app.process_next_event().await;
        app.process_next_event().await;

        assert_eq!(
            app.slots()[0].view(),
            &WidgetView::Error {
                message: "second".into()
            }
        );
    }

    #[tokio::test]
    async fn onboarding_submit_sends_entered_values() {
        let stub = StubController::new(WidgetKind::Weather, |t| match t {
            Transition::SubmitOnboarding(_) => error("submitted"),
            _ => onboarding(),
        });
        let mut app = app_with(Arc::clone(&stub));
        app.start();
        app.process_next_event().await;
        assert_eq!(app.input_mode(), InputMode::Form);

        type_text(&mut app, "abc123");
        app.update(Message::FormNavigate { delta: 1 });
        type_text(&mut app, "Lyon,FR");
        app.update(Message::FormNavigate { delta: 1 });
        app.update(Message::FormActivate);

        assert!(app.slots()[0].form().is_some_and(|f| f.is_pending()));
        app.process_next_event().await;

        let calls = stub.calls();
        let Some(Transition::SubmitOnboarding(form)) = calls.last() else {
            panic!("expected a submit, got {calls:?}");
        };
        assert_eq!(form.value("api_key"), Some("abc123"));
        assert_eq!(form.value("location"), Some("Lyon,FR"));
        assert_eq!(app.slots()[0].view().name(), "error");
    }

    #[tokio::test]
    async fn ignored_submit_clears_pending() {
        let stub = StubController::new(WidgetKind::Weather, |t| match t {
            Transition::SubmitOnboarding(_) => Outcome::Ignored,
            _ => onboarding(),
        });
        let mut app = app_with(stub);
        app.start();
        app.process_next_event().await;

        app.update(Message::FormNavigate { delta: -1 });
        app.update(Message::FormActivate);
        assert!(app.slots()[0].form().is_some_and(|f| f.is_pending()));

        app.process_next_event().await;
        let form = app.slots()[0].form().unwrap();
        assert!(!form.is_pending());
        assert_eq!(app.slots()[0].view().name(), "onboarding");
    }

    #[tokio::test]
    async fn escape_in_settings_cancels() {
        let stub = StubController::new(WidgetKind::Weather, |t| match t {
            Transition::OpenSettings => Outcome::View(WidgetView::Settings(
                WeatherSettings::default().settings_form(),
            )),
            _ => error("offline"),
        });
        let mut app = app_with(Arc::clone(&stub));
        app.start();
        app.process_next_event().await;

        app.update(Message::OpenSettings);
        app.process_next_event().await;
        assert_eq!(app.slots()[0].view().name(), "settings");

        // Esc while editing only leaves the field.
        app.update(Message::FormActivate);
        assert_eq!(app.input_mode(), InputMode::Editing);
        app.update(Message::FormCancel);
        assert_eq!(app.input_mode(), InputMode::Form);

        app.update(Message::FormCancel);
        assert!(app.slots()[0].view().is_loading());
        app.process_next_event().await;
        assert_eq!(stub.calls().last(), Some(&Transition::CancelSettings));
    }

    #[tokio::test]
    async fn select_retries_after_error() {
        let stub = StubController::new(WidgetKind::Mail, |_| error("offline"));
        let mut app = app_with(Arc::clone(&stub));
        app.start();
        app.process_next_event().await;

        app.update(Message::Select);

        assert!(app.slots()[0].view().is_loading());
        app.process_next_event().await;
        assert_eq!(stub.calls().last(), Some(&Transition::Refresh));
    }

    #[tokio::test]
    async fn refresh_is_ignored_while_loading() {
        let stub = StubController::new(WidgetKind::Mail, |_| error("offline"));
        let mut app = app_with(Arc::clone(&stub));
        app.start();

        app.update(Message::Refresh);
        app.update(Message::OpenSettings);

        app.process_next_event().await;
        assert_eq!(stub.calls().len(), 1);
    }

    #[tokio::test]
    async fn help_blocks_focus_changes() {
        let a = StubController::new(WidgetKind::Weather, |_| error("x"));
        let b = StubController::new(WidgetKind::Mail, |_| error("y"));
        let mut app = App::new(vec![a as Arc<dyn Controller>, b as Arc<dyn Controller>]);

        app.update(Message::ToggleHelp);
        app.update(Message::FocusNext);
        assert!(!app.state().help_visible);
        assert_eq!(app.state().focus, 0);

        app.update(Message::FocusNext);
        assert_eq!(app.state().focus, 1);

        app.update(Message::Quit);
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn football_data_starts_ticker_and_reloads_when_over() {
        let now = Arc::new(Mutex::new(kickoff() - TimeDelta::hours(1)));
        let clock_now = Arc::clone(&now);
        let stub = StubController::new(WidgetKind::Football, |t| match t {
            Transition::Activate { .. } => football_data(),
            _ => error("unexpected"),
        });
        let mut app = app_with(Arc::clone(&stub)).with_clock(move || *clock_now.lock().unwrap());
        app.start();
        app.process_next_event().await;

        let token = app.slots()[0].token();
        let ticker = app.slots()[0].ticker().expect("countdown ticker");
        assert_eq!(ticker.period(), Duration::from_secs(1));

        // Once kicked off, the countdown ticker becomes a phase poll.
        *now.lock().unwrap() = kickoff() + TimeDelta::minutes(5);
        app.handle_event(AppEvent::Tick { slot: 0, token });
        let ticker = app.slots()[0].ticker().expect("phase ticker");
        assert_eq!(ticker.period(), Duration::from_secs(60));

        // A finished match re-activates the widget.
        *now.lock().unwrap() = kickoff() + TimeDelta::hours(3);
        app.handle_event(AppEvent::Tick { slot: 0, token });
        assert!(app.slots()[0].view().is_loading());
        assert!(app.slots()[0].ticker().is_none());
        app.process_next_event().await;
        assert_eq!(
            stub.calls(),
            vec![
                Transition::Activate { interactive: false },
                Transition::Activate { interactive: false },
            ]
        );
    }

    #[tokio::test]
    async fn stale_tick_is_ignored() {
        let stub = StubController::new(WidgetKind::Football, |t| match t {
            Transition::Activate { .. } => football_data(),
            _ => error("refreshed"),
        });
        let mut app = app_with(Arc::clone(&stub))
            .with_clock(|| kickoff() + TimeDelta::hours(3));
        app.start();
        let stale = app.slots()[0].token();
        app.process_next_event().await;

        app.update(Message::Refresh);
        let current = app.slots()[0].token();
        app.handle_event(AppEvent::Tick {
            slot: 0,
            token: stale,
        });

        assert_eq!(app.slots()[0].token(), current);
        app.process_next_event().await;
        assert_eq!(stub.calls().len(), 2);
        assert_eq!(app.slots()[0].view().name(), "error");
    }

    #[tokio::test]
    async fn transition_drops_ticker() {
        let stub = StubController::new(WidgetKind::Football, |t| match t {
            Transition::Activate { .. } => football_data(),
            _ => error("refreshed"),
        });
        let mut app = app_with(stub).with_clock(|| kickoff() - TimeDelta::hours(1));
        app.start();
        app.process_next_event().await;
        assert!(app.slots()[0].ticker().is_some());

        app.update(Message::Refresh);

        assert!(app.slots()[0].ticker().is_none());
    }

    #[tokio::test]
    async fn view_renders_header_and_slots() {
        let weather = StubController::new(WidgetKind::Weather, |_| error("Service down"));
        let mail = StubController::new(WidgetKind::Mail, |_| onboarding());
        let mut app = App::new(vec![
            weather as Arc<dyn Controller>,
            mail as Arc<dyn Controller>,
        ]);
        app.start();
        app.process_next_event().await;
        app.process_next_event().await;

        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|frame| app.view(frame)).unwrap();
        let content = buffer_to_string(terminal.backend().buffer());

        assert!(content.contains("newtab"));
        assert!(content.contains("Press ? for help"));
        assert!(content.contains("Weather"));
        assert!(content.contains("Inbox"));
        assert!(content.contains("Service down"));
        assert!(content.contains("Set up Weather"));
    }

    #[test]
    fn view_reports_small_terminal() {
        let app = App::new(Vec::new());

        let mut terminal = Terminal::new(TestBackend::new(20, 5)).unwrap();
        terminal.draw(|frame| app.view(frame)).unwrap();
        let content = buffer_to_string(terminal.backend().buffer());

        assert!(content.contains("Terminal too small"));
    }

    #[test]
    fn view_without_widgets() {
        let app = App::new(Vec::new());

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| app.view(frame)).unwrap();
        let content = buffer_to_string(terminal.backend().buffer());

        assert!(content.contains("No widgets configured"));
    }
}
