//! Periodic re-render timers owned by widget slots.
//!
//! A [`Ticker`] sends [`AppEvent::Tick`] for one slot at a fixed period
//! until it is dropped. Slots drop their ticker on every transition, so a
//! timer never outlives the view that started it.

use std::time::Duration;

use newtab_protocol::ActivationToken;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::app::AppEvent;

/// A running tick timer.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    cancel_tx: broadcast::Sender<()>,
    join: JoinHandle<()>,
}

impl Ticker {
    /// Starts ticking for `slot` every `period`, the first tick one period
    /// from now.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(
        slot: usize,
        token: ActivationToken,
        period: Duration,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        let (cancel_tx, mut cancel_rx) = broadcast::channel(1);
        let join = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = cancel_rx.recv() => {
                        debug!(slot, "ticker cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        if events.send(AppEvent::Tick { slot, token }).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Self {
            period,
            cancel_tx,
            join,
        }
    }

    /// Returns the tick period.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns `true` once the timer task has stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        let _ = self.cancel_tx.send(());
        self.join.abort();
    }
}
