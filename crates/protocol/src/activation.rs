//! Activation tokens.
//!
//! Every time a widget slot starts a transition (initial load, refresh,
//! settings save, ...) it begins a new activation. Asynchronous work carries
//! its [`Activation`] and checks [`Activation::is_current`] before writing
//! to the cache or producing a view; a superseded activation does neither.
//!
//! # Examples
//!
//! ```
//! use newtab_protocol::ActivationCounter;
//!
//! let counter = ActivationCounter::new();
//! let first = counter.begin();
//! assert!(first.is_current());
//!
//! let second = counter.begin();
//! assert!(!first.is_current());
//! assert!(second.is_current());
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// An opaque identifier for one activation of a widget slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ActivationToken(u64);

impl ActivationToken {
    /// Returns the raw sequence number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// The per-slot source of activation tokens.
///
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct ActivationCounter {
    current: Arc<AtomicU64>,
}

impl ActivationCounter {
    /// Creates a counter with no activation in progress.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new activation, superseding every earlier one.
    #[must_use]
    pub fn begin(&self) -> Activation {
        let token = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        Activation {
            token: ActivationToken(token),
            current: Arc::clone(&self.current),
        }
    }

    /// Supersedes the current activation without starting a new one.
    ///
    /// Used when a slot is detached; in-flight work then finishes silently.
    pub fn invalidate(&self) {
        self.current.fetch_add(1, Ordering::SeqCst);
    }

    /// Returns the token of the most recent activation.
    #[must_use]
    pub fn current(&self) -> ActivationToken {
        ActivationToken(self.current.load(Ordering::SeqCst))
    }

    /// Returns `true` if `token` belongs to the most recent activation.
    #[must_use]
    pub fn is_current(&self, token: ActivationToken) -> bool {
        self.current() == token
    }
}

/// A handle on one activation, carried by the work it started.
#[derive(Debug, Clone)]
pub struct Activation {
    token: ActivationToken,
    current: Arc<AtomicU64>,
}

impl Activation {
    /// Returns this activation's token.
    #[must_use]
    pub fn token(&self) -> ActivationToken {
        self.token
    }

    /// Returns `true` while no newer activation has begun.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.token.0
    }
}
