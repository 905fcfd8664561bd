//! Wall-clock debounce markers.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Remembers when an action was last attempted and refuses repeats inside a
/// window.
///
/// Windows are re-evaluated against the supplied `now` on every call, so an
/// irregular tick cadence only delays, never skips, the next attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debounce {
    last: Option<DateTime<Utc>>,
}

impl Debounce {
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Last recorded attempt.
    #[must_use]
    pub const fn last(&self) -> Option<DateTime<Utc>> {
        self.last
    }

    /// True when no attempt was recorded within `window` before `now`.
    #[must_use]
    pub fn is_ready(&self, now: DateTime<Utc>, window: Duration) -> bool {
        match self.last {
            Some(last) => now - last >= window,
            None => true,
        }
    }

    /// Record an attempt at `now` if the window allows it.
    ///
    /// Returns `false` (and records nothing) while still inside the window.
    pub fn try_acquire(&mut self, now: DateTime<Utc>, window: Duration) -> bool {
        if !self.is_ready(now, window) {
            return false;
        }
        self.last = Some(now);
        true
    }

    /// Record an attempt unconditionally.
    pub fn mark(&mut self, now: DateTime<Utc>) {
        self.last = Some(now);
    }

    /// Forget the last attempt so the next one is allowed immediately.
    pub fn clear(&mut self) {
        self.last = None;
    }
}

/// True when `window` has fully elapsed since `since`.
#[must_use]
pub fn elapsed(since: DateTime<Utc>, now: DateTime<Utc>, window: Duration) -> bool {
    now - since > window
}
