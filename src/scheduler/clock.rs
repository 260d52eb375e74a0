//! Sources of the current local wall-clock time.

use chrono::{Duration, Local, NaiveDateTime};

/// Provides the current local time.
pub trait Clock {
    /// The current local wall-clock time.
    fn now(&self) -> NaiveDateTime;
}

/// The host's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualClock {
    now: NaiveDateTime,
}

impl ManualClock {
    /// Creates a clock stopped at `now`.
    #[must_use]
    pub const fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// Moves the clock to `now`.
    pub const fn set(&mut self, now: NaiveDateTime) {
        self.now = now;
    }

    /// Moves the clock forward.
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }
}
