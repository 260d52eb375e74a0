//! A one-second resolution countdown.
//!
//! The countdown does not own a timer. The caller drives it by calling
//! [`Countdown::tick`] once per elapsed second, and stops driving it as soon
//! as the countdown is no longer running.

use std::fmt;

/// The phase a countdown is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    /// Never started, or reset.
    #[default]
    Idle,
    /// Counting down.
    Running,
    /// Stopped with time remaining.
    Paused,
    /// Reached zero.
    Finished,
}

/// The result of advancing a countdown by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Still running, with this many seconds left.
    Remaining(u32),
    /// Reached zero on this tick.
    Finished,
    /// The countdown was not running, so nothing happened.
    Inactive,
}

/// Input for a countdown that is not of the form `MM:SS`.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("invalid countdown '{0}': expected MM:SS")]
pub struct ParseError(String);

/// A countdown timer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    state: State,
}

impl Countdown {
    /// Creates an idle countdown with nothing on the clock.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            remaining: 0,
            state: State::Idle,
        }
    }

    /// Parses `MM:SS` into a number of seconds.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] unless the input is two colon-separated
    /// non-negative integers.
    pub fn parse(input: &str) -> Result<u32, ParseError> {
        let invalid = || ParseError(input.to_string());
        let (minutes, seconds) = input.trim().split_once(':').ok_or_else(invalid)?;
        let minutes: u32 = minutes.trim().parse().map_err(|_| invalid())?;
        let seconds: u32 = seconds.trim().parse().map_err(|_| invalid())?;
        minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .ok_or_else(invalid)
    }

    /// Starts counting down from `seconds`.
    ///
    /// Returns `false`, leaving the countdown untouched, if it is already
    /// running.
    pub const fn start(&mut self, seconds: u32) -> bool {
        if matches!(self.state, State::Running) {
            return false;
        }
        self.remaining = seconds;
        self.state = State::Running;
        true
    }

    /// Resumes a paused countdown.
    ///
    /// Returns `false` if there was nothing to resume.
    pub const fn resume(&mut self) -> bool {
        if matches!(self.state, State::Paused) {
            self.state = State::Running;
            true
        } else {
            false
        }
    }

    /// Pauses a running countdown, keeping the remaining time.
    pub const fn stop(&mut self) {
        if matches!(self.state, State::Running) {
            self.state = State::Paused;
        }
    }

    /// Clears the countdown back to idle with nothing on the clock.
    pub const fn reset(&mut self) {
        self.remaining = 0;
        self.state = State::Idle;
    }

    /// Advances the countdown by one second.
    pub const fn tick(&mut self) -> Tick {
        if !matches!(self.state, State::Running) {
            return Tick::Inactive;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = State::Finished;
            Tick::Finished
        } else {
            Tick::Remaining(self.remaining)
        }
    }

    /// Seconds left on the clock.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// The current phase.
    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}
