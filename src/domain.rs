//! Domain models for reminders.
//!
//! This module contains the reminder record itself, parsing of due instants,
//! configuration, and the countdown timer.

/// Reminder records and their validated components.
pub mod reminder;
pub use reminder::{Reminder, ReminderId, Title, ValidationError};

/// Parsing and formatting of due instants.
pub mod due;

mod config;
pub use config::{Config, DueNotificationPolicy};

/// Countdown timer state machine.
pub mod countdown;
pub use countdown::Countdown;
