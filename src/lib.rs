//! Reminder list with scheduled notifications
//!
//! Reminders carry a due instant and an optional pre-notification offset. A
//! [`ReminderStore`] owns the collection and persists it to a key-value blob
//! after every change; a [`NotificationScheduler`] scans the store on a fixed
//! interval and raises at most one pre-due notification per reminder.

pub mod domain;
pub use domain::{
    Config, Countdown, DueNotificationPolicy, Reminder, ReminderId, Title, ValidationError,
};

/// Key-value persistence for the reminder collection.
pub mod storage;
pub use storage::{
    FileBackend, KeyLock, KeyValueStore, MemoryBackend, PersistenceWarning, ReminderStore,
    StoreError,
};

/// Periodic evaluation of reminders and notification dispatch.
pub mod scheduler;
pub use scheduler::{Clock, Notification, NotificationScheduler, Notifier, SystemClock};
