//! Periodic evaluation of reminders.
//!
//! On every tick, each non-completed reminder is checked against the current
//! time:
//!
//! - once `now` enters `[due - notify_before, due)`, a pre-due notification is
//!   raised and the reminder's `notified` flag is set, so it never fires twice;
//! - for reminders with no offset, once `now >= due` a due-time notification is
//!   raised. Under [`DueNotificationPolicy::Once`] the `due_notified` flag then
//!   suppresses it; under [`DueNotificationPolicy::Repeat`] it fires on every
//!   tick until the reminder is completed or deleted.
//!
//! Reminders whose due instant cannot be parsed are skipped. A failing sound
//! channel never prevents the popup.

use std::{fmt, time::Duration};

use chrono::NaiveDateTime;

mod clock;
mod notifier;

pub use clock::{Clock, ManualClock, SystemClock};
pub use notifier::{Notifier, RecordingNotifier, SoundError};

use crate::{
    domain::{Config, DueNotificationPolicy, Reminder, ReminderId, Title},
    storage::{KeyValueStore, ReminderStore},
};

/// A notification raised by a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The reminder is due within its notification offset.
    PreDue {
        /// The reminder that is nearly due.
        id: ReminderId,
        /// Its label.
        text: Title,
        /// Its notification offset in minutes.
        minutes: u32,
        /// When it falls due.
        due_at: NaiveDateTime,
    },

    /// The reminder is due.
    Due {
        /// The reminder that is due.
        id: ReminderId,
        /// Its label.
        text: Title,
        /// When it fell due.
        due_at: NaiveDateTime,
    },
}

impl Notification {
    /// The reminder this notification is about.
    #[must_use]
    pub const fn id(&self) -> ReminderId {
        match self {
            Self::PreDue { id, .. } | Self::Due { id, .. } => *id,
        }
    }

    /// The label of the reminder.
    #[must_use]
    pub const fn text(&self) -> &Title {
        match self {
            Self::PreDue { text, .. } | Self::Due { text, .. } => text,
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreDue {
                text, minutes: 1, ..
            } => write!(f, "🔔 \"{text}\" is due in 1 minute"),
            Self::PreDue { text, minutes, .. } => {
                write!(f, "🔔 \"{text}\" is due in {minutes} minutes")
            }
            Self::Due { text, .. } => write!(f, "⏰ \"{text}\" is due now"),
        }
    }
}

/// Scans a [`ReminderStore`] and dispatches notifications.
#[derive(Debug)]
pub struct NotificationScheduler<C, N> {
    clock: C,
    notifier: N,
    policy: DueNotificationPolicy,
    sound: bool,
    interval: Duration,
}

impl<C: Clock, N: Notifier> NotificationScheduler<C, N> {
    /// Creates a scheduler with the default configuration.
    #[must_use]
    pub fn new(clock: C, notifier: N) -> Self {
        Self::from_config(clock, notifier, &Config::default())
    }

    /// Creates a scheduler using the policy, sound and interval settings of
    /// `config`.
    #[must_use]
    pub fn from_config(clock: C, notifier: N, config: &Config) -> Self {
        Self {
            clock,
            notifier,
            policy: config.due_notification,
            sound: config.sound,
            interval: config.tick_interval(),
        }
    }

    /// Sets how often due-time notifications fire.
    #[must_use]
    pub const fn with_policy(mut self, policy: DueNotificationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets whether to play the notification sound.
    #[must_use]
    pub const fn with_sound(mut self, sound: bool) -> Self {
        self.sound = sound;
        self
    }

    /// Sets the time [`NotificationScheduler::run`] sleeps between ticks.
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Evaluates every non-completed reminder once and returns the
    /// notifications raised, in collection order.
    pub fn tick<B: KeyValueStore>(&mut self, store: &mut ReminderStore<B>) -> Vec<Notification> {
        let now = self.clock.now();
        let policy = self.policy;
        let raised: Vec<_> = store
            .list(false)
            .filter_map(|reminder| evaluate(reminder, now, policy))
            .collect();

        for notification in &raised {
            self.dispatch(notification);

            let id = notification.id();
            let marked = match notification {
                Notification::PreDue { .. } => store.mark_notified(id).map(drop),
                Notification::Due { .. } if policy == DueNotificationPolicy::Once => {
                    store.mark_due_notified(id).map(drop)
                }
                Notification::Due { .. } => Ok(()),
            };
            if let Err(e) = marked {
                tracing::warn!("Could not record notification for reminder {id}: {e}");
            }
        }

        tracing::trace!("Tick at {now} raised {} notifications", raised.len());
        raised
    }

    /// Reloads the store and ticks, on the configured interval.
    ///
    /// Runs forever if `max_ticks` is `None`; otherwise returns after that
    /// many ticks without sleeping after the last one. Returns the number of
    /// ticks performed.
    pub fn run<B: KeyValueStore>(
        &mut self,
        store: &mut ReminderStore<B>,
        max_ticks: Option<u64>,
    ) -> u64 {
        self.run_with(store, max_ticks, |_, _| {})
    }

    /// Like [`NotificationScheduler::run`], calling `after_tick` with the
    /// store and the notifications raised once each tick has been recorded.
    ///
    /// Every tick starts with [`ReminderStore::reload`], so reminders added
    /// or changed by other processes are seen on the next tick.
    pub fn run_with<B: KeyValueStore>(
        &mut self,
        store: &mut ReminderStore<B>,
        max_ticks: Option<u64>,
        mut after_tick: impl FnMut(&mut ReminderStore<B>, &[Notification]),
    ) -> u64 {
        let mut ticks = 0;
        while max_ticks.is_none_or(|max| ticks < max) {
            store.reload();
            let raised = self.tick(store);
            after_tick(store, &raised);

            ticks += 1;
            if max_ticks.is_none_or(|max| ticks < max) {
                std::thread::sleep(self.interval);
            }
        }
        ticks
    }

    fn dispatch(&mut self, notification: &Notification) {
        tracing::info!("{notification}");
        self.notifier.popup(notification);
        if self.sound {
            if let Err(e) = self.notifier.play_sound() {
                tracing::debug!("Ignoring sound failure: {e}");
            }
        }
    }

    /// The clock the scheduler reads.
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Mutable access to the clock.
    pub const fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// The notifier popups are sent to.
    #[must_use]
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Mutable access to the notifier.
    pub const fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// The time between ticks.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

fn evaluate(
    reminder: &Reminder,
    now: NaiveDateTime,
    policy: DueNotificationPolicy,
) -> Option<Notification> {
    if reminder.is_completed() {
        return None;
    }

    let due_at = match reminder.due_at() {
        Ok(due_at) => due_at,
        Err(e) => {
            tracing::warn!("Skipping reminder {}: {e}", reminder.id());
            return None;
        }
    };
    let notify_at = reminder.notify_at_for(due_at);

    if !reminder.is_notified() && notify_at <= now && now < due_at {
        return Some(Notification::PreDue {
            id: reminder.id(),
            text: reminder.text().clone(),
            minutes: reminder.notify_before(),
            due_at,
        });
    }

    let repeat = policy == DueNotificationPolicy::Repeat;
    if reminder.notify_before() == 0 && now >= due_at && (repeat || !reminder.is_due_notified()) {
        return Some(Notification::Due {
            id: reminder.id(),
            text: reminder.text().clone(),
            due_at,
        });
    }

    None
}
