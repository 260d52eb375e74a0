use std::{
    io::{IsTerminal, Write},
    path::Path,
    time::Duration,
};

use chime::{
    scheduler::SoundError, DueNotificationPolicy, Notification, NotificationScheduler, Notifier,
    SystemClock,
};
use clap::{Parser, ValueEnum};
use tracing::instrument;

use super::{report_warning, terminal::Colorize, Session};

/// Prints notifications to the terminal and rings the terminal bell.
#[derive(Debug, Default)]
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn popup(&mut self, notification: &Notification) {
        let line = notification.to_string();
        match notification {
            Notification::PreDue { .. } => println!("{}", line.warning()),
            Notification::Due { .. } => println!("{}", line.alert()),
        }
    }

    fn play_sound(&mut self) -> Result<(), SoundError> {
        let mut stdout = std::io::stdout();
        if !stdout.is_terminal() {
            return Err(SoundError::new("stdout is not a terminal"));
        }
        stdout
            .write_all(b"\x07")
            .and_then(|()| stdout.flush())
            .map_err(|e| SoundError::new(e.to_string()))
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum DuePolicy {
    /// Notify once at the due time
    Once,
    /// Notify on every tick until the reminder is completed
    Repeat,
}

impl From<DuePolicy> for DueNotificationPolicy {
    fn from(policy: DuePolicy) -> Self {
        match policy {
            DuePolicy::Once => Self::Once,
            DuePolicy::Repeat => Self::Repeat,
        }
    }
}

/// Options shared by `check` and `watch`.
#[derive(Debug, clap::Args)]
struct SchedulerArgs {
    /// How often the due-time notification fires (overrides the config)
    #[arg(long, value_enum)]
    due_notification: Option<DuePolicy>,

    /// Don't ring the terminal bell
    #[arg(long)]
    no_sound: bool,
}

impl SchedulerArgs {
    fn scheduler(
        &self,
        session: &Session,
    ) -> NotificationScheduler<SystemClock, TerminalNotifier> {
        let mut scheduler =
            NotificationScheduler::from_config(SystemClock, TerminalNotifier, &session.config);
        if let Some(policy) = self.due_notification {
            scheduler = scheduler.with_policy(policy.into());
        }
        if self.no_sound {
            scheduler = scheduler.with_sound(false);
        }
        scheduler
    }
}

#[derive(Debug, Parser)]
pub struct Check {
    #[command(flatten)]
    args: SchedulerArgs,
}

impl Check {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, root: &Path) {
        let mut session = Session::open(root);
        let mut scheduler = self.args.scheduler(&session);

        let raised = scheduler.tick(&mut session.store);
        session.report_warning();

        if raised.is_empty() {
            println!("{}", "Nothing due".dim());
        }
    }
}

#[derive(Debug, Parser)]
pub struct Watch {
    /// Seconds between checks (overrides the config)
    #[arg(long, short)]
    interval: Option<u64>,

    /// Stop after this many checks
    #[arg(long)]
    ticks: Option<u64>,

    #[command(flatten)]
    args: SchedulerArgs,
}

impl Watch {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, root: &Path) {
        let mut session = Session::open(root);
        let mut scheduler = self.args.scheduler(&session);
        if let Some(secs) = self.interval {
            scheduler = scheduler.with_interval(Duration::from_secs(secs.max(1)));
        }

        println!(
            "{}",
            format!(
                "Watching {} reminders every {}s (Ctrl-C to stop)",
                session.store.list(false).count(),
                scheduler.interval().as_secs()
            )
            .info()
        );

        scheduler.run_with(&mut session.store, self.ticks, |store, _| {
            report_warning(store);
        });
    }
}
