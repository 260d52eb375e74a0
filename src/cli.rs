use std::path::{Path, PathBuf};

mod list;
mod terminal;
mod timer;
mod watch;

use anyhow::Context;
use chime::{domain::due, Config, FileBackend, Reminder, ReminderId, ReminderStore};
use clap::ArgAction;
use list::List;
use terminal::Colorize;
use timer::Timer;
use tracing::instrument;
use watch::{Check, Watch};

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The directory reminders and configuration are kept in
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::List(List::default()))
            .run(&self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Create the data directory with a default configuration
    Init(Init),

    /// Add a reminder
    Add(Add),

    /// Change the text or due time of a reminder
    ///
    /// Editing re-arms all notifications and clears the completed flag.
    Edit(Edit),

    /// Mark a reminder as done
    Complete(Complete),

    /// Delete a reminder
    Delete(Delete),

    /// List reminders (default)
    List(List),

    /// Evaluate every reminder once and show any notifications
    Check(Check),

    /// Keep evaluating reminders on the configured interval
    Watch(Watch),

    /// Run a countdown timer
    Timer(Timer),
}

impl Command {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        match self {
            Self::Init(_) => Init::run(root)?,
            Self::Add(command) => command.run(root)?,
            Self::Edit(command) => command.run(root)?,
            Self::Complete(command) => command.run(root)?,
            Self::Delete(command) => command.run(root)?,
            Self::List(command) => command.run(root)?,
            Self::Check(command) => command.run(root),
            Self::Watch(command) => command.run(root),
            Self::Timer(command) => command.run()?,
        }
        Ok(())
    }
}

/// The configuration and reminder store of a data directory.
struct Session {
    config: Config,
    store: ReminderStore<FileBackend>,
}

impl Session {
    fn open(root: &Path) -> Self {
        let config = Config::load_or_default(&root.join(CONFIG_FILE));
        let backend = FileBackend::new(root.to_path_buf());
        let mut store = ReminderStore::load_with_key(backend, config.storage_key());
        report_warning(&mut store);
        Self { config, store }
    }

    fn report_warning(&mut self) {
        report_warning(&mut self.store);
    }

    fn find(&self, id: ReminderId) -> anyhow::Result<&Reminder> {
        self.store
            .get(id)
            .with_context(|| format!("reminder {id} not found"))
    }
}

/// Prints, and clears, the store's persistence warning.
fn report_warning(store: &mut ReminderStore<FileBackend>) {
    if let Some(warning) = store.take_warning() {
        eprintln!("{}", format!("⚠️  {warning}").warning());
    }
}

/// Formats a due instant for display, falling back to the stored text.
fn display_due(reminder: &Reminder) -> String {
    reminder.due_at().map_or_else(
        |_| reminder.datetime().to_string(),
        |due| due.format("%Y-%m-%d %H:%M").to_string(),
    )
}

#[derive(Debug, clap::Parser)]
pub struct Init {}

impl Init {
    #[instrument]
    fn run(root: &Path) -> anyhow::Result<()> {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            anyhow::bail!(
                "Already initialized (found existing {})",
                config_path.display()
            );
        }

        std::fs::create_dir_all(root)
            .with_context(|| format!("Failed to create {}", root.display()))?;

        Config::default()
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create {CONFIG_FILE}: {e}"))?;

        println!("Initialized reminders in {}", root.display());
        println!("  Created: {CONFIG_FILE}");
        println!();
        println!("Next steps:");
        println!("  chime add \"Call the dentist\" --date 2024-04-21 --time 10:00");

        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Add {
    /// What to be reminded about
    text: String,

    /// The due date (YYYY-MM-DD or YYYY/MM/DD)
    #[arg(long, short, conflicts_with = "at")]
    date: Option<String>,

    /// The due time (HH:MM)
    #[arg(long, short, conflicts_with = "at")]
    time: Option<String>,

    /// The due date and time as a single value, e.g. '2024-04-21T10:00'
    #[arg(long)]
    at: Option<String>,

    /// Minutes before the due time to send a notification
    ///
    /// With zero, a notification is sent at the due time instead.
    #[arg(long, short, default_value_t = 0)]
    notify_before: u32,
}

impl Add {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let datetime = match self.at {
            Some(at) => at,
            None => due::combine(
                self.date.as_deref().unwrap_or_default(),
                self.time.as_deref().unwrap_or_default(),
            )?,
        };

        let mut session = Session::open(root);
        let reminder = session
            .store
            .create(&self.text, &datetime, self.notify_before)?
            .last()
            .cloned()
            .context("created reminder is missing")?;
        session.report_warning();

        println!(
            "{}",
            format!(
                "✅ Added reminder {}: {} (due {})",
                reminder.id(),
                reminder.text(),
                display_due(&reminder)
            )
            .success()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Edit {
    /// The id of the reminder to edit
    id: ReminderId,

    /// The new text
    #[arg(long)]
    text: Option<String>,

    /// The new due date, keeping the current time unless --time is given
    #[arg(long, short, conflicts_with = "at")]
    date: Option<String>,

    /// The new due time, keeping the current date unless --date is given
    #[arg(long, short, conflicts_with = "at")]
    time: Option<String>,

    /// The new due date and time as a single value
    #[arg(long)]
    at: Option<String>,
}

impl Edit {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut session = Session::open(root);
        let current = session.find(self.id)?;

        let text = self
            .text
            .unwrap_or_else(|| current.text().as_str().to_string());
        let datetime = match (self.at, self.date, self.time) {
            (Some(at), ..) => at,
            (None, None, None) => current.datetime().to_string(),
            (None, date, time) => {
                let (current_date, current_time) = split_due(current);
                due::combine(
                    date.as_deref().unwrap_or(&current_date),
                    time.as_deref().unwrap_or(&current_time),
                )?
            }
        };

        session.store.update(self.id, &text, &datetime)?;
        session.report_warning();

        let reminder = session.find(self.id)?;
        println!(
            "{}",
            format!(
                "✅ Updated reminder {}: {} (due {})",
                reminder.id(),
                reminder.text(),
                display_due(reminder)
            )
            .success()
        );
        Ok(())
    }
}

/// Splits a reminder's due instant into picker-style date and time halves.
///
/// Both halves are empty if the stored value does not parse.
fn split_due(reminder: &Reminder) -> (String, String) {
    reminder.due_at().map_or_else(
        |_| (String::new(), String::new()),
        |due| {
            (
                due.format("%Y-%m-%d").to_string(),
                due.format("%H:%M").to_string(),
            )
        },
    )
}

#[derive(Debug, clap::Parser)]
pub struct Complete {
    /// The id of the reminder to complete
    id: ReminderId,
}

impl Complete {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut session = Session::open(root);
        session.store.complete(self.id)?;
        session.report_warning();

        let reminder = session.find(self.id)?;
        println!(
            "{}",
            format!("✅ Completed reminder {}: {}", reminder.id(), reminder.text()).success()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Delete {
    /// The id of the reminder to delete
    id: ReminderId,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    yes: bool,
}

impl Delete {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut session = Session::open(root);
        let reminder = session.find(self.id)?;
        let text = reminder.text().clone();

        if !self.yes {
            let confirmed = dialoguer::Confirm::new()
                .with_prompt(format!(
                    "Delete reminder {}: {} (due {})?",
                    self.id,
                    text,
                    display_due(reminder)
                ))
                .default(false)
                .interact()?;
            if !confirmed {
                println!("{}", "Cancelled".dim());
                return Ok(());
            }
        }

        session.store.delete(self.id)?;
        session.report_warning();

        println!(
            "{}",
            format!("✅ Deleted reminder {}: {text}", self.id).success()
        );
        Ok(())
    }
}
