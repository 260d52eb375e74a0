use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::storage::DEFAULT_KEY;

/// How often the due-time notification fires for a reminder with no
/// pre-notification offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DueNotificationPolicy {
    /// Fire once, then suppress until the reminder is edited.
    #[default]
    Once,

    /// Fire on every tick until the reminder is completed or deleted.
    Repeat,
}

/// Configuration for the reminder store and scheduler.
///
/// Stored as TOML in the data directory. A missing or unreadable file yields
/// the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Seconds between scheduler ticks.
    ///
    /// This bounds the worst-case notification latency.
    tick_interval_secs: u64,

    /// The key the reminder collection is stored under.
    storage_key: String,

    /// Whether due-time notifications repeat on every tick.
    pub due_notification: DueNotificationPolicy,

    /// Whether to play the notification sound alongside each popup.
    pub sound: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval_secs: default_tick_interval_secs(),
            storage_key: default_storage_key(),
            due_notification: DueNotificationPolicy::default(),
            sound: true,
        }
    }
}

impl Config {
    /// Reads the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the file is missing, unreadable
    /// or not a valid configuration.
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        toml::from_str(&text).map_err(|e| format!("invalid config in {}: {e}", path.display()))
    }

    /// Loads the configuration, falling back to the defaults on any error.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::debug!("Using default config: {e}");
            Self::default()
        })
    }

    /// Writes the configuration to `path` as TOML, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if encoding or writing fails.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let text = toml::to_string_pretty(self).map_err(|e| format!("cannot encode config: {e}"))?;
        std::fs::write(path, text).map_err(|e| format!("cannot write {}: {e}", path.display()))
    }

    /// Returns the interval between scheduler ticks.
    ///
    /// A configured interval of zero is treated as one second.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs.max(1))
    }

    /// Sets the interval between scheduler ticks, in seconds.
    pub const fn set_tick_interval_secs(&mut self, secs: u64) {
        self.tick_interval_secs = secs;
    }

    /// Returns the key the reminder collection is stored under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }
}

const fn default_tick_interval_secs() -> u64 {
    30
}

fn default_storage_key() -> String {
    DEFAULT_KEY.to_string()
}

const fn default_sound() -> bool {
    true
}

/// On-disk layouts, newest last.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_tick_interval_secs")]
        tick_interval_secs: u64,

        #[serde(default = "default_storage_key")]
        storage_key: String,

        #[serde(default)]
        due_notification: DueNotificationPolicy,

        #[serde(default = "default_sound")]
        sound: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                tick_interval_secs,
                storage_key,
                due_notification,
                sound,
            } => Self {
                tick_interval_secs,
                storage_key,
                due_notification,
                sound,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            tick_interval_secs: config.tick_interval_secs,
            storage_key: config.storage_key,
            due_notification: config.due_notification,
            sound: config.sound,
        }
    }
}
