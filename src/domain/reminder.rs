use std::{fmt, num::ParseIntError, ops::Deref, str::FromStr};

use chrono::{Duration, NaiveDateTime};
use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};

use crate::domain::due::{self, ParseError};

/// Identifier of a reminder.
///
/// Ids are allocated from a monotonic counter owned by the store, and are
/// never reused within a store, even after the reminder they named has been
/// deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderId(u64);

impl ReminderId {
    /// Wraps a raw id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ReminderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReminderId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// The display label of a reminder.
///
/// Surrounding whitespace is trimmed, and the remainder must not be empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Title(NonEmptyString);

impl Title {
    /// Creates a new title.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] if the trimmed string is empty.
    pub fn new(s: impl Into<String>) -> Result<Self, ValidationError> {
        let s = s.into();
        let trimmed = s.trim();
        let title = if trimmed.len() == s.len() {
            s
        } else {
            trimmed.to_string()
        };
        NonEmptyString::new(title)
            .map(Self)
            .map_err(|_| ValidationError::EmptyTitle)
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for Title {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Title {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Errors raised when the input for a create or edit action is rejected.
///
/// A rejected action never mutates the collection.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The title was empty or only whitespace.
    #[error("title must not be empty")]
    EmptyTitle,

    /// No date was supplied.
    #[error("date must not be empty")]
    EmptyDate,

    /// No time was supplied.
    #[error("time must not be empty")]
    EmptyTime,

    /// The due instant could not be parsed.
    #[error(transparent)]
    DateTime(#[from] ParseError),
}

/// A reminder with a due instant and an optional pre-notification offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub(crate) id: ReminderId,
    pub(crate) text: Title,
    /// Local wall-clock due instant. Reminders created through the store hold
    /// the canonical form; migrated records may hold anything.
    pub(crate) datetime: String,
    pub(crate) notify_before: u32,
    pub(crate) completed: bool,
    pub(crate) notified: bool,
    pub(crate) due_notified: bool,
}

impl Reminder {
    pub(crate) const fn new(
        id: ReminderId,
        text: Title,
        datetime: String,
        notify_before: u32,
    ) -> Self {
        Self {
            id,
            text,
            datetime,
            notify_before,
            completed: false,
            notified: false,
            due_notified: false,
        }
    }

    /// Replaces the text and due instant, re-arming every notification.
    pub(crate) fn edit(&mut self, text: Title, datetime: String) {
        self.text = text;
        self.datetime = datetime;
        self.completed = false;
        self.notified = false;
        self.due_notified = false;
    }

    /// The reminder's identifier.
    #[must_use]
    pub const fn id(&self) -> ReminderId {
        self.id
    }

    /// The display label.
    #[must_use]
    pub const fn text(&self) -> &Title {
        &self.text
    }

    /// The stored due instant, exactly as persisted.
    #[must_use]
    pub fn datetime(&self) -> &str {
        &self.datetime
    }

    /// Minutes before the due instant at which the pre-due notification fires.
    ///
    /// Zero means the reminder only notifies at the due instant.
    #[must_use]
    pub const fn notify_before(&self) -> u32 {
        self.notify_before
    }

    /// Whether the reminder has been completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Whether the pre-due notification has fired.
    #[must_use]
    pub const fn is_notified(&self) -> bool {
        self.notified
    }

    /// Whether the due-time notification has fired.
    #[must_use]
    pub const fn is_due_notified(&self) -> bool {
        self.due_notified
    }

    /// Parses the due instant.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the stored value is not a recognised
    /// date/time.
    pub fn due_at(&self) -> Result<NaiveDateTime, ParseError> {
        due::parse(&self.datetime)
    }

    /// The instant at which the pre-due window opens.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the stored due instant cannot be parsed.
    pub fn notify_at(&self) -> Result<NaiveDateTime, ParseError> {
        self.due_at().map(|due| self.notify_at_for(due))
    }

    pub(crate) fn notify_at_for(&self, due: NaiveDateTime) -> NaiveDateTime {
        let offset = Duration::minutes(i64::from(self.notify_before));
        due.checked_sub_signed(offset).unwrap_or(NaiveDateTime::MIN)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn reminder(datetime: &str, notify_before: u32) -> Reminder {
        Reminder::new(
            ReminderId::new(1),
            Title::new("Dentist").unwrap(),
            datetime.to_string(),
            notify_before,
        )
    }

    #[test]
    fn title_is_trimmed() {
        let title = Title::new("  Water the plants \n").unwrap();
        assert_eq!(title.as_str(), "Water the plants");
    }

    #[test]
    fn blank_title_is_rejected() {
        assert_eq!(Title::new(""), Err(ValidationError::EmptyTitle));
        assert_eq!(Title::new("   "), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn notify_at_subtracts_offset() {
        let reminder = reminder("2024-04-21T10:00:00", 10);
        let expected = NaiveDate::from_ymd_opt(2024, 4, 21)
            .unwrap()
            .and_hms_opt(9, 50, 0)
            .unwrap();
        assert_eq!(reminder.notify_at().unwrap(), expected);
    }

    #[test]
    fn unparseable_datetime_surfaces_error() {
        let reminder = reminder("next tuesday", 0);
        assert!(reminder.due_at().is_err());
        assert!(reminder.notify_at().is_err());
    }

    #[test]
    fn edit_rearms_notifications() {
        let mut reminder = reminder("2024-04-21T10:00:00", 10);
        reminder.completed = true;
        reminder.notified = true;
        reminder.due_notified = true;

        reminder.edit(
            Title::new("Dentist (moved)").unwrap(),
            "2024-04-22T11:00:00".to_string(),
        );

        assert_eq!(reminder.text().as_str(), "Dentist (moved)");
        assert_eq!(reminder.datetime(), "2024-04-22T11:00:00");
        assert_eq!(reminder.notify_before(), 10);
        assert!(!reminder.is_completed());
        assert!(!reminder.is_notified());
        assert!(!reminder.is_due_notified());
    }

    #[test]
    fn id_parses_from_cli_input() {
        assert_eq!(" 42 ".parse::<ReminderId>().unwrap(), ReminderId::new(42));
        assert!("abc".parse::<ReminderId>().is_err());
    }
}
