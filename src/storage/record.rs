//! Persisted schema for the reminder collection.
//!
//! The current format is a versioned envelope carrying the id counter. A bare
//! JSON array is the legacy format and is migrated on read.
//! Records are decoded one at a time so a single malformed record is dropped
//! rather than discarding the whole collection.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::{Reminder, ReminderId, Title};

/// The stored blob could not be decoded at all.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The blob is not JSON, or not a recognised envelope.
    #[error("invalid reminder data: {0}")]
    Json(#[from] serde_json::Error),

    /// The blob is JSON, but neither an array nor an object.
    #[error("invalid reminder data: expected an array or an object")]
    Shape,
}

/// The outcome of decoding a blob.
#[derive(Debug)]
pub struct Decoded {
    pub reminders: Vec<Reminder>,
    pub next_id: u64,
    /// Number of records that were rejected.
    pub dropped: usize,
    /// Whether the blob was in the legacy array format.
    pub migrated: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions<R> {
    #[serde(rename = "2", rename_all = "camelCase")]
    V2 {
        #[serde(default)]
        next_id: u64,
        reminders: Vec<R>,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Record {
    id: u64,
    text: String,
    datetime: String,
    #[serde(default, deserialize_with = "lenient_minutes")]
    notify_before: u32,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    notified: bool,
    #[serde(default)]
    due_notified: bool,
}

/// Legacy records stored the offset as whatever the form produced: a number,
/// a numeric string, an empty string or nothing at all.
fn lenient_minutes<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Minutes {
        Number(u32),
        Text(String),
        Null(()),
    }

    match Minutes::deserialize(deserializer)? {
        Minutes::Number(n) => Ok(n),
        Minutes::Null(()) => Ok(0),
        Minutes::Text(s) if s.trim().is_empty() => Ok(0),
        Minutes::Text(s) => s.trim().parse().map_err(|_| {
            serde::de::Error::custom(format!("invalid notifyBefore '{s}'"))
        }),
    }
}

impl From<&Reminder> for Record {
    fn from(reminder: &Reminder) -> Self {
        Self {
            id: reminder.id.get(),
            text: reminder.text.to_string(),
            datetime: reminder.datetime.clone(),
            notify_before: reminder.notify_before,
            completed: reminder.completed,
            notified: reminder.notified,
            due_notified: reminder.due_notified,
        }
    }
}

impl TryFrom<Record> for Reminder {
    type Error = String;

    fn try_from(record: Record) -> Result<Self, Self::Error> {
        let text = Title::new(record.text).map_err(|e| e.to_string())?;
        Ok(Self {
            id: ReminderId::new(record.id),
            text,
            datetime: record.datetime,
            notify_before: record.notify_before,
            completed: record.completed,
            notified: record.notified,
            due_notified: record.due_notified,
        })
    }
}

/// Serializes the collection in the current format.
pub fn encode(
    reminders: &[Reminder],
    next_id: u64,
) -> Result<Vec<u8>, serde_json::Error> {
    let envelope = Versions::V2 {
        next_id,
        reminders: reminders.iter().map(Record::from).collect::<Vec<_>>(),
    };
    serde_json::to_vec_pretty(&envelope)
}

/// Decodes a stored blob, dropping records that fail validation.
pub fn decode(bytes: &[u8]) -> Result<Decoded, DecodeError> {
    let (values, stored_next_id, migrated) = match serde_json::from_slice::<Value>(bytes)? {
        Value::Array(values) => (values, 0, true),
        value @ Value::Object(_) => {
            let Versions::V2 { next_id, reminders } =
                serde_json::from_value::<Versions<Value>>(value)?;
            (reminders, next_id, false)
        }
        _ => return Err(DecodeError::Shape),
    };

    let mut seen = HashSet::new();
    let mut reminders = Vec::with_capacity(values.len());
    let mut dropped = 0;

    for (index, value) in values.into_iter().enumerate() {
        let reminder = serde_json::from_value::<Record>(value)
            .map_err(|e| e.to_string())
            .and_then(Reminder::try_from);

        match reminder {
            Ok(reminder) if seen.insert(reminder.id) => reminders.push(reminder),
            Ok(reminder) => {
                tracing::warn!("Dropping record {index}: duplicate id {}", reminder.id);
                dropped += 1;
            }
            Err(e) => {
                tracing::warn!("Dropping record {index}: {e}");
                dropped += 1;
            }
        }
    }

    let next_after_max = reminders
        .iter()
        .map(|r| r.id.get().saturating_add(1))
        .max()
        .unwrap_or(1);

    Ok(Decoded {
        next_id: stored_next_id.max(next_after_max),
        reminders,
        dropped,
        migrated,
    })
}
