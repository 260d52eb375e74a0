//! Due instants are local wall-clock times with no timezone offset.
//!
//! The canonical stored form is `YYYY-MM-DDTHH:MM:SS`. Parsing is lenient
//! about the separators the date/time picker produces (`Y/m/d`, `H:i`), so
//! records written by older versions remain schedulable.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::domain::ValidationError;

/// The format due instants are stored in.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const ACCEPTED_FORMATS: [&str; 8] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y/%m/%dT%H:%M:%S",
    "%Y/%m/%dT%H:%M",
];

/// A stored or supplied due instant that is not a recognised date/time.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("unrecognised date/time '{0}': expected YYYY-MM-DDTHH:MM:SS or YYYY/MM/DD HH:MM")]
pub struct ParseError(String);

/// Parses a due instant in any of the accepted layouts.
///
/// # Errors
///
/// Returns a [`ParseError`] if no accepted layout matches.
pub fn parse(s: &str) -> Result<NaiveDateTime, ParseError> {
    let trimmed = s.trim();
    ACCEPTED_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| ParseError(s.to_string()))
}

/// Formats an instant in the canonical stored form.
#[must_use]
pub fn format(instant: NaiveDateTime) -> String {
    instant.format(CANONICAL_FORMAT).to_string()
}

/// Parses a due instant and re-emits it in canonical form.
///
/// # Errors
///
/// Returns a [`ParseError`] if the input is not a recognised date/time.
pub fn normalize(s: &str) -> Result<String, ParseError> {
    parse(s).map(format)
}

/// Combines the picker's date (`Y/m/d` or `Y-m-d`) and time (`H:i`) into a
/// canonical due instant.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyDate`] or [`ValidationError::EmptyTime`]
/// for blank input, and [`ValidationError::DateTime`] if either half does not
/// parse.
pub fn combine(date: &str, time: &str) -> Result<String, ValidationError> {
    let date = date.trim();
    let time = time.trim();
    if date.is_empty() {
        return Err(ValidationError::EmptyDate);
    }
    if time.is_empty() {
        return Err(ValidationError::EmptyTime);
    }

    let invalid = || ParseError(format!("{date} {time}"));

    let day = NaiveDate::parse_from_str(&date.replace('/', "-"), "%Y-%m-%d")
        .map_err(|_| invalid())?;
    let clock = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .map_err(|_| invalid())?;

    Ok(format(day.and_time(clock)))
}
