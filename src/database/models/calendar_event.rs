use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

/// Calendar entry. `event_date` serializes as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CalendarEvent {
    pub event_id: i64,
    pub event_title: String,
    pub event_date: NaiveDate,
    pub event_type: String,
    pub event_text: String,
}

/// Writable columns of an event, date already normalized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEventFields {
    pub event_title: String,
    pub event_date: NaiveDate,
    pub event_type: String,
    pub event_text: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized event date: {0:?}")]
pub struct EventDateError(pub String);

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Reduce a date or timestamp to its calendar date.
///
/// Timestamps carrying an offset are converted to UTC first; timestamps
/// without one are taken as UTC already. A plain `YYYY-MM-DD` is returned
/// unchanged, so normalizing twice gives the same value.
pub fn normalize_event_date(input: &str) -> Result<NaiveDate, EventDateError> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(ts.with_timezone(&Utc).date_naive());
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|ts| ts.date())
        .ok_or_else(|| EventDateError(input.to_string()))
}
