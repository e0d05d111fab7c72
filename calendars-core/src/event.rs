//! Event documents and their request shapes.
//!
//! An event belongs to exactly one calendar through `calendar_id`. The
//! back-reference is set when the event is created and never changes.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::calendar::required_name;
use crate::error::{CalendarsError, CalendarsResult};

/// A stored event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub date: DateTime<Utc>,
    pub calendar_id: String,
}

/// Fields accepted when creating an event.
///
/// There is no `calendar_id` here: the owning calendar always comes from the
/// request path, so a `calendarId` in the body is dropped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewEvent {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub date: Option<DateTime<Utc>>,
}

/// Partial update for an event. `calendar_id` is immutable and not patchable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPatch {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub date: Option<DateTime<Utc>>,
}

impl NewEvent {
    pub fn new(name: impl Into<String>, date: DateTime<Utc>) -> Self {
        NewEvent {
            name: Some(name.into()),
            date: Some(date),
        }
    }

    /// Returns the validated name and date.
    pub(crate) fn validate(&self) -> CalendarsResult<(&str, DateTime<Utc>)> {
        let name = required_name(self.name.as_deref())
            .ok_or_else(|| CalendarsError::validation("events", "name"))?;
        let date = self
            .date
            .ok_or_else(|| CalendarsError::validation("events", "date"))?;
        Ok((name, date))
    }
}

impl EventPatch {
    pub(crate) fn validate(&self) -> CalendarsResult<()> {
        match self.name.as_deref() {
            Some(name) if required_name(Some(name)).is_none() => {
                Err(CalendarsError::validation("events", "name"))
            }
            _ => Ok(()),
        }
    }
}

/// Parse an event date: an RFC 3339 timestamp, an ISO date-time without an
/// offset (read as UTC), or a bare `YYYY-MM-DD` taken as midnight UTC.
pub(crate) fn parse_date(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt.and_utc());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| format!("invalid date '{raw}'"))
}

/// A date as it may appear in a request body: text, or epoch milliseconds.
#[derive(Deserialize)]
#[serde(untagged)]
enum DateInput {
    Millis(i64),
    Text(String),
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let date = match Option::<DateInput>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(DateInput::Millis(ms)) => DateTime::from_timestamp_millis(ms)
            .ok_or_else(|| format!("timestamp {ms} out of range")),
        Some(DateInput::Text(raw)) => parse_date(&raw),
    };
    date.map(Some).map_err(serde::de::Error::custom)
}
