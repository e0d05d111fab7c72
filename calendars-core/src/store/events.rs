use sqlx::SqlitePool;

use crate::error::{CalendarsError, CalendarsResult};
use crate::event::{Event, EventPatch, NewEvent};
use crate::store::{new_id, parse_id};

const COLUMNS: &str = "id, name, date, calendar_id";

/// Event persistence
#[derive(Clone, Copy)]
pub struct EventStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> EventStore<'a> {
    pub(crate) fn new(pool: &'a SqlitePool) -> Self {
        EventStore { pool }
    }

    /// Insert an event owned by `calendar_id`.
    ///
    /// The caller is responsible for checking the calendar exists; the store
    /// only requires the reference to be well formed.
    pub async fn create(&self, calendar_id: &str, data: &NewEvent) -> CalendarsResult<Event> {
        let (name, date) = data.validate()?;
        let calendar_id = parse_id(calendar_id)
            .ok_or_else(|| CalendarsError::validation("events", "calendarId"))?;

        let event = sqlx::query_as::<_, Event>(&format!(
            "INSERT INTO events (id, name, date, calendar_id) VALUES (?, ?, ?, ?) RETURNING {COLUMNS}"
        ))
        .bind(new_id())
        .bind(name)
        .bind(date)
        .bind(calendar_id)
        .fetch_one(self.pool)
        .await?;

        tracing::debug!(id = %event.id, calendar_id = %event.calendar_id, "event created");
        Ok(event)
    }

    /// All events of one calendar, in no particular order.
    pub async fn get_all(&self, calendar_id: &str) -> CalendarsResult<Vec<Event>> {
        let Some(calendar_id) = parse_id(calendar_id) else {
            return Ok(Vec::new());
        };

        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {COLUMNS} FROM events WHERE calendar_id = ?"
        ))
        .bind(calendar_id)
        .fetch_all(self.pool)
        .await?;
        Ok(events)
    }

    pub async fn get_by_id(&self, id: &str) -> CalendarsResult<Option<Event>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };

        let event = sqlx::query_as::<_, Event>(&format!("SELECT {COLUMNS} FROM events WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(event)
    }

    /// Merge `name` and `date` into the stored event and return the result.
    pub async fn update_by_id(&self, id: &str, patch: &EventPatch) -> CalendarsResult<Option<Event>> {
        patch.validate()?;
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };

        let event = sqlx::query_as::<_, Event>(&format!(
            "UPDATE events SET name = COALESCE(?, name), date = COALESCE(?, date) \
             WHERE id = ? RETURNING {COLUMNS}"
        ))
        .bind(patch.name.as_deref())
        .bind(patch.date)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(event)
    }

    pub async fn remove_by_id(&self, id: &str) -> CalendarsResult<Option<Event>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };

        let event = sqlx::query_as::<_, Event>(&format!(
            "DELETE FROM events WHERE id = ? RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(event)
    }
}
