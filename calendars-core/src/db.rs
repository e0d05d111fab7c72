//! Database connection management.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::CalendarsResult;
use crate::store::{CalendarStore, EventStore};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS calendars (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL
    )",
    // No foreign key on calendar_id: deleting a calendar leaves its events in place.
    "CREATE TABLE IF NOT EXISTS events (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        date TEXT NOT NULL,
        calendar_id TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS events_calendar_id ON events (calendar_id)",
];

/// Handle to the document database. Cheap to clone; all clones share one pool.
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to `url` and make sure the tables exist.
    pub async fn open(url: &str, max_connections: u32) -> CalendarsResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options)
            .await?;

        let db = Database { pool };
        db.ensure_schema().await?;

        tracing::info!(url, "database opened");
        Ok(db)
    }

    /// A private in-memory database.
    ///
    /// Every SQLite connection to `:memory:` sees its own database, so the pool
    /// is pinned to a single connection that is never recycled.
    pub async fn in_memory() -> CalendarsResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Database { pool };
        db.ensure_schema().await?;
        Ok(db)
    }

    async fn ensure_schema(&self) -> CalendarsResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub fn calendars(&self) -> CalendarStore<'_> {
        CalendarStore::new(&self.pool)
    }

    pub fn events(&self) -> EventStore<'_> {
        EventStore::new(&self.pool)
    }

    /// Wait for checked-out connections to return, then close the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("database closed");
    }
}
