use sqlx::SqlitePool;

use crate::calendar::{Calendar, CalendarPatch, NewCalendar};
use crate::error::CalendarsResult;
use crate::store::{new_id, parse_id};

/// Calendar persistence
#[derive(Clone, Copy)]
pub struct CalendarStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CalendarStore<'a> {
    pub(crate) fn new(pool: &'a SqlitePool) -> Self {
        CalendarStore { pool }
    }

    pub async fn create(&self, data: &NewCalendar) -> CalendarsResult<Calendar> {
        let name = data.validate()?;

        let calendar = sqlx::query_as::<_, Calendar>(
            "INSERT INTO calendars (id, name) VALUES (?, ?) RETURNING id, name",
        )
        .bind(new_id())
        .bind(name)
        .fetch_one(self.pool)
        .await?;

        tracing::debug!(id = %calendar.id, "calendar created");
        Ok(calendar)
    }

    pub async fn get_all(&self) -> CalendarsResult<Vec<Calendar>> {
        let calendars = sqlx::query_as::<_, Calendar>("SELECT id, name FROM calendars")
            .fetch_all(self.pool)
            .await?;
        Ok(calendars)
    }

    pub async fn get_by_id(&self, id: &str) -> CalendarsResult<Option<Calendar>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };

        let calendar =
            sqlx::query_as::<_, Calendar>("SELECT id, name FROM calendars WHERE id = ?")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;
        Ok(calendar)
    }

    /// Merge the supplied fields into the stored calendar and return the result.
    pub async fn update_by_id(
        &self,
        id: &str,
        patch: &CalendarPatch,
    ) -> CalendarsResult<Option<Calendar>> {
        patch.validate()?;
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };

        let calendar = sqlx::query_as::<_, Calendar>(
            "UPDATE calendars SET name = COALESCE(?, name) WHERE id = ? RETURNING id, name",
        )
        .bind(patch.name.as_deref())
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(calendar)
    }

    /// Events that point at the removed calendar are left untouched.
    pub async fn remove_by_id(&self, id: &str) -> CalendarsResult<Option<Calendar>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };

        let calendar =
            sqlx::query_as::<_, Calendar>("DELETE FROM calendars WHERE id = ? RETURNING id, name")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;
        Ok(calendar)
    }
}

#[cfg(test)]
mod tests {
    use crate::calendar::{CalendarPatch, NewCalendar};
    use crate::error::CalendarsError;
    use crate::event::NewEvent;
    use crate::Database;
    use chrono::Utc;

    async fn seeded() -> Database {
        let db = Database::in_memory().await.unwrap();
        for name in ["first", "additional", "last"] {
            db.calendars().create(&NewCalendar::named(name)).await.unwrap();
        }
        db
    }

    #[tokio::test]
    async fn test_create_and_get_by_id() {
        let db = Database::in_memory().await.unwrap();
        let created = db.calendars().create(&NewCalendar::named("work")).await.unwrap();

        let fetched = db.calendars().get_by_id(&created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_create_without_name_is_validation_error() {
        let db = seeded().await;
        let err = db.calendars().create(&NewCalendar::default()).await.unwrap_err();

        assert!(matches!(err, CalendarsError::Validation(_)));
        assert_eq!(db.calendars().get_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_get_all() {
        let db = seeded().await;
        let mut names: Vec<String> = db
            .calendars()
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        names.sort();
        assert_eq!(names, ["additional", "first", "last"]);
    }

    #[tokio::test]
    async fn test_get_all_empty() {
        let db = Database::in_memory().await.unwrap();
        assert!(db.calendars().get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_id_is_absent() {
        let db = seeded().await;
        let store = db.calendars();

        assert_eq!(store.get_by_id("id1").await.unwrap(), None);
        assert_eq!(
            store
                .update_by_id("id1", &CalendarPatch { name: Some("x".into()) })
                .await
                .unwrap(),
            None
        );
        assert_eq!(store.remove_by_id("id1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let db = seeded().await;
        let store = db.calendars();
        let before = store.create(&NewCalendar::named("home")).await.unwrap();

        let unchanged = store
            .update_by_id(&before.id, &CalendarPatch::default())
            .await
            .unwrap();
        assert_eq!(unchanged.as_ref(), Some(&before));

        let renamed = store
            .update_by_id(&before.id, &CalendarPatch { name: Some("home new".into()) })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.id, before.id);
        assert_eq!(renamed.name, "home new");
        assert_eq!(store.get_by_id(&before.id).await.unwrap(), Some(renamed));
    }

    #[tokio::test]
    async fn test_update_with_empty_name_leaves_document() {
        let db = seeded().await;
        let store = db.calendars();
        let before = store.create(&NewCalendar::named("home")).await.unwrap();

        let err = store
            .update_by_id(&before.id, &CalendarPatch { name: Some(String::new()) })
            .await
            .unwrap_err();
        assert!(matches!(err, CalendarsError::Validation(_)));
        assert_eq!(store.get_by_id(&before.id).await.unwrap(), Some(before));
    }

    #[tokio::test]
    async fn test_remove_returns_removed_once() {
        let db = seeded().await;
        let store = db.calendars();
        let calendar = store.create(&NewCalendar::named("doomed")).await.unwrap();

        assert_eq!(store.remove_by_id(&calendar.id).await.unwrap(), Some(calendar.clone()));
        assert_eq!(store.remove_by_id(&calendar.id).await.unwrap(), None);
        assert_eq!(store.get_by_id(&calendar.id).await.unwrap(), None);
        assert_eq!(store.get_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_remove_does_not_cascade_to_events() {
        let db = Database::in_memory().await.unwrap();
        let calendar = db.calendars().create(&NewCalendar::named("c")).await.unwrap();
        let event = db
            .events()
            .create(&calendar.id, &NewEvent::new("e", Utc::now()))
            .await
            .unwrap();

        db.calendars().remove_by_id(&calendar.id).await.unwrap();

        assert_eq!(db.events().get_by_id(&event.id).await.unwrap(), Some(event));
    }
}
