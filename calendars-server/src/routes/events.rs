//! Event endpoints, nested under their calendar
//!
//! Every route re-checks that the calendar in the path exists and owns the
//! event, so an event id is never reachable through another calendar.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};

use calendars_core::{Calendar, Database, Event, EventPatch, NewEvent};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/calendars/{calendar_id}/events",
            get(list_events).post(create_event),
        )
        .route(
            "/calendars/{calendar_id}/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
}

async fn require_calendar(db: &Database, calendar_id: &str) -> Result<Calendar, AppError> {
    db.calendars().get_by_id(calendar_id).await?.ok_or_else(|| {
        tracing::warn!(calendar_id, "unknown calendar");
        AppError::not_found("Calendar")
    })
}

/// Fetch an event, but only through the calendar that owns it.
async fn require_owned_event(db: &Database, calendar_id: &str, id: &str) -> Result<Event, AppError> {
    let calendar = require_calendar(db, calendar_id).await?;

    match db.events().get_by_id(id).await? {
        Some(event) if event.calendar_id == calendar.id => Ok(event),
        Some(event) => {
            tracing::warn!(id, owner = %event.calendar_id, calendar_id = %calendar.id, "event requested through wrong calendar");
            Err(AppError::not_found("Event"))
        }
        None => Err(AppError::not_found("Event")),
    }
}

/// GET /calendars/:calendar_id/events - List a calendar's events
async fn list_events(
    State(state): State<AppState>,
    Path(calendar_id): Path<String>,
) -> Result<Json<Vec<Event>>, AppError> {
    let calendar = require_calendar(state.db(), &calendar_id).await?;
    let events = state.db().events().get_all(&calendar.id).await?;

    Ok(Json(events))
}

/// GET /calendars/:calendar_id/events/:id - Fetch one event
async fn get_event(
    State(state): State<AppState>,
    Path((calendar_id, id)): Path<(String, String)>,
) -> Result<Json<Event>, AppError> {
    let event = require_owned_event(state.db(), &calendar_id, &id).await?;
    Ok(Json(event))
}

/// POST /calendars/:calendar_id/events - Create an event in this calendar
///
/// The owner always comes from the path; any `calendarId` in the body is ignored.
async fn create_event(
    State(state): State<AppState>,
    Path(calendar_id): Path<String>,
    body: Result<Json<NewEvent>, JsonRejection>,
) -> Result<Json<Event>, AppError> {
    let calendar = require_calendar(state.db(), &calendar_id).await?;

    let Json(data) = body?;
    let event = state.db().events().create(&calendar.id, &data).await?;

    tracing::info!(id = %event.id, calendar_id = %calendar.id, "created event");
    Ok(Json(event))
}

/// PUT /calendars/:calendar_id/events/:id - Update an event's name and/or date
async fn update_event(
    State(state): State<AppState>,
    Path((calendar_id, id)): Path<(String, String)>,
    body: Result<Json<EventPatch>, JsonRejection>,
) -> Result<Json<Event>, AppError> {
    let event = require_owned_event(state.db(), &calendar_id, &id).await?;

    let Json(patch) = body?;
    let updated = state
        .db()
        .events()
        .update_by_id(&event.id, &patch)
        .await?
        .ok_or_else(|| AppError::not_found("Event"))?;

    tracing::info!(id = %updated.id, calendar_id = %updated.calendar_id, "updated event");
    Ok(Json(updated))
}

/// DELETE /calendars/:calendar_id/events/:id - Remove an event
async fn delete_event(
    State(state): State<AppState>,
    Path((calendar_id, id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let event = require_owned_event(state.db(), &calendar_id, &id).await?;

    // A concurrent delete can win between the ownership check and this call.
    let removed = state
        .db()
        .events()
        .remove_by_id(&event.id)
        .await?
        .ok_or_else(|| AppError::not_found("Event"))?;

    tracing::info!(id = %removed.id, calendar_id = %removed.calendar_id, "deleted event");
    Ok(StatusCode::OK)
}
