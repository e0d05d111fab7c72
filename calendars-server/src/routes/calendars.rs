//! Calendar endpoints

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};

use calendars_core::{Calendar, CalendarPatch, NewCalendar};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/calendars", get(list_calendars).post(create_calendar))
        .route(
            "/calendars/{id}",
            get(get_calendar).put(update_calendar).delete(delete_calendar),
        )
}

/// GET /calendars - List all calendars
async fn list_calendars(State(state): State<AppState>) -> Result<Json<Vec<Calendar>>, AppError> {
    let calendars = state.db().calendars().get_all().await?;
    Ok(Json(calendars))
}

/// GET /calendars/:id - Fetch one calendar
async fn get_calendar(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Calendar>, AppError> {
    let calendar = state
        .db()
        .calendars()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Calendar"))?;

    Ok(Json(calendar))
}

/// POST /calendars - Create a calendar (responds 200, not 201)
async fn create_calendar(
    State(state): State<AppState>,
    body: Result<Json<NewCalendar>, JsonRejection>,
) -> Result<Json<Calendar>, AppError> {
    let Json(data) = body?;
    let calendar = state.db().calendars().create(&data).await?;

    tracing::info!(id = %calendar.id, name = %calendar.name, "created calendar");
    Ok(Json(calendar))
}

/// PUT /calendars/:id - Rename a calendar
///
/// The target is looked up before the body is inspected, so an unknown id is
/// a 404 even when the body is also invalid.
async fn update_calendar(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<CalendarPatch>, JsonRejection>,
) -> Result<Json<Calendar>, AppError> {
    let calendars = state.db().calendars();

    if calendars.get_by_id(&id).await?.is_none() {
        tracing::warn!(%id, "update of unknown calendar");
        return Err(AppError::not_found("Calendar"));
    }

    let Json(patch) = body?;
    patch.require_name()?;

    let calendar = calendars
        .update_by_id(&id, &patch)
        .await?
        .ok_or_else(|| AppError::not_found("Calendar"))?;

    tracing::info!(id = %calendar.id, name = %calendar.name, "updated calendar");
    Ok(Json(calendar))
}

/// DELETE /calendars/:id - Remove a calendar (its events are left in place)
async fn delete_calendar(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let removed = state
        .db()
        .calendars()
        .remove_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Calendar"))?;

    tracing::info!(id = %removed.id, "deleted calendar");
    Ok(StatusCode::OK)
}
