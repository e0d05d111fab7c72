pub mod calendars;
pub mod events;

use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use calendars_core::CalendarsError;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application: every route, its state and the HTTP layers.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(calendars::router())
        .merge(events::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Maps store errors onto the three outward kinds: 404, 400 and 500.
#[derive(Debug)]
pub struct AppError(CalendarsError);

impl AppError {
    pub fn not_found(what: &str) -> Self {
        AppError(CalendarsError::NotFound(what.to_string()))
    }

    pub fn status(&self) -> StatusCode {
        match self.0 {
            CalendarsError::NotFound(_) => StatusCode::NOT_FOUND,
            CalendarsError::Validation(_) => StatusCode::BAD_REQUEST,
            CalendarsError::Database(_) | CalendarsError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<CalendarsError> for AppError {
    fn from(err: CalendarsError) -> Self {
        Self(err)
    }
}

/// Empty, malformed or mistyped JSON bodies are validation failures.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self(CalendarsError::Validation(rejection.body_text()))
    }
}
