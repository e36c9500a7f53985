pub mod activity;
pub mod health;
pub mod link;
pub mod participant;
pub mod trip;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::state::AppState;

/// Error half of every handler: a status code plus a JSON body with a message.
pub type ApiError = (StatusCode, Json<Value>);

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Trips
        .route("/trips", post(trip::create_trip))
        .route(
            "/trips/:trip_id",
            get(trip::get_trip_details).put(trip::update_trip),
        )
        .route("/trips/:trip_id/confirm", get(trip::confirm_trip))
        // Participants
        .route(
            "/trips/:trip_id/participants",
            get(participant::list_participants),
        )
        .route("/trips/:trip_id/invites", post(participant::create_invite))
        .route(
            "/participants/:participant_id",
            get(participant::get_participant),
        )
        .route(
            "/participants/:participant_id/confirm",
            get(participant::confirm_participant),
        )
        // Activities
        .route(
            "/trips/:trip_id/activities",
            get(activity::list_activities).post(activity::create_activity),
        )
        .route(
            "/activities/:activity_id/done",
            get(activity::confirm_activity_done),
        )
        // Links
        .route(
            "/trips/:trip_id/links",
            get(link::list_links).post(link::create_link),
        )
        .with_state(state)
}

pub(crate) fn client_error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "error": message })))
}

pub(crate) fn internal_error<E: std::fmt::Display>(err: E) -> ApiError {
    tracing::error!("{}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
}

/// Timestamps are persisted as RFC 3339 text; a row that fails to parse is a
/// server-side defect, not client input.
pub(crate) fn parse_datetime(value: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(internal_error)
}

pub(crate) fn is_valid_email(value: &str) -> bool {
    value.parse::<lettre::Address>().is_ok()
}
