use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Redirect,
    Json,
};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::{client_error, internal_error, parse_datetime, ApiError};
use crate::models::activity::{self as activity_model, Entity as Activity};
use crate::models::trip::Entity as Trip;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateActivityRequest {
    pub title: String,
    pub occurs_at: DateTime<Utc>,
}

pub async fn create_activity(
    State(db): State<DatabaseConnection>,
    Path(trip_id): Path<String>,
    Json(payload): Json<CreateActivityRequest>,
) -> Result<Json<Value>, ApiError> {
    let trip = Trip::find_by_id(trip_id.as_str())
        .one(&db)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| client_error(StatusCode::NOT_FOUND, "Trip not found"))?;

    if payload.title.trim().chars().count() < 4 {
        return Err(client_error(
            StatusCode::BAD_REQUEST,
            "Invalid activity title",
        ));
    }

    let starts_at = parse_datetime(&trip.starts_at)?;
    let ends_at = parse_datetime(&trip.ends_at)?;
    if payload.occurs_at < starts_at || payload.occurs_at > ends_at {
        return Err(client_error(
            StatusCode::BAD_REQUEST,
            "Invalid activity date",
        ));
    }

    let activity = activity_model::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        title: Set(payload.title),
        occurs_at: Set(payload.occurs_at.to_rfc3339()),
        is_done: Set(false),
        trip_id: Set(trip_id),
    };
    let activity = activity.insert(&db).await.map_err(internal_error)?;

    Ok(Json(json!({ "activityId": activity.id })))
}

/// One entry per calendar day of the trip, each carrying the activities that
/// occur on that day ordered by time.
pub async fn list_activities(
    State(db): State<DatabaseConnection>,
    Path(trip_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let trip = Trip::find_by_id(trip_id.as_str())
        .one(&db)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| client_error(StatusCode::NOT_FOUND, "Trip not found"))?;

    let starts_at = parse_datetime(&trip.starts_at)?;
    let ends_at = parse_datetime(&trip.ends_at)?;

    let rows = Activity::find()
        .filter(activity_model::Column::TripId.eq(trip_id.as_str()))
        .order_by_asc(activity_model::Column::OccursAt)
        .all(&db)
        .await
        .map_err(internal_error)?;

    let total_days = (ends_at.date_naive() - starts_at.date_naive()).num_days();
    let days: Vec<Value> = (0..=total_days)
        .map(|offset| {
            let date = starts_at + Duration::days(offset);
            let on_this_day: Vec<&activity_model::Model> = rows
                .iter()
                .filter(|activity| {
                    DateTime::parse_from_rfc3339(&activity.occurs_at)
                        .map(|occurs_at| occurs_at.date_naive() == date.date_naive())
                        .unwrap_or(false)
                })
                .collect();
            json!({ "date": date.to_rfc3339(), "activities": on_this_day })
        })
        .collect();

    Ok(Json(json!({ "activities": days })))
}

pub async fn confirm_activity_done(
    State(state): State<AppState>,
    Path(activity_id): Path<String>,
) -> Result<Redirect, ApiError> {
    let activity = Activity::find_by_id(activity_id.as_str())
        .one(&state.db)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| client_error(StatusCode::NOT_FOUND, "Activity not found"))?;

    let trip_page = state.config.trip_page_url(&activity.trip_id);

    if activity.is_done {
        return Ok(Redirect::to(&trip_page));
    }

    let mut active: activity_model::ActiveModel = activity.into();
    active.is_done = Set(true);
    active.update(&state.db).await.map_err(internal_error)?;

    Ok(Redirect::to(&trip_page))
}
