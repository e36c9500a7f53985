use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Redirect,
    Json,
};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::{client_error, internal_error, is_valid_email, ApiError};
use crate::models::participant::{self as participant_model, Entity as Participant};
use crate::models::trip::{self as trip_model, Entity as Trip};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTripRequest {
    pub destination: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub owner_name: String,
    pub owner_email: String,
    pub emails_to_invite: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTripRequest {
    pub destination: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct TripDto {
    pub id: String,
    pub destination: String,
    pub starts_at: String,
    pub ends_at: String,
    pub is_confirmed: bool,
}

impl From<trip_model::Model> for TripDto {
    fn from(model: trip_model::Model) -> Self {
        Self {
            id: model.id,
            destination: model.destination,
            starts_at: model.starts_at,
            ends_at: model.ends_at,
            is_confirmed: model.is_confirmed,
        }
    }
}

fn validate_trip_input(
    destination: &str,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
) -> Result<(), ApiError> {
    if destination.trim().chars().count() < 4 {
        return Err(client_error(
            StatusCode::BAD_REQUEST,
            "Invalid trip destination",
        ));
    }
    if starts_at < Utc::now() {
        return Err(client_error(
            StatusCode::BAD_REQUEST,
            "Invalid trip start date.",
        ));
    }
    if ends_at < starts_at {
        return Err(client_error(
            StatusCode::BAD_REQUEST,
            "Invalid trip end date.",
        ));
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/trips",
    responses(
        (status = 200, description = "Trip created, confirmation mail sent to the owner"),
        (status = 400, description = "Invalid destination, dates or emails")
    )
)]
pub async fn create_trip(
    State(state): State<AppState>,
    Json(payload): Json<CreateTripRequest>,
) -> Result<Json<Value>, ApiError> {
    validate_trip_input(&payload.destination, payload.starts_at, payload.ends_at)?;

    if payload.owner_name.trim().chars().count() < 4 {
        return Err(client_error(StatusCode::BAD_REQUEST, "Invalid owner name"));
    }
    if !is_valid_email(&payload.owner_email) {
        return Err(client_error(StatusCode::BAD_REQUEST, "Invalid owner email"));
    }
    if let Some(email) = payload
        .emails_to_invite
        .iter()
        .find(|email| !is_valid_email(email.as_str()))
    {
        tracing::debug!("rejecting invite list with invalid address {}", email);
        return Err(client_error(
            StatusCode::BAD_REQUEST,
            "Invalid invited email",
        ));
    }

    let trip_id = Uuid::new_v4().to_string();
    let new_trip = trip_model::ActiveModel {
        id: Set(trip_id.clone()),
        destination: Set(payload.destination.clone()),
        starts_at: Set(payload.starts_at.to_rfc3339()),
        ends_at: Set(payload.ends_at.to_rfc3339()),
        is_confirmed: Set(false),
        created_at: Set(Utc::now().to_rfc3339()),
    };
    let trip = new_trip.insert(&state.db).await.map_err(internal_error)?;

    // The owner travels pre-confirmed; invited guests confirm via email.
    let owner = participant_model::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        name: Set(Some(payload.owner_name.clone())),
        email: Set(payload.owner_email.clone()),
        is_confirmed: Set(true),
        is_owner: Set(true),
        trip_id: Set(trip_id.clone()),
    };
    let owner = owner.insert(&state.db).await.map_err(internal_error)?;

    if !payload.emails_to_invite.is_empty() {
        let guests: Vec<participant_model::ActiveModel> = payload
            .emails_to_invite
            .iter()
            .map(|email| participant_model::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                name: Set(None),
                email: Set(email.clone()),
                is_confirmed: Set(false),
                is_owner: Set(false),
                trip_id: Set(trip_id.clone()),
            })
            .collect();
        Participant::insert_many(guests)
            .exec(&state.db)
            .await
            .map_err(internal_error)?;
    }

    state
        .mailer
        .send_trip_created(&trip, &owner)
        .await
        .map_err(internal_error)?;

    Ok(Json(json!({ "tripId": trip_id })))
}

#[utoipa::path(
    get,
    path = "/trips/{trip_id}",
    params(("trip_id" = String, Path, description = "Trip id")),
    responses(
        (status = 200, description = "Trip details"),
        (status = 404, description = "Trip not found")
    )
)]
pub async fn get_trip_details(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let trip = Trip::find_by_id(trip_id.as_str())
        .one(&state.db)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| client_error(StatusCode::NOT_FOUND, "Trip not found"))?;

    Ok(Json(json!({ "trip": TripDto::from(trip) })))
}

pub async fn update_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Json(payload): Json<UpdateTripRequest>,
) -> Result<Json<Value>, ApiError> {
    let trip = Trip::find_by_id(trip_id.as_str())
        .one(&state.db)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| client_error(StatusCode::NOT_FOUND, "Trip not found"))?;

    validate_trip_input(&payload.destination, payload.starts_at, payload.ends_at)?;

    let mut active: trip_model::ActiveModel = trip.into();
    active.destination = Set(payload.destination);
    active.starts_at = Set(payload.starts_at.to_rfc3339());
    active.ends_at = Set(payload.ends_at.to_rfc3339());
    let updated = active.update(&state.db).await.map_err(internal_error)?;

    Ok(Json(json!({ "tripId": updated.id })))
}

#[utoipa::path(
    get,
    path = "/trips/{trip_id}/confirm",
    params(("trip_id" = String, Path, description = "Trip id")),
    responses(
        (status = 303, description = "Redirect to the trip page; guests are mailed on the first call"),
        (status = 404, description = "Trip not found")
    )
)]
pub async fn confirm_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<Redirect, ApiError> {
    let trip = Trip::find_by_id(trip_id.as_str())
        .one(&state.db)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| client_error(StatusCode::NOT_FOUND, "Trip not found"))?;

    let trip_page = state.config.trip_page_url(&trip_id);

    // Idempotent: a revisited confirmation link just lands on the trip page.
    if trip.is_confirmed {
        return Ok(Redirect::to(&trip_page));
    }

    let mut active: trip_model::ActiveModel = trip.clone().into();
    active.is_confirmed = Set(true);
    active.update(&state.db).await.map_err(internal_error)?;

    let guests = Participant::find()
        .filter(participant_model::Column::TripId.eq(trip_id.as_str()))
        .filter(participant_model::Column::IsOwner.eq(false))
        .all(&state.db)
        .await
        .map_err(internal_error)?;

    let sends = guests
        .iter()
        .map(|guest| state.mailer.send_guest_invitation(&trip, guest));
    for sent in join_all(sends).await {
        sent.map_err(internal_error)?;
    }

    Ok(Redirect::to(&trip_page))
}
