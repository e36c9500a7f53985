use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Redirect,
    Json,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::{client_error, internal_error, is_valid_email, ApiError};
use crate::models::participant::{self as participant_model, Entity as Participant};
use crate::models::trip::Entity as Trip;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ParticipantDto {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    pub is_confirmed: bool,
}

impl From<participant_model::Model> for ParticipantDto {
    fn from(model: participant_model::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            is_confirmed: model.is_confirmed,
        }
    }
}

pub async fn list_participants(
    State(db): State<DatabaseConnection>,
    Path(trip_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Trip::find_by_id(trip_id.as_str())
        .one(&db)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| client_error(StatusCode::NOT_FOUND, "Trip not found"))?;

    let participants = Participant::find()
        .filter(participant_model::Column::TripId.eq(trip_id.as_str()))
        .all(&db)
        .await
        .map_err(internal_error)?;

    let dtos: Vec<ParticipantDto> = participants.into_iter().map(ParticipantDto::from).collect();

    Ok(Json(json!({ "participants": dtos })))
}

pub async fn get_participant(
    State(db): State<DatabaseConnection>,
    Path(participant_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let participant = Participant::find_by_id(participant_id.as_str())
        .one(&db)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| client_error(StatusCode::NOT_FOUND, "Participant not found"))?;

    Ok(Json(json!({ "participant": ParticipantDto::from(participant) })))
}

#[utoipa::path(
    get,
    path = "/participants/{participant_id}/confirm",
    params(("participant_id" = String, Path, description = "Participant id")),
    responses(
        (status = 303, description = "Redirect to the trip page"),
        (status = 404, description = "Participant not found")
    )
)]
pub async fn confirm_participant(
    State(state): State<AppState>,
    Path(participant_id): Path<String>,
) -> Result<Redirect, ApiError> {
    let participant = Participant::find_by_id(participant_id.as_str())
        .one(&state.db)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| client_error(StatusCode::NOT_FOUND, "Participant not found"))?;

    let trip_page = state.config.trip_page_url(&participant.trip_id);

    if participant.is_confirmed {
        return Ok(Redirect::to(&trip_page));
    }

    let mut active: participant_model::ActiveModel = participant.into();
    active.is_confirmed = Set(true);
    active.update(&state.db).await.map_err(internal_error)?;

    Ok(Redirect::to(&trip_page))
}

#[derive(Debug, Deserialize)]
pub struct CreateInviteRequest {
    pub email: String,
}

pub async fn create_invite(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Json(payload): Json<CreateInviteRequest>,
) -> Result<Json<Value>, ApiError> {
    let trip = Trip::find_by_id(trip_id.as_str())
        .one(&state.db)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| client_error(StatusCode::NOT_FOUND, "Trip not found"))?;

    if !is_valid_email(&payload.email) {
        return Err(client_error(StatusCode::BAD_REQUEST, "Invalid email"));
    }

    let guest = participant_model::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        name: Set(None),
        email: Set(payload.email),
        is_confirmed: Set(false),
        is_owner: Set(false),
        trip_id: Set(trip_id),
    };
    let guest = guest.insert(&state.db).await.map_err(internal_error)?;

    state
        .mailer
        .send_guest_invitation(&trip, &guest)
        .await
        .map_err(internal_error)?;

    Ok(Json(json!({ "participantId": guest.id })))
}
