use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;
use uuid::Uuid;

use crate::api::{client_error, internal_error, ApiError};
use crate::models::link::{self as link_model, Entity as Link};
use crate::models::trip::Entity as Trip;

#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    pub title: String,
    pub url: String,
}

pub async fn create_link(
    State(db): State<DatabaseConnection>,
    Path(trip_id): Path<String>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<Json<Value>, ApiError> {
    Trip::find_by_id(trip_id.as_str())
        .one(&db)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| client_error(StatusCode::NOT_FOUND, "Trip not found"))?;

    if payload.title.trim().chars().count() < 4 {
        return Err(client_error(StatusCode::BAD_REQUEST, "Invalid link title"));
    }
    if Url::parse(&payload.url).is_err() {
        return Err(client_error(StatusCode::BAD_REQUEST, "Invalid link URL"));
    }

    let link = link_model::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        title: Set(payload.title),
        url: Set(payload.url),
        trip_id: Set(trip_id),
    };
    let link = link.insert(&db).await.map_err(internal_error)?;

    Ok(Json(json!({ "linkId": link.id })))
}

pub async fn list_links(
    State(db): State<DatabaseConnection>,
    Path(trip_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Trip::find_by_id(trip_id.as_str())
        .one(&db)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| client_error(StatusCode::NOT_FOUND, "Trip not found"))?;

    let links = Link::find()
        .filter(link_model::Column::TripId.eq(trip_id.as_str()))
        .all(&db)
        .await
        .map_err(internal_error)?;

    Ok(Json(json!({ "links": links })))
}
