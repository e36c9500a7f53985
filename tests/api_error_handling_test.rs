use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, Set};
use tower::util::ServiceExt; // for `oneshot`

use planner::config::Config;
use planner::db;
use planner::models;
use planner::services::Mailer;
use planner::state::AppState;

fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        port: 3333,
        api_base_url: "http://localhost:3333".to_string(),
        web_base_url: "http://localhost:3000".to_string(),
        mail_from_name: "Equipe plann.er".to_string(),
        mail_from_address: "oi@plann.er".to_string(),
        smtp_host: None,
        smtp_port: 587,
        smtp_username: None,
        smtp_password: None,
    }
}

async fn setup_test_app() -> (Router, AppState) {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    let config = test_config();
    let mailer = Mailer::from_config(&config).expect("Failed to build mailer");
    let state = AppState::new(db, mailer, config);
    (planner::api::api_router(state.clone()), state)
}

async fn create_future_trip(state: &AppState) -> String {
    let starts_at = Utc::now() + Duration::days(30);
    let id = uuid::Uuid::new_v4().to_string();
    let trip = models::trip::ActiveModel {
        id: Set(id.clone()),
        destination: Set("Porto de Galinhas, PE".to_string()),
        starts_at: Set(starts_at.to_rfc3339()),
        ends_at: Set((starts_at + Duration::days(3)).to_rfc3339()),
        is_confirmed: Set(false),
        created_at: Set(Utc::now().to_rfc3339()),
    };
    trip.insert(&state.db).await.expect("Failed to create trip");
    id
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap()
}

async fn error_message(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body: serde_json::Value = serde_json::from_slice(&bytes).expect("Body should be JSON");
    body["error"]
        .as_str()
        .expect("error message should be a string")
        .to_string()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _state) = setup_test_app().await;
    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_get_trip_not_found() {
    let (app, _state) = setup_test_app().await;

    let response = app
        .oneshot(get_request(
            "/trips/00000000-0000-0000-0000-000000000000",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_message(response).await, "Trip not found");
}

#[tokio::test]
async fn test_update_trip_not_found() {
    let (app, _state) = setup_test_app().await;

    let starts_at = Utc::now() + Duration::days(10);
    let payload = serde_json::json!({
        "destination": "Qualquer lugar",
        "starts_at": starts_at.to_rfc3339(),
        "ends_at": (starts_at + Duration::days(1)).to_rfc3339()
    });
    let response = app
        .oneshot(json_request(
            "PUT",
            "/trips/00000000-0000-0000-0000-000000000000",
            payload,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_trip_rejects_past_start() {
    let (app, _state) = setup_test_app().await;

    let starts_at = Utc::now() - Duration::days(1);
    let payload = serde_json::json!({
        "destination": "Florianópolis, SC",
        "starts_at": starts_at.to_rfc3339(),
        "ends_at": (starts_at + Duration::days(5)).to_rfc3339(),
        "owner_name": "John Doe",
        "owner_email": "john@example.com",
        "emails_to_invite": []
    });
    let response = app
        .oneshot(json_request("POST", "/trips", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "Invalid trip start date.");
}

#[tokio::test]
async fn test_create_trip_rejects_end_before_start() {
    let (app, _state) = setup_test_app().await;

    let starts_at = Utc::now() + Duration::days(30);
    let payload = serde_json::json!({
        "destination": "Florianópolis, SC",
        "starts_at": starts_at.to_rfc3339(),
        "ends_at": (starts_at - Duration::days(2)).to_rfc3339(),
        "owner_name": "John Doe",
        "owner_email": "john@example.com",
        "emails_to_invite": []
    });
    let response = app
        .oneshot(json_request("POST", "/trips", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "Invalid trip end date.");
}

#[tokio::test]
async fn test_create_trip_rejects_short_destination() {
    let (app, _state) = setup_test_app().await;

    let starts_at = Utc::now() + Duration::days(30);
    let payload = serde_json::json!({
        "destination": "RJ",
        "starts_at": starts_at.to_rfc3339(),
        "ends_at": (starts_at + Duration::days(5)).to_rfc3339(),
        "owner_name": "John Doe",
        "owner_email": "john@example.com",
        "emails_to_invite": []
    });
    let response = app
        .oneshot(json_request("POST", "/trips", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_trip_rejects_invalid_invite_email() {
    let (app, _state) = setup_test_app().await;

    let starts_at = Utc::now() + Duration::days(30);
    let payload = serde_json::json!({
        "destination": "Florianópolis, SC",
        "starts_at": starts_at.to_rfc3339(),
        "ends_at": (starts_at + Duration::days(5)).to_rfc3339(),
        "owner_name": "John Doe",
        "owner_email": "john@example.com",
        "emails_to_invite": ["not-an-email"]
    });
    let response = app
        .oneshot(json_request("POST", "/trips", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_trip_rejects_end_before_start() {
    let (app, state) = setup_test_app().await;
    let trip_id = create_future_trip(&state).await;

    let starts_at = Utc::now() + Duration::days(20);
    let payload = serde_json::json!({
        "destination": "Porto de Galinhas, PE",
        "starts_at": starts_at.to_rfc3339(),
        "ends_at": (starts_at - Duration::days(1)).to_rfc3339()
    });
    let response = app
        .oneshot(json_request("PUT", &format!("/trips/{}", trip_id), payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_activity_unknown_trip() {
    let (app, _state) = setup_test_app().await;

    let payload = serde_json::json!({
        "title": "Passeio de barco",
        "occurs_at": (Utc::now() + Duration::days(31)).to_rfc3339()
    });
    let response = app
        .oneshot(json_request(
            "POST",
            "/trips/00000000-0000-0000-0000-000000000000/activities",
            payload,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_activity_rejects_short_title() {
    let (app, state) = setup_test_app().await;
    let trip_id = create_future_trip(&state).await;

    let payload = serde_json::json!({
        "title": "Bar",
        "occurs_at": (Utc::now() + Duration::days(31)).to_rfc3339()
    });
    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/trips/{}/activities", trip_id),
            payload,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_link_rejects_invalid_url() {
    let (app, state) = setup_test_app().await;
    let trip_id = create_future_trip(&state).await;

    let payload = serde_json::json!({
        "title": "Reserva do hotel",
        "url": "not a url"
    });
    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/trips/{}/links", trip_id),
            payload,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "Invalid link URL");
}

#[tokio::test]
async fn test_confirm_unknown_participant() {
    let (app, _state) = setup_test_app().await;

    let response = app
        .oneshot(get_request(
            "/participants/00000000-0000-0000-0000-000000000000/confirm",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_message(response).await, "Participant not found");
}

#[tokio::test]
async fn test_invite_rejects_invalid_email() {
    let (app, state) = setup_test_app().await;
    let trip_id = create_future_trip(&state).await;

    let payload = serde_json::json!({ "email": "definitely not an email" });
    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/trips/{}/invites", trip_id),
            payload,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "Invalid email");
}

#[tokio::test]
async fn test_activity_done_unknown_activity() {
    let (app, _state) = setup_test_app().await;

    let response = app
        .oneshot(get_request(
            "/activities/00000000-0000-0000-0000-000000000000/done",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_message(response).await, "Activity not found");
}
