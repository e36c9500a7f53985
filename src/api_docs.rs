use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::trip::create_trip,
        api::trip::get_trip_details,
        api::trip::confirm_trip,
        api::participant::confirm_participant,
        // Add other endpoints here as we document them
    ),
    tags(
        (name = "planner", description = "Trip planning API")
    )
)]
pub struct ApiDoc;
