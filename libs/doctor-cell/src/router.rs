use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::services::availability::AvailabilityService;

pub fn doctor_routes(service: Arc<AvailabilityService>) -> Router {
    Router::new()
        .route("/", post(handlers::create_provider))
        .route("/{provider_id}/deactivate", post(handlers::deactivate_provider))
        .route(
            "/{provider_id}/availability",
            get(handlers::get_provider_availability).post(handlers::create_availability),
        )
        .route(
            "/{provider_id}/availability/{window_id}/deactivate",
            post(handlers::deactivate_availability),
        )
        .with_state(service)
}
