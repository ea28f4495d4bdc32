use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use appointment_cell::services::SchedulingService;
use doctor_cell::router::doctor_routes;
use doctor_cell::services::AvailabilityService;

pub fn create_router(
    availability: Arc<AvailabilityService>,
    scheduling: Arc<SchedulingService>,
) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic scheduling API is running!" }))
        .nest("/doctors", doctor_routes(availability))
        .nest("/appointments", appointment_routes(scheduling))
}
