// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::services::scheduling::SchedulingService;

pub fn appointment_routes(service: Arc<SchedulingService>) -> Router {
    Router::new()
        .route("/offers", get(handlers::list_offers))
        .route("/book", post(handlers::book_appointment))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}/attended", post(handlers::mark_attended))
        .with_state(service)
}
