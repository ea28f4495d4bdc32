// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{AppointmentError, BookingRequest, OffersQuery};
use crate::services::scheduling::SchedulingService;

fn to_app_error(error: AppointmentError) -> AppError {
    match error {
        AppointmentError::SlotConflict { .. } | AppointmentError::InvalidStatusTransition(_) => {
            AppError::Conflict(error.to_string())
        }
        AppointmentError::NoEligibleProvider { .. } | AppointmentError::OutsideBookingWindow { .. } => {
            AppError::Unprocessable(error.to_string())
        }
        AppointmentError::InvalidSlotTime(_) => AppError::BadRequest(error.to_string()),
        AppointmentError::ValidationError(msg) => AppError::ValidationError(msg),
        AppointmentError::AppointmentNotFound(_) => AppError::NotFound(error.to_string()),
        AppointmentError::StoreError(msg) => AppError::Database(msg),
    }
}

// ==============================================================================
// OFFER HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_offers(
    State(service): State<Arc<SchedulingService>>,
    Query(query): Query<OffersQuery>,
) -> Result<Json<Value>, AppError> {
    let offers = service
        .list_offers(query.date, query.modality)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "date": query.date,
        "modality": query.modality,
        "total": offers.len(),
        "offers": offers
    })))
}

// ==============================================================================
// BOOKING HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn book_appointment(
    State(service): State<Arc<SchedulingService>>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<Value>, AppError> {
    let response = service.book(request).await.map_err(to_app_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": response.appointment,
        "policy": response.policy,
        "duplicate": response.appointment.duplicate_of.is_some()
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(service): State<Arc<SchedulingService>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointment = service
        .get_appointment(appointment_id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn mark_attended(
    State(service): State<Arc<SchedulingService>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointment = service
        .mark_attended(appointment_id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}
