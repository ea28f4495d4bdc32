use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{AvailabilityError, CreateAvailabilityRequest, CreateProviderRequest};
use crate::services::availability::AvailabilityService;

fn to_app_error(error: AvailabilityError) -> AppError {
    match error {
        AvailabilityError::ProviderNotFound(_) | AvailabilityError::WindowNotFound(_) => {
            AppError::NotFound(error.to_string())
        }
        AvailabilityError::InvalidWindow { .. }
        | AvailabilityError::InvalidDayOfWeek(_)
        | AvailabilityError::InvalidConsultationLength
        | AvailabilityError::MissingDisplayName => AppError::ValidationError(error.to_string()),
    }
}

// ==============================================================================
// PROVIDER HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_provider(
    State(service): State<Arc<AvailabilityService>>,
    Json(request): Json<CreateProviderRequest>,
) -> Result<Json<Value>, AppError> {
    let provider = service.create_provider(request).await.map_err(to_app_error)?;

    Ok(Json(json!({
        "success": true,
        "provider": provider
    })))
}

#[axum::debug_handler]
pub async fn deactivate_provider(
    State(service): State<Arc<AvailabilityService>>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let provider = service
        .deactivate_provider(provider_id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "success": true,
        "provider": provider
    })))
}

// ==============================================================================
// AVAILABILITY HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_availability(
    State(service): State<Arc<AvailabilityService>>,
    Path(provider_id): Path<Uuid>,
    Json(request): Json<CreateAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    let window = service
        .create_availability(provider_id, request)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "success": true,
        "availability": window
    })))
}

#[axum::debug_handler]
pub async fn get_provider_availability(
    State(service): State<Arc<AvailabilityService>>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let response = service
        .get_provider_availability(provider_id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!(response)))
}

#[axum::debug_handler]
pub async fn deactivate_availability(
    State(service): State<Arc<AvailabilityService>>,
    Path((provider_id, window_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Value>, AppError> {
    let window = service
        .deactivate_availability(provider_id, window_id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "success": true,
        "availability": window
    })))
}
