// libs/appointment-cell/src/services/supabase_store.rs
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Offset, Utc};
use chrono_tz::Tz;
use reqwest::{header::{HeaderMap, HeaderValue}, Method};
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{ApiError, SupabaseClient};

use crate::models::{Appointment, AppointmentError, NewAppointment};
use crate::services::store::AppointmentStore;

/// Appointments persisted in Supabase.
///
/// Bookings go through the `book_appointment` Postgres function, which locks
/// the patient's pending rows, fills `duplicate_of`/`duplicate_kind` and
/// inserts in one transaction. Strict bookings rely on a partial unique index
/// over `(provider_id, scheduled_at) WHERE status = 'pending' AND
/// enforce_unique_slot`, surfaced by PostgREST as HTTP 409.
pub struct SupabaseAppointmentStore {
    supabase: SupabaseClient,
    timezone: Tz,
}

impl SupabaseAppointmentStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            timezone: config.clinic_timezone,
        }
    }

    /// PostgREST renders `timestamptz` in the session zone; rows are
    /// re-stamped with the clinic offset.
    fn parse_row(&self, row: Value) -> Result<Appointment, AppointmentError> {
        let mut appointment: Appointment = serde_json::from_value(row)
            .map_err(|e| AppointmentError::StoreError(format!("Failed to parse appointment: {}", e)))?;

        let local = appointment.scheduled_at.with_timezone(&self.timezone);
        appointment.scheduled_at = local.with_timezone(&local.offset().fix());
        Ok(appointment)
    }

    fn parse_rows(&self, result: Vec<Value>) -> Result<Vec<Appointment>, AppointmentError> {
        result.into_iter().map(|row| self.parse_row(row)).collect()
    }
}

fn store_error(error: anyhow::Error) -> AppointmentError {
    AppointmentError::StoreError(error.to_string())
}

#[async_trait]
impl AppointmentStore for SupabaseAppointmentStore {
    async fn pending_on(&self, date: NaiveDate) -> Result<Vec<Appointment>, AppointmentError> {
        let path = format!(
            "/rest/v1/appointments?status=eq.pending&scheduled_date=eq.{}&order=scheduled_at.asc",
            date
        );

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(store_error)?;

        self.parse_rows(result)
    }

    async fn insert_guarded(&self, new: NewAppointment) -> Result<Appointment, AppointmentError> {
        let slot = new.scheduled_at.naive_local();
        let args = json!({
            "p_patient_id": new.patient_id,
            "p_provider_id": new.provider_id,
            "p_scheduled_at": new.scheduled_at.to_rfc3339(),
            "p_scheduled_date": new.scheduled_at.date_naive(),
            "p_modality": new.modality,
            "p_tenant": new.tenant,
            "p_enforce_unique_slot": new.enforce_unique_slot,
        });

        let row: Value = self.supabase.rpc("book_appointment", args).await.map_err(|e| {
            match e.downcast_ref::<ApiError>() {
                Some(api) if api.is_conflict() => AppointmentError::SlotConflict { slot },
                _ => store_error(e),
            }
        })?;

        debug!("book_appointment returned: {}", row);
        self.parse_row(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>, AppointmentError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", id);

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(store_error)?;

        Ok(self.parse_rows(result)?.into_iter().next())
    }

    async fn mark_attended(&self, id: Uuid, at: DateTime<Utc>) -> Result<Appointment, AppointmentError> {
        // The status filter makes the transition a compare-and-set.
        let path = format!("/rest/v1/appointments?id=eq.{}&status=eq.pending", id);
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(json!({
                    "status": "attended",
                    "attended_at": at.to_rfc3339(),
                })),
                Some(headers),
            )
            .await
            .map_err(store_error)?;

        if let Some(updated) = self.parse_rows(result)?.into_iter().next() {
            return Ok(updated);
        }

        match self.get(id).await? {
            Some(existing) => Err(AppointmentError::InvalidStatusTransition(existing.status)),
            None => Err(AppointmentError::AppointmentNotFound(id)),
        }
    }
}
