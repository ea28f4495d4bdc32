// libs/appointment-cell/src/models.rs
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use doctor_cell::models::{Modality, ProviderId};
use shared_config::TenantPolicy;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: String,
    pub provider_id: ProviderId,
    /// Clinic-local wall clock with its UTC offset.
    pub scheduled_at: DateTime<FixedOffset>,
    pub modality: Modality,
    pub status: AppointmentStatus,
    pub tenant: String,
    pub duplicate_of: Option<Uuid>,
    pub duplicate_kind: Option<DuplicateKind>,
    pub attended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    pub fn is_pending(&self) -> bool {
        self.status == AppointmentStatus::Pending
    }

    /// Wall-clock time in the clinic zone, whatever offset the record was
    /// stored or returned with.
    pub fn local_datetime(&self, timezone: &Tz) -> NaiveDateTime {
        self.scheduled_at.with_timezone(timezone).naive_local()
    }

    pub fn local_date(&self, timezone: &Tz) -> NaiveDate {
        self.local_datetime(timezone).date()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Attended,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Attended => write!(f, "attended"),
        }
    }
}

/// Why a booking was linked to an earlier pending record of the same patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKind {
    /// The patient booked again while a previous appointment is still pending.
    Rebooking,
    /// Same patient, provider and timestamp twice: most likely bad input.
    SuspectedTestData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateTag {
    pub duplicate_of: Uuid,
    pub kind: DuplicateKind,
}

/// Insert payload handed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub patient_id: String,
    pub provider_id: ProviderId,
    pub scheduled_at: DateTime<FixedOffset>,
    pub modality: Modality,
    pub tenant: String,
    /// Strict tenants require the provider/timestamp pair to be free at write time.
    pub enforce_unique_slot: bool,
}

impl NewAppointment {
    pub fn into_appointment(self, tag: Option<DuplicateTag>, created_at: DateTime<Utc>) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            patient_id: self.patient_id,
            provider_id: self.provider_id,
            scheduled_at: self.scheduled_at,
            modality: self.modality,
            status: AppointmentStatus::Pending,
            tenant: self.tenant,
            duplicate_of: tag.map(|t| t.duplicate_of),
            duplicate_kind: tag.map(|t| t.kind),
            attended_at: None,
            created_at,
        }
    }
}

/// Offers collapsed by displayed time, keeping every provider that can still serve it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferGroup {
    pub time_of_day: NaiveTime,
    pub modality: Modality,
    pub provider_ids: Vec<ProviderId>,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffersQuery {
    pub date: NaiveDate,
    pub modality: Modality,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub date: NaiveDate,
    pub time_of_day: NaiveTime,
    pub modality: Modality,
    pub patient_id: String,
    pub tenant: String,
    pub provider_hint: Option<ProviderId>,
    pub recipient_phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    pub appointment: Appointment,
    pub policy: TenantPolicy,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppointmentError {
    #[error("Slot {slot} is no longer available")]
    SlotConflict { slot: NaiveDateTime },

    #[error("No provider covers {slot}")]
    NoEligibleProvider { slot: NaiveDateTime },

    #[error("Slot {slot} is earlier than the booking lead time allows")]
    OutsideBookingWindow { slot: NaiveDateTime },

    #[error("Slot {0} does not exist in the clinic timezone")]
    InvalidSlotTime(NaiveDateTime),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Appointment not found: {0}")]
    AppointmentNotFound(Uuid),

    #[error("Appointment cannot be modified in current status: {0}")]
    InvalidStatusTransition(AppointmentStatus),

    #[error("Store error: {0}")]
    StoreError(String),
}

impl AppointmentError {
    /// Conflicts are expected under concurrency; the caller re-queries offers and retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppointmentError::SlotConflict { .. })
    }
}
