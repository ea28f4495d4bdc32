use std::fmt;

use chrono::{NaiveTime, DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub type ProviderId = Uuid;

/// Longest consultation a provider or window may declare.
pub const MAX_CONSULTATION_MINUTES: u32 = 24 * 60;

// ==============================================================================
// CORE SCHEDULING MODELS
// ==============================================================================

/// How a consultation is delivered. Availability is declared per modality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    #[serde(alias = "in-person", alias = "presencial")]
    InPerson,
    #[serde(alias = "virtual", alias = "telemedicine", alias = "online")]
    Remote,
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modality::InPerson => write!(f, "in_person"),
            Modality::Remote => write!(f, "remote"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub id: ProviderId,
    pub display_name: String,
    pub active: bool,
    pub consultation_minutes: u32,
    pub created_at: DateTime<Utc>,
}

/// A recurring weekly block in which a provider takes consultations.
/// `day_of_week` counts from Sunday = 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub id: Uuid,
    pub provider_id: ProviderId,
    pub day_of_week: u8,
    pub modality: Modality,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Overrides the provider's consultation length inside this window.
    pub consultation_minutes: Option<u32>,
    pub active: bool,
}

impl AvailabilityWindow {
    pub fn slot_minutes(&self, provider: &Provider) -> u32 {
        self.consultation_minutes.unwrap_or(provider.consultation_minutes)
    }

    pub fn matches(&self, day_of_week: u8, modality: Modality) -> bool {
        self.active && self.day_of_week == day_of_week && self.modality == modality
    }
}

/// A candidate start time proposed for a provider. Derived on every query, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotOffer {
    pub time_of_day: NaiveTime,
    pub provider_id: ProviderId,
    pub modality: Modality,
    pub duration_minutes: u32,
    pub window_start: NaiveTime,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProviderRequest {
    pub display_name: String,
    pub consultation_minutes: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAvailabilityRequest {
    pub day_of_week: i32,
    pub modality: Modality,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub consultation_minutes: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderAvailabilityResponse {
    pub provider: Provider,
    pub windows: Vec<AvailabilityWindow>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("Invalid window: start time {start} must be before end time {end}")]
    InvalidWindow { start: NaiveTime, end: NaiveTime },

    #[error("Day of week must be between 0 (Sunday) and 6 (Saturday), got {0}")]
    InvalidDayOfWeek(i32),

    #[error("Consultation length must be between 1 and 1440 minutes")]
    InvalidConsultationLength,

    #[error("Display name must not be empty")]
    MissingDisplayName,

    #[error("Provider not found: {0}")]
    ProviderNotFound(ProviderId),

    #[error("Availability window not found: {0}")]
    WindowNotFound(Uuid),
}
