// libs/appointment-cell/src/services/guard.rs
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use tracing::{info, warn};

use doctor_cell::models::{Modality, ProviderId};
use shared_config::TenantPolicy;

use crate::models::{Appointment, AppointmentError, DuplicateKind, DuplicateTag, NewAppointment};
use crate::services::store::AppointmentStore;

/// Decides how a new booking relates to a patient's existing pending record.
///
/// A record that already carries a completion timestamp is not a duplicate.
/// The exact same provider and timestamp again is treated as suspect data;
/// anything else is a genuine re-booking. Neither case blocks the insert.
pub fn classify_duplicate(existing: &Appointment, new: &NewAppointment) -> Option<DuplicateTag> {
    if !existing.is_pending() || existing.attended_at.is_some() {
        return None;
    }

    let kind = if existing.provider_id == new.provider_id && existing.scheduled_at == new.scheduled_at {
        DuplicateKind::SuspectedTestData
    } else {
        DuplicateKind::Rebooking
    };

    Some(DuplicateTag {
        duplicate_of: existing.id,
        kind,
    })
}

/// Final write of a booking.
pub struct BookingWriteGuard {
    store: Arc<dyn AppointmentStore>,
}

impl BookingWriteGuard {
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self { store }
    }

    pub async fn write(
        &self,
        provider_id: ProviderId,
        scheduled_at: DateTime<FixedOffset>,
        modality: Modality,
        patient_id: &str,
        tenant: &str,
        policy: TenantPolicy,
    ) -> Result<Appointment, AppointmentError> {
        let new = NewAppointment {
            patient_id: patient_id.to_string(),
            provider_id,
            scheduled_at,
            modality,
            tenant: tenant.to_string(),
            enforce_unique_slot: policy == TenantPolicy::Strict,
        };

        let appointment = self.store.insert_guarded(new).await.inspect_err(|e| {
            if e.is_retryable() {
                warn!("Booking lost race for provider {} at {}: {}", provider_id, scheduled_at, e);
            }
        })?;

        if let (Some(original), Some(kind)) = (appointment.duplicate_of, appointment.duplicate_kind) {
            warn!(
                "Patient {} already had pending appointment {}; new record {} tagged as {:?}",
                appointment.patient_id, original, appointment.id, kind
            );
        }

        info!(
            "Appointment {} booked: provider {} at {} ({}, tenant {})",
            appointment.id, appointment.provider_id, appointment.scheduled_at, appointment.modality, appointment.tenant
        );

        Ok(appointment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn new_booking(provider: u128, hour: u32) -> NewAppointment {
        NewAppointment {
            patient_id: "p1".to_string(),
            provider_id: Uuid::from_u128(provider),
            scheduled_at: FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(2026, 10, 26, hour, 0, 0)
                .unwrap(),
            modality: Modality::Remote,
            tenant: "ACME".to_string(),
            enforce_unique_slot: true,
        }
    }

    #[test]
    fn test_same_provider_and_time_is_suspect() {
        let existing = new_booking(1, 9).into_appointment(None, Utc::now());

        let tag = classify_duplicate(&existing, &new_booking(1, 9)).unwrap();

        assert_eq!(tag.duplicate_of, existing.id);
        assert_eq!(tag.kind, DuplicateKind::SuspectedTestData);
    }

    #[test]
    fn test_other_slot_is_rebooking() {
        let existing = new_booking(1, 9).into_appointment(None, Utc::now());

        assert_eq!(
            classify_duplicate(&existing, &new_booking(2, 9)).map(|t| t.kind),
            Some(DuplicateKind::Rebooking)
        );
        assert_eq!(
            classify_duplicate(&existing, &new_booking(1, 10)).map(|t| t.kind),
            Some(DuplicateKind::Rebooking)
        );
    }

    #[test]
    fn test_completed_record_is_ignored() {
        let mut existing = new_booking(1, 9).into_appointment(None, Utc::now());
        existing.attended_at = Some(Utc.with_ymd_and_hms(2026, 10, 26, 9, 20, 0).unwrap());

        assert_eq!(classify_duplicate(&existing, &new_booking(1, 9)), None);
    }
}
