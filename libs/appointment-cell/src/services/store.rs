// libs/appointment-cell/src/services/store.rs
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::models::{Appointment, AppointmentError, AppointmentStatus, NewAppointment};
use crate::services::guard::classify_duplicate;

/// Persistence seam for appointments.
///
/// `insert_guarded` must run the patient duplicate lookup, the strict slot
/// uniqueness check and the insert as one atomic unit.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Pending appointments whose clinic-local date is `date`, any modality.
    async fn pending_on(&self, date: NaiveDate) -> Result<Vec<Appointment>, AppointmentError>;

    async fn insert_guarded(&self, new: NewAppointment) -> Result<Appointment, AppointmentError>;

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>, AppointmentError>;

    /// pending -> attended, exactly once.
    async fn mark_attended(&self, id: Uuid, at: DateTime<Utc>) -> Result<Appointment, AppointmentError>;
}

pub struct InMemoryAppointmentStore {
    appointments: Mutex<Vec<Appointment>>,
    timezone: Tz,
}

impl InMemoryAppointmentStore {
    /// `timezone` is the clinic zone that `pending_on` dates refer to.
    pub fn new(timezone: Tz) -> Self {
        Self::with_appointments(timezone, Vec::new())
    }

    pub fn with_appointments(timezone: Tz, appointments: Vec<Appointment>) -> Self {
        Self {
            appointments: Mutex::new(appointments),
            timezone,
        }
    }

    /// Adds an existing record as-is, bypassing the booking checks.
    pub async fn import(&self, appointment: Appointment) {
        self.appointments.lock().await.push(appointment);
    }

    pub async fn all(&self) -> Vec<Appointment> {
        self.appointments.lock().await.clone()
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn pending_on(&self, date: NaiveDate) -> Result<Vec<Appointment>, AppointmentError> {
        let appointments = self.appointments.lock().await;
        Ok(appointments
            .iter()
            .filter(|a| a.is_pending() && a.local_date(&self.timezone) == date)
            .cloned()
            .collect())
    }

    async fn insert_guarded(&self, new: NewAppointment) -> Result<Appointment, AppointmentError> {
        let mut appointments = self.appointments.lock().await;

        if new.enforce_unique_slot
            && appointments.iter().any(|a| {
                a.is_pending() && a.provider_id == new.provider_id && a.scheduled_at == new.scheduled_at
            })
        {
            debug!("Unique slot violated for provider {} at {}", new.provider_id, new.scheduled_at);
            return Err(AppointmentError::SlotConflict {
                slot: new.scheduled_at.naive_local(),
            });
        }

        let tag = appointments
            .iter()
            .filter(|a| a.is_pending() && a.patient_id == new.patient_id)
            .max_by_key(|a| a.created_at)
            .and_then(|existing| classify_duplicate(existing, &new));

        let appointment = new.into_appointment(tag, Utc::now());
        appointments.push(appointment.clone());

        Ok(appointment)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>, AppointmentError> {
        let appointments = self.appointments.lock().await;
        Ok(appointments.iter().find(|a| a.id == id).cloned())
    }

    async fn mark_attended(&self, id: Uuid, at: DateTime<Utc>) -> Result<Appointment, AppointmentError> {
        let mut appointments = self.appointments.lock().await;
        let appointment = appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(AppointmentError::AppointmentNotFound(id))?;

        if appointment.status != AppointmentStatus::Pending {
            return Err(AppointmentError::InvalidStatusTransition(appointment.status));
        }

        appointment.status = AppointmentStatus::Attended;
        appointment.attended_at = Some(at);
        Ok(appointment.clone())
    }
}
