// libs/appointment-cell/src/services/scheduling.rs
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;
use tracing::{debug, info};
use uuid::Uuid;

use doctor_cell::models::{Modality, ProviderId};
use doctor_cell::services::{AvailabilityService, SlotGenerator};
use notification_cell::models::BookingConfirmation;
use notification_cell::services::{dispatch_confirmation, ConfirmationChannel};
use shared_config::{AppConfig, TenantPolicyTable};

use crate::models::{Appointment, AppointmentError, BookingRequest, BookingResponse, OfferGroup};
use crate::services::assignment::{AssignmentInput, AssignmentPolicy};
use crate::services::clock::Clock;
use crate::services::filters::LeadTimeFilter;
use crate::services::guard::BookingWriteGuard;
use crate::services::offers::build_offers;
use crate::services::store::AppointmentStore;

/// Entry point for callers: offer listing, booking and attendance.
pub struct SchedulingService {
    availability: Arc<AvailabilityService>,
    store: Arc<dyn AppointmentStore>,
    guard: BookingWriteGuard,
    channel: Arc<dyn ConfirmationChannel>,
    clock: Arc<dyn Clock>,
    tenant_policies: TenantPolicyTable,
    lead_time: LeadTimeFilter,
    timezone: Tz,
}

struct Assignment {
    provider_id: ProviderId,
    provider_name: String,
}

impl SchedulingService {
    pub fn new(
        config: &AppConfig,
        availability: Arc<AvailabilityService>,
        store: Arc<dyn AppointmentStore>,
        channel: Arc<dyn ConfirmationChannel>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            availability,
            guard: BookingWriteGuard::new(store.clone()),
            store,
            channel,
            clock,
            tenant_policies: config.tenant_policies.clone(),
            lead_time: LeadTimeFilter::new(config.lead_time_minutes),
            timezone: config.clinic_timezone,
        }
    }

    fn local_now(&self) -> NaiveDateTime {
        self.clock.now().with_timezone(&self.timezone).naive_local()
    }

    /// Stamps a clinic wall-clock slot with its UTC offset. On a DST fold the
    /// earlier instant is used; a slot inside a DST gap does not exist.
    fn localize(&self, slot: NaiveDateTime) -> Result<DateTime<FixedOffset>, AppointmentError> {
        let local = self
            .timezone
            .from_local_datetime(&slot)
            .earliest()
            .ok_or(AppointmentError::InvalidSlotTime(slot))?;

        Ok(local.with_timezone(&local.offset().fix()))
    }

    /// Bookable offers for a day. Read-only; an empty list means no slots.
    pub async fn list_offers(
        &self,
        date: NaiveDate,
        modality: Modality,
    ) -> Result<Vec<OfferGroup>, AppointmentError> {
        let now = self.local_now();
        let appointments = self.store.pending_on(date).await?;

        let index = self.availability.index().await;
        let offers = build_offers(
            &index,
            date,
            modality,
            now,
            &appointments,
            &self.lead_time,
            &self.timezone,
        );

        debug!("{} offers for {} ({})", offers.len(), date, modality);
        Ok(offers)
    }

    pub async fn book(&self, request: BookingRequest) -> Result<BookingResponse, AppointmentError> {
        let patient_id = request.patient_id.trim();
        if patient_id.is_empty() {
            return Err(AppointmentError::ValidationError("patient_id is required".to_string()));
        }
        let tenant = request.tenant.trim();
        if tenant.is_empty() {
            return Err(AppointmentError::ValidationError("tenant is required".to_string()));
        }

        let slot = request.date.and_time(request.time_of_day);
        let policy = self.tenant_policies.policy_for(tenant);
        let now = self.local_now();

        if !self.lead_time.is_bookable(request.date, request.time_of_day, now) {
            return Err(AppointmentError::OutsideBookingWindow { slot });
        }

        let scheduled_at = self.localize(slot)?;
        let appointments = self.store.pending_on(request.date).await?;

        let assignment = {
            let index = self.availability.index().await;

            let offers = build_offers(
                &index,
                request.date,
                request.modality,
                now,
                &appointments,
                &self.lead_time,
                &self.timezone,
            );
            let free_providers = offers
                .into_iter()
                .find(|group| group.time_of_day == request.time_of_day)
                .map(|group| group.provider_ids)
                .unwrap_or_default();

            let covering_providers: Vec<ProviderId> = SlotGenerator::new(&index)
                .covering_providers(request.date, request.time_of_day, request.modality)
                .iter()
                .map(|p| p.id)
                .collect();

            let day_load = day_load(&appointments);

            let provider_id = AssignmentPolicy::assign(
                policy,
                &AssignmentInput {
                    slot,
                    free_providers: &free_providers,
                    covering_providers: &covering_providers,
                    day_load: &day_load,
                    provider_hint: request.provider_hint,
                },
            )?;

            Assignment {
                provider_id,
                provider_name: index
                    .provider(provider_id)
                    .map(|p| p.display_name.clone())
                    .unwrap_or_default(),
            }
        };

        debug!(
            "Tenant {} ({}) assigned provider {} for {}",
            tenant, policy, assignment.provider_id, slot
        );

        let appointment = self
            .guard
            .write(
                assignment.provider_id,
                scheduled_at,
                request.modality,
                patient_id,
                tenant,
                policy,
            )
            .await?;

        dispatch_confirmation(
            self.channel.clone(),
            BookingConfirmation {
                appointment_id: appointment.id,
                patient_id: appointment.patient_id.clone(),
                provider_id: appointment.provider_id,
                provider_name: assignment.provider_name,
                scheduled_at: appointment.scheduled_at,
                recipient_phone: request.recipient_phone,
            },
        );

        Ok(BookingResponse { appointment, policy })
    }

    /// Records that a pending consultation took place.
    pub async fn mark_attended(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        let appointment = self.store.mark_attended(appointment_id, self.clock.now()).await?;
        info!("Appointment {} marked attended", appointment_id);
        Ok(appointment)
    }

    pub async fn get_appointment(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        self.store
            .get(appointment_id)
            .await?
            .ok_or(AppointmentError::AppointmentNotFound(appointment_id))
    }
}

fn day_load(appointments: &[Appointment]) -> HashMap<ProviderId, usize> {
    let mut load = HashMap::new();
    for appointment in appointments.iter().filter(|a| a.is_pending()) {
        *load.entry(appointment.provider_id).or_insert(0) += 1;
    }
    load
}
