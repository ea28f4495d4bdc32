#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use uuid::Uuid;

use appointment_cell::models::{Appointment, NewAppointment};
use appointment_cell::services::{
    AppointmentStore, FixedClock, InMemoryAppointmentStore, SchedulingService,
};
use doctor_cell::models::{CreateAvailabilityRequest, CreateProviderRequest, Modality, Provider};
use doctor_cell::services::AvailabilityService;
use notification_cell::services::{ConfirmationChannel, NoopChannel};
use shared_config::{AppConfig, TenantPolicy, TenantPolicyTable};

pub struct TestSetup {
    pub config: AppConfig,
    pub availability: Arc<AvailabilityService>,
    pub store: Arc<InMemoryAppointmentStore>,
    pub service: Arc<SchedulingService>,
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// 2026-10-26, a Monday.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 26).unwrap()
}

pub fn utc(date: NaiveDate, h: u32, m: u32) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(time(h, m)))
}

pub fn test_config() -> AppConfig {
    AppConfig {
        clinic_timezone: chrono_tz::UTC,
        lead_time_minutes: 60,
        tenant_policies: TenantPolicyTable::new(TenantPolicy::Strict)
            .with_tenant("POOL1", TenantPolicy::Pooled)
            .with_tenant("ACME", TenantPolicy::Strict),
        ..AppConfig::default()
    }
}

impl TestSetup {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with(test_config(), now, Arc::new(NoopChannel), Vec::new())
    }

    pub fn with(
        config: AppConfig,
        now: DateTime<Utc>,
        channel: Arc<dyn ConfirmationChannel>,
        seed: Vec<Appointment>,
    ) -> Self {
        let availability = Arc::new(AvailabilityService::new(&config));
        let store = Arc::new(InMemoryAppointmentStore::with_appointments(config.clinic_timezone, seed));
        let service = Arc::new(SchedulingService::new(
            &config,
            availability.clone(),
            store.clone() as Arc<dyn AppointmentStore>,
            channel,
            Arc::new(FixedClock(now)),
        ));

        Self {
            config,
            availability,
            store,
            service,
        }
    }

    pub async fn add_provider(
        &self,
        name: &str,
        minutes: u32,
        windows: &[(i32, Modality, NaiveTime, NaiveTime)],
    ) -> Provider {
        let provider = self
            .availability
            .create_provider(CreateProviderRequest {
                display_name: name.to_string(),
                consultation_minutes: Some(minutes),
            })
            .await
            .unwrap();

        for (day, modality, start, end) in windows {
            self.availability
                .create_availability(
                    provider.id,
                    CreateAvailabilityRequest {
                        day_of_week: *day,
                        modality: *modality,
                        start_time: *start,
                        end_time: *end,
                        consultation_minutes: None,
                    },
                )
                .await
                .unwrap();
        }

        provider
    }
}

/// A pending appointment stamped in UTC, for seeding stores directly.
pub fn pending(provider_id: Uuid, date: NaiveDate, at: NaiveTime, modality: Modality, patient: &str) -> Appointment {
    NewAppointment {
        patient_id: patient.to_string(),
        provider_id,
        scheduled_at: Utc
            .from_utc_datetime(&date.and_time(at))
            .with_timezone(&FixedOffset::east_opt(0).unwrap()),
        modality,
        tenant: "ACME".to_string(),
        enforce_unique_slot: true,
    }
    .into_appointment(None, Utc::now())
}
