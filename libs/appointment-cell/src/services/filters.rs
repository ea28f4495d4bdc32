// libs/appointment-cell/src/services/filters.rs
use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use tracing::debug;

use doctor_cell::models::{ProviderId, SlotOffer};

use crate::models::Appointment;

/// Same-day cutoff: nothing earlier than `now + buffer` is offered.
#[derive(Debug, Clone, Copy)]
pub struct LeadTimeFilter {
    buffer: Duration,
}

impl LeadTimeFilter {
    pub fn new(buffer_minutes: i64) -> Self {
        Self {
            buffer: Duration::minutes(buffer_minutes.max(0)),
        }
    }

    pub fn cutoff(&self, now: NaiveDateTime) -> NaiveDateTime {
        now + self.buffer
    }

    /// Dates after the cutoff's date pass untouched. Past dates end up empty
    /// since every slot falls before the cutoff.
    pub fn apply(&self, mut offers: Vec<SlotOffer>, date: NaiveDate, now: NaiveDateTime) -> Vec<SlotOffer> {
        let cutoff = self.cutoff(now);
        if date > cutoff.date() {
            return offers;
        }

        let before = offers.len();
        offers.retain(|offer| {
            let floor = cutoff.max(date.and_time(offer.window_start));
            date.and_time(offer.time_of_day) >= floor
        });

        debug!("Lead time removed {} offers before {}", before - offers.len(), cutoff);
        offers
    }

    pub fn is_bookable(&self, date: NaiveDate, time_of_day: NaiveTime, now: NaiveDateTime) -> bool {
        date.and_time(time_of_day) >= self.cutoff(now)
    }
}

/// Drops offers whose provider already holds a pending appointment at that
/// exact clinic-local instant, in any modality. Tenant policy plays no part
/// here.
pub struct OccupancyFilter;

impl OccupancyFilter {
    pub fn apply(
        mut offers: Vec<SlotOffer>,
        date: NaiveDate,
        appointments: &[Appointment],
        timezone: &Tz,
    ) -> Vec<SlotOffer> {
        let taken: HashSet<(ProviderId, NaiveDateTime)> = appointments
            .iter()
            .filter(|a| a.is_pending())
            .map(|a| (a.provider_id, a.local_datetime(timezone)))
            .filter(|(_, at)| at.date() == date)
            .collect();

        if taken.is_empty() {
            return offers;
        }

        offers.retain(|offer| !taken.contains(&(offer.provider_id, date.and_time(offer.time_of_day))));
        offers
    }
}
