// libs/appointment-cell/src/services/offers.rs
use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

use doctor_cell::models::Modality;
use doctor_cell::services::{AvailabilityIndex, SlotGenerator};

use crate::models::{Appointment, OfferGroup};
use crate::services::dedup::Deduplicator;
use crate::services::filters::{LeadTimeFilter, OccupancyFilter};

/// The read path: generate, trim by lead time, drop occupied slots, collapse.
/// Deterministic for a given index, clinic-local `now` and appointment set.
pub fn build_offers(
    index: &AvailabilityIndex,
    date: NaiveDate,
    modality: Modality,
    now: NaiveDateTime,
    appointments: &[Appointment],
    lead_time: &LeadTimeFilter,
    timezone: &Tz,
) -> Vec<OfferGroup> {
    let offers = SlotGenerator::new(index).generate(date, modality);
    let offers = lead_time.apply(offers, date, now);
    let offers = OccupancyFilter::apply(offers, date, appointments, timezone);
    Deduplicator::collapse(offers)
}
