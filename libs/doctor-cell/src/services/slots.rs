use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use tracing::debug;

use crate::models::{AvailabilityWindow, Modality, Provider, SlotOffer};
use crate::services::availability::AvailabilityIndex;

const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// Day index used by availability windows: Sunday = 0 .. Saturday = 6.
pub fn day_of_week(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Enumerates candidate start times from recurring availability.
pub struct SlotGenerator<'a> {
    index: &'a AvailabilityIndex,
}

impl<'a> SlotGenerator<'a> {
    pub fn new(index: &'a AvailabilityIndex) -> Self {
        Self { index }
    }

    /// Every slot start for active providers on `date`, ascending by time of
    /// day and then provider id. Overlapping windows of one provider each
    /// contribute their own slots, so the same (provider, time) may repeat.
    pub fn generate(&self, date: NaiveDate, modality: Modality) -> Vec<SlotOffer> {
        let dow = day_of_week(date);
        let mut offers = Vec::new();

        for provider in self.index.active_providers() {
            for window in self.index.active_windows(provider.id, dow, modality) {
                walk_window(provider, window, &mut offers);
            }
        }

        offers.sort_by(|a, b| {
            a.time_of_day
                .cmp(&b.time_of_day)
                .then_with(|| a.provider_id.cmp(&b.provider_id))
        });

        debug!("Generated {} raw slots for {} ({})", offers.len(), date, modality);
        offers
    }

    /// Active providers for which `time_of_day` is one of their own slot
    /// starts: on the window's grid and with the whole consultation inside
    /// it. Existing bookings are not considered.
    pub fn covering_providers(
        &self,
        date: NaiveDate,
        time_of_day: NaiveTime,
        modality: Modality,
    ) -> Vec<&'a Provider> {
        let dow = day_of_week(date);

        self.index
            .active_providers()
            .filter(|provider| {
                self.index
                    .active_windows(provider.id, dow, modality)
                    .any(|window| starts_slot(provider, window, time_of_day))
            })
            .collect()
    }
}

/// Slot length in seconds, or `None` when it is zero or does not fit a day.
fn step_seconds(provider: &Provider, window: &AvailabilityWindow) -> Option<u32> {
    window
        .slot_minutes(provider)
        .checked_mul(60)
        .filter(|step| *step > 0 && *step <= SECONDS_PER_DAY)
}

fn starts_slot(provider: &Provider, window: &AvailabilityWindow, time_of_day: NaiveTime) -> bool {
    let Some(step) = step_seconds(provider, window) else {
        return false;
    };
    if time_of_day.nanosecond() != 0 {
        return false;
    }

    let start = window.start_time.num_seconds_from_midnight();
    let end = window.end_time.num_seconds_from_midnight();
    let at = time_of_day.num_seconds_from_midnight();

    at >= start && (at - start) % step == 0 && at + step <= end
}

fn walk_window(provider: &Provider, window: &AvailabilityWindow, out: &mut Vec<SlotOffer>) {
    let Some(step) = step_seconds(provider, window) else {
        debug!("Window {} skipped: unusable slot length", window.id);
        return;
    };
    let minutes = step / 60;

    let end = window.end_time.num_seconds_from_midnight();
    let mut current = window.start_time.num_seconds_from_midnight();

    while current + step <= end {
        if let Some(time_of_day) = NaiveTime::from_num_seconds_from_midnight_opt(current, 0) {
            out.push(SlotOffer {
                time_of_day,
                provider_id: provider.id,
                modality: window.modality,
                duration_minutes: minutes,
                window_start: window.start_time,
            });
        }
        current += step;
    }
}
