// libs/appointment-cell/src/services/assignment.rs
use std::collections::HashMap;

use chrono::NaiveDateTime;
use tracing::debug;

use doctor_cell::models::ProviderId;
use shared_config::TenantPolicy;

use crate::models::AppointmentError;

/// Everything the policy needs to pick a provider for one requested slot.
#[derive(Debug, Clone)]
pub struct AssignmentInput<'a> {
    pub slot: NaiveDateTime,
    /// Providers still free at this slot after occupancy filtering, in id order.
    pub free_providers: &'a [ProviderId],
    /// Providers whose window covers the slot regardless of bookings, in id order.
    pub covering_providers: &'a [ProviderId],
    /// Pending appointments per provider over the whole day.
    pub day_load: &'a HashMap<ProviderId, usize>,
    pub provider_hint: Option<ProviderId>,
}

/// Stateless decision made at booking time.
pub struct AssignmentPolicy;

impl AssignmentPolicy {
    pub fn assign(policy: TenantPolicy, input: &AssignmentInput<'_>) -> Result<ProviderId, AppointmentError> {
        match policy {
            TenantPolicy::Strict => Self::first_free(input),
            TenantPolicy::Pooled => Self::least_loaded(input),
        }
    }

    /// A slot nobody (or not the hinted provider) can serve is terminal; a
    /// servable slot whose providers are all taken is a retryable conflict.
    fn first_free(input: &AssignmentInput<'_>) -> Result<ProviderId, AppointmentError> {
        let servable = match input.provider_hint {
            Some(hint) => input.covering_providers.contains(&hint),
            None => !input.covering_providers.is_empty(),
        };
        if !servable {
            return Err(AppointmentError::NoEligibleProvider { slot: input.slot });
        }

        let chosen = match input.provider_hint {
            Some(hint) => input.free_providers.iter().copied().find(|p| *p == hint),
            None => input.free_providers.first().copied(),
        };

        chosen.ok_or(AppointmentError::SlotConflict { slot: input.slot })
    }

    /// Occupancy is ignored: any covering provider may be overbooked. The one
    /// with the fewest pending appointments that day wins, ties going to the
    /// lowest provider id. A hint is honoured when the hinted provider covers
    /// the slot.
    fn least_loaded(input: &AssignmentInput<'_>) -> Result<ProviderId, AppointmentError> {
        if let Some(hint) = input.provider_hint {
            if input.covering_providers.contains(&hint) {
                return Ok(hint);
            }
            debug!("Provider hint {} does not cover {}, balancing instead", hint, input.slot);
        }

        input
            .covering_providers
            .iter()
            .copied()
            .min_by_key(|p| (input.day_load.get(p).copied().unwrap_or(0), *p))
            .ok_or(AppointmentError::NoEligibleProvider { slot: input.slot })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn slot() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 26)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn input<'a>(
        free: &'a [ProviderId],
        covering: &'a [ProviderId],
        load: &'a HashMap<ProviderId, usize>,
        hint: Option<ProviderId>,
    ) -> AssignmentInput<'a> {
        AssignmentInput {
            slot: slot(),
            free_providers: free,
            covering_providers: covering,
            day_load: load,
            provider_hint: hint,
        }
    }

    #[test]
    fn test_strict_takes_first_free_provider() {
        let (a, b) = (Uuid::from_u128(1), Uuid::from_u128(2));
        let load = HashMap::new();

        let chosen = AssignmentPolicy::assign(TenantPolicy::Strict, &input(&[a, b], &[a, b], &load, None));
        assert_eq!(chosen, Ok(a));
    }

    #[test]
    fn test_strict_rejects_when_nobody_is_free() {
        let a = Uuid::from_u128(1);
        let load = HashMap::new();

        let chosen = AssignmentPolicy::assign(TenantPolicy::Strict, &input(&[], &[a], &load, None));
        assert_eq!(chosen, Err(AppointmentError::SlotConflict { slot: slot() }));
    }

    #[test]
    fn test_strict_hint_must_be_free() {
        let (a, b) = (Uuid::from_u128(1), Uuid::from_u128(2));
        let load = HashMap::new();

        let free_hint = AssignmentPolicy::assign(TenantPolicy::Strict, &input(&[a, b], &[a, b], &load, Some(b)));
        assert_eq!(free_hint, Ok(b));

        let taken_hint = AssignmentPolicy::assign(TenantPolicy::Strict, &input(&[a], &[a, b], &load, Some(b)));
        assert_eq!(taken_hint, Err(AppointmentError::SlotConflict { slot: slot() }));
    }

    #[test]
    fn test_strict_slot_off_every_grid_is_terminal() {
        let (a, b) = (Uuid::from_u128(1), Uuid::from_u128(2));
        let load = HashMap::new();

        let nobody = AssignmentPolicy::assign(TenantPolicy::Strict, &input(&[], &[], &load, None));
        assert_eq!(nobody, Err(AppointmentError::NoEligibleProvider { slot: slot() }));
        assert!(!nobody.unwrap_err().is_retryable());

        let foreign_hint = AssignmentPolicy::assign(TenantPolicy::Strict, &input(&[a], &[a], &load, Some(b)));
        assert_eq!(foreign_hint, Err(AppointmentError::NoEligibleProvider { slot: slot() }));
    }

    #[test]
    fn test_pooled_picks_least_loaded() {
        let (a, b) = (Uuid::from_u128(1), Uuid::from_u128(2));
        let load = HashMap::from([(a, 3), (b, 1)]);

        let chosen = AssignmentPolicy::assign(TenantPolicy::Pooled, &input(&[], &[a, b], &load, None));
        assert_eq!(chosen, Ok(b));
    }

    #[test]
    fn test_pooled_tie_breaks_on_provider_id() {
        let (a, b, c) = (Uuid::from_u128(1), Uuid::from_u128(2), Uuid::from_u128(3));
        let load = HashMap::from([(a, 2), (b, 1), (c, 1)]);

        let chosen = AssignmentPolicy::assign(TenantPolicy::Pooled, &input(&[], &[c, b, a], &load, None));
        assert_eq!(chosen, Ok(b));
    }

    #[test]
    fn test_pooled_without_cover_is_terminal() {
        let load = HashMap::new();

        let chosen = AssignmentPolicy::assign(TenantPolicy::Pooled, &input(&[], &[], &load, None));
        assert_eq!(chosen, Err(AppointmentError::NoEligibleProvider { slot: slot() }));
    }

    #[test]
    fn test_pooled_hint_outside_cover_falls_back() {
        let (a, b) = (Uuid::from_u128(1), Uuid::from_u128(2));
        let load = HashMap::from([(a, 5)]);

        let covered = AssignmentPolicy::assign(TenantPolicy::Pooled, &input(&[], &[a], &load, Some(a)));
        assert_eq!(covered, Ok(a));

        let uncovered = AssignmentPolicy::assign(TenantPolicy::Pooled, &input(&[], &[a], &load, Some(b)));
        assert_eq!(uncovered, Ok(a));
    }
}
