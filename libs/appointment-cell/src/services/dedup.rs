// libs/appointment-cell/src/services/dedup.rs
use std::collections::BTreeMap;

use chrono::NaiveTime;

use doctor_cell::models::{Modality, ProviderId, SlotOffer};

use crate::models::OfferGroup;

pub struct Deduplicator;

impl Deduplicator {
    /// Merges offers sharing `(time_of_day, modality)`. Providers keep
    /// first-seen order, which is id order for generator output, and appear
    /// once per group even when overlapping windows produced the same slot.
    pub fn collapse(offers: Vec<SlotOffer>) -> Vec<OfferGroup> {
        let mut groups: BTreeMap<(NaiveTime, Modality), Vec<ProviderId>> = BTreeMap::new();

        for offer in offers {
            let providers = groups.entry((offer.time_of_day, offer.modality)).or_default();
            if !providers.contains(&offer.provider_id) {
                providers.push(offer.provider_id);
            }
        }

        groups
            .into_iter()
            .map(|((time_of_day, modality), provider_ids)| OfferGroup {
                time_of_day,
                modality,
                provider_ids,
            })
            .collect()
    }
}
