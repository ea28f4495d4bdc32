use chrono::{NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use doctor_cell::models::{AvailabilityWindow, Modality, Provider};
use doctor_cell::services::{day_of_week, AvailabilityIndex, SlotGenerator};

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

// 2026-10-26 is a Monday.
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 26).unwrap()
}

fn provider(n: u128, minutes: u32) -> Provider {
    Provider {
        id: Uuid::from_u128(n),
        display_name: format!("Provider {}", n),
        active: true,
        consultation_minutes: minutes,
        created_at: Utc::now(),
    }
}

fn window(
    provider: &Provider,
    day: u8,
    modality: Modality,
    start: NaiveTime,
    end: NaiveTime,
) -> AvailabilityWindow {
    AvailabilityWindow {
        id: Uuid::new_v4(),
        provider_id: provider.id,
        day_of_week: day,
        modality,
        start_time: start,
        end_time: end,
        consultation_minutes: None,
        active: true,
    }
}

fn index_with(providers: Vec<Provider>, windows: Vec<AvailabilityWindow>) -> AvailabilityIndex {
    let mut index = AvailabilityIndex::new();
    for p in providers {
        index.upsert_provider(p);
    }
    for w in windows {
        index.add_window(w).unwrap();
    }
    index
}

#[test]
fn test_morning_window_yields_sixteen_quarter_hour_slots() {
    let a = provider(1, 15);
    let w = window(&a, 1, Modality::InPerson, time(8, 0), time(12, 0));
    let index = index_with(vec![a.clone()], vec![w]);

    let offers = SlotGenerator::new(&index).generate(monday(), Modality::InPerson);

    assert_eq!(offers.len(), 16);
    assert_eq!(offers.first().unwrap().time_of_day, time(8, 0));
    assert_eq!(offers.last().unwrap().time_of_day, time(11, 45));
    assert!(offers.iter().all(|o| o.provider_id == a.id));
}

#[test]
fn test_other_day_and_modality_yield_nothing() {
    let a = provider(1, 15);
    let w = window(&a, 1, Modality::InPerson, time(8, 0), time(12, 0));
    let index = index_with(vec![a], vec![w]);
    let generator = SlotGenerator::new(&index);

    assert!(generator.generate(monday(), Modality::Remote).is_empty());
    assert!(generator
        .generate(monday().succ_opt().unwrap(), Modality::InPerson)
        .is_empty());
}

#[test]
fn test_offers_sorted_by_time_then_provider() {
    let b = provider(2, 30);
    let a = provider(1, 20);
    let windows = vec![
        window(&b, 1, Modality::Remote, time(9, 0), time(10, 0)),
        window(&a, 1, Modality::Remote, time(9, 0), time(10, 0)),
    ];
    let index = index_with(vec![b.clone(), a.clone()], windows);

    let offers = SlotGenerator::new(&index).generate(monday(), Modality::Remote);
    let pairs: Vec<_> = offers.iter().map(|o| (o.time_of_day, o.provider_id)).collect();

    assert_eq!(
        pairs,
        vec![
            (time(9, 0), a.id),
            (time(9, 0), b.id),
            (time(9, 20), a.id),
            (time(9, 30), b.id),
            (time(9, 40), a.id),
        ]
    );
}

#[test]
fn test_overlapping_windows_walk_independently() {
    let a = provider(1, 30);
    let windows = vec![
        window(&a, 1, Modality::InPerson, time(8, 0), time(10, 0)),
        window(&a, 1, Modality::InPerson, time(9, 0), time(11, 0)),
    ];
    let index = index_with(vec![a], windows);

    let offers = SlotGenerator::new(&index).generate(monday(), Modality::InPerson);
    let nine_o_clock = offers.iter().filter(|o| o.time_of_day == time(9, 0)).count();

    assert_eq!(offers.len(), 8);
    assert_eq!(nine_o_clock, 2);
}

#[test]
fn test_inactive_provider_and_window_are_skipped() {
    let a = provider(1, 30);
    let mut b = provider(2, 30);
    b.active = false;
    let mut closed = window(&a, 1, Modality::InPerson, time(14, 0), time(16, 0));
    closed.active = false;
    let windows = vec![
        window(&a, 1, Modality::InPerson, time(8, 0), time(9, 0)),
        closed,
        window(&b, 1, Modality::InPerson, time(8, 0), time(9, 0)),
    ];
    let index = index_with(vec![a.clone(), b], windows);

    let offers = SlotGenerator::new(&index).generate(monday(), Modality::InPerson);

    assert_eq!(offers.len(), 2);
    assert!(offers.iter().all(|o| o.provider_id == a.id));
}

#[test]
fn test_every_offer_lies_inside_a_matching_window() {
    let a = provider(1, 15);
    let b = provider(2, 40);
    let windows = vec![
        window(&a, 1, Modality::InPerson, time(8, 0), time(12, 0)),
        window(&a, 1, Modality::InPerson, time(14, 10), time(17, 0)),
        window(&b, 1, Modality::InPerson, time(7, 30), time(13, 0)),
        window(&b, 2, Modality::InPerson, time(7, 30), time(13, 0)),
    ];
    let index = index_with(vec![a, b], windows);

    let offers = SlotGenerator::new(&index).generate(monday(), Modality::InPerson);
    assert!(!offers.is_empty());

    for offer in &offers {
        let provider = index.provider(offer.provider_id).unwrap();
        let inside = index
            .active_windows(offer.provider_id, day_of_week(monday()), Modality::InPerson)
            .any(|w| {
                let end = offer.time_of_day + chrono::Duration::minutes(w.slot_minutes(provider) as i64);
                w.start_time <= offer.time_of_day && end <= w.end_time
            });
        assert!(inside, "offer {:?} outside every window", offer);
    }
}

#[test]
fn test_covering_providers_respect_each_grid() {
    let a = provider(1, 15);
    let b = provider(2, 40);
    let windows = vec![
        window(&a, 1, Modality::InPerson, time(8, 0), time(12, 0)),
        window(&b, 1, Modality::InPerson, time(8, 0), time(10, 30)),
    ];
    let index = index_with(vec![a.clone(), b.clone()], windows);
    let generator = SlotGenerator::new(&index);
    let covering = |at| -> Vec<_> {
        generator
            .covering_providers(monday(), at, Modality::InPerson)
            .iter()
            .map(|p| p.id)
            .collect()
    };

    // B's slots are 08:00, 08:40, 09:20; 10:00 would overrun its window.
    assert_eq!(covering(time(9, 0)), vec![a.id]);
    assert_eq!(covering(time(8, 40)), vec![b.id]);
    assert_eq!(covering(time(8, 0)), vec![a.id, b.id]);
    assert!(covering(time(10, 0)).contains(&a.id));
    assert!(!covering(time(10, 0)).contains(&b.id));
    assert!(covering(time(9, 7)).is_empty());
}

#[test]
fn test_covering_matches_generated_slots() {
    let a = provider(1, 25);
    let windows = vec![window(&a, 1, Modality::InPerson, time(8, 0), time(11, 0))];
    let index = index_with(vec![a.clone()], windows);
    let generator = SlotGenerator::new(&index);

    let offered: Vec<_> = generator
        .generate(monday(), Modality::InPerson)
        .into_iter()
        .map(|o| o.time_of_day)
        .collect();

    for minute in (0..180).step_by(5) {
        let at = time(8, 0) + chrono::Duration::minutes(minute);
        let covered = !generator.covering_providers(monday(), at, Modality::InPerson).is_empty();
        assert_eq!(covered, offered.contains(&at), "mismatch at {}", at);
    }
}
