//! Property-based tests for day layout using proptest.
//!
//! Random days of timed events must always lay out without two overlapping
//! events sharing horizontal space.

use calendar_engine::{group, layout_day, CalendarEvent};
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

const EPSILON: f64 = 1e-9;

/// Generate up to 12 events on one day, starting on 5-minute marks.
fn arb_day() -> impl Strategy<Value = Vec<CalendarEvent>> {
    prop::collection::vec((0i64..288, 1i64..=48), 0..=12).prop_map(|slots| {
        let midnight = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        slots
            .into_iter()
            .enumerate()
            .map(|(i, (slot, length))| {
                let start = midnight + Duration::minutes(slot * 5);
                CalendarEvent::new(
                    format!("e{:02}", i),
                    format!("Event {}", i),
                    start,
                    start + Duration::minutes(length * 5),
                )
            })
            .collect()
    })
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: Overlapping events never share horizontal space
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn overlapping_events_never_collide(events in arb_day()) {
        let layouts = layout_day(&events);
        prop_assert_eq!(layouts.len(), events.len());

        for a in &events {
            for b in &events {
                if a.id == b.id || !a.overlaps(b) {
                    continue;
                }
                let la = &layouts[&a.id];
                let lb = &layouts[&b.id];
                let disjoint = la.right() <= lb.left + EPSILON || lb.right() <= la.left + EPSILON;
                prop_assert!(disjoint, "{} {:?} collides with {} {:?}", a.id, la, b.id, lb);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: Every box stays inside the day column
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn boxes_fit_the_day(events in arb_day()) {
        for layout in layout_day(&events).values() {
            prop_assert!(layout.left >= 0.0);
            prop_assert!(layout.width > 0.0);
            prop_assert!(layout.right() <= 100.0 + EPSILON);
            prop_assert!(layout.column < layout.column_count);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: Column count is constant within a cluster
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn column_count_is_cluster_wide(events in arb_day()) {
        let layouts = layout_day(&events);
        for cluster in group(&events) {
            let counts: Vec<usize> = cluster.ids().map(|id| layouts[id].column_count).collect();
            prop_assert!(counts.windows(2).all(|w| w[0] == w[1]), "{:?}", counts);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: Layout does not depend on input order
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn layout_is_order_independent(events in arb_day()) {
        let mut reversed = events.clone();
        reversed.reverse();
        prop_assert_eq!(layout_day(&events), layout_day(&reversed));
    }
}
