//! Day layout: grouping plus packing behind one call.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use crate::event::CalendarEvent;
use crate::overlap::{group_spans, Span};
use crate::packer::{pack, EventLayout};

/// Lay out one rendered day's timed events.
///
/// `events` should already be filtered to the day (see [`events_on_day`]).
/// All-day events are skipped; they belong to
/// [`pack_all_day`](crate::all_day::pack_all_day). Ids are assumed unique.
pub fn layout_day(events: &[CalendarEvent]) -> BTreeMap<String, EventLayout> {
    let spans: Vec<Span> = events
        .iter()
        .filter(|event| !event.is_all_day())
        .map(Span::from_event)
        .collect();

    let mut layouts = BTreeMap::new();
    for cluster in group_spans(spans) {
        layouts.extend(pack(&cluster));
    }
    layouts
}

/// Timed events intersecting `[day 00:00, next day 00:00)` UTC.
pub fn events_on_day(events: &[CalendarEvent], day: NaiveDate) -> Vec<CalendarEvent> {
    let day_start = day.and_time(chrono::NaiveTime::MIN).and_utc();
    let Some(day_end) = day_start.checked_add_signed(Duration::days(1)) else {
        return Vec::new();
    };
    events
        .iter()
        .filter(|event| !event.is_all_day())
        .filter(|event| event.start < day_end && day_start < event.end)
        .cloned()
        .collect()
}
