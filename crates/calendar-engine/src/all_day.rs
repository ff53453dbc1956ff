//! Row stacking for all-day events across a visible date span.
//!
//! This is column packing at day granularity: every event becomes a span of
//! day indexes and is placed in the first row where it collides with nothing.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::CalendarEvent;
use crate::overlap::{group_spans, Span};
use crate::packer::assign_columns;

/// Where one all-day event sits in the lane area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllDayPlacement {
    pub id: String,
    pub row: usize,
    /// First covered day, as an index from the first visible day.
    pub start_day: i64,
    /// Exclusive.
    pub end_day: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllDayLayout {
    pub row_count: usize,
    /// Sorted by row, then start day, then id.
    pub placements: Vec<AllDayPlacement>,
}

/// First day after the event. An end exactly at midnight is exclusive; any
/// other end time still covers its own day.
fn end_date_exclusive(end: DateTime<Utc>) -> NaiveDate {
    let date = end.date_naive();
    if end.time() == NaiveTime::MIN {
        date
    } else {
        date.succ_opt().unwrap_or(date)
    }
}

/// Day-index span of an event relative to `first_day`. Always at least one day long.
pub fn day_span(event: &CalendarEvent, first_day: NaiveDate) -> Span {
    let start = (event.start.date_naive() - first_day).num_days();
    let end = (end_date_exclusive(event.end) - first_day).num_days();
    Span::new(event.id.clone(), start, end.max(start + 1))
}

/// Stack the all-day events of `events` into rows for `[first_day, last_day)`.
///
/// Timed events are ignored. Ranges are clipped to the visible span and events
/// entirely outside it are dropped.
pub fn pack_all_day(
    events: &[CalendarEvent],
    first_day: NaiveDate,
    last_day: NaiveDate,
) -> AllDayLayout {
    let visible_days = (last_day - first_day).num_days();
    let spans: Vec<Span> = events
        .iter()
        .filter(|event| event.is_all_day())
        .map(|event| day_span(event, first_day))
        .filter_map(|span| {
            let start = span.start.max(0);
            let end = span.end.min(visible_days);
            (start < end).then(|| Span::new(span.id, start, end))
        })
        .collect();

    let mut layout = AllDayLayout::default();
    for cluster in group_spans(spans) {
        let columns = assign_columns(&cluster.spans);
        layout.row_count = layout.row_count.max(columns.lanes.len());
        layout.placements.extend(cluster.spans.into_iter().zip(columns.column_of).map(
            |(span, row)| AllDayPlacement {
                id: span.id,
                row,
                start_day: span.start,
                end_day: span.end,
            },
        ));
    }

    layout.placements.sort_by(|a, b| {
        a.row
            .cmp(&b.row)
            .then_with(|| a.start_day.cmp(&b.start_day))
            .then_with(|| a.id.cmp(&b.id))
    });
    layout
}
