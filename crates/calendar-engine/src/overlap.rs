//! Partition one day's events into overlap-connected clusters.
//!
//! Grouping works on [`Span`]s, an id plus a half-open integer range, so the
//! same code serves timed events (seconds since the epoch) and all-day events
//! (day indexes).

use std::cmp::Ordering;

use tracing::warn;

use crate::event::CalendarEvent;

/// An id with a half-open `[start, end)` range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub id: String,
    pub start: i64,
    pub end: i64,
}

impl Span {
    /// Build a span. A reversed range is collapsed to zero length at `start`.
    pub fn new(id: impl Into<String>, start: i64, end: i64) -> Self {
        let id = id.into();
        let end = if end < start {
            warn!(%id, start, end, "span ends before it starts, treating as zero-length");
            start
        } else {
            end
        };
        Self { id, start, end }
    }

    /// Timed span of an event, in seconds.
    pub fn from_event(event: &CalendarEvent) -> Self {
        Self::new(
            event.id.clone(),
            event.start.timestamp(),
            event.end.timestamp(),
        )
    }

    pub fn len(&self) -> i64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Half-open overlap: spans that only touch do not overlap.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Canonical layout order: start ascending, longer first, then id.
///
/// Greedy packing depends on this order, so it is pinned rather than left to
/// input order.
pub fn canonical_order(a: &Span, b: &Span) -> Ordering {
    a.start
        .cmp(&b.start)
        .then_with(|| b.len().cmp(&a.len()))
        .then_with(|| a.id.cmp(&b.id))
}

/// A maximal set of spans connected by pairwise overlap, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cluster {
    pub spans: Vec<Span>,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.spans.iter().map(|s| s.id.as_str())
    }

    fn touches(&self, span: &Span) -> bool {
        self.spans.iter().any(|member| member.overlaps(span))
    }
}

/// Group spans into clusters.
///
/// Spans are sorted canonically, then each joins the first cluster holding a
/// member it directly overlaps, or opens a new one. A chain A-B-C where only
/// neighbours overlap ends up in one cluster.
pub fn group_spans(mut spans: Vec<Span>) -> Vec<Cluster> {
    spans.sort_by(canonical_order);

    let mut clusters: Vec<Cluster> = Vec::new();
    for span in spans {
        match clusters.iter_mut().find(|c| c.touches(&span)) {
            Some(cluster) => cluster.spans.push(span),
            None => clusters.push(Cluster { spans: vec![span] }),
        }
    }
    clusters
}

/// Group a day's timed events into overlap clusters.
pub fn group(events: &[CalendarEvent]) -> Vec<Cluster> {
    group_spans(events.iter().map(Span::from_event).collect())
}
