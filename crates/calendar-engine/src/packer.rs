//! Column packing: horizontal position and width for every event in a cluster.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::overlap::{Cluster, Span};

/// Horizontal placement of one event within its day, in percent of the day's width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLayout {
    pub column: usize,
    /// Total columns in the event's cluster; the same for every member.
    pub column_count: usize,
    pub width: f64,
    pub left: f64,
}

impl EventLayout {
    /// Layout of an event that shares its time with nothing.
    pub const FULL: EventLayout = EventLayout {
        column: 0,
        column_count: 1,
        width: 100.0,
        left: 0.0,
    };

    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Greedy column assignment shared by timed and all-day packing.
#[derive(Debug, Clone, Default)]
pub(crate) struct Columns {
    /// Span indexes per column.
    pub lanes: Vec<Vec<usize>>,
    /// Column of each span, parallel to the input slice.
    pub column_of: Vec<usize>,
}

/// Place each span, in slice order, into the leftmost column where it
/// overlaps nothing; open a new column when none fits.
pub(crate) fn assign_columns(spans: &[Span]) -> Columns {
    let mut columns = Columns {
        lanes: Vec::new(),
        column_of: Vec::with_capacity(spans.len()),
    };
    for (index, span) in spans.iter().enumerate() {
        let free = columns
            .lanes
            .iter()
            .position(|lane| lane.iter().all(|&other| !spans[other].overlaps(span)));
        let column = match free {
            Some(column) => column,
            None => {
                columns.lanes.push(Vec::new());
                columns.lanes.len() - 1
            }
        };
        columns.lanes[column].push(index);
        columns.column_of.push(column);
    }
    columns
}

/// Number of adjacent columns, starting at the span's own, it can widen across.
fn column_span(spans: &[Span], columns: &Columns, index: usize) -> usize {
    let own = columns.column_of[index];
    let span = &spans[index];
    let mut width = 1;
    while let Some(lane) = columns.lanes.get(own + width) {
        if lane.iter().any(|&other| spans[other].overlaps(span)) {
            break;
        }
        width += 1;
    }
    width
}

/// Compute layouts for one cluster, keyed by event id.
///
/// Spans must be in canonical order, as produced by
/// [`group_spans`](crate::overlap::group_spans). Any two members with
/// overlapping ranges get disjoint `[left, left + width)` ranges.
pub fn pack(cluster: &Cluster) -> BTreeMap<String, EventLayout> {
    let spans = &cluster.spans;
    if let [only] = spans.as_slice() {
        return BTreeMap::from([(only.id.clone(), EventLayout::FULL)]);
    }

    let columns = assign_columns(spans);
    let column_count = columns.lanes.len();
    let unit = 100.0 / column_count as f64;

    spans
        .iter()
        .enumerate()
        .map(|(index, span)| {
            let column = columns.column_of[index];
            let left = unit * column as f64;
            let width = (unit * column_span(spans, &columns, index) as f64).min(100.0 - left);
            (
                span.id.clone(),
                EventLayout {
                    column,
                    column_count,
                    width,
                    left,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlap::group_spans;

    #[test]
    fn empty_cluster_packs_to_nothing() {
        assert!(pack(&Cluster::default()).is_empty());
    }

    #[test]
    fn three_way_overlap_splits_in_thirds() {
        let clusters = group_spans(vec![
            Span::new("a", 0, 60),
            Span::new("b", 0, 50),
            Span::new("c", 0, 40),
        ]);
        let layouts = pack(&clusters[0]);
        assert_eq!(layouts["a"].column, 0);
        assert_eq!(layouts["b"].column, 1);
        assert_eq!(layouts["c"].column, 2);
        for layout in layouts.values() {
            assert_eq!(layout.column_count, 3);
            assert!(layout.right() <= 100.0);
        }
    }

    #[test]
    fn short_event_widens_into_free_columns() {
        // a and b overlap; c overlaps a only, so it can extend over b's column.
        let clusters = group_spans(vec![
            Span::new("a", 0, 100),
            Span::new("b", 0, 40),
            Span::new("c", 50, 90),
        ]);
        let layouts = pack(&clusters[0]);
        assert_eq!(layouts["c"].column, 1);
        assert_eq!(layouts["b"].column, 1);
        assert_eq!(layouts["a"].width, 50.0);
        assert_eq!(layouts["c"].width, 50.0);

        let clusters = group_spans(vec![
            Span::new("a", 0, 100),
            Span::new("b", 0, 40),
            Span::new("c", 0, 30),
            Span::new("d", 50, 90),
        ]);
        let layouts = pack(&clusters[0]);
        // d sits in column 1 and nothing in column 2 overlaps it.
        assert_eq!(layouts["d"].column, 1);
        assert_eq!(layouts["d"].column_count, 3);
        assert!((layouts["d"].width - 200.0 / 3.0).abs() < 1e-9);
    }
}
