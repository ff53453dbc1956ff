//! The `CalendarEvent` record shared by every producer and consumer of the engine.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::rule::RecurrenceRule;

/// Relative importance of an event, as set by the owning member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// A calendar entry, either a one-off event, the base of a recurring series,
/// or a materialized occurrence of one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    /// Must be after `start`; callers reject malformed events before they reach the engine.
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub priority: Priority,
    /// The household member that owns the event.
    #[serde(default)]
    pub member_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_all_day: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
    /// Set on occurrences: the id of the series they were expanded from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_event_id: Option<String>,
}

/// One concrete dated instance of a recurring series.
///
/// Occurrences are never persisted; their identity is `(series id, start)`.
pub type Occurrence = CalendarEvent;

impl CalendarEvent {
    /// Create a timed, non-recurring event with default category, priority and owner.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start,
            end,
            category: String::new(),
            priority: Priority::default(),
            member_id: String::new(),
            is_all_day: None,
            recurrence: None,
            recurring_event_id: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn is_all_day(&self) -> bool {
        self.is_all_day.unwrap_or(false)
    }

    /// True for values produced by expansion rather than created by a user.
    pub fn is_occurrence(&self) -> bool {
        self.recurring_event_id.is_some()
    }

    /// Half-open overlap test: events that merely touch do not overlap.
    pub fn overlaps(&self, other: &CalendarEvent) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Materialize an occurrence of this series starting at `start`.
    ///
    /// The duration is carried over as a fixed elapsed offset.
    pub(crate) fn occurrence_at(&self, start: DateTime<Utc>) -> Occurrence {
        Occurrence {
            id: format!("{}_{}", self.id, start.to_rfc3339()),
            title: self.title.clone(),
            start,
            end: start + self.duration(),
            category: self.category.clone(),
            priority: self.priority,
            member_id: self.member_id.clone(),
            is_all_day: self.is_all_day,
            recurrence: None,
            recurring_event_id: Some(self.id.clone()),
        }
    }
}
