//! # calendar-engine
//!
//! Deterministic recurrence expansion and overlap layout for calendar views.
//!
//! The engine answers the two questions a calendar renderer cannot get wrong:
//! which dated occurrences of a recurring event fall inside the visible window,
//! and where each event of a day goes horizontally so that overlapping events
//! never cover each other. Everything is a pure function of its inputs; there
//! is no clock, locale or cache inside the engine.
//!
//! ## Modules
//!
//! - [`event`] — `CalendarEvent`, the record every producer hands over
//! - [`rule`] — `RecurrenceRule`, validation, RRULE text conversion
//! - [`expander`] — base event + rule → occurrences in a window
//! - [`describe`] — rule ↔ human-readable description
//! - [`overlap`] — overlap clusters of a day's events
//! - [`packer`] — column, width and offset per event in a cluster
//! - [`all_day`] — row stacking for all-day events
//! - [`layout`] — `layout_day`, grouping and packing in one call
//! - [`error`] — Error types

pub mod all_day;
pub mod describe;
pub mod error;
pub mod event;
pub mod expander;
pub mod layout;
pub mod overlap;
pub mod packer;
pub mod rule;

pub use all_day::{pack_all_day, AllDayLayout, AllDayPlacement};
pub use describe::{describe_recurrence, parse_recurrence_description};
pub use error::{CalendarError, ValidationError};
pub use event::{CalendarEvent, Occurrence, Priority};
pub use expander::{
    expand, expand_event, expand_events, expand_recurrence, ExpansionOptions,
    DEFAULT_MAX_OCCURRENCES, DEFAULT_OPEN_ENDED_HORIZON_DAYS,
};
pub use layout::{events_on_day, layout_day};
pub use overlap::{group, group_spans, Cluster, Span};
pub use packer::{pack, EventLayout};
pub use rule::{validate, Frequency, RecurrenceRule};
