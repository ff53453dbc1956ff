//! Error types for calendar-engine operations.

use thiserror::Error;

/// A recurrence rule that cannot be expanded as written.
///
/// Raised before any iteration starts. Rules are never coerced to a
/// "closest valid" rule; the caller must reject the triggering action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("interval must be at least 1, got {0}")]
    InvalidInterval(u32),

    #[error("weekly rule has an empty days-of-week list")]
    EmptyDaysOfWeek,

    #[error("day of week must be in 0..=6, got {0}")]
    DayOfWeekOutOfRange(u8),

    #[error("day of month must be in 1..=31, got {0}")]
    DayOfMonthOutOfRange(u8),

    #[error("end date and count are mutually exclusive")]
    ConflictingEndConditions,
}

/// Errors that can occur across the engine.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Invalid recurrence rule: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid recurrence description: {0}")]
    InvalidDescription(String),

    #[error("Unsupported RRULE: {0}")]
    UnsupportedRule(String),
}

pub type Result<T> = std::result::Result<T, CalendarError>;
