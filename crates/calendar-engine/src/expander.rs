//! Recurrence expansion -- turns a base event plus a rule into dated occurrences.
//!
//! Candidates are walked one calendar day at a time from the base start and
//! tested against the rule's frequency predicate. Every predicate depends only
//! on the offset from the base date, so the walk is deterministic and a window
//! can be split anywhere without losing or duplicating occurrences.
//!
//! Occurrence times are plain UTC arithmetic: each occurrence starts at the
//! base time of day on its date and keeps the base's elapsed duration.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::event::{CalendarEvent, Occurrence};
use crate::rule::{Frequency, RecurrenceRule};

/// Default ceiling on occurrences returned by a single expansion.
pub const DEFAULT_MAX_OCCURRENCES: usize = 1000;

/// Default horizon for rules with neither an end date nor a count (two years).
pub const DEFAULT_OPEN_ENDED_HORIZON_DAYS: u32 = 730;

/// Caller-tunable bounds on expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExpansionOptions {
    /// Hard ceiling on emitted occurrences. Reaching it truncates the result
    /// and logs a warning; it is not an error.
    pub max_occurrences: usize,
    /// How far past the base start an open-ended rule is expanded.
    pub open_ended_horizon_days: u32,
}

impl Default for ExpansionOptions {
    fn default() -> Self {
        Self {
            max_occurrences: DEFAULT_MAX_OCCURRENCES,
            open_ended_horizon_days: DEFAULT_OPEN_ENDED_HORIZON_DAYS,
        }
    }
}

/// Where a series stops, independent of the view window.
#[derive(Debug, Clone, Copy)]
enum Termination {
    /// Explicit end date: an occurrence may start exactly on it.
    Inclusive(DateTime<Utc>),
    /// Derived from a count or the open-ended horizon.
    Exclusive(DateTime<Utc>),
}

impl Termination {
    fn for_rule(base_start: DateTime<Utc>, rule: &RecurrenceRule, options: &ExpansionOptions) -> Self {
        if let Some(end) = rule.end_date {
            return Termination::Inclusive(end);
        }
        let bound = match rule.count {
            Some(count) => advance(base_start, rule.frequency, count.saturating_mul(rule.interval)),
            None => Duration::try_days(i64::from(options.open_ended_horizon_days))
                .and_then(|horizon| base_start.checked_add_signed(horizon)),
        };
        Termination::Exclusive(bound.unwrap_or(DateTime::<Utc>::MAX_UTC))
    }

    fn admits(self, start: DateTime<Utc>) -> bool {
        match self {
            Termination::Inclusive(end) => start <= end,
            Termination::Exclusive(end) => start < end,
        }
    }
}

/// Move `periods` frequency units past `start`. `None` on overflow.
fn advance(start: DateTime<Utc>, frequency: Frequency, periods: u32) -> Option<DateTime<Utc>> {
    match frequency {
        Frequency::Daily => start.checked_add_signed(Duration::try_days(i64::from(periods))?),
        Frequency::Weekly => start.checked_add_signed(Duration::try_weeks(i64::from(periods))?),
        Frequency::Monthly => start.checked_add_months(Months::new(periods)),
        Frequency::Yearly => start.checked_add_months(Months::new(periods.checked_mul(12)?)),
    }
}

fn month_offset(base: NaiveDate, date: NaiveDate) -> i64 {
    i64::from(date.year() - base.year()) * 12 + i64::from(date.month()) - i64::from(base.month())
}

/// Does `date` carry an occurrence of the series based on `base`?
fn matches(rule: &RecurrenceRule, weekdays: Option<&[Weekday]>, base: NaiveDate, date: NaiveDate) -> bool {
    let interval = i64::from(rule.interval);
    let days = (date - base).num_days();
    match rule.frequency {
        Frequency::Daily => days % interval == 0,
        Frequency::Weekly => {
            let on_day = match weekdays {
                Some(set) => set.contains(&date.weekday()),
                None => date.weekday() == base.weekday(),
            };
            on_day && days.div_euclid(7) % interval == 0
        }
        Frequency::Monthly => {
            // Months without the target day are skipped, never clamped.
            let target = rule.day_of_month.map_or(base.day(), u32::from);
            date.day() == target && month_offset(base, date) % interval == 0
        }
        Frequency::Yearly => {
            date.month() == base.month()
                && date.day() == base.day()
                && i64::from(date.year() - base.year()) % interval == 0
        }
    }
}

/// Expand a recurring base event into the occurrences that start inside a window.
///
/// # Arguments
/// - `base` -- The series' base event; its start anchors the pattern and its
///   duration is copied onto every occurrence
/// - `rule` -- The repetition rule
/// - `window_start` -- Inclusive lower bound on occurrence starts
/// - `window_end` -- Exclusive upper bound on occurrence starts
/// - `options` -- Occurrence ceiling and open-ended horizon
///
/// Occurrences are returned in start order. `count` is counted from the series
/// start, so occurrences before the window use up the count too.
///
/// # Errors
/// Returns `CalendarError::Validation` if the rule fails [`RecurrenceRule::validate`].
pub fn expand(
    base: &CalendarEvent,
    rule: &RecurrenceRule,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    options: &ExpansionOptions,
) -> Result<Vec<Occurrence>> {
    if let Err(err) = rule.validate() {
        debug!(series = %base.id, %err, "rejecting recurrence rule");
        return Err(err.into());
    }

    // Short-circuit: nothing can be produced.
    if rule.count == Some(0) || window_start >= window_end {
        return Ok(Vec::new());
    }

    let termination = Termination::for_rule(base.start, rule, options);
    let base_date = base.start.date_naive();
    let weekdays = match rule.frequency {
        Frequency::Weekly => rule.weekdays(),
        _ => None,
    };

    // Without a count nothing before the window affects the result, so the
    // walk can start at the window's first day.
    let mut date = if rule.count.is_none() && window_start > base.start {
        window_start.date_naive()
    } else {
        base_date
    };

    debug!(series = %base.id, rule = %rule.to_rrule(), from = %date, "expanding series");

    let mut matched: u32 = 0;
    let mut occurrences = Vec::new();

    loop {
        let Some(start) = Duration::try_days((date - base_date).num_days())
            .and_then(|offset| base.start.checked_add_signed(offset))
        else {
            break;
        };
        if start >= window_end || !termination.admits(start) {
            break;
        }

        if matches(rule, weekdays.as_deref(), base_date, date) {
            matched += 1;
            if start >= window_start {
                if occurrences.len() >= options.max_occurrences {
                    warn!(
                        series = %base.id,
                        limit = options.max_occurrences,
                        "occurrence ceiling reached, truncating expansion"
                    );
                    break;
                }
                occurrences.push(base.occurrence_at(start));
            }
            if rule.count.is_some_and(|count| matched >= count) {
                break;
            }
        }

        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    Ok(occurrences)
}

/// Expand with [`ExpansionOptions::default`].
///
/// # Errors
/// See [`expand`].
pub fn expand_recurrence(
    base: &CalendarEvent,
    rule: &RecurrenceRule,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Result<Vec<Occurrence>> {
    expand(base, rule, window_start, window_end, &ExpansionOptions::default())
}

/// Expand a single stored event using its own `recurrence`.
///
/// A non-recurring event yields itself when it starts inside the window.
///
/// # Errors
/// See [`expand`].
pub fn expand_event(
    event: &CalendarEvent,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    options: &ExpansionOptions,
) -> Result<Vec<Occurrence>> {
    match &event.recurrence {
        Some(rule) => expand(event, rule, window_start, window_end, options),
        None if event.start >= window_start && event.start < window_end => Ok(vec![event.clone()]),
        None => Ok(Vec::new()),
    }
}

/// Flatten a list of stored events into everything that starts inside the window,
/// sorted by start then id.
///
/// # Errors
/// Fails on the first event whose rule does not validate.
pub fn expand_events(
    events: &[CalendarEvent],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    options: &ExpansionOptions,
) -> Result<Vec<Occurrence>> {
    let mut all = Vec::new();
    for event in events {
        all.extend(expand_event(event, window_start, window_end, options)?);
    }
    all.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
    Ok(all)
}
