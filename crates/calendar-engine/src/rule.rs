//! Recurrence rules: the shape, its validation, and RRULE text conversion.
//!
//! Rules cover a subset of RFC 5545: one frequency, an interval,
//! an optional weekday set (weekly) or day of month (monthly), and at most one
//! end condition. RRULE text from sync adapters is parsed with the `rrule`
//! crate and mapped onto this subset.

use std::fmt::Write as _;
use std::str::FromStr;

use chrono::{DateTime, Utc, Weekday};
use rrule::{NWeekday, RRule, Unvalidated};
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, ValidationError};

/// How often a series repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    fn rrule_name(self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }
}

/// A repetition rule attached to a base event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    #[serde(default = "default_interval")]
    pub interval: u32,
    /// Weekdays as 0 (Sunday) through 6 (Saturday). Weekly rules only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<u8>>,
    /// 1 through 31. Monthly rules only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u8>,
    /// Inclusive last instant an occurrence may start at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

fn default_interval() -> u32 {
    1
}

impl RecurrenceRule {
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: 1,
            days_of_week: None,
            day_of_month: None,
            end_date: None,
            count: None,
        }
    }

    pub fn daily() -> Self {
        Self::new(Frequency::Daily)
    }

    pub fn weekly() -> Self {
        Self::new(Frequency::Weekly)
    }

    pub fn monthly() -> Self {
        Self::new(Frequency::Monthly)
    }

    pub fn yearly() -> Self {
        Self::new(Frequency::Yearly)
    }

    pub fn every(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    pub fn on_days(mut self, days: &[u8]) -> Self {
        self.days_of_week = Some(days.to_vec());
        self
    }

    pub fn on_day_of_month(mut self, day: u8) -> Self {
        self.day_of_month = Some(day);
        self
    }

    pub fn until(mut self, end: DateTime<Utc>) -> Self {
        self.end_date = Some(end);
        self
    }

    pub fn times(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// Check the rule before any expansion is attempted.
    ///
    /// # Errors
    /// Returns the first [`ValidationError`] found; rules are never repaired.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.interval < 1 {
            return Err(ValidationError::InvalidInterval(self.interval));
        }
        if let Some(days) = &self.days_of_week {
            if self.frequency == Frequency::Weekly && days.is_empty() {
                return Err(ValidationError::EmptyDaysOfWeek);
            }
            if let Some(&bad) = days.iter().find(|&&d| d > 6) {
                return Err(ValidationError::DayOfWeekOutOfRange(bad));
            }
        }
        if let Some(day) = self.day_of_month {
            if !(1..=31).contains(&day) {
                return Err(ValidationError::DayOfMonthOutOfRange(day));
            }
        }
        if self.end_date.is_some() && self.count.is_some() {
            return Err(ValidationError::ConflictingEndConditions);
        }
        Ok(())
    }

    /// The weekday set for weekly rules, sorted and deduplicated.
    pub(crate) fn weekdays(&self) -> Option<Vec<Weekday>> {
        let days = self.days_of_week.as_ref()?;
        let mut indexes: Vec<u8> = days.clone();
        indexes.sort_unstable();
        indexes.dedup();
        Some(indexes.into_iter().filter_map(weekday_from_index).collect())
    }

    /// Render the rule as RFC 5545 RRULE text (without the `RRULE:` prefix).
    pub fn to_rrule(&self) -> String {
        let mut out = format!("FREQ={}", self.frequency.rrule_name());
        if self.interval != 1 {
            let _ = write!(out, ";INTERVAL={}", self.interval);
        }
        if self.frequency == Frequency::Weekly {
            if let Some(days) = self.weekdays() {
                let names: Vec<&str> = days.into_iter().map(weekday_code).collect();
                let _ = write!(out, ";BYDAY={}", names.join(","));
            }
        }
        if self.frequency == Frequency::Monthly {
            if let Some(day) = self.day_of_month {
                let _ = write!(out, ";BYMONTHDAY={}", day);
            }
        }
        if let Some(count) = self.count {
            let _ = write!(out, ";COUNT={}", count);
        }
        if let Some(end) = self.end_date {
            let _ = write!(out, ";UNTIL={}", end.format("%Y%m%dT%H%M%SZ"));
        }
        out
    }
}

/// Validate a rule. Free-function form of [`RecurrenceRule::validate`].
///
/// # Errors
/// See [`RecurrenceRule::validate`].
pub fn validate(rule: &RecurrenceRule) -> Result<(), ValidationError> {
    rule.validate()
}

impl FromStr for RecurrenceRule {
    type Err = CalendarError;

    /// Parse RRULE text such as `FREQ=WEEKLY;BYDAY=MO,WE;COUNT=4`.
    ///
    /// Only the subset the engine can expand is accepted: ordinal weekdays,
    /// negative or multiple month days, and BYMONTH/BYSETPOS are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let text = text.strip_prefix("RRULE:").unwrap_or(text);
        let parsed = text
            .parse::<RRule<Unvalidated>>()
            .map_err(|e| CalendarError::UnsupportedRule(e.to_string()))?;

        let frequency = match parsed.get_freq() {
            rrule::Frequency::Daily => Frequency::Daily,
            rrule::Frequency::Weekly => Frequency::Weekly,
            rrule::Frequency::Monthly => Frequency::Monthly,
            rrule::Frequency::Yearly => Frequency::Yearly,
            other => {
                return Err(CalendarError::UnsupportedRule(format!(
                    "frequency {:?} is finer than a day",
                    other
                )))
            }
        };

        if !parsed.get_by_month().is_empty() || !parsed.get_by_set_pos().is_empty() {
            return Err(CalendarError::UnsupportedRule(
                "BYMONTH and BYSETPOS are not supported".to_string(),
            ));
        }

        let mut rule = RecurrenceRule::new(frequency).every(u32::from(parsed.get_interval()));

        let by_weekday = parsed.get_by_weekday();
        if !by_weekday.is_empty() {
            if frequency != Frequency::Weekly {
                return Err(CalendarError::UnsupportedRule(
                    "BYDAY is only supported on weekly rules".to_string(),
                ));
            }
            let mut days = Vec::with_capacity(by_weekday.len());
            for nday in by_weekday {
                match nday {
                    NWeekday::Every(day) => days.push(weekday_index(*day)),
                    NWeekday::Nth(n, _) => {
                        return Err(CalendarError::UnsupportedRule(format!(
                            "ordinal weekday {} in BYDAY",
                            n
                        )))
                    }
                }
            }
            rule.days_of_week = Some(days);
        }

        let month_days: &[i8] = parsed.get_by_month_day();
        match month_days {
            [] => {}
            [day] if frequency == Frequency::Monthly && (1..=31).contains(day) => {
                rule.day_of_month = Some(*day as u8);
            }
            other => {
                return Err(CalendarError::UnsupportedRule(format!(
                    "BYMONTHDAY {:?}",
                    other
                )))
            }
        }

        rule.count = parsed.get_count();
        rule.end_date = parsed.get_until().map(|until| until.with_timezone(&Utc));

        rule.validate()?;
        Ok(rule)
    }
}

/// 0 = Sunday through 6 = Saturday.
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

pub fn weekday_index(day: Weekday) -> u8 {
    // num_days_from_sunday is always < 7.
    day.num_days_from_sunday() as u8
}

fn weekday_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}
