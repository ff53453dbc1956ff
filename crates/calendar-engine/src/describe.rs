//! Human-readable recurrence descriptions and their inverse.
//!
//! ```text
//! Daily
//! Every 3 days, 10 times
//! Weekly on Monday, Wednesday
//! Every 2 months on day 31, until 2026-12-31
//! Yearly, until 2030-06-01T09:30:00+00:00
//! ```
//!
//! Parsing a description yields a rule that expands identically to the one
//! it was rendered from; the text itself is not guaranteed to round-trip.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};

use crate::error::{CalendarError, Result};
use crate::rule::{weekday_index, Frequency, RecurrenceRule};

fn unit(frequency: Frequency) -> &'static str {
    match frequency {
        Frequency::Daily => "day",
        Frequency::Weekly => "week",
        Frequency::Monthly => "month",
        Frequency::Yearly => "year",
    }
}

fn adverb(frequency: Frequency) -> &'static str {
    match frequency {
        Frequency::Daily => "Daily",
        Frequency::Weekly => "Weekly",
        Frequency::Monthly => "Monthly",
        Frequency::Yearly => "Yearly",
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Render a rule as an English sentence fragment.
pub fn describe_recurrence(rule: &RecurrenceRule) -> String {
    let mut text = if rule.interval == 1 {
        adverb(rule.frequency).to_string()
    } else {
        format!("Every {} {}s", rule.interval, unit(rule.frequency))
    };

    match rule.frequency {
        Frequency::Weekly => {
            if let Some(days) = rule.weekdays().filter(|days| !days.is_empty()) {
                let names: Vec<&str> = days.into_iter().map(weekday_name).collect();
                text.push_str(" on ");
                text.push_str(&names.join(", "));
            }
        }
        Frequency::Monthly => {
            if let Some(day) = rule.day_of_month {
                text.push_str(&format!(" on day {}", day));
            }
        }
        Frequency::Daily | Frequency::Yearly => {}
    }

    if let Some(count) = rule.count {
        let noun = if count == 1 { "time" } else { "times" };
        text.push_str(&format!(", {} {}", count, noun));
    } else if let Some(end) = rule.end_date {
        if end.time() == NaiveTime::MIN {
            text.push_str(&format!(", until {}", end.format("%Y-%m-%d")));
        } else {
            text.push_str(&format!(", until {}", end.format(UNTIL_FORMAT)));
        }
    }

    text
}

/// RFC 3339 for four-digit years; `%Y` signs years past 9999 and parses them back.
const UNTIL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";

fn invalid(text: &str, reason: &str) -> CalendarError {
    CalendarError::InvalidDescription(format!("{} in {:?}", reason, text))
}

fn parse_until(text: &str, value: &str) -> Result<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_str(value, UNTIL_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| invalid(text, "unreadable end date"))
}

fn parse_frequency(text: &str, phrase: &str) -> Result<(Frequency, u32)> {
    for frequency in [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Yearly,
    ] {
        if phrase.eq_ignore_ascii_case(adverb(frequency)) {
            return Ok((frequency, 1));
        }
    }

    let mut words = phrase.split_whitespace();
    let (Some(every), Some(n), Some(unit_word), None) =
        (words.next(), words.next(), words.next(), words.next())
    else {
        return Err(invalid(text, "unrecognized frequency"));
    };
    if !every.eq_ignore_ascii_case("every") {
        return Err(invalid(text, "unrecognized frequency"));
    }
    let interval: u32 = n.parse().map_err(|_| invalid(text, "bad interval"))?;
    let singular = unit_word.strip_suffix('s').unwrap_or(unit_word);
    let frequency = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Yearly,
    ]
    .into_iter()
    .find(|f| singular.eq_ignore_ascii_case(unit(*f)))
    .ok_or_else(|| invalid(text, "unknown unit"))?;
    Ok((frequency, interval))
}

/// Re-derive a rule from [`describe_recurrence`] output.
///
/// # Errors
/// Returns `CalendarError::InvalidDescription` for text that does not follow
/// the description grammar, and `CalendarError::Validation` when the parsed
/// rule is itself invalid (e.g. `Every 0 days`).
pub fn parse_recurrence_description(text: &str) -> Result<RecurrenceRule> {
    let mut rest = text.trim();
    let mut count = None;
    let mut end_date = None;

    if let Some((head, until)) = rest.rsplit_once(", until ") {
        end_date = Some(parse_until(text, until.trim())?);
        rest = head;
    } else if let Some((head, tail)) = rest.rsplit_once(", ") {
        let mut words = tail.split_whitespace();
        if let (Some(n), Some("time" | "times"), None) = (words.next(), words.next(), words.next())
        {
            count = Some(n.parse().map_err(|_| invalid(text, "bad count"))?);
            rest = head;
        }
    }

    let (phrase, qualifier) = match rest.split_once(" on ") {
        Some((phrase, qualifier)) => (phrase, Some(qualifier.trim())),
        None => (rest, None),
    };
    let (frequency, interval) = parse_frequency(text, phrase.trim())?;

    let mut rule = RecurrenceRule::new(frequency).every(interval);
    rule.count = count;
    rule.end_date = end_date;

    match (frequency, qualifier) {
        (_, None) => {}
        (Frequency::Weekly, Some(days)) => {
            let parsed: Vec<u8> = days
                .split(',')
                .map(|name| {
                    name.trim()
                        .parse::<Weekday>()
                        .map(weekday_index)
                        .map_err(|_| invalid(text, "unknown weekday"))
                })
                .collect::<Result<_>>()?;
            rule.days_of_week = Some(parsed);
        }
        (Frequency::Monthly, Some(day)) => {
            let number = day
                .strip_prefix("day ")
                .ok_or_else(|| invalid(text, "expected `day N`"))?;
            rule.day_of_month = Some(
                number
                    .trim()
                    .parse()
                    .map_err(|_| invalid(text, "bad day of month"))?,
            );
        }
        (_, Some(_)) => return Err(invalid(text, "qualifier not allowed for this frequency")),
    }

    rule.validate()?;
    Ok(rule)
}
