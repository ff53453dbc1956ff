//! WASM bindings for calendar-engine.
//!
//! Exposes recurrence expansion, day layout and rule descriptions to
//! JavaScript via `wasm-bindgen`. All complex types are passed as JSON strings
//! in the same camelCase shape the calendar app stores.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p calendar-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/calendar_engine_wasm.wasm
//! ```
//!
//! Every export is a pure function, so it can run on a web worker as well as
//! on the main thread.

use calendar_engine::{CalendarEvent, ExpansionOptions, RecurrenceRule};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers: parsing inputs and serializing outputs
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts both RFC 3339 (with timezone offset, e.g., "2026-02-17T14:00:00+00:00")
/// and naive local time (e.g., "2026-02-17T14:00:00"), which is interpreted as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    // Try RFC 3339 first (has timezone info).
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    // Fall back to naive datetime interpreted as UTC.
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| format!("Invalid datetime '{}': {}", s, e))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("Invalid date '{}': {}", s, e))
}

fn parse_json<T: serde::de::DeserializeOwned>(json: &str, what: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn options(max_occurrences: Option<u32>) -> ExpansionOptions {
    let mut options = ExpansionOptions::default();
    if let Some(max) = max_occurrences {
        options.max_occurrences = max as usize;
    }
    options
}

// ---------------------------------------------------------------------------
// Native implementations (testable without a JS host)
// ---------------------------------------------------------------------------

fn expand_recurrence_impl(
    event_json: &str,
    rule_json: &str,
    window_start: &str,
    window_end: &str,
    max_occurrences: Option<u32>,
) -> Result<String, String> {
    let event: CalendarEvent = parse_json(event_json, "event")?;
    let rule: RecurrenceRule = parse_json(rule_json, "rule")?;
    let occurrences = calendar_engine::expand(
        &event,
        &rule,
        parse_datetime(window_start)?,
        parse_datetime(window_end)?,
        &options(max_occurrences),
    )
    .map_err(|e| e.to_string())?;
    to_json(&occurrences)
}

fn expand_events_impl(
    events_json: &str,
    window_start: &str,
    window_end: &str,
    max_occurrences: Option<u32>,
) -> Result<String, String> {
    let events: Vec<CalendarEvent> = parse_json(events_json, "events")?;
    let occurrences = calendar_engine::expand_events(
        &events,
        parse_datetime(window_start)?,
        parse_datetime(window_end)?,
        &options(max_occurrences),
    )
    .map_err(|e| e.to_string())?;
    to_json(&occurrences)
}

fn layout_day_impl(events_json: &str) -> Result<String, String> {
    let events: Vec<CalendarEvent> = parse_json(events_json, "events")?;
    to_json(&calendar_engine::layout_day(&events))
}

fn layout_all_day_impl(events_json: &str, first_day: &str, last_day: &str) -> Result<String, String> {
    let events: Vec<CalendarEvent> = parse_json(events_json, "events")?;
    to_json(&calendar_engine::pack_all_day(
        &events,
        parse_date(first_day)?,
        parse_date(last_day)?,
    ))
}

fn describe_recurrence_impl(rule_json: &str) -> Result<String, String> {
    let rule: RecurrenceRule = parse_json(rule_json, "rule")?;
    rule.validate().map_err(|e| e.to_string())?;
    Ok(calendar_engine::describe_recurrence(&rule))
}

fn parse_recurrence_description_impl(text: &str) -> Result<String, String> {
    let rule = calendar_engine::parse_recurrence_description(text).map_err(|e| e.to_string())?;
    to_json(&rule)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Expand one base event with a recurrence rule into the occurrences starting
/// in `[windowStart, windowEnd)`.
///
/// Returns a JSON array of events. `maxOccurrences` raises or lowers the
/// default ceiling of 1000.
#[wasm_bindgen(js_name = "expandRecurrence")]
pub fn expand_recurrence(
    event_json: &str,
    rule_json: &str,
    window_start: &str,
    window_end: &str,
    max_occurrences: Option<u32>,
) -> Result<String, JsValue> {
    expand_recurrence_impl(event_json, rule_json, window_start, window_end, max_occurrences)
        .map_err(|e| JsValue::from_str(&e))
}

/// Flatten stored events (recurring or not) into everything that starts in the window.
#[wasm_bindgen(js_name = "expandEvents")]
pub fn expand_events(
    events_json: &str,
    window_start: &str,
    window_end: &str,
    max_occurrences: Option<u32>,
) -> Result<String, JsValue> {
    expand_events_impl(events_json, window_start, window_end, max_occurrences)
        .map_err(|e| JsValue::from_str(&e))
}

/// Column layout for one day's events.
///
/// Returns a JSON object mapping event id to `{column, columnCount, width, left}`.
#[wasm_bindgen(js_name = "layoutDay")]
pub fn layout_day(events_json: &str) -> Result<String, JsValue> {
    layout_day_impl(events_json).map_err(|e| JsValue::from_str(&e))
}

/// Row stacking for all-day events between `firstDay` and `lastDay` (exclusive),
/// both `YYYY-MM-DD`.
#[wasm_bindgen(js_name = "layoutAllDay")]
pub fn layout_all_day(events_json: &str, first_day: &str, last_day: &str) -> Result<String, JsValue> {
    layout_all_day_impl(events_json, first_day, last_day).map_err(|e| JsValue::from_str(&e))
}

/// Human-readable description of a rule.
#[wasm_bindgen(js_name = "describeRecurrence")]
pub fn describe_recurrence(rule_json: &str) -> Result<String, JsValue> {
    describe_recurrence_impl(rule_json).map_err(|e| JsValue::from_str(&e))
}

/// Parse a description produced by `describeRecurrence` back into rule JSON.
#[wasm_bindgen(js_name = "parseRecurrenceDescription")]
pub fn parse_recurrence_description(text: &str) -> Result<String, JsValue> {
    parse_recurrence_description_impl(text).map_err(|e| JsValue::from_str(&e))
}
