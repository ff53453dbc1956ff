//! `calendar` CLI — expand recurring events and lay out calendar days from JSON.
//!
//! ## Usage
//!
//! ```sh
//! # Expand stored events (one object or an array) into a window
//! calendar expand -i events.json --from 2026-03-01T00:00:00Z --to 2026-04-01T00:00:00Z
//!
//! # Attach an RRULE to the input events before expanding
//! echo '{"id":"gym","title":"Gym","start":"2026-03-02T07:00:00Z","end":"2026-03-02T08:00:00Z"}' \
//!   | calendar expand --rrule "FREQ=WEEKLY;BYDAY=MO,WE" --from 2026-03-01 --to 2026-03-15
//!
//! # Column layout for one day's timed events
//! calendar layout -i day.json --day 2026-03-02
//!
//! # Row stacking for all-day events over a week
//! calendar all-day -i events.json --from 2026-03-01 --to 2026-03-08
//!
//! # Describe a rule, or parse a description back into a rule
//! calendar describe --rrule "FREQ=MONTHLY;BYMONTHDAY=31"
//! calendar describe --parse "Every 2 weeks on Monday, Wednesday, 4 times"
//! ```
//!
//! Logs go to stderr; set `RUST_LOG` or pass `-v` for more detail.

use anyhow::{Context, Result};
use calendar_engine::{
    describe_recurrence, events_on_day, expand_events, layout_day, pack_all_day,
    parse_recurrence_description, CalendarEvent, ExpansionOptions, RecurrenceRule,
    DEFAULT_MAX_OCCURRENCES, DEFAULT_OPEN_ENDED_HORIZON_DAYS,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "calendar",
    version,
    about = "Recurrence expansion and day layout for calendar views"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand events into the occurrences that start inside a window
    Expand {
        /// Input JSON file with one event or an array (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Window start, inclusive (RFC 3339, or a date/naive datetime read as UTC)
        #[arg(long, value_parser = parse_datetime)]
        from: DateTime<Utc>,
        /// Window end, exclusive
        #[arg(long, value_parser = parse_datetime)]
        to: DateTime<Utc>,
        /// RRULE text applied to every input event, replacing its own rule
        #[arg(long)]
        rrule: Option<String>,
        /// Ceiling on occurrences per series
        #[arg(long, default_value_t = DEFAULT_MAX_OCCURRENCES)]
        max_occurrences: usize,
        /// How far open-ended series are expanded past their start, in days
        #[arg(long, default_value_t = DEFAULT_OPEN_ENDED_HORIZON_DAYS)]
        horizon_days: u32,
    },
    /// Compute column layouts for a day's timed events
    Layout {
        /// Input JSON array of events (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Only lay out events intersecting this UTC day (YYYY-MM-DD)
        #[arg(long)]
        day: Option<NaiveDate>,
    },
    /// Stack all-day events into rows over a date span
    AllDay {
        /// Input JSON array of events (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// First visible day (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Day after the last visible day
        #[arg(long)]
        to: NaiveDate,
    },
    /// Describe a recurrence rule in words, or parse a description
    Describe {
        /// Input JSON rule (reads from stdin if neither --rrule nor --parse is given)
        #[arg(short, long)]
        input: Option<String>,
        /// RRULE text to describe instead of JSON input
        #[arg(long, conflicts_with = "parse")]
        rrule: Option<String>,
        /// Description to turn back into a JSON rule
        #[arg(long)]
        parse: Option<String>,
    },
}

/// One event or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum EventInput {
    Many(Vec<CalendarEvent>),
    One(Box<CalendarEvent>),
}

impl EventInput {
    fn into_vec(self) -> Vec<CalendarEvent> {
        match self {
            EventInput::Many(events) => events,
            EventInput::One(event) => vec![*event],
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Expand {
            input,
            output,
            from,
            to,
            rrule,
            max_occurrences,
            horizon_days,
        } => {
            let mut events = read_events(input.as_deref())?;
            if let Some(text) = rrule {
                let rule: RecurrenceRule = text
                    .parse()
                    .with_context(|| format!("Failed to parse RRULE: {}", text))?;
                for event in &mut events {
                    event.recurrence = Some(rule.clone());
                }
            }
            let options = ExpansionOptions {
                max_occurrences,
                open_ended_horizon_days: horizon_days,
            };
            let occurrences =
                expand_events(&events, from, to, &options).context("Failed to expand events")?;
            tracing::debug!(count = occurrences.len(), "expanded events");
            write_json(output.as_deref(), &occurrences)?;
        }
        Commands::Layout { input, output, day } => {
            let mut events = read_events(input.as_deref())?;
            if let Some(day) = day {
                events = events_on_day(&events, day);
            }
            write_json(output.as_deref(), &layout_day(&events))?;
        }
        Commands::AllDay {
            input,
            output,
            from,
            to,
        } => {
            let events = read_events(input.as_deref())?;
            write_json(output.as_deref(), &pack_all_day(&events, from, to))?;
        }
        Commands::Describe {
            input,
            rrule,
            parse,
        } => {
            if let Some(text) = parse {
                let rule = parse_recurrence_description(&text)
                    .context("Failed to parse recurrence description")?;
                write_json(None, &rule)?;
            } else {
                let rule: RecurrenceRule = match rrule {
                    Some(text) => text
                        .parse()
                        .with_context(|| format!("Failed to parse RRULE: {}", text))?,
                    None => {
                        let json = read_input(input.as_deref())?;
                        serde_json::from_str(&json).context("Failed to parse rule JSON")?
                    }
                };
                rule.validate().context("Invalid recurrence rule")?;
                println!("{}", describe_recurrence(&rule));
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Parse a datetime argument into `DateTime<Utc>`.
///
/// Accepts RFC 3339 (e.g., "2026-03-01T09:00:00+01:00"), a naive datetime
/// (e.g., "2026-03-01T09:00:00"), or a bare date, the latter two read as UTC.
fn parse_datetime(s: &str) -> std::result::Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(ndt.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|e| format!("Invalid datetime '{}': {}", s, e))
}

fn read_events(path: Option<&str>) -> Result<Vec<CalendarEvent>> {
    let json = read_input(path)?;
    let events: EventInput = serde_json::from_str(&json).context("Failed to parse events JSON")?;
    Ok(events.into_vec())
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_json<T: Serialize>(path: Option<&str>, value: &T) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value)?;
    match path {
        Some(path) => {
            std::fs::write(path, pretty).with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", pretty);
        }
    }
    Ok(())
}
