//! Integration tests for the `calendar` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the expand, layout,
//! all-day and describe subcommands through the actual binary, including
//! stdin/stdout piping, file I/O and error handling.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

/// Helper: path to a fixture file.
fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

/// Helper: run the binary and parse its stdout as JSON.
fn run_json(args: &[&str]) -> Value {
    let output = Command::cargo_bin("calendar")
        .unwrap()
        .args(args)
        .output()
        .expect("binary should run");
    assert!(
        output.status.success(),
        "calendar {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ─────────────────────────────────────────────────────────────────────────────
// Expand subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn expand_series_from_file() {
    let series = fixture("series.json");
    let value = run_json(&[
        "expand",
        "-i",
        &series,
        "--from",
        "2026-03-02",
        "--to",
        "2026-03-16",
    ]);

    let occurrences = value.as_array().expect("array of occurrences");
    assert_eq!(occurrences.len(), 4, "Mon/Wed over two weeks");
    assert_eq!(occurrences[0]["start"], "2026-03-02T10:00:00Z");
    assert_eq!(occurrences[1]["start"], "2026-03-04T10:00:00Z");
    assert_eq!(occurrences[3]["recurringEventId"], "standup");
}

#[test]
fn expand_stdin_with_rrule_override() {
    let input = r#"{"id":"gym","title":"Gym","start":"2026-03-02T07:00:00Z","end":"2026-03-02T08:00:00Z"}"#;

    Command::cargo_bin("calendar")
        .unwrap()
        .args([
            "expand",
            "--rrule",
            "FREQ=DAILY;COUNT=3",
            "--from",
            "2026-03-01T00:00:00Z",
            "--to",
            "2026-04-01T00:00:00Z",
        ])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("2026-03-04T07:00:00Z"))
        .stdout(predicate::str::contains("2026-03-05T07:00:00Z").not());
}

#[test]
fn expand_respects_max_occurrences() {
    let series = fixture("series.json");
    let value = run_json(&[
        "expand",
        "-i",
        &series,
        "--from",
        "2026-03-01",
        "--to",
        "2027-03-01",
        "--max-occurrences",
        "5",
    ]);
    assert_eq!(value.as_array().unwrap().len(), 5);
}

#[test]
fn expand_invalid_rule_fails() {
    let input = r#"{"id":"x","title":"X","start":"2026-03-02T07:00:00Z","end":"2026-03-02T08:00:00Z",
        "recurrence":{"frequency":"daily","interval":0}}"#;

    Command::cargo_bin("calendar")
        .unwrap()
        .args(["expand", "--from", "2026-03-01", "--to", "2026-04-01"])
        .write_stdin(input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to expand events"));
}

#[test]
fn expand_bad_window_argument_fails() {
    Command::cargo_bin("calendar")
        .unwrap()
        .args(["expand", "--from", "yesterday", "--to", "2026-04-01"])
        .write_stdin("[]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid datetime"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Layout subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn layout_one_day_from_file() {
    let day = fixture("day.json");
    let value = run_json(&["layout", "-i", &day, "--day", "2026-03-02"]);

    let layouts = value.as_object().expect("map of layouts");
    let mut ids: Vec<&String> = layouts.keys().collect();
    ids.sort();
    assert_eq!(ids, ["a", "b", "c"]);

    assert_eq!(value["a"]["column"], 0);
    assert_eq!(value["b"]["column"], 1);
    assert_eq!(value["c"]["column"], 0);
    for id in ["a", "b", "c"] {
        assert_eq!(value[id]["columnCount"], 2);
        assert_eq!(value[id]["width"].as_f64(), Some(50.0));
    }
    assert_eq!(value["b"]["left"].as_f64(), Some(50.0));
}

#[test]
fn layout_file_to_file() {
    let output_path = std::env::temp_dir().join("calendar-test-layout-output.json");
    let _ = std::fs::remove_file(&output_path);

    Command::cargo_bin("calendar")
        .unwrap()
        .args(["layout", "-i", &fixture("day.json"), "-o"])
        .arg(&output_path)
        .assert()
        .success();

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    let value: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value["tomorrow"]["columnCount"], 1);
    assert!(value.get("trip").is_none(), "all-day events are not column-packed");

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn layout_invalid_json_fails() {
    Command::cargo_bin("calendar")
        .unwrap()
        .arg("layout")
        .write_stdin("this is not valid json {{{")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse events JSON"));
}

// ─────────────────────────────────────────────────────────────────────────────
// All-day subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn all_day_rows_for_a_week() {
    let value = run_json(&[
        "all-day",
        "-i",
        &fixture("day.json"),
        "--from",
        "2026-03-01",
        "--to",
        "2026-03-08",
    ]);

    assert_eq!(value["rowCount"], 2);
    let placements = value["placements"].as_array().unwrap();
    assert_eq!(placements.len(), 2);
    assert_eq!(placements[0]["id"], "trip");
    assert_eq!(placements[0]["endDay"], 3);
    assert_eq!(placements[1]["id"], "birthday");
    assert_eq!(placements[1]["row"], 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Describe subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn describe_rrule_text() {
    Command::cargo_bin("calendar")
        .unwrap()
        .args(["describe", "--rrule", "FREQ=MONTHLY;BYMONTHDAY=31"])
        .assert()
        .success()
        .stdout(predicate::str::diff("Monthly on day 31\n"));
}

#[test]
fn describe_rule_file() {
    Command::cargo_bin("calendar")
        .unwrap()
        .args(["describe", "-i", &fixture("rule.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Every 2 months on day 31, 6 times"));
}

#[test]
fn describe_parse_emits_rule_json() {
    let value = run_json(&[
        "describe",
        "--parse",
        "Every 2 weeks on Monday, Wednesday, 4 times",
    ]);

    assert_eq!(value["frequency"], "weekly");
    assert_eq!(value["interval"], 2);
    assert_eq!(value["daysOfWeek"], serde_json::json!([1, 3]));
    assert_eq!(value["count"], 4);
}

#[test]
fn describe_invalid_rule_fails() {
    Command::cargo_bin("calendar")
        .unwrap()
        .arg("describe")
        .write_stdin(r#"{"frequency":"weekly","daysOfWeek":[]}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid recurrence rule"));
}

#[test]
fn no_subcommand_shows_usage() {
    Command::cargo_bin("calendar")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
