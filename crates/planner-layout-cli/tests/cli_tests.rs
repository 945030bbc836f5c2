//! Integration tests for the `planner-layout` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the slots, layout,
//! split and classify subcommands through the actual binary, including
//! stdin/stdout piping, file I/O and error handling.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn week_json() -> String {
    std::fs::read_to_string(fixture("week.json")).expect("week.json fixture must exist")
}

fn cli() -> Command {
    Command::cargo_bin("planner-layout").unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// slots
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn slots_lists_each_start_time() {
    cli()
        .args(["slots", "--start", "08:00", "--end", "09:10", "--granularity", "30"])
        .assert()
        .success()
        .stdout("0\t08:00\n1\t08:30\n2\t09:00\n");
}

#[test]
fn slots_rejects_zero_granularity() {
    cli()
        .args(["slots", "--granularity", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("granularity must be positive"));
}

#[test]
fn slots_rejects_malformed_time() {
    cli()
        .args(["slots", "--start", "8am"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Expected HH:MM"));
}

// ─────────────────────────────────────────────────────────────────────────────
// layout
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn layout_file_with_config() {
    let output = cli()
        .args([
            "layout",
            "-i",
            &fixture("week.json"),
            "-c",
            &fixture("office.json"),
            "--char-width",
            "4",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let boxes = value.as_array().unwrap();

    // The 20:00 event is outside 08:00..=17:30.
    assert_eq!(boxes.len(), 3);
    assert_eq!(boxes[0]["event"]["id"], "sp-101");
    assert_eq!(boxes[0]["layout_box"]["width"], 50.0);
    assert_eq!(boxes[1]["layout_box"]["x"], 50.0);
    assert_eq!(boxes[0]["text"]["lines"][0], "Internation…");
    assert_eq!(boxes[0]["text"]["truncated"], true);
    assert_eq!(boxes[0]["category"], "primary");
    assert_eq!(boxes[2]["category"], "allday");
}

#[test]
fn layout_stdin_to_stdout_with_defaults() {
    cli()
        .arg("layout")
        .write_stdin(week_json())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"layout_box\""))
        .stdout(predicate::str::contains("\"late\""));
}

#[test]
fn layout_writes_output_file() {
    let out = std::env::temp_dir().join(format!("planner-layout-{}.json", std::process::id()));

    cli()
        .args(["layout", "-i", &fixture("week.json"), "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = std::fs::read_to_string(&out).unwrap();
    let _ = std::fs::remove_file(&out);
    assert!(written.contains("sp-101"));
}

#[test]
fn layout_rejects_invalid_json() {
    cli()
        .arg("layout")
        .write_stdin("not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse events JSON"));
}

#[test]
fn layout_rejects_bad_config() {
    let dir = std::env::temp_dir();
    let path = dir.join(format!("planner-layout-bad-{}.json", std::process::id()));
    std::fs::write(&path, r#"{"timezone": "Nowhere/Special"}"#).unwrap();

    let assert = cli()
        .args(["layout", "-i", &fixture("week.json"), "-c"])
        .arg(&path)
        .assert();
    let _ = std::fs::remove_file(&path);

    assert
        .failure()
        .stderr(predicate::str::contains("Invalid layout config"));
}

#[test]
fn layout_missing_input_file_fails() {
    cli()
        .args(["layout", "-i", "/nonexistent/events.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// split
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn split_cuts_overnight_event() {
    let output = cli()
        .args([
            "split",
            "-i",
            &fixture("overnight.json"),
            "--first-day",
            "2026-03-02",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);
    assert_eq!(value[0]["column"], 1);
    assert_eq!(value[1]["column"], 2);
}

#[test]
fn split_rejects_unknown_timezone() {
    cli()
        .args([
            "split",
            "-i",
            &fixture("overnight.json"),
            "--first-day",
            "2026-03-02",
            "--timezone",
            "Atlantis/Capital",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown timezone"));
}

// ─────────────────────────────────────────────────────────────────────────────
// classify
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn classify_prints_categories() {
    cli()
        .args(["classify", "-i", &fixture("week.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"primary\""))
        .stdout(predicate::str::contains("\"secondary\""))
        .stdout(predicate::str::contains("\"allday\""));
}
