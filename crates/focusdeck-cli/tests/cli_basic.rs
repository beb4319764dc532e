//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

use std::path::Path;
use std::process::Command;

use serde_json::Value;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_focusdeck"))
        .args(args)
        .env("FOCUSDECK_DATA_DIR", data_dir)
        .env_remove("FOCUSDECK_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

/// The pretty-printed status object that ends every timer command.
fn status(stdout: &str) -> Value {
    let start = stdout.find("{\n").expect("no status object in output");
    serde_json::from_str(&stdout[start..]).expect("status is not JSON")
}

/// Single-line event objects printed before the status.
fn events(stdout: &str) -> Vec<Value> {
    stdout
        .lines()
        .filter(|l| l.starts_with("{\""))
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn test_fresh_status() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_ok(dir.path(), &["timer", "status"]);
    let s = status(&out);
    assert_eq!(s["mode"], "work");
    assert_eq!(s["time_left"], 1500);
    assert_eq!(s["remaining"], "25:00");
    assert_eq!(s["is_running"], false);
    assert_eq!(s["pomodoros_in_cycle"], 4);
    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_start_and_pause() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_ok(dir.path(), &["timer", "start"]);
    assert_eq!(events(&out)[0]["type"], "started");
    assert_eq!(status(&out)["is_running"], true);

    let out = run_ok(dir.path(), &["timer", "pause"]);
    assert_eq!(events(&out)[0]["type"], "paused");
    assert_eq!(status(&out)["is_running"], false);

    // Pausing again is a no-op.
    let out = run_ok(dir.path(), &["timer", "pause"]);
    assert!(events(&out).is_empty());
}

#[test]
fn test_skip_is_logged_and_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_ok(dir.path(), &["timer", "skip"]);
    let evs = events(&out);
    assert_eq!(evs[0]["type"], "interval_ended");
    assert_eq!(evs[0]["ended"], "work");
    assert_eq!(evs[1]["type"], "skipped");
    assert_eq!(evs[1]["to"], "shortBreak");

    let s = status(&out);
    assert_eq!(s["mode"], "shortBreak");
    assert_eq!(s["current_cycle_pomodoros"], 1);
    assert_eq!(s["sessions_today"], 1);

    let log: Value =
        serde_json::from_str(&run_ok(dir.path(), &["log", "show", "--json"])).unwrap();
    let records = log.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["mode"], "work");
    assert_eq!(records[0]["completed"], false);
    assert_eq!(records[0]["durationMinutes"], 0);

    let stats: Value = serde_json::from_str(&run_ok(dir.path(), &["log", "stats"])).unwrap();
    assert_eq!(stats["work"]["skipped"], 1);

    let days = run_ok(dir.path(), &["log", "days"]);
    assert_eq!(days.lines().count(), 1);
}

#[test]
fn test_reset_to_work() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["timer", "skip"]);
    let out = run_ok(dir.path(), &["timer", "reset"]);
    assert_eq!(status(&out)["mode"], "shortBreak");

    let out = run_ok(dir.path(), &["timer", "reset", "--work"]);
    let s = status(&out);
    assert_eq!(s["mode"], "work");
    assert_eq!(s["current_cycle_pomodoros"], 0);
    // The day's log survives a reset.
    assert_eq!(s["sessions_today"], 1);
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(run_ok(dir.path(), &["config", "get", "timer.work_minutes"]).trim(), "25");

    run_ok(dir.path(), &["config", "set", "timer.work_minutes", "50"]);
    assert_eq!(run_ok(dir.path(), &["config", "get", "timer.work_minutes"]).trim(), "50");

    let out = run_ok(dir.path(), &["timer", "status"]);
    assert_eq!(status(&out)["time_left"], 3000);

    let list: Value = serde_json::from_str(&run_ok(dir.path(), &["config", "list"])).unwrap();
    assert_eq!(list["timer"]["work_minutes"], 50);

    run_ok(dir.path(), &["config", "reset"]);
    assert_eq!(run_ok(dir.path(), &["config", "get", "timer.work_minutes"]).trim(), "25");
}

#[test]
fn test_config_change_reaches_parked_timer() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_ok(dir.path(), &["timer", "status"]);
    assert_eq!(status(&out)["time_left"], 1500);

    run_ok(dir.path(), &["config", "set", "timer.work_minutes", "50"]);
    let out = run_ok(dir.path(), &["timer", "status"]);
    assert_eq!(status(&out)["time_left"], 3000);
}

#[test]
fn test_config_change_leaves_running_timer_alone() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["timer", "start"]);
    run_ok(dir.path(), &["config", "set", "timer.work_minutes", "50"]);

    let out = run_ok(dir.path(), &["timer", "status"]);
    let s = status(&out);
    assert_eq!(s["is_running"], true);
    assert!(s["time_left"].as_u64().unwrap() <= 1500);

    // Once stopped and reset, the interval uses the new length.
    let out = run_ok(dir.path(), &["timer", "reset"]);
    assert_eq!(status(&out)["time_left"], 3000);
}

#[test]
fn test_config_rejects_bad_values() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(
        dir.path(),
        &["config", "set", "timer.long_break_interval", "0"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));

    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "timer.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_log_show_rejects_bad_date() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["log", "show", "--date", "soon"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("invalid date"));

    let out = run_ok(dir.path(), &["log", "show", "--date", "2020-01-01"]);
    assert!(out.contains("no sessions on 2020-01-01"));
}
