//! Basic CLI E2E tests.
//!
//! Each test runs the `grove` binary against its own temporary data
//! directory and checks stdout, stderr and the exit code.

use std::path::Path;
use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

struct Output {
    code: i32,
    stdout: String,
    stderr: String,
}

impl Output {
    fn json(&self) -> Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {}", self.stdout))
    }
}

/// Run a CLI command with `GROVE_DATA_DIR` pointed at `dir`.
fn run_cli(dir: &Path, args: &[&str]) -> Output {
    let output = Command::new(env!("CARGO_BIN_EXE_grove"))
        .args(args)
        .env("GROVE_DATA_DIR", dir)
        .env_remove("GROVE_LOG")
        .output()
        .expect("Failed to execute CLI command");

    Output {
        code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

fn add_habit(dir: &Path, name: &str, target: &str) -> String {
    let out = run_cli(dir, &["habit", "add", name, "--target", target]);
    assert_eq!(out.code, 0, "habit add failed: {}", out.stderr);
    out.json()["id"].as_str().unwrap().to_string()
}

#[test]
fn test_habit_add_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let out = run_cli(dir.path(), &["habit", "add", "Stretch"]);
    assert_eq!(out.code, 0, "{}", out.stderr);

    let habit = out.json();
    assert_eq!(habit["name"], "Stretch");
    assert_eq!(habit["targetMinutes"], 30);
    assert_eq!(habit["color"], "#FF6B6B");
    assert_eq!(habit["streak"], 0);
    assert_eq!(habit["completedToday"], false);
    assert_eq!(habit["sessions"], Value::Array(vec![]));
}

#[test]
fn test_habit_list_json() {
    let dir = TempDir::new().unwrap();
    let first = add_habit(dir.path(), "Read", "20");
    let second = add_habit(dir.path(), "Run", "40");

    let out = run_cli(dir.path(), &["habit", "list", "--json"]);
    assert_eq!(out.code, 0);
    let habits = out.json();
    let ids: Vec<_> = habits
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec![first, second]);
}

#[test]
fn test_habit_list_empty() {
    let dir = TempDir::new().unwrap();
    let out = run_cli(dir.path(), &["habit", "list"]);
    assert_eq!(out.code, 0);
    assert!(out.stdout.contains("No habits yet"));
}

#[test]
fn test_habit_edit() {
    let dir = TempDir::new().unwrap();
    let id = add_habit(dir.path(), "Piano", "15");

    let out = run_cli(dir.path(), &["habit", "edit", &id, "--name", "Scales", "--target", "25"]);
    assert_eq!(out.code, 0, "{}", out.stderr);
    let habit = out.json();
    assert_eq!(habit["name"], "Scales");
    assert_eq!(habit["targetMinutes"], 25);

    let out = run_cli(dir.path(), &["habit", "edit", &id]);
    assert_eq!(out.code, 1);
    assert!(out.stderr.contains("nothing to update"));
}

#[test]
fn test_habit_errors() {
    let dir = TempDir::new().unwrap();
    let out = run_cli(dir.path(), &["habit", "show", "404"]);
    assert_eq!(out.code, 1);
    assert!(out.stderr.contains("habit not found: 404"));

    let out = run_cli(dir.path(), &["habit", "add", "   "]);
    assert_eq!(out.code, 1);
    assert!(out.stderr.contains("habit name cannot be empty"));

    let out = run_cli(dir.path(), &["habit", "add", "Zero", "--target", "0"]);
    assert_ne!(out.code, 0);
}

#[test]
fn test_session_log_updates_habit() {
    let dir = TempDir::new().unwrap();
    let id = add_habit(dir.path(), "Meditate", "30");

    let out = run_cli(dir.path(), &["session", "log", &id, "25"]);
    assert_eq!(out.code, 0, "{}", out.stderr);
    assert_eq!(out.json()["completed"], true);

    let out = run_cli(dir.path(), &["session", "log", &id, "5"]);
    assert_eq!(out.json()["completed"], false);

    let habit = run_cli(dir.path(), &["habit", "show", &id]).json();
    assert_eq!(habit["streak"], 1);
    assert_eq!(habit["totalMinutes"], 30);
    assert_eq!(habit["completedToday"], false);
    assert!(habit["lastCompletedAt"].is_string());

    let out = run_cli(dir.path(), &["session", "list", "--habit", &id, "--json"]);
    assert_eq!(out.json().as_array().unwrap().len(), 2);
}

#[test]
fn test_session_log_override() {
    let dir = TempDir::new().unwrap();
    let id = add_habit(dir.path(), "Journal", "30");

    let out = run_cli(dir.path(), &["session", "log", &id, "5", "--completed"]);
    assert_eq!(out.json()["completed"], true);
    let out = run_cli(dir.path(), &["session", "log", &id, "60", "--incomplete"]);
    assert_eq!(out.json()["completed"], false);

    let out = run_cli(dir.path(), &["session", "log", &id, "5", "--completed", "--incomplete"]);
    assert_ne!(out.code, 0);

    let out = run_cli(dir.path(), &["session", "log", "missing", "10"]);
    assert_eq!(out.code, 1);
    assert!(out.stderr.contains("habit not found"));
}

#[test]
fn test_focus_start_and_end() {
    let dir = TempDir::new().unwrap();
    let id = add_habit(dir.path(), "Code", "40");

    let out = run_cli(dir.path(), &["focus", "start", &id]);
    assert_eq!(out.code, 0, "{}", out.stderr);
    let focus = out.json();
    assert_eq!(focus["isActive"], true);
    assert_eq!(focus["targetMinutes"], 40);
    let focus_id = focus["id"].as_str().unwrap().to_string();

    let again = run_cli(dir.path(), &["focus", "start", &id]).json();
    assert_eq!(again["id"].as_str().unwrap(), focus_id);

    let out = run_cli(dir.path(), &["focus", "list", "--active", "--json"]);
    assert_eq!(out.json().as_array().unwrap().len(), 1);

    let out = run_cli(dir.path(), &["focus", "end", &focus_id, "32"]);
    assert_eq!(out.code, 0, "{}", out.stderr);
    let session = out.json();
    assert_eq!(session["minutes"], 32);
    assert_eq!(session["completed"], true);
    assert_eq!(session["habitId"].as_str().unwrap(), id);

    let out = run_cli(dir.path(), &["focus", "list", "--active", "--json"]);
    assert!(out.json().as_array().unwrap().is_empty());

    let out = run_cli(dir.path(), &["focus", "end", &focus_id, "10"]);
    assert_eq!(out.code, 1);
    assert!(out.stderr.contains("already ended"));

    let out = run_cli(dir.path(), &["focus", "end", "999", "10"]);
    assert_eq!(out.code, 1);
    assert!(out.stderr.contains("focus session not found"));

    let habit = run_cli(dir.path(), &["habit", "show", &id]).json();
    assert_eq!(habit["streak"], 1);
    assert_eq!(habit["totalMinutes"], 32);
}

#[test]
fn test_delete_cascades() {
    let dir = TempDir::new().unwrap();
    let keep = add_habit(dir.path(), "Keep", "10");
    let gone = add_habit(dir.path(), "Gone", "10");
    run_cli(dir.path(), &["session", "log", &keep, "10"]);
    run_cli(dir.path(), &["session", "log", &gone, "10"]);
    run_cli(dir.path(), &["focus", "start", &gone]);

    let out = run_cli(dir.path(), &["habit", "delete", &gone]);
    assert_eq!(out.code, 0);
    assert!(out.stdout.contains(&format!("deleted {gone}")));

    let sessions = run_cli(dir.path(), &["session", "list", "--json"]).json();
    let sessions = sessions.as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["habitId"].as_str().unwrap(), keep);

    let focus = run_cli(dir.path(), &["focus", "list", "--json"]).json();
    assert!(focus.as_array().unwrap().is_empty());

    let out = run_cli(dir.path(), &["habit", "delete", &gone]);
    assert_eq!(out.code, 1);
}

#[test]
fn test_stats_summary_json() {
    let dir = TempDir::new().unwrap();
    let a = add_habit(dir.path(), "A", "20");
    add_habit(dir.path(), "B", "20");
    run_cli(dir.path(), &["session", "log", &a, "20"]);

    let out = run_cli(dir.path(), &["stats", "summary", "--json"]);
    assert_eq!(out.code, 0, "{}", out.stderr);
    let summary = out.json();
    assert_eq!(summary["habit_count"], 2);
    assert_eq!(summary["completed_today"], 1);
    assert_eq!(summary["completion_rate_pct"], 50);
    assert_eq!(summary["total_minutes"], 20);
    assert_eq!(summary["minutes_this_week"], 20);
}

#[test]
fn test_stats_chart() {
    let dir = TempDir::new().unwrap();
    let id = add_habit(dir.path(), "Draw", "30");
    run_cli(dir.path(), &["session", "log", &id, "45"]);

    let out = run_cli(dir.path(), &["stats", "chart", &id, "--days", "7", "--json"]);
    assert_eq!(out.code, 0, "{}", out.stderr);
    let chart = out.json();
    let days = chart["days"].as_array().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days[6]["minutes"], 45);
    assert_eq!(days[6]["is_today"], true);
    assert_eq!(chart["scale_minutes"], 60);

    let out = run_cli(dir.path(), &["stats", "chart", &id]);
    assert_eq!(out.code, 0);
    assert!(out.stdout.contains("Draw"));
}

#[test]
fn test_config_set_get() {
    let dir = TempDir::new().unwrap();
    let out = run_cli(dir.path(), &["config", "get", "habits.default_target_minutes"]);
    assert_eq!(out.code, 0);
    assert_eq!(out.stdout.trim(), "30");

    let out = run_cli(dir.path(), &["config", "set", "habits.default_target_minutes", "45"]);
    assert_eq!(out.code, 0, "{}", out.stderr);

    let habit = run_cli(dir.path(), &["habit", "add", "Yoga"]).json();
    assert_eq!(habit["targetMinutes"], 45);

    let out = run_cli(dir.path(), &["config", "get", "nope"]);
    assert_eq!(out.code, 1);
    assert!(out.stderr.contains("unknown config key"));

    let out = run_cli(dir.path(), &["config", "reset"]);
    assert_eq!(out.code, 0);
    let out = run_cli(dir.path(), &["config", "get", "habits.default_target_minutes"]);
    assert_eq!(out.stdout.trim(), "30");
}

#[test]
fn test_key_prefix_isolates_slots() {
    let dir = TempDir::new().unwrap();
    add_habit(dir.path(), "Unprefixed", "10");

    run_cli(dir.path(), &["config", "set", "storage.key_prefix", "grove_"]);
    let out = run_cli(dir.path(), &["habit", "list", "--json"]);
    assert!(out.json().as_array().unwrap().is_empty());
}
