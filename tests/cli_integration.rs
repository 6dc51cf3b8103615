//! Integration tests for the `dq` CLI.
//!
//! Each test creates a temp board directory, runs `dq` as a subprocess,
//! and checks stdout, stderr, and/or the stored task file.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the path to the built `dq` binary.
fn dq_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_dq"))
}

/// Create a board with four tasks in scrambled stored order.
fn create_test_board(root: &Path) {
    let board_dir = root.join("dueq");
    fs::create_dir_all(&board_dir).unwrap();

    fs::write(
        board_dir.join("board.toml"),
        r#"[board]
name = "Test Board"

[ids]
prefix = "T"
"#,
    )
    .unwrap();

    fs::write(
        board_dir.join("tasks.json"),
        r#"[
  {"id": "T-001", "title": "Write report", "dueDate": "2025-01-02", "priority": 2, "createdAt": "2024-12-20T09:00:00Z"},
  {"id": "T-002", "title": "Pay rent", "dueDate": "2025-01-01", "priority": 1, "createdAt": "2024-12-20T09:01:00Z"},
  {"id": "T-003", "title": "Water plants", "dueDate": "2025-01-01", "priority": 3, "createdAt": "2024-12-20T09:02:00Z"},
  {"id": "T-004", "title": "Learn piano", "description": "someday", "priority": 1, "createdAt": "2024-12-20T09:03:00Z"}
]
"#,
    )
    .unwrap();
}

/// Run `dq` with the given args in the given directory, returning (stdout, stderr, success).
fn run_dq(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(dq_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env("TZ", "UTC")
        .output()
        .expect("failed to run dq");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `dq` expecting success, return stdout.
fn run_dq_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_dq(dir, args);
    if !success {
        panic!(
            "dq {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Run `dq` expecting failure, return stderr.
fn run_dq_err(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_dq(dir, args);
    if success {
        panic!("dq {:?} unexpectedly succeeded:\nstdout: {}", args, stdout);
    }
    stderr
}

fn listed_ids(dir: &Path) -> Vec<String> {
    let out = run_dq_ok(dir, &["list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect()
}

fn stored_tasks(dir: &Path) -> Vec<serde_json::Value> {
    let text = fs::read_to_string(dir.join("dueq/tasks.json")).unwrap();
    serde_json::from_str::<Vec<serde_json::Value>>(&text).unwrap()
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

#[test]
fn test_init_creates_board() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_dq_ok(tmp.path(), &["init", "--name", "Chores", "--prefix", "CH"]);
    assert!(out.contains("Chores"));
    assert!(tmp.path().join("dueq/board.toml").exists());
    assert!(stored_tasks(tmp.path()).is_empty());

    let out = run_dq_ok(tmp.path(), &["add", "Sweep"]);
    assert!(out.starts_with("CH-001"));
}

#[test]
fn test_init_twice_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_dq_ok(tmp.path(), &["init"]);
    let err = run_dq_err(tmp.path(), &["init"]);
    assert!(err.contains("already exists"));
}

#[test]
fn test_no_board() {
    let tmp = tempfile::TempDir::new().unwrap();
    let err = run_dq_err(tmp.path(), &["list"]);
    assert!(err.contains("not a dueq board"));
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[test]
fn test_list_orders_by_deadline_then_priority() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    assert_eq!(listed_ids(tmp.path()), vec!["T-002", "T-003", "T-001", "T-004"]);

    let out = run_dq_ok(tmp.path(), &["list"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("1. T-002"));
    assert!(lines[3].contains("no deadline"));
}

#[test]
fn test_list_from_subdirectory_and_board_dir_flag() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());
    let sub = tmp.path().join("notes/deep");
    fs::create_dir_all(&sub).unwrap();

    let out = run_dq_ok(&sub, &["list"]);
    assert!(out.contains("Pay rent"));

    let other = tempfile::TempDir::new().unwrap();
    let dir = tmp.path().to_str().unwrap();
    let out = run_dq_ok(other.path(), &["-C", dir, "next"]);
    assert!(out.contains("T-002"));
}

#[test]
fn test_next_and_show() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let out = run_dq_ok(tmp.path(), &["next"]);
    assert!(out.starts_with("T-002  Pay rent"));
    assert!(out.contains("priority: P1 (High)"));

    let out = run_dq_ok(tmp.path(), &["show", "T-004"]);
    assert!(out.contains("Learn piano"));
    assert!(out.contains("someday"));
    assert!(out.contains("position: 4 of 4"));

    let err = run_dq_err(tmp.path(), &["show", "T-999"]);
    assert!(err.contains("task not found: T-999"));
}

#[test]
fn test_next_on_empty_board() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_dq_ok(tmp.path(), &["init"]);
    let out = run_dq_ok(tmp.path(), &["next"]);
    assert_eq!(out.trim(), "No tasks scheduled.");
    let out = run_dq_ok(tmp.path(), &["next", "--json"]);
    assert_eq!(out.trim(), "null");
}

#[test]
fn test_cal_groups_by_day() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let out = run_dq_ok(tmp.path(), &["cal", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let days = parsed.as_array().unwrap();
    assert_eq!(days.len(), 2);
    assert_eq!(days[0]["date"], "2025-01-01");
    assert_eq!(days[0]["tasks"][0]["id"], "T-002");
    assert_eq!(days[0]["tasks"][1]["id"], "T-003");
    assert_eq!(days[1]["tasks"][0]["id"], "T-001");

    let out = run_dq_ok(tmp.path(), &["cal"]);
    assert!(out.contains("== Wed, Jan 1 2025 =="));
    assert!(!out.contains("Learn piano"));
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

#[test]
fn test_add_places_task_in_order() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let out = run_dq_ok(
        tmp.path(),
        &["add", "Renew passport", "--due", "2024-12-31", "--priority", "3"],
    );
    assert_eq!(out.trim(), "T-005 (position 1)");
    assert_eq!(
        listed_ids(tmp.path()),
        vec!["T-005", "T-002", "T-003", "T-001", "T-004"]
    );

    let stored = stored_tasks(tmp.path());
    assert_eq!(stored.len(), 5);
    assert_eq!(stored[4]["title"], "Renew passport");
    assert_eq!(stored[4]["dueDate"], "2024-12-31T00:00:00Z");
}

#[test]
fn test_add_uses_default_priority() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());
    let out = run_dq_ok(tmp.path(), &["add", "Later", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["priority"], 2);
    assert!(parsed["due"].is_null());
}

#[test]
fn test_add_rejects_bad_input() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let err = run_dq_err(tmp.path(), &["add", "   "]);
    assert!(err.contains("title cannot be empty"));
    let err = run_dq_err(tmp.path(), &["add", "x", "--due", "whenever"]);
    assert!(err.contains("invalid due date"));
    let err = run_dq_err(tmp.path(), &["add", "x", "--priority", "high"]);
    assert!(err.contains("invalid priority"));
    assert_eq!(stored_tasks(tmp.path()).len(), 4);
}

#[test]
fn test_edit_reorders() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    run_dq_ok(tmp.path(), &["edit", "T-004", "--due", "2024-12-01"]);
    assert_eq!(listed_ids(tmp.path())[0], "T-004");

    run_dq_ok(tmp.path(), &["edit", "T-004", "--no-due", "--clear-desc"]);
    assert_eq!(listed_ids(tmp.path())[3], "T-004");
    let stored = stored_tasks(tmp.path());
    assert!(stored[3].get("description").is_none());
    assert!(stored[3]["dueDate"].is_null());

    let err = run_dq_err(tmp.path(), &["edit", "T-004"]);
    assert!(err.contains("nothing to change"));
    let err = run_dq_err(tmp.path(), &["edit", "T-404", "--title", "x"]);
    assert!(err.contains("task not found"));
}

#[test]
fn test_rm_deletes_any_task() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let out = run_dq_ok(tmp.path(), &["rm", "T-001"]);
    assert!(out.contains("Deleted T-001"));
    assert_eq!(listed_ids(tmp.path()), vec!["T-002", "T-003", "T-004"]);
}

#[test]
fn test_done_only_front() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let err = run_dq_err(tmp.path(), &["done", "T-001"]);
    assert!(err.contains("complete \"Pay rent\" (T-002) first"));
    assert_eq!(stored_tasks(tmp.path()).len(), 4);

    let out = run_dq_ok(tmp.path(), &["done", "T-002"]);
    assert!(out.contains("Completed T-002"));
    assert!(out.contains("Next: T-003 \"Water plants\""));
    assert_eq!(listed_ids(tmp.path()), vec!["T-003", "T-001", "T-004"]);
    assert!(stored_tasks(tmp.path()).iter().all(|t| t["id"] != "T-002"));
}

#[test]
fn test_done_until_empty() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    for id in ["T-002", "T-003", "T-001"] {
        run_dq_ok(tmp.path(), &["done", id]);
    }
    let out = run_dq_ok(tmp.path(), &["done", "T-004", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["completed"]["id"], "T-004");
    assert!(parsed["next"].is_null());

    let err = run_dq_err(tmp.path(), &["done", "T-004"]);
    assert!(err.contains("queue is empty"));
}

#[test]
fn test_tolerates_loose_stored_fields() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());
    fs::write(
        tmp.path().join("dueq/tasks.json"),
        r#"[
  {"id": "_old1", "title": "Odd priority", "priority": "abc", "dueDate": "2025-01-01"},
  {"id": "_old2", "title": "Bad date", "priority": 1, "dueDate": "not a date"},
  {"id": "_old3", "title": "Urgent", "priority": "1", "dueDate": "2025-01-01"}
]"#,
    )
    .unwrap();

    assert_eq!(listed_ids(tmp.path()), vec!["_old3", "_old1", "_old2"]);
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[test]
fn test_config_get_and_set() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_dq_ok(tmp.path(), &["init", "--name", "Cfg"]);

    assert_eq!(run_dq_ok(tmp.path(), &["config", "defaults.priority"]).trim(), "2");
    assert_eq!(
        run_dq_ok(tmp.path(), &["config", "defaults.priority", "1"]).trim(),
        "1"
    );
    let toml_text = fs::read_to_string(tmp.path().join("dueq/board.toml")).unwrap();
    assert!(toml_text.contains("# Priority for tasks added without --priority"));

    let out = run_dq_ok(tmp.path(), &["add", "Fresh", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["priority"], 1);

    let err = run_dq_err(tmp.path(), &["config", "colors.bg", "red"]);
    assert!(err.contains("unknown config key"));
}
