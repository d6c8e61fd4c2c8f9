//! Integration tests for the `pb` CLI.
//!
//! Each test points `pb` at a database in a temp directory, runs it as a
//! subprocess, and checks stdout (or the JSON it prints).

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

fn pb_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_pb"))
}

/// Run `pb --db <db> --config <missing> args...`
fn run_pb(db: &Path, args: &[&str]) -> Output {
    let config = db.with_file_name("no-config.toml");
    Command::new(pb_bin())
        .arg("--db")
        .arg(db)
        .arg("--config")
        .arg(&config)
        .args(args)
        .env_remove("PIPEBOARD_LOG")
        .output()
        .expect("failed to run pb")
}

fn stdout_ok(db: &Path, args: &[&str]) -> String {
    let out = run_pb(db, args);
    assert!(
        out.status.success(),
        "pb {:?} failed: {}",
        args,
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8(out.stdout).unwrap()
}

fn json_ok(db: &Path, args: &[&str]) -> Value {
    let mut full = args.to_vec();
    full.push("--json");
    serde_json::from_str(&stdout_ok(db, &full)).unwrap()
}

fn setup() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("pb.sqlite");
    (tmp, db)
}

fn add_lead(db: &Path, name: &str, extra: &[&str]) -> i64 {
    let mut args = vec!["lead", "add", "--name", name];
    args.extend_from_slice(extra);
    json_ok(db, &args)["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// init / stages
// ---------------------------------------------------------------------------

#[test]
fn init_creates_database_with_default_stages() {
    let (_tmp, db) = setup();
    let out = stdout_ok(&db, &["init"]);
    assert!(out.contains("with 5 stages"), "{out}");
    assert!(db.exists());

    let again = stdout_ok(&db, &["init"]);
    assert!(again.starts_with("Database up to date"), "{again}");
}

#[test]
fn stages_lists_board_order_with_counts() {
    let (_tmp, db) = setup();
    add_lead(&db, "Jane Roe", &[]);
    add_lead(&db, "Bob Stone", &["--stage", "contacted"]);

    let out = stdout_ok(&db, &["stages"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].ends_with("New (1)"), "{}", lines[0]);
    assert!(lines[1].ends_with("Contacted (1)"), "{}", lines[1]);
    assert!(lines[4].ends_with("Closed (0)"), "{}", lines[4]);

    let json = json_ok(&db, &["stages"]);
    assert_eq!(json[0]["name"], "New");
    assert_eq!(json[0]["leads"], 1);
}

// ---------------------------------------------------------------------------
// leads
// ---------------------------------------------------------------------------

#[test]
fn lead_add_normalizes_and_defaults() {
    let (_tmp, db) = setup();
    let id = add_lead(
        &db,
        "  Jane Roe ",
        &["--type", "SELLER", "--phone", "555-0101", "--source", "Zillow"],
    );
    add_lead(&db, "Bob Stone", &[]);

    let leads = json_ok(&db, &["lead", "list"]);
    let jane = leads
        .as_array()
        .unwrap()
        .iter()
        .find(|l| l["id"] == id)
        .unwrap();
    assert_eq!(jane["full_name"], "Jane Roe");
    assert_eq!(jane["lead_type"], "seller");
    assert_eq!(jane["stage_name"], "New");

    let bob = &leads[0];
    assert_eq!(bob["full_name"], "Bob Stone");
    assert_eq!(bob["lead_type"], "buyer");
}

#[test]
fn lead_list_filters_by_query() {
    let (_tmp, db) = setup();
    add_lead(&db, "Jane Roe", &["--email", "jane@example.com"]);
    add_lead(&db, "Bob Stone", &["--source", "referral"]);

    let out = stdout_ok(&db, &["lead", "list", "EXAMPLE"]);
    assert!(out.contains("Jane Roe"));
    assert!(!out.contains("Bob Stone"));

    let none = stdout_ok(&db, &["lead", "list", "zzz"]);
    assert_eq!(none.trim(), "No leads match \"zzz\".");
}

#[test]
fn lead_add_rejects_blank_name_and_unknown_stage() {
    let (_tmp, db) = setup();
    let out = run_pb(&db, &["lead", "add", "--name", "  "]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("error: name is required"));

    let out = run_pb(&db, &["lead", "add", "--name", "X", "--stage", "Lost"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("no stage named"));
}

#[test]
fn lead_move_by_name_and_id() {
    let (_tmp, db) = setup();
    let id = add_lead(&db, "Jane Roe", &[]).to_string();

    let out = stdout_ok(&db, &["lead", "move", &id, "nurture"]);
    assert_eq!(out.trim(), format!("Moved lead {id} to Nurture"));

    let json = json_ok(&db, &["lead", "move", &id, "2"]);
    assert_eq!(json["stage"], "Contacted");

    let out = run_pb(&db, &["lead", "move", "999", "New"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("not found"));
}

// ---------------------------------------------------------------------------
// notes / tasks / followups
// ---------------------------------------------------------------------------

#[test]
fn note_add_requires_existing_lead() {
    let (_tmp, db) = setup();
    let id = add_lead(&db, "Jane Roe", &[]).to_string();

    let out = stdout_ok(&db, &["note", "add", &id, "Prefers texts"]);
    assert!(out.starts_with("Added note"), "{out}");

    let out = run_pb(&db, &["note", "add", "42", "hello"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("lead 42 not found"));
}

#[test]
fn followups_show_due_tasks_and_done_hides_them() {
    let (_tmp, db) = setup();
    let id = add_lead(&db, "Jane Roe", &[]).to_string();

    let overdue = json_ok(&db, &["task", "add", &id, "Call back", "--due", "2020-01-01"])["id"]
        .as_i64()
        .unwrap();
    json_ok(&db, &["task", "add", &id, "Send comps", "--due", "2999-01-01"]);
    json_ok(&db, &["task", "add", &id, "Someday"]);

    let due = stdout_ok(&db, &["followups"]);
    assert!(due.contains("Call back"), "{due}");
    assert!(due.contains("(overdue)"));
    assert!(due.contains("(Jane Roe)"));
    assert!(!due.contains("Send comps"));
    assert!(!due.contains("Someday"));

    let all = json_ok(&db, &["followups", "--all"]);
    assert_eq!(all.as_array().unwrap().len(), 3);

    stdout_ok(&db, &["task", "done", &overdue.to_string()]);
    let due = stdout_ok(&db, &["followups"]);
    assert_eq!(due.trim(), "Nothing due today.");
}

#[test]
fn task_add_rejects_bad_due_date() {
    let (_tmp, db) = setup();
    let id = add_lead(&db, "Jane Roe", &[]).to_string();
    let out = run_pb(&db, &["task", "add", &id, "Call", "--due", "tomorrow"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid due date"));
}

#[test]
fn task_done_unknown_id_fails() {
    let (_tmp, db) = setup();
    let out = run_pb(&db, &["task", "done", "77"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).starts_with("error:"));
}
