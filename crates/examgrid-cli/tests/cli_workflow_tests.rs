//! End-to-end runs of the examgrid binary against a scratch database

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn examgrid(dir: &Path, args: &[&str]) -> Output {
    let db = dir.join("examgrid.db");
    Command::new(env!("CARGO_BIN_EXE_examgrid"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env("EXAMGRID_LOG_PROFILE", "production")
        .arg("--db")
        .arg(&db)
        .args(args)
        .output()
        .expect("failed to execute CLI")
}

fn ok(dir: &Path, args: &[&str]) -> String {
    let output = examgrid(dir, args);
    assert!(
        output.status.success(),
        "examgrid {:?} failed. Stderr: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn session_save(dir: &Path) -> String {
    ok(
        dir,
        &[
            "session",
            "save",
            "--start",
            "2025-01-06",
            "--end",
            "2025-01-10",
            "--periods-per-day",
            "2",
            "--session",
            "2024/2025",
            "--semester",
            "1",
        ],
    )
}

#[test]
fn test_full_configuration_then_generate() {
    // GIVEN a fresh database
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();

    // WHEN a session, a holiday, exclusions and constraints are configured
    let saved = session_save(dir);
    assert!(saved.contains("exam_weeks: 1"));
    ok(dir, &["holiday", "add", "2025-01-06", "--label", "New Year break"]);
    let calendar = ok(dir, &["calendar"]);
    assert!(calendar.contains("Total periods: 10"));
    assert!(calendar.contains("[locked]"));

    let exclusion = ok(dir, &["exclusion", "save", "--toggle", "3", "--name", "Final"]);
    assert!(exclusion.contains("excluded: 0,1,3"));

    let readiness = ok(dir, &["context", "readiness"]);
    assert!(readiness.contains("Not ready: missing constraints"));

    ok(dir, &["constraint", "add", "period-inclusive-exam", "CSC301", "2,4"]);

    // THEN the configuration is ready and generation is queued
    let readiness = ok(dir, &["context", "readiness"]);
    assert!(readiness.contains("Ready for generation"));
    let generated = ok(dir, &["generate"]);
    assert!(generated.contains("status: queued"));
}

#[test]
fn test_conflicting_constraint_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    session_save(dir);
    ok(dir, &["exclusion", "save", "--toggle", "3"]);

    let output = examgrid(dir, &["constraint", "add", "periodExcE", "MTH101", "3"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_PERIOD_CONFLICT"), "stderr: {stderr}");
    let history = ok(dir, &["constraint", "history"]);
    assert!(history.trim().is_empty());
}

#[test]
fn test_generate_without_configuration_fails() {
    let tmp = TempDir::new().unwrap();
    let output = examgrid(tmp.path(), &["generate"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_NOT_READY"));
}

#[test]
fn test_non_admin_actor_is_denied() {
    let tmp = TempDir::new().unwrap();
    let output = examgrid(
        tmp.path(),
        &[
            "--actor",
            "student",
            "session",
            "save",
            "--start",
            "2025-01-06",
            "--end",
            "2025-01-10",
        ],
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_POLICY_DENIED"));
}

#[test]
fn test_logout_clears_selection() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    ok(dir, &["login", "admin"]);
    session_save(dir);

    ok(dir, &["logout"]);

    let context = ok(dir, &["context", "show"]);
    let value: serde_json::Value = serde_json::from_str(&context).unwrap();
    assert!(value["selectedExclusionSnapshotId"].is_null());
    assert!(value["selectedConstraintSnapshotId"].is_null());
}
