//! End-to-end tests for the non-interactive `bvault` commands.
//!
//! Commands that prompt for a passphrase are covered by the library tests;
//! these only exercise paths that run without a terminal.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn bvault(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bvault").unwrap();
    cmd.env("BVAULT_DATA_DIR", data_dir.path());
    cmd
}

fn sample_results_json() -> &'static str {
    r#"{
        "qualified": [{
            "programId": "snap",
            "programName": "SNAP",
            "programDescription": "Food assistance",
            "jurisdiction": "CA",
            "status": "qualified",
            "confidence": "high",
            "confidenceScore": 0.95,
            "explanation": {
                "reason": "income below threshold",
                "details": [],
                "rulesCited": []
            },
            "requiredDocuments": ["ID card"],
            "nextSteps": [{"step": "apply online", "url": "https://benefits.gov/apply"}],
            "evaluatedAt": "2025-03-01T12:00:00Z",
            "rulesVersion": "2025.1"
        }],
        "likely": [],
        "maybe": [],
        "notQualified": [],
        "totalPrograms": 1,
        "evaluatedAt": "2025-03-01T12:00:00Z"
    }"#
}

#[test]
fn config_shows_paths() {
    let data_dir = TempDir::new().unwrap();

    bvault(&data_dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings file:"))
        .stdout(predicate::str::contains("records.json"))
        .stdout(predicate::str::contains("not set"));
}

#[test]
fn lock_status_reports_unset_passphrase() {
    let data_dir = TempDir::new().unwrap();

    bvault(&data_dir)
        .args(["lock", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NOT SET"));
}

#[test]
fn vault_commands_refuse_without_passphrase() {
    let data_dir = TempDir::new().unwrap();

    bvault(&data_dir)
        .args(["vault", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("lock init"));
}

#[test]
fn print_builds_html_document() {
    let data_dir = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let input = work.path().join("results.json");
    let output = work.path().join("results.html");
    std::fs::write(&input, sample_results_json()).unwrap();

    bvault(&data_dir)
        .arg("print")
        .arg(&input)
        .arg(&output)
        .args(["--name", "Alex", "--state", "CA"])
        .assert()
        .success();

    let html = std::fs::read_to_string(&output).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("SNAP"));
    assert!(html.contains("Prepared for: Alex"));
    assert!(html.contains("https://benefits.gov/apply"));
}

#[test]
fn print_rejects_invalid_results_file() {
    let data_dir = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let input = work.path().join("results.json");
    std::fs::write(&input, "not json").unwrap();

    bvault(&data_dir)
        .arg("print")
        .arg(&input)
        .arg(work.path().join("out.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid results file"));
}

#[test]
fn import_missing_file_fails_cleanly() {
    let data_dir = TempDir::new().unwrap();

    bvault(&data_dir)
        .args(["import", "/nonexistent/path.bfx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}
