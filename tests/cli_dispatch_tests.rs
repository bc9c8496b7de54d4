use std::path::PathBuf;
use std::process::Command;

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_stratadvisor")
}

fn crate_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn recommend_command_emits_json_array() {
    let output = Command::new(bin())
        .current_dir(crate_root())
        .args(["recommend", "--limit", "3"])
        .output()
        .expect("recommend should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value = serde_json::from_str(&stdout).expect("recommend should emit json");
    assert!(payload.is_array());
}

#[test]
fn lineup_command_reports_unknown_mode_but_still_emits_json() {
    let output = Command::new(bin())
        .current_dir(crate_root())
        .args(["lineup", "not_a_real_mode"])
        .output()
        .expect("lineup should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value = serde_json::from_str(&stdout).expect("lineup should emit json");
    assert!(payload["notes"].as_str().unwrap_or("").contains("Unknown mode"));
}

#[test]
fn lineup_command_without_mode_argument_returns_usage() {
    let output = Command::new(bin()).args(["lineup"]).output().expect("lineup should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: stratadvisor lineup"));
}

#[test]
fn validate_command_passes_against_the_shipped_catalog() {
    let output = Command::new(bin())
        .current_dir(crate_root())
        .args(["validate"])
        .output()
        .expect("validate should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("validation passed"));
}

#[test]
fn validate_command_fails_against_a_missing_path() {
    let output = Command::new(bin())
        .args(["validate", "data/heroes/does_not_exist.json", "data/lineups/does_not_exist.json"])
        .output()
        .expect("validate should run");

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn ask_command_answers_a_rules_question_without_ai() {
    let output = Command::new(bin())
        .current_dir(crate_root())
        .args(["ask", "what lineup should I use for bear trap?"])
        .output()
        .expect("ask should run");

    assert_eq!(output.status.code(), Some(0));
    assert!(!output.stdout.is_empty());
}

#[test]
fn unknown_command_returns_usage() {
    let output = Command::new(bin()).args(["bogus"]).output().expect("binary should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: stratadvisor"));
}
