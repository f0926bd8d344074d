//! CLI Integration Tests
//!
//! These tests drive the `idreg` binary end-to-end against a temporary
//! registry file.
//!
//! Run with:
//! ```bash
//! cargo test --test cli_integration
//! ```

use serde_json::Value;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

/// Run idreg and return (stdout, stderr, success)
fn run_idreg(args: &[&str], db_path: &Path) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_idreg"))
        .arg("-d")
        .arg(db_path)
        .args(["-f", "json"])
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute idreg");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

fn parse(stdout: &str) -> Value {
    serde_json::from_str(stdout.trim()).expect("stdout should be a single JSON document")
}

fn sha256_hex(data: &str) -> String {
    use sha2::{Digest, Sha256};
    hex::encode(Sha256::digest(data.as_bytes()))
}

fn expected_leaf(name: &str, dob: &str, passport_id: &str) -> String {
    let inner = format!(
        "{}{}{}",
        sha256_hex(name),
        sha256_hex(dob),
        sha256_hex(passport_id)
    );
    sha256_hex(&inner)
}

// ============================================================================
// Initialization
// ============================================================================

#[test]
fn test_cli_init_creates_registry() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("registry.idreg");

    let (stdout, _stderr, success) = run_idreg(&["init"], &db);

    assert!(success, "init should succeed");
    assert_eq!(parse(&stdout)["status"], "ok");
    assert!(db.exists(), "registry file should be created");
}

#[test]
fn test_cli_init_refuses_to_overwrite() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("registry.idreg");

    run_idreg(&["init"], &db);
    run_idreg(&["add", "John", "1990101", "12345"], &db);

    let (_stdout, stderr, success) = run_idreg(&["init"], &db);
    assert!(!success, "second init should fail");
    assert!(stderr.contains("already exists"));

    let (stdout, _stderr, success) = run_idreg(&["init", "--force"], &db);
    assert!(success, "init --force should succeed: {stdout}");

    let (stdout, _stderr, _) = run_idreg(&["status"], &db);
    assert_eq!(parse(&stdout)["count"], 0);
}

#[test]
fn test_cli_requires_init() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("missing.idreg");

    let (_stdout, stderr, success) = run_idreg(&["list"], &db);
    assert!(!success);
    assert!(stderr.contains("idreg init"));
}

// ============================================================================
// Records
// ============================================================================

#[test]
fn test_cli_add_and_get() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("registry.idreg");
    run_idreg(&["init"], &db);

    let (stdout, _stderr, success) = run_idreg(&["add", "John", "1990101", "12345"], &db);
    assert!(success, "add should succeed");
    let json = parse(&stdout);
    assert_eq!(json["passport_id"], "12345");
    assert_eq!(json["leaf"], expected_leaf("John", "1990101", "12345"));

    let (stdout, _stderr, success) = run_idreg(&["get", "12345"], &db);
    assert!(success, "get should succeed");
    let json = parse(&stdout);
    assert_eq!(json["record"]["name"], "John");
    assert_eq!(json["record"]["date_of_birth"], "1990101");
}

#[test]
fn test_cli_get_missing() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("registry.idreg");
    run_idreg(&["init"], &db);

    let (_stdout, stderr, success) = run_idreg(&["get", "00000"], &db);
    assert!(!success);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_cli_duplicate_passport_rejected() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("registry.idreg");
    run_idreg(&["init"], &db);

    run_idreg(&["add", "John", "1990101", "12345"], &db);
    let (_stdout, stderr, success) = run_idreg(&["add", "Other", "2000101", "12345"], &db);

    assert!(!success, "duplicate passport id should fail");
    assert!(stderr.contains("Duplicate record"));
}

#[test]
fn test_cli_list_in_passport_order() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("registry.idreg");
    run_idreg(&["init"], &db);

    run_idreg(&["add", "Mary", "1985203", "67890"], &db);
    run_idreg(&["add", "John", "1990101", "12345"], &db);

    let (stdout, _stderr, success) = run_idreg(&["list"], &db);
    assert!(success);
    let json = parse(&stdout);
    assert_eq!(json["count"], 2);
    assert_eq!(json["records"][0]["passport_id"], "12345");
    assert_eq!(json["records"][1]["passport_id"], "67890");

    let (stdout, _stderr, _) = run_idreg(&["--order", "insertion", "list"], &db);
    let json = parse(&stdout);
    assert_eq!(json["records"][0]["passport_id"], "67890");
}

// ============================================================================
// Hashing, roots and verification
// ============================================================================

#[test]
fn test_cli_hash_is_stateless() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("never-created.idreg");

    let (stdout, _stderr, success) = run_idreg(&["hash", "John", "1990101", "12345"], &db);
    assert!(success);
    assert_eq!(parse(&stdout)["leaf"], expected_leaf("John", "1990101", "12345"));
    assert!(!db.exists());
}

#[test]
fn test_cli_root_of_empty_registry_fails() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("registry.idreg");
    run_idreg(&["init"], &db);

    let (_stdout, stderr, success) = run_idreg(&["root"], &db);
    assert!(!success);
    assert!(stderr.contains("empty"));
}

#[test]
fn test_cli_root_with_levels() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("registry.idreg");
    run_idreg(&["init"], &db);
    run_idreg(&["add", "John", "1990101", "12345"], &db);
    run_idreg(&["add", "Mary", "1985203", "67890"], &db);
    run_idreg(&["add", "Anna", "2001231", "99999"], &db);

    let (stdout, _stderr, success) = run_idreg(&["root", "--levels"], &db);
    assert!(success);
    let json = parse(&stdout);

    let john = expected_leaf("John", "1990101", "12345");
    let mary = expected_leaf("Mary", "1985203", "67890");
    let anna = expected_leaf("Anna", "2001231", "99999");
    let pair = sha256_hex(&format!("{john}{mary}"));
    let root = sha256_hex(&format!("{pair}{anna}"));

    assert_eq!(json["count"], 3);
    assert_eq!(json["height"], 3);
    assert_eq!(json["root"], root);
    assert_eq!(json["levels"][1][1], anna);
}

#[test]
fn test_cli_verify_single_record() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("registry.idreg");
    run_idreg(&["init"], &db);
    run_idreg(&["add", "John", "1990101", "12345"], &db);

    let (stdout, _stderr, success) = run_idreg(&["verify", "John", "1990101", "12345"], &db);
    assert!(success, "verify should exit 0 when verified");
    let json = parse(&stdout);
    assert_eq!(json["outcome"], "verified");
    assert_eq!(json["candidate"], json["root"]);
}

#[test]
fn test_cli_verify_two_records_not_verified() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("registry.idreg");
    run_idreg(&["init"], &db);
    run_idreg(&["add", "John", "1990101", "12345"], &db);
    run_idreg(&["add", "Mary", "1985203", "67890"], &db);

    let (stdout, _stderr, success) = run_idreg(&["verify", "John", "1990101", "12345"], &db);
    assert!(!success, "verify should exit non-zero when not verified");
    let json = parse(&stdout);
    assert_eq!(json["outcome"], "not_verified");
    assert_eq!(json["count"], 2);
}

#[test]
fn test_cli_verify_trailing_space() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("registry.idreg");
    run_idreg(&["init"], &db);
    run_idreg(&["add", "John", "1990101", "12345"], &db);

    let (stdout, _stderr, success) = run_idreg(&["verify", "John ", "1990101", "12345"], &db);
    assert!(!success);
    assert_eq!(parse(&stdout)["outcome"], "not_verified");
}

#[test]
fn test_cli_status() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("registry.idreg");
    run_idreg(&["init"], &db);

    let (stdout, _stderr, success) = run_idreg(&["status"], &db);
    assert!(success);
    let json = parse(&stdout);
    assert_eq!(json["count"], 0);
    assert!(json["root"].is_null());

    run_idreg(&["add", "John", "1990101", "12345"], &db);
    let (stdout, _stderr, _) = run_idreg(&["status"], &db);
    let json = parse(&stdout);
    assert_eq!(json["count"], 1);
    assert_eq!(json["root"], expected_leaf("John", "1990101", "12345"));
    assert_eq!(json["order"], "passport_id");
}

#[test]
fn test_cli_config_file_sets_order() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("registry.idreg");
    let config = dir.path().join("config.json");
    std::fs::write(&config, r#"{"order": "insertion"}"#).unwrap();
    let config = config.to_str().unwrap();

    run_idreg(&["init"], &db);
    run_idreg(&["add", "Mary", "1985203", "67890"], &db);
    run_idreg(&["add", "John", "1990101", "12345"], &db);

    let (stdout, _stderr, success) = run_idreg(&["--config", config, "list"], &db);
    assert!(success);
    let json = parse(&stdout);
    assert_eq!(json["order"], "insertion");
    assert_eq!(json["records"][0]["passport_id"], "67890");
}
