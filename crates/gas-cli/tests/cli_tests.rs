//! Integration tests for the gas CLI binary.
//!
//! These tests exercise the compiled binary using assert_cmd. None of them
//! reach the network: commands either stop before connecting or fail on a
//! missing Script ID.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

/// Get a Command for the gas binary with a clean environment
fn gas_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("gas"));
    cmd.env_remove("GAS_ACCESS_TOKEN")
        .env_remove("GAS_ROOT")
        .env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[test]
fn test_help_output() {
    gas_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Apps Script Sync"));
}

#[test]
fn test_version_output() {
    gas_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gas"));
}

#[test]
fn test_no_command_shows_help_hint() {
    gas_cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("gas --help"));
}

#[test]
fn test_add_file_rejects_unknown_type() {
    gas_cmd()
        .args(["add-file", "Util", "--type", "python"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

// ============================================================================
// Authorization Tests
// ============================================================================

#[test]
fn test_init_without_credentials_fails() {
    let dir = tempdir().unwrap();

    gas_cmd()
        .arg("--root")
        .arg(dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Credentials failed!"));

    assert!(!dir.path().join("SourceCode").exists());
}

#[test]
fn test_init_with_token_creates_layout() {
    let dir = tempdir().unwrap();

    gas_cmd()
        .env("GAS_ACCESS_TOKEN", "test-token")
        .arg("--root")
        .arg(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("User Authorization Succeeded!"))
        .stdout(predicate::str::contains("gas set-id"));

    for folder in ["JAVASCRIPT", "HTML", "JSON"] {
        assert!(dir.path().join("SourceCode").join(folder).is_dir());
    }
    assert!(dir.path().join(".gas/credentials/token.json").exists());
}

#[test]
fn test_stored_credential_is_reused() {
    let dir = tempdir().unwrap();

    gas_cmd()
        .env("GAS_ACCESS_TOKEN", "test-token")
        .arg("--root")
        .arg(dir.path())
        .arg("init")
        .assert()
        .success();

    // Second run has no token in the environment
    gas_cmd()
        .arg("--root")
        .arg(dir.path())
        .arg("init")
        .assert()
        .success();
}

#[test]
fn test_versions_without_script_id() {
    let dir = tempdir().unwrap();

    gas_cmd()
        .env("GAS_ACCESS_TOKEN", "test-token")
        .arg("--root")
        .arg(dir.path())
        .arg("versions")
        .assert()
        .failure()
        .stderr(predicate::str::contains("provide a GAS Script ID"));
}

#[test]
fn test_create_version_without_script_id() {
    let dir = tempdir().unwrap();

    gas_cmd()
        .env("GAS_ACCESS_TOKEN", "test-token")
        .args(["create-version", "Release"])
        .arg("--root")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("provide a GAS Script ID"));
}

// ============================================================================
// Logout Tests
// ============================================================================

#[test]
fn test_logout_on_empty_directory() {
    let dir = tempdir().unwrap();

    gas_cmd()
        .arg("--root")
        .arg(dir.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed removing your credentials"));
}

#[test]
fn test_logout_removes_local_state() {
    let dir = tempdir().unwrap();
    let state = dir.path().join(".gas");
    fs::create_dir_all(state.join("credentials")).unwrap();
    fs::write(state.join("credentials/token.json"), r#"{"access_token":"old"}"#).unwrap();
    fs::write(state.join("script_id.txt"), "script-abc").unwrap();

    gas_cmd()
        .arg("--root")
        .arg(dir.path())
        .arg("logout")
        .assert()
        .success();

    assert!(!state.join("credentials").exists());
    assert!(!state.join("script_id.txt").exists());
}

#[test]
fn test_logout_keeps_sources() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("SourceCode/JAVASCRIPT/Code.js");
    fs::create_dir_all(source.parent().unwrap()).unwrap();
    fs::write(&source, "function main() {}").unwrap();

    gas_cmd()
        .arg("--root")
        .arg(dir.path())
        .arg("logout")
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&source).unwrap(), "function main() {}");
}

// ============================================================================
// Backups Tests
// ============================================================================

#[test]
fn test_backups_on_empty_directory() {
    let dir = tempdir().unwrap();

    gas_cmd()
        .arg("--root")
        .arg(dir.path())
        .arg("backups")
        .assert()
        .success()
        .stdout(predicate::str::contains("No backups yet"));
}

#[test]
fn test_backups_lists_existing_folders() {
    let dir = tempdir().unwrap();
    let backup = dir.path().join("BACKUPS/Backup for Demo at 10.00.00");
    fs::create_dir_all(backup.join("JAVASCRIPT/lib")).unwrap();
    fs::write(backup.join("JAVASCRIPT/Code.js"), "a()").unwrap();
    fs::write(backup.join("JAVASCRIPT/lib/util.js"), "b()").unwrap();

    gas_cmd()
        .arg("--root")
        .arg(dir.path())
        .arg("backups")
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup for Demo at 10.00.00"))
        .stdout(predicate::str::contains("(2 files)"));
}
