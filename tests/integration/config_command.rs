//! Integration tests for `p4auth config`.
//!
//! Each test points `P4AUTH_CONFIG` at its own temp file so nothing
//! touches the real `~/.p4auth/config.yaml`.

#![allow(clippy::expect_used)]

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn p4auth(config: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("p4auth"));
    cmd.env("NO_COLOR", "1");
    cmd.env("P4AUTH_CONFIG", config);
    cmd
}

#[test]
fn test_config_show_with_no_file_shows_unset_values() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("config.yaml");

    p4auth(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("connection.address"))
        .stdout(predicate::str::contains("(not set)"));
}

#[test]
fn test_config_set_then_show_roundtrip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("config.yaml");

    p4auth(&config)
        .args(["config", "set", "connection.address", "127.0.0.1:1666"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Set connection.address = 127.0.0.1:1666",
        ));

    p4auth(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("127.0.0.1:1666"));
}

#[test]
fn test_config_set_user_then_show() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("config.yaml");

    p4auth(&config)
        .args(["config", "set", "connection.user", "alice"])
        .assert()
        .success();

    p4auth(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice"));
}

#[test]
fn test_config_set_unknown_key_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("config.yaml");

    p4auth(&config)
        .args(["config", "set", "connection.password", "secret"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown setting"));
}

#[test]
fn test_config_set_empty_value_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("config.yaml");

    p4auth(&config)
        .args(["config", "set", "connection.user", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value"));
}

#[test]
fn test_config_show_json_includes_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("config.yaml");

    let output = p4auth(&config)
        .args(["--json", "config", "show"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value =
        serde_json::from_slice(&output).expect("config show --json emits valid JSON");
    assert!(value["path"].as_str().expect("path").contains("config.yaml"));
}

#[cfg(unix)]
#[test]
fn test_config_file_written_with_restricted_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("config.yaml");

    p4auth(&config)
        .args(["config", "set", "connection.user", "alice"])
        .assert()
        .success();

    let mode = std::fs::metadata(&config)
        .expect("config file exists")
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600, "mode was {mode:o}");
}
