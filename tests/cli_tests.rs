//! Command-line tests for the rene binary.

use std::time::Duration;

use assert_cmd::Command;
use predicates::prelude::*;

fn rene() -> Command {
    let mut cmd = Command::cargo_bin("rene").unwrap();
    cmd.env_remove("RUST_LOG").timeout(Duration::from_secs(30));
    cmd
}

#[test]
fn test_help_lists_commands() {
    rene()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("toggle"))
        .stdout(predicate::str::contains("mode"))
        .stdout(predicate::str::contains("track"))
        .stdout(predicate::str::contains("daemon"));
}

#[test]
fn test_no_args_prints_help() {
    rene()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_version() {
    rene()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_completions_bash() {
    rene()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rene"));
}

#[test]
fn test_invalid_mode_is_usage_error() {
    rene()
        .args(["mode", "siesta"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("siesta"));
}

#[test]
fn test_invalid_track_json_is_usage_error() {
    rene()
        .args(["track", "{not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("valid JSON"));
}

#[test]
fn test_status_without_daemon_fails() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("absent.sock");

    rene()
        .arg("--socket")
        .arg(&socket)
        .arg("status")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error: Cannot reach the daemon"));
}

#[test]
fn test_daemon_rejects_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(&config, r#"{"sound": {"volume": 7.0}}"#).unwrap();

    rene()
        .arg("--socket")
        .arg(dir.path().join("rene.sock"))
        .args(["daemon", "--no-sound", "--config"])
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("sound.volume"));
}
