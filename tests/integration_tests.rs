//! Integration tests for the batchproc CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn batchproc() -> Command {
    let mut cmd = Command::cargo_bin("batchproc").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Test CLI binary exists and responds to --help
#[test]
fn test_cli_help() {
    batchproc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("run"));
}

/// Test CLI responds to --version
#[test]
fn test_cli_version() {
    batchproc()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("batchproc"));
}

/// Test invalid subcommand shows error
#[test]
fn test_invalid_subcommand() {
    batchproc()
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_plan_uneven_split() {
    batchproc()
        .args(["plan", "--size", "51", "--workers", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("concurrent"))
        .stdout(predicate::str::contains("[0, 12)"))
        .stdout(predicate::str::contains("[24, 36)"))
        .stdout(predicate::str::contains("[36, 51) (15 items)"));
}

#[test]
fn test_plan_small_collection_is_serial() {
    batchproc()
        .args(["plan", "--size", "2", "--workers", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("serial"))
        .stdout(predicate::str::contains("[0, 2)"));
}

#[test]
fn test_plan_rejects_zero_workers() {
    batchproc()
        .args(["plan", "--size", "10", "--workers", "0"])
        .assert()
        .failure();
}

#[test]
fn test_run_success() {
    batchproc()
        .args(["run", "--size", "100", "--workers", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5050"));
}

#[test]
fn test_run_failure_exits_non_zero() {
    batchproc()
        .args(["run", "--size", "100", "--workers", "4", "--fail-at", "60"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed at index 60"));
}

#[test]
fn test_run_failure_reported_once() {
    let assert = batchproc()
        .args(["run", "--size", "40", "--workers", "4", "--fail-at", "30"])
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert_eq!(stderr.matches("failed at index 30").count(), 1, "stderr was: {stderr}");
}

#[test]
fn test_run_timeout() {
    batchproc()
        .args(["run", "--size", "1000", "--workers", "2", "--delay-ms", "5", "--timeout-ms", "30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("deadline exceeded"));
}

#[test]
fn test_quiet_run_prints_nothing() {
    batchproc()
        .args(["--quiet", "run", "--size", "10", "--workers", "2"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_config_show_defaults() {
    let temp_dir = TempDir::new().unwrap();
    batchproc()
        .current_dir(temp_dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[dispatch]"))
        .stdout(predicate::str::contains("thread_percentage = 100"));
}

#[test]
fn test_config_file_sets_workers() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("batchproc.toml");
    fs::write(&config_path, "[dispatch]\nworkers = 3\n").unwrap();

    batchproc()
        .arg("--config")
        .arg(&config_path)
        .args(["plan", "--size", "6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[0, 2)"))
        .stdout(predicate::str::contains("[2, 4)"))
        .stdout(predicate::str::contains("[4, 6)"));
}

#[test]
fn test_env_overrides_config() {
    let temp_dir = TempDir::new().unwrap();
    batchproc()
        .current_dir(temp_dir.path())
        .env("BATCHPROC_DISPATCH__WORKERS", "2")
        .args(["plan", "--size", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[0, 3)"))
        .stdout(predicate::str::contains("[3, 7)"));
}

#[test]
fn test_missing_config_file_fails() {
    batchproc()
        .args(["--config", "no-such-file.toml", "plan", "--size", "4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}
