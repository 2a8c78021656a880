//! End-to-end tests for the `hook` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// Nothing listens on the discard port.
const DEAD_SERVER: &str = "http://127.0.0.1:9";

fn hook(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hook").unwrap();
    cmd.env("HOOK_HOME", home.path())
        .env_remove("HOOK_SERVER")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    hook(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("complete"))
        .stdout(predicate::str::contains("distractions"));
}

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    hook(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_hook"));
}

#[test]
fn test_prompt_is_empty_when_server_is_down() {
    let home = TempDir::new().unwrap();
    hook(&home)
        .args(["prompt", "--server", DEAD_SERVER])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_status_fails_when_server_is_down() {
    let home = TempDir::new().unwrap();
    hook(&home)
        .args(["status", "--server", DEAD_SERVER])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_start_rejects_blank_task_before_sending() {
    let home = TempDir::new().unwrap();
    hook(&home)
        .args(["start", "   ", "--server", DEAD_SERVER])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a task name"));
}

#[test]
fn test_bad_rating_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    hook(&home)
        .args(["complete", "--rating", "9"])
        .assert()
        .failure()
        .code(2);
}
