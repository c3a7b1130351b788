//! CLI smoke tests

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("dda")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("blueprint"))
        .stdout(predicate::str::contains("profile"));
}

#[test]
fn test_profile_set_show_roundtrip() {
    let temp = tempfile::TempDir::new().unwrap();
    let config_path = temp.path().join("ddagent.yml");
    std::fs::write(
        &config_path,
        format!("storage:\n  session-dir: {}\n", temp.path().join("session").display()),
    )
    .unwrap();

    Command::cargo_bin("dda")
        .unwrap()
        .args(["--config", config_path.to_str().unwrap(), "profile", "set", "age", "42"])
        .assert()
        .success();

    Command::cargo_bin("dda")
        .unwrap()
        .args(["--config", config_path.to_str().unwrap(), "profile", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"age\": \"42\""));
}

#[test]
fn test_unknown_goal_rejected() {
    let temp = tempfile::TempDir::new().unwrap();
    let config_path = temp.path().join("ddagent.yml");
    std::fs::write(
        &config_path,
        format!("storage:\n  session-dir: {}\n", temp.path().join("session").display()),
    )
    .unwrap();

    Command::cargo_bin("dda")
        .unwrap()
        .args([
            "--config",
            config_path.to_str().unwrap(),
            "profile",
            "set",
            "goals",
            "Become Immortal",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown goal"));
}
