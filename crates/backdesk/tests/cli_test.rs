#![allow(clippy::unwrap_used)]
// CLI surface smoke tests.

use assert_cmd::Command;
use predicates::prelude::*;

fn backdesk() -> Command {
    Command::cargo_bin("backdesk").unwrap()
}

#[test]
fn help_lists_top_level_commands() {
    backdesk()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compliance"))
        .stdout(predicate::str::contains("customers"))
        .stdout(predicate::str::contains("rewards"))
        .stdout(predicate::str::contains("export"));
}

#[test]
fn version_prints() {
    backdesk()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("backdesk"));
}

#[test]
fn no_args_shows_usage() {
    backdesk()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn customers_label_requires_a_scope() {
    backdesk()
        .args(["customers", "label", "--assign", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--id"));
}
