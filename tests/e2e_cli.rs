//! Offline end-to-end CLI tests.
//!
//! Everything here exercises validation paths that fail before any
//! provider call, so no network access is needed.

use assert_cmd::{cargo, prelude::*};
use predicates::prelude::*;
use std::process::Command;

fn base_cmd() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("rendimento"));
    cmd.arg("--no-color");
    cmd
}

#[test]
fn help_lists_subcommands() {
    base_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("yield"))
        .stdout(predicate::str::contains("monthly"))
        .stdout(predicate::str::contains("interactive"));
}

#[test]
fn future_payment_date_is_rejected_with_a_warning() {
    base_cmd()
        .arg("yield")
        .arg("MXRF11")
        .arg("--date")
        .arg("2999-01-01")
        .assert()
        .success()
        .stdout(predicate::str::contains("future"))
        .stdout(predicate::str::contains("\u{001b}[").not());
}

#[test]
fn blank_ticker_list_is_rejected_with_a_warning() {
    base_cmd()
        .arg("yield")
        .arg(" , ")
        .arg("--date")
        .arg("2024-06-14")
        .assert()
        .success()
        .stdout(predicate::str::contains("at least one ticker"))
        .stdout(predicate::str::contains("\u{001b}[").not());
}

#[test]
fn malformed_date_fails_with_context() {
    base_cmd()
        .arg("yield")
        .arg("MXRF11")
        .arg("--date")
        .arg("14/06/2024")
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected YYYY-MM-DD"));
}

#[test]
fn blank_monthly_symbol_is_rejected_with_a_warning() {
    base_cmd()
        .arg("monthly")
        .arg(" ")
        .assert()
        .success()
        .stdout(predicate::str::contains("at least one ticker"))
        .stdout(predicate::str::contains("\u{001b}[").not());
}
