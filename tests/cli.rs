//! Smoke tests for the installed binary.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_top_level_commands() {
    let mut cmd = Command::cargo_bin("qdash-cli").expect("binary should build");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("predelivery"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn unknown_subcommand_fails() {
    let mut cmd = Command::cargo_bin("qdash-cli").expect("binary should build");
    cmd.arg("frobnicate").assert().failure();
}

#[test]
fn stats_help_lists_filter_flags() {
    let mut cmd = Command::cargo_bin("qdash-cli").expect("binary should build");
    cmd.args(["stats", "overall", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--domain"))
        .stdout(predicate::str::contains("--min-score"))
        .stdout(predicate::str::contains("--format"));
}

#[test]
fn inverted_score_bounds_are_rejected() {
    let mut cmd = Command::cargo_bin("qdash-cli").expect("binary should build");
    cmd.args([
        "--mock",
        "stats",
        "overall",
        "--min-score",
        "4.0",
        "--max-score",
        "1.0",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("min-score"));
}

#[test]
fn mock_predelivery_overview_renders_table() {
    let mut cmd = Command::cargo_bin("qdash-cli").expect("binary should build");
    cmd.args(["--mock", "predelivery", "overview"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Conversations:"))
        .stdout(predicate::str::contains("Clarity"));
}

#[test]
fn mock_overall_renders_json() {
    let mut cmd = Command::cargo_bin("qdash-cli").expect("binary should build");
    cmd.args(["--mock", "stats", "overall", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("conversationCount"));
}
