//! CLI integration tests using the REAL stagehand binary

mod common;

use common::{TestBed, stagehand_cmd};
use predicates::prelude::*;

#[test]
fn test_help_output() {
    stagehand_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Transactional install/uninstall engine",
        ))
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("commit"))
        .stdout(predicate::str::contains("rollback"))
        .stdout(predicate::str::contains("uninstall"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_help_shows_parameter_examples() {
    stagehand_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("-prefix="));
}

#[test]
fn test_version_output() {
    stagehand_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("stagehand"))
        .stdout(predicate::str::contains("Build info"));
}

#[test]
fn test_completions_bash() {
    stagehand_cmd()
        .args(["completions", "--shell", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stagehand"));
}

#[test]
fn test_completions_unknown_shell() {
    stagehand_cmd()
        .args(["completions", "--shell", "tcsh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown shell"));
}

#[test]
fn test_unknown_subcommand_fails() {
    stagehand_cmd().arg("explode").assert().failure();
}

#[test]
fn test_status_without_state() {
    let bed = TestBed::new();
    bed.phase("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No recorded install state"));
}

#[test]
fn test_status_shows_unit_and_state_file() {
    let bed = TestBed::new();
    bed.phase("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unit:"))
        .stdout(predicate::str::contains("stagehand.instate"));
}

#[test]
fn test_check_reports_entry_count() {
    let bed = TestBed::new();
    bed.phase("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("resolves to 3 installable entries"));
}

#[test]
fn test_check_describe_lists_entries_and_parameters() {
    let bed = TestBed::new();
    bed.phase_with("check", &["--describe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entries:"))
        .stdout(predicate::str::contains("(auto)"))
        .stdout(predicate::str::contains("(manual)"))
        .stdout(predicate::str::contains("-prefix=<dir>"));
}

#[test]
fn test_commit_without_state_fails() {
    let bed = TestBed::new();
    bed.phase("commit")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "The saved state argument is required",
        ));
}

#[test]
fn test_rollback_without_state_fails() {
    let bed = TestBed::new();
    bed.phase("rollback")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "The saved state argument is required",
        ));
}
