//! Uninstall tests: removing a committed install with, without and despite
//! the recorded state

mod common;

use std::fs;

use common::TestBed;
use predicates::prelude::*;
use serde_json::Value;

fn installed_bed() -> TestBed {
    let bed = TestBed::new();
    bed.phase_with("install", &["--commit"]).assert().success();
    bed
}

#[test]
fn test_uninstall_removes_installed_work() {
    let bed = installed_bed();

    bed.phase_with("uninstall", &["-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Uninstalled unit 'stagehand'"));

    assert!(!bed.prefix_path(TestBed::launcher_rel()).exists());
    assert!(!bed.state_file().exists());
    let manifest: Value =
        serde_json::from_str(&fs::read_to_string(bed.prefix_path("etc/services.json")).unwrap())
            .unwrap();
    assert!(manifest["services"].as_object().unwrap().is_empty());
}

#[test]
fn test_uninstall_without_state_uses_computed_defaults() {
    let bed = installed_bed();
    fs::remove_file(bed.state_file()).unwrap();

    bed.phase_with("uninstall", &["-y"]).assert().success();

    assert!(!bed.prefix_path(TestBed::launcher_rel()).exists());
}

#[test]
fn test_uninstall_with_garbage_state_continues() {
    let bed = installed_bed();
    fs::write(bed.state_file(), "not a state file").unwrap();

    bed.phase_with("uninstall", &["-y"]).assert().success();

    let log = bed.log_contents();
    assert!(log.contains("could not be read"));
    assert!(log.contains("Continuing the uninstall without recorded state"));
    assert!(!bed.prefix_path(TestBed::launcher_rel()).exists());
    assert!(!bed.state_file().exists());
}

#[test]
fn test_uninstall_leaves_foreign_files_alone() {
    let bed = installed_bed();
    let keep = bed.prefix_path("var/keepme.txt");
    fs::write(&keep, "still here").unwrap();

    bed.phase_with("uninstall", &["-y"]).assert().success();

    assert!(keep.exists());
    let log = bed.log_contents();
    assert!(log.contains("Leaving non-empty directory"));
}

#[test]
fn test_uninstall_twice_is_harmless() {
    let bed = installed_bed();

    bed.phase_with("uninstall", &["-y"]).assert().success();
    bed.phase_with("uninstall", &["-y"]).assert().success();
}
