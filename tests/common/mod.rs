//! Common test utilities for Stagehand integration tests

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// An isolated install area for one integration test
#[allow(dead_code)]
pub struct TestBed {
    /// Temporary directory holding everything the test touches
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Install prefix passed as `-prefix=`
    pub prefix: PathBuf,
    /// Directory passed as `-statedir=`
    pub state_dir: PathBuf,
    /// Log file passed as `--log-file`
    pub log_file: PathBuf,
}

#[allow(dead_code)]
impl TestBed {
    /// Create a new isolated install area
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let prefix = temp.path().join("prefix");
        let state_dir = temp.path().join("state");
        std::fs::create_dir_all(&state_dir).expect("Failed to create state directory");
        let log_file = temp.path().join("run.log");
        Self {
            temp,
            prefix,
            state_dir,
            log_file,
        }
    }

    /// Command for one subcommand with this bed's isolation parameters
    /// already applied
    pub fn phase(&self, subcommand: &str) -> Command {
        self.phase_with(subcommand, &[])
    }

    /// Like [`phase`](Self::phase) but with extra flags placed before the
    /// `-name=value` parameters, where clap expects them
    pub fn phase_with(&self, subcommand: &str, flags: &[&str]) -> Command {
        let mut cmd = stagehand_cmd();
        cmd.arg(subcommand);
        for flag in flags {
            cmd.arg(flag);
        }
        cmd.arg(format!("--log-file={}", self.log_file.display()))
            .arg(format!("-prefix={}", self.prefix.display()))
            .arg(format!("-statedir={}", self.state_dir.display()));
        cmd
    }

    /// Path of the recovery state file the bed's commands write
    pub fn state_file(&self) -> PathBuf {
        self.state_dir.join("stagehand.instate")
    }

    /// Contents of the install log, or empty when no log was written
    pub fn log_contents(&self) -> String {
        std::fs::read_to_string(&self.log_file).unwrap_or_default()
    }

    /// Path under the install prefix
    pub fn prefix_path(&self, rel: &str) -> PathBuf {
        self.prefix.join(rel)
    }

    /// Relative launcher path the builtin unit installs
    pub fn launcher_rel() -> &'static str {
        if cfg!(windows) {
            "bin/stagehand-service.cmd"
        } else {
            "bin/stagehand-service"
        }
    }
}

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
pub fn stagehand_cmd() -> Command {
    Command::cargo_bin("stagehand").unwrap()
}
