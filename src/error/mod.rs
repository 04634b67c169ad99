//! Error types and handling for Stagehand
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`engine`]: Transaction engine errors
//! - [`state`]: Saved-state and recovery-file errors
//! - [`registry`]: Unit registration and discovery errors
//! - [`fs`]: File system errors

#![allow(dead_code)]

// Declare submodules
pub mod engine;
pub mod fs;
pub mod registry;
pub mod state;

// Re-export convenience constructors from submodules
#[allow(unused_imports)]
pub use engine::{bad_parent, hook_failed, missing_argument};
#[allow(unused_imports)]
pub use fs::{io_error, read_failed as file_read_failed, write_failed as file_write_failed};
#[allow(unused_imports)]
pub use registry::{
    discovery_failed, instantiation_failed, no_installers as no_installers_found,
};
#[allow(unused_imports)]
pub use state::{
    corrupt as corrupt_state, delete_failed as state_delete_failed, fields_missing,
    read_failed as state_read_failed, write_failed as state_write_failed,
};

use crate::installer::Phase;
use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Stagehand operations
#[derive(Error, Diagnostic, Debug)]
pub enum StagehandError {
    // Engine errors
    #[error("The {name} argument is required but was not provided")]
    #[diagnostic(
        code(stagehand::engine::missing_argument),
        help("This operation needs the state recorded by a prior install phase")
    )]
    MissingArgument { name: String },

    #[error("An error occurred in the {hook} handler of '{node}': {reason}")]
    #[diagnostic(code(stagehand::engine::hook_failed))]
    HookFailed {
        hook: String,
        node: String,
        reason: String,
    },

    #[error("An error occurred during the {phase} phase")]
    #[diagnostic(code(stagehand::engine::phase_failed))]
    PhaseFailed {
        phase: Phase,
        #[source]
        source: Box<StagehandError>,
        reported: bool,
    },

    #[error("Cannot reparent '{node}': {reason}")]
    #[diagnostic(code(stagehand::tree::bad_parent))]
    BadParent { node: String, reason: String },

    // Saved-state errors
    #[error("The saved state is missing its required fields")]
    #[diagnostic(
        code(stagehand::state::fields_missing),
        help("The recovery file was not produced by the install phase of this program")
    )]
    StateFieldsMissing,

    #[error("The saved state is corrupted: {details}")]
    #[diagnostic(
        code(stagehand::state::corrupt),
        help("Delete the recovery file to abandon the recorded install state")
    )]
    CorruptState { details: String },

    #[error("Failed to read state file '{path}': {reason}")]
    #[diagnostic(code(stagehand::state::read_failed))]
    StateFileReadFailed { path: String, reason: String },

    #[error("Failed to write state file '{path}': {reason}")]
    #[diagnostic(code(stagehand::state::write_failed))]
    StateFileWriteFailed { path: String, reason: String },

    #[error("Failed to delete state file '{path}': {reason}")]
    #[diagnostic(
        code(stagehand::state::delete_failed),
        help("The recorded install state could not be removed; delete the file manually")
    )]
    StateFileDeleteFailed { path: String, reason: String },

    // Registry errors
    #[error("Failed to discover installable entries for unit '{unit}': {reason}")]
    #[diagnostic(
        code(stagehand::registry::discovery_failed),
        help("Register the unit's entries before constructing an installer for it")
    )]
    DiscoveryFailed { unit: String, reason: String },

    #[error("Failed to construct installable entry '{entry}': {reason}")]
    #[diagnostic(code(stagehand::registry::instantiation_failed))]
    InstantiationFailed { entry: String, reason: String },

    #[error("No installable entries found for unit '{unit}'")]
    #[diagnostic(
        code(stagehand::registry::no_installers),
        help("The unit registered no auto-run entries; there is nothing to install")
    )]
    NoInstallersFound { unit: String },

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(stagehand::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(stagehand::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(stagehand::fs::io_error))]
    IoError { message: String },
}

impl StagehandError {
    /// Whether this error has already been written to the install log by the
    /// level that observed it. Enclosing levels repropagate without logging.
    pub fn is_reported(&self) -> bool {
        matches!(self, StagehandError::PhaseFailed { reported: true, .. })
    }

    /// Wraps a pending traversal error in the standard phase failure carrying
    /// the reported marker. An error that already carries the marker is
    /// returned unchanged.
    pub fn into_reported(self, phase: Phase) -> Self {
        if self.is_reported() {
            self
        } else {
            StagehandError::PhaseFailed {
                phase,
                source: Box::new(self),
                reported: true,
            }
        }
    }
}

impl From<std::io::Error> for StagehandError {
    fn from(err: std::io::Error) -> Self {
        StagehandError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StagehandError {
    fn from(err: serde_json::Error) -> Self {
        StagehandError::CorruptState {
            details: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for StagehandError {
    fn from(err: inquire::InquireError) -> Self {
        StagehandError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, StagehandError>;

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_error_contains {
        ($test_name:ident, $err:expr, $($contains:expr),+ $(,)?) => {
            #[test]
            fn $test_name() {
                let err = $err;
                let error_string = err.to_string();
                $(
                    assert!(error_string.contains($contains),
                        "Error message should contain '{}', got: {}",
                        $contains,
                        error_string
                    );
                )+
            }
        };
    }

    #[test]
    fn test_error_display() {
        let err = StagehandError::NoInstallersFound {
            unit: "demo".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No installable entries found for unit 'demo'"
        );
    }

    #[test]
    fn test_error_code() {
        let err = StagehandError::CorruptState {
            details: "bad pairing".to_string(),
        };
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("stagehand::state::corrupt".to_string())
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: StagehandError = io_err.into();
        assert!(matches!(err, StagehandError::IoError { .. }));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_str = "invalid json content";
        let parse_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str(json_str);
        let json_err = parse_result.unwrap_err();
        let err: StagehandError = json_err.into();
        assert!(matches!(err, StagehandError::CorruptState { .. }));
    }

    #[test]
    fn test_into_reported_wraps_once() {
        let inner = io_error("boom");
        let wrapped = inner.into_reported(Phase::Commit);
        assert!(wrapped.is_reported());
        let rewrapped = wrapped.into_reported(Phase::Rollback);
        match rewrapped {
            StagehandError::PhaseFailed { phase, .. } => assert_eq!(phase, Phase::Commit),
            other => panic!("expected PhaseFailed, got: {other}"),
        }
    }

    #[test]
    fn test_phase_failed_source_chain() {
        let inner = missing_argument("saved state");
        let wrapped = inner.into_reported(Phase::Uninstall);
        let source = std::error::Error::source(&wrapped).map(ToString::to_string);
        assert_eq!(
            source,
            Some("The saved state argument is required but was not provided".to_string())
        );
    }

    test_error_contains!(
        test_fields_missing_error,
        StagehandError::StateFieldsMissing,
        "missing its required fields"
    );

    test_error_contains!(
        test_hook_failed_error,
        hook_failed("before-install", "launcher", "refused"),
        "before-install",
        "launcher",
        "refused"
    );

    test_error_contains!(
        test_discovery_failed_error,
        discovery_failed("ghost", "unit is not registered"),
        "ghost",
        "unit is not registered"
    );

    test_error_contains!(
        test_instantiation_failed_error,
        instantiation_failed("dir-layout", "constructor returned an error"),
        "Failed to construct installable entry 'dir-layout'"
    );

    test_error_contains!(
        test_state_delete_failed_error,
        state_delete_failed("/tmp/demo.instate", "permission denied"),
        "Failed to delete state file"
    );

    #[test]
    fn test_corrupt_state() {
        let err = corrupt_state("index 3 does not match 2 recorded child states");
        assert!(matches!(err, StagehandError::CorruptState { .. }));
        assert!(err.to_string().contains("corrupted"));
    }

    #[test]
    fn test_missing_argument() {
        let err = missing_argument("saved state");
        assert!(matches!(err, StagehandError::MissingArgument { .. }));
        assert!(err.to_string().contains("saved state"));
    }

    #[test]
    fn test_file_read_failed() {
        let err = file_read_failed("/path/to/file.txt", "permission denied");
        assert!(matches!(err, StagehandError::FileReadFailed { .. }));
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[test]
    fn test_file_write_failed() {
        let err = file_write_failed("/path/to/file.txt", "disk full");
        assert!(matches!(err, StagehandError::FileWriteFailed { .. }));
        assert!(err.to_string().contains("Failed to write file"));
    }

    #[test]
    fn test_io_error() {
        let err = io_error("some error");
        assert!(matches!(err, StagehandError::IoError { .. }));
        assert!(err.to_string().contains("IO error"));
    }
}
