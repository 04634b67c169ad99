//! Saved-state and recovery-file errors

use super::StagehandError;

/// Creates a corrupt-state error. Corruption is reported, never repaired.
pub fn corrupt(details: impl Into<String>) -> StagehandError {
    StagehandError::CorruptState {
        details: details.into(),
    }
}

/// Creates a missing-reserved-fields error
pub fn fields_missing() -> StagehandError {
    StagehandError::StateFieldsMissing
}

/// Creates a state file read error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> StagehandError {
    StagehandError::StateFileReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a state file write error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> StagehandError {
    StagehandError::StateFileWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a state file delete error
pub fn delete_failed(path: impl Into<String>, reason: impl Into<String>) -> StagehandError {
    StagehandError::StateFileDeleteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
