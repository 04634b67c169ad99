//! Unit registration and discovery errors

use super::StagehandError;

/// Creates a discovery failure error
pub fn discovery_failed(unit: impl Into<String>, reason: impl Into<String>) -> StagehandError {
    StagehandError::DiscoveryFailed {
        unit: unit.into(),
        reason: reason.into(),
    }
}

/// Creates an instantiation failure error naming the entry that failed
pub fn instantiation_failed(
    entry: impl Into<String>,
    reason: impl Into<String>,
) -> StagehandError {
    StagehandError::InstantiationFailed {
        entry: entry.into(),
        reason: reason.into(),
    }
}

/// Creates the strict-check failure for a unit with no auto-run entries
pub fn no_installers(unit: impl Into<String>) -> StagehandError {
    StagehandError::NoInstallersFound { unit: unit.into() }
}
