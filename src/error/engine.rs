//! Transaction engine errors

use super::StagehandError;

/// Creates a missing-argument error
pub fn missing_argument(name: impl Into<String>) -> StagehandError {
    StagehandError::MissingArgument { name: name.into() }
}

/// Creates a tree structure violation error
pub fn bad_parent(node: impl Into<String>, reason: impl Into<String>) -> StagehandError {
    StagehandError::BadParent {
        node: node.into(),
        reason: reason.into(),
    }
}

/// Creates a hook failure error. Fatal when raised by the install phase.
pub fn hook_failed(
    hook: impl Into<String>,
    node: impl Into<String>,
    reason: impl Into<String>,
) -> StagehandError {
    StagehandError::HookFailed {
        hook: hook.into(),
        node: node.into(),
        reason: reason.into(),
    }
}
