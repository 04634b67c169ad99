//! Before/after callbacks around each transaction phase
//!
//! Hooks replace the event surface of classic installer frameworks with an
//! explicit ordered list per registration point: callbacks run
//! synchronously in registration order and the first failure stops the
//! rest of that list. How a hook failure affects the transaction depends
//! on the phase: fatal around install, a logged warning everywhere else.

use crate::error::Result;
use crate::state::NodeState;

/// A registered callback. Receives the node's saved state; absent only for
/// a forced uninstall.
pub type HookFn = Box<dyn FnMut(Option<&mut NodeState>) -> Result<()>>;

/// The eight registration points around the four phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPoint {
    BeforeInstall,
    AfterInstall,
    BeforeCommit,
    AfterCommit,
    BeforeRollback,
    AfterRollback,
    BeforeUninstall,
    AfterUninstall,
}

impl HookPoint {
    /// Label used in log lines and hook failure errors
    pub fn label(self) -> &'static str {
        match self {
            HookPoint::BeforeInstall => "before-install",
            HookPoint::AfterInstall => "after-install",
            HookPoint::BeforeCommit => "before-commit",
            HookPoint::AfterCommit => "after-commit",
            HookPoint::BeforeRollback => "before-rollback",
            HookPoint::AfterRollback => "after-rollback",
            HookPoint::BeforeUninstall => "before-uninstall",
            HookPoint::AfterUninstall => "after-uninstall",
        }
    }
}

/// The callback lists of one node
#[derive(Default)]
pub struct Hooks {
    before_install: Vec<HookFn>,
    after_install: Vec<HookFn>,
    before_commit: Vec<HookFn>,
    after_commit: Vec<HookFn>,
    before_rollback: Vec<HookFn>,
    after_rollback: Vec<HookFn>,
    before_uninstall: Vec<HookFn>,
    after_uninstall: Vec<HookFn>,
}

impl Hooks {
    /// Appends a callback to one registration point
    pub fn add(&mut self, point: HookPoint, hook: HookFn) {
        self.list_mut(point).push(hook);
    }

    /// Runs one list in registration order; the first failing callback
    /// stops the remainder of the list
    pub(crate) fn run(&mut self, point: HookPoint, state: Option<&mut NodeState>) -> Result<()> {
        let mut state = state;
        for hook in self.list_mut(point) {
            hook(state.as_deref_mut())?;
        }
        Ok(())
    }

    fn list_mut(&mut self, point: HookPoint) -> &mut Vec<HookFn> {
        match point {
            HookPoint::BeforeInstall => &mut self.before_install,
            HookPoint::AfterInstall => &mut self.after_install,
            HookPoint::BeforeCommit => &mut self.before_commit,
            HookPoint::AfterCommit => &mut self.after_commit,
            HookPoint::BeforeRollback => &mut self.before_rollback,
            HookPoint::AfterRollback => &mut self.after_rollback,
            HookPoint::BeforeUninstall => &mut self.before_uninstall,
            HookPoint::AfterUninstall => &mut self.after_uninstall,
        }
    }
}
