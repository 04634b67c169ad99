//! Installer tree and transaction engine
//!
//! This module handles:
//! - Arranging installable units into an ordered tree (index arena)
//! - Walking the tree through the four-phase transaction
//! - Recording per-node recovery state during the install phase
//! - Running registered before/after callbacks around each phase
//!
//! The install phase is fail-fast and records, for every node, how far the
//! walk got and what each child saved, so a later commit finishes the work
//! and a later rollback or uninstall undoes it, possibly from another
//! process, using the state the discovery façade persisted.

mod arena;
mod engine;
mod hooks;

pub use arena::{InstallerTree, NodeId};
pub use hooks::{HookFn, HookPoint, Hooks};

use std::fmt;

use crate::context::InstallContext;
use crate::error::Result;
use crate::state::NodeState;

/// The four phases of an install transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Install,
    Commit,
    Rollback,
    Uninstall,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Install => "install",
            Phase::Commit => "commit",
            Phase::Rollback => "rollback",
            Phase::Uninstall => "uninstall",
        };
        f.write_str(name)
    }
}

/// Behavior of one node in the installer tree.
///
/// Implementations do their own work only; walking children, recording the
/// reserved state fields and collecting failures is the engine's job. The
/// per-phase methods default to no-ops so grouping nodes implement just
/// what they need.
pub trait Installable {
    /// Name used in log lines and error messages
    fn name(&self) -> &str;

    /// Help text describing the unit's parameters; empty entries are
    /// skipped when a tree aggregates its descendants' help
    fn help_text(&self) -> &str {
        ""
    }

    /// Performs the unit's work, recording in `state` whatever a later
    /// rollback or uninstall needs to undo it
    fn install(&mut self, _ctx: &InstallContext, _state: &mut NodeState) -> Result<()> {
        Ok(())
    }

    /// Finalizes installed work once the whole transaction succeeded
    fn commit(&mut self, _ctx: &InstallContext, _state: &mut NodeState) -> Result<()> {
        Ok(())
    }

    /// Undoes whatever `install` recorded in `state`
    fn rollback(&mut self, _ctx: &InstallContext, _state: &mut NodeState) -> Result<()> {
        Ok(())
    }

    /// Removes the unit's installed work. `state` is absent on a forced
    /// uninstall where no recorded install exists.
    fn uninstall(&mut self, _ctx: &InstallContext, _state: Option<&mut NodeState>) -> Result<()> {
        Ok(())
    }
}

impl fmt::Debug for dyn Installable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Installable")
            .field("name", &self.name())
            .finish()
    }
}

/// A node with no behavior of its own, used to group children
pub struct Group {
    name: String,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Installable for Group {
    fn name(&self) -> &str {
        &self.name
    }
}
