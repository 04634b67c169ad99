//! The four transaction phase walks
//!
//! Install is fail-fast: the first child failure aborts the walk, but the
//! per-child state collected so far (including the failed child's) is
//! always recorded so a later rollback knows exactly how far things got.
//! Commit, rollback and uninstall are best-effort: child failures are
//! logged, remembered and the walk continues; the last failure wins and is
//! surfaced at the end wrapped in the phase error carrying the reported
//! marker, so enclosing levels propagate it without logging it again.

use super::Phase;
use super::arena::{InstallerTree, NodeId};
use super::hooks::HookPoint;
use crate::context::InstallContext;
use crate::error::{Result, StagehandError, corrupt_state, fields_missing, hook_failed};
use crate::state::NodeState;

impl InstallerTree {
    /// Installs the node's own work, then its children in order.
    ///
    /// The reserved fields (last attempted child index and the per-child
    /// states) are written into `state` whether or not the walk
    /// succeeded. Hook failures around this phase are fatal.
    pub fn install(
        &mut self,
        node: NodeId,
        ctx: &InstallContext,
        state: &mut NodeState,
    ) -> Result<()> {
        if let Err(err) = self.node_mut(node).hooks.run(HookPoint::BeforeInstall, Some(state)) {
            return Err(self.fatal_hook_failure(node, HookPoint::BeforeInstall, &err, ctx));
        }
        let mut failure = self.payload_mut(node).install(ctx, state).err();
        let children = self.children(node).to_vec();
        let mut last_attempted: i64 = -1;
        let mut nested = Vec::with_capacity(children.len());
        if failure.is_none() {
            for child in children {
                let mut child_state = NodeState::new();
                last_attempted += 1;
                let result = self.install(child, ctx, &mut child_state);
                // recorded even when the child failed, so rollback can
                // undo whatever partial work the child wrote in there
                nested.push(child_state);
                if let Err(err) = result {
                    failure = Some(err);
                    break;
                }
            }
        }
        state.set_last_attempted(last_attempted);
        state.set_nested(nested);
        if let Some(err) = failure {
            return Err(err);
        }
        if let Err(err) = self.node_mut(node).hooks.run(HookPoint::AfterInstall, Some(state)) {
            return Err(self.fatal_hook_failure(node, HookPoint::AfterInstall, &err, ctx));
        }
        Ok(())
    }

    /// Finalizes a recorded install: the node's own work, then the
    /// children that were attempted, in install order.
    ///
    /// Hook failures here are warnings. Drops the last-attempted marker
    /// once the walk is done.
    pub fn commit(
        &mut self,
        node: NodeId,
        ctx: &InstallContext,
        state: &mut NodeState,
    ) -> Result<()> {
        if !state.has_reserved_fields() {
            return Err(fields_missing());
        }
        let mut pending = None;
        if let Err(err) = self.node_mut(node).hooks.run(HookPoint::BeforeCommit, Some(state)) {
            pending = Some(self.hook_warning(node, HookPoint::BeforeCommit, Phase::Commit, &err, ctx));
        }
        let last = state
            .last_attempted()
            .ok_or_else(|| corrupt_state("the last attempted index is not an integer"))?;
        let mut nested = state.take_nested()?;
        let children = self.children(node).to_vec();
        if last + 1 != nested.len() as i64 || last >= children.len() as i64 {
            return Err(corrupt_state(format!(
                "last attempted index {last} does not pair with {} recorded child states for {} children",
                nested.len(),
                children.len()
            )));
        }
        if let Err(err) = self.payload_mut(node).commit(ctx, state) {
            pending = Some(self.phase_failure(node, Phase::Commit, err, ctx));
        }
        for index in 0..nested.len() {
            let child = children[index];
            if let Err(err) = self.commit(child, ctx, &mut nested[index]) {
                pending = Some(self.phase_failure(child, Phase::Commit, err, ctx));
            }
        }
        state.set_nested(nested);
        state.clear_last_attempted();
        if let Err(err) = self.node_mut(node).hooks.run(HookPoint::AfterCommit, Some(state)) {
            pending = Some(self.hook_warning(node, HookPoint::AfterCommit, Phase::Commit, &err, ctx));
        }
        match pending {
            Some(err) => Err(err.into_reported(Phase::Commit)),
            None => Ok(()),
        }
    }

    /// Undoes a recorded install: the attempted children in reverse
    /// install order, then the node's own work.
    ///
    /// Hook failures here are warnings.
    pub fn rollback(
        &mut self,
        node: NodeId,
        ctx: &InstallContext,
        state: &mut NodeState,
    ) -> Result<()> {
        if !state.has_reserved_fields() {
            return Err(fields_missing());
        }
        let mut pending = None;
        if let Err(err) = self.node_mut(node).hooks.run(HookPoint::BeforeRollback, Some(state)) {
            pending =
                Some(self.hook_warning(node, HookPoint::BeforeRollback, Phase::Rollback, &err, ctx));
        }
        let last = state
            .last_attempted()
            .ok_or_else(|| corrupt_state("the last attempted index is not an integer"))?;
        let mut nested = state.take_nested()?;
        let children = self.children(node).to_vec();
        if last + 1 != nested.len() as i64 || last >= children.len() as i64 {
            return Err(corrupt_state(format!(
                "last attempted index {last} does not pair with {} recorded child states for {} children",
                nested.len(),
                children.len()
            )));
        }
        for index in (0..nested.len()).rev() {
            let child = children[index];
            if let Err(err) = self.rollback(child, ctx, &mut nested[index]) {
                pending = Some(self.phase_failure(child, Phase::Rollback, err, ctx));
            }
        }
        if let Err(err) = self.payload_mut(node).rollback(ctx, state) {
            pending = Some(self.phase_failure(node, Phase::Rollback, err, ctx));
        }
        state.set_nested(nested);
        if let Err(err) = self.node_mut(node).hooks.run(HookPoint::AfterRollback, Some(state)) {
            pending =
                Some(self.hook_warning(node, HookPoint::AfterRollback, Phase::Rollback, &err, ctx));
        }
        match pending {
            Some(err) => Err(err.into_reported(Phase::Rollback)),
            None => Ok(()),
        }
    }

    /// Removes installed work: every child in reverse order, then the
    /// node's own work.
    ///
    /// `state` may be absent (forced uninstall); every child then runs
    /// with absent state too. When present, the recorded child states
    /// must pair one-to-one with the current children.
    pub fn uninstall(
        &mut self,
        node: NodeId,
        ctx: &InstallContext,
        state: Option<&mut NodeState>,
    ) -> Result<()> {
        let mut state = state;
        let mut pending = None;
        if let Err(err) = self
            .node_mut(node)
            .hooks
            .run(HookPoint::BeforeUninstall, state.as_deref_mut())
        {
            pending = Some(self.hook_warning(
                node,
                HookPoint::BeforeUninstall,
                Phase::Uninstall,
                &err,
                ctx,
            ));
        }
        let children = self.children(node).to_vec();
        let mut nested: Vec<Option<NodeState>> = match state.as_deref_mut() {
            Some(st) => {
                let taken = match st.take_nested() {
                    Ok(taken) => taken,
                    Err(StagehandError::StateFieldsMissing) => {
                        return Err(corrupt_state("the saved state carries no per-child states"));
                    }
                    Err(err) => return Err(err),
                };
                if taken.len() != children.len() {
                    return Err(corrupt_state(format!(
                        "{} recorded child states do not match {} children",
                        taken.len(),
                        children.len()
                    )));
                }
                taken.into_iter().map(Some).collect()
            }
            None => std::iter::repeat_with(|| None).take(children.len()).collect(),
        };
        for index in (0..children.len()).rev() {
            let child = children[index];
            if let Err(err) = self.uninstall(child, ctx, nested[index].as_mut()) {
                pending = Some(self.phase_failure(child, Phase::Uninstall, err, ctx));
            }
        }
        if let Err(err) = self.payload_mut(node).uninstall(ctx, state.as_deref_mut()) {
            pending = Some(self.phase_failure(node, Phase::Uninstall, err, ctx));
        }
        if let Some(st) = state.as_deref_mut() {
            st.set_nested(nested.into_iter().flatten().collect());
        }
        if let Err(err) = self
            .node_mut(node)
            .hooks
            .run(HookPoint::AfterUninstall, state.as_deref_mut())
        {
            pending = Some(self.hook_warning(
                node,
                HookPoint::AfterUninstall,
                Phase::Uninstall,
                &err,
                ctx,
            ));
        }
        match pending {
            Some(err) => Err(err.into_reported(Phase::Uninstall)),
            None => Ok(()),
        }
    }

    /// Install-phase hook failures abort the transaction
    fn fatal_hook_failure(
        &self,
        node: NodeId,
        point: HookPoint,
        err: &StagehandError,
        ctx: &InstallContext,
    ) -> StagehandError {
        let name = self.name(node);
        ctx.log_message(&format!(
            "Error: An error occurred in the {} handler of '{name}'",
            point.label()
        ));
        ctx.log_error(err);
        hook_failed(point.label(), name, err.to_string())
    }

    /// Hook failures outside the install phase are logged and remembered
    /// but never stop the walk
    fn hook_warning(
        &self,
        node: NodeId,
        point: HookPoint,
        phase: Phase,
        err: &StagehandError,
        ctx: &InstallContext,
    ) -> StagehandError {
        let name = self.name(node);
        ctx.log_message(&format!(
            "Warning: An error occurred in the {} handler of '{name}'",
            point.label()
        ));
        ctx.log_error(err);
        ctx.log_message(&format!("An error occurred during the {phase} phase"));
        hook_failed(point.label(), name, err.to_string())
    }

    /// Logs a traversal failure unless some level below already did
    fn phase_failure(
        &self,
        node: NodeId,
        phase: Phase,
        err: StagehandError,
        ctx: &InstallContext,
    ) -> StagehandError {
        if !err.is_reported() {
            ctx.log_message(&format!(
                "An error occurred during the {phase} phase of '{}'",
                self.name(node)
            ));
            ctx.log_error(&err);
            ctx.log_message(&format!("An error occurred during the {phase} phase"));
        }
        err
    }
}
