//! Unit installer façade
//!
//! A [`UnitInstaller`] ties one unit to the transaction engine: it looks
//! the unit up in the [`Registry`](crate::registry::Registry), mounts the
//! discovered installables under a grouping root, and drives the phase
//! walks together with the state-file lifecycle around them.
//!
//! The recovery file lives next to the unit as `<stem>.instate` (or under
//! `-statedir` keeping the same file name) and follows the lifecycle the
//! phases imply: install writes it even when the walk failed, commit
//! leaves it as the install phase wrote it, rollback and uninstall delete
//! it. Uninstall is the only phase willing to proceed when the file is
//! unreadable.

use std::fs;
use std::path::{Path, PathBuf};

use crate::context::InstallContext;
use crate::error::{
    Result, missing_argument, no_installers_found, state_delete_failed, state_read_failed,
    state_write_failed,
};
use crate::installer::{Group, InstallerTree, NodeId, Phase};
use crate::registry::Registry;
use crate::state::NodeState;

/// Extension of the recovery file written next to the unit
const STATE_EXTENSION: &str = "instate";

/// Extension of the default log file written next to the unit
const LOG_EXTENSION: &str = "log";

/// Drives the four phases for one unit, persisting recovery state between
/// invocations
pub struct UnitInstaller {
    unit_path: PathBuf,
    name: String,
    ctx: InstallContext,
    tree: InstallerTree,
    root: NodeId,
    initialized: bool,
}

impl UnitInstaller {
    /// Builds the façade for a unit path. `tokens` are the raw `-name=value`
    /// parameters; the default log file is `<unit>.log` unless a `logfile`
    /// parameter overrides it.
    pub fn new(unit_path: impl Into<PathBuf>, tokens: &[String]) -> Self {
        let unit_path = unit_path.into();
        let name = unit_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| unit_path.display().to_string());
        let default_log = unit_path.with_extension(LOG_EXTENSION);
        let mut ctx = InstallContext::new(Some(&default_log), tokens);
        ctx.set_param("unitpath", unit_path.display().to_string());
        let mut tree = InstallerTree::new();
        let root = tree.insert(Box::new(Group::new(name.clone())));
        Self {
            unit_path,
            name,
            ctx,
            tree,
            root,
            initialized: false,
        }
    }

    /// The unit name, the stem of the unit path
    pub fn unit_name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> &InstallContext {
        &self.ctx
    }

    /// Where the recovery state lives: `<unit>.instate`, relocated into
    /// `-statedir` when that parameter is set, keeping the file name
    pub fn state_path(&self) -> PathBuf {
        let default = self.unit_path.with_extension(STATE_EXTENSION);
        match self.ctx.param("statedir") {
            Some(dir) if !dir.is_empty() => match default.file_name() {
                Some(file) => Path::new(dir).join(file),
                None => default,
            },
            _ => default,
        }
    }

    /// Runs the install phase and persists the recorded state, even when
    /// the walk failed, so a later rollback knows what to undo
    pub fn install(&mut self, registry: &Registry) -> Result<()> {
        self.banner(Phase::Install);
        self.ensure_initialized(registry)?;
        if self.tree.child_count(self.root) == 0 {
            self.ctx.log_message(&format!(
                "No installable entries found for unit '{}'",
                self.name
            ));
        }
        let mut state = NodeState::new();
        let result = self.tree.install(self.root, &self.ctx, &mut state);
        let persisted = if state.is_empty() {
            self.delete_state()
        } else {
            self.write_state(&state)
        };
        self.ctx.flush_log();
        self.prefer_phase_error(result, persisted)
    }

    /// Finalizes a recorded install. The state file is left exactly as the
    /// install phase wrote it.
    pub fn commit(&mut self, registry: &Registry) -> Result<()> {
        self.banner(Phase::Commit);
        self.ensure_initialized(registry)?;
        let mut state = self
            .saved_state()?
            .ok_or_else(|| missing_argument("saved state"))?;
        let result = self.tree.commit(self.root, &self.ctx, &mut state);
        let removed = if self.tree.child_count(self.root) == 0 {
            self.delete_state()
        } else {
            Ok(())
        };
        self.ctx.flush_log();
        self.prefer_phase_error(result, removed)
    }

    /// Undoes a recorded install and removes the state file
    pub fn rollback(&mut self, registry: &Registry) -> Result<()> {
        self.banner(Phase::Rollback);
        self.ensure_initialized(registry)?;
        let mut state = self
            .saved_state()?
            .ok_or_else(|| missing_argument("saved state"))?;
        let result = self.tree.rollback(self.root, &self.ctx, &mut state);
        let removed = self.delete_state();
        self.ctx.flush_log();
        self.prefer_phase_error(result, removed)
    }

    /// Removes the unit's installed work. A missing or unreadable state
    /// file downgrades to a forced uninstall; the file is removed either
    /// way.
    pub fn uninstall(&mut self, registry: &Registry) -> Result<()> {
        self.banner(Phase::Uninstall);
        self.ensure_initialized(registry)?;
        let mut state = self.load_state_lenient();
        let result = self.tree.uninstall(self.root, &self.ctx, state.as_mut());
        let removed = self.delete_state();
        self.ctx.flush_log();
        self.prefer_phase_error(result, removed)
    }

    /// Verifies the unit resolves to at least one constructible auto-run
    /// entry; returns how many
    pub fn check_installable(&self, registry: &Registry) -> Result<usize> {
        let mut count = 0;
        for entry in registry.entries(&self.name)? {
            if entry.auto_run() {
                entry.construct()?;
                count += 1;
            }
        }
        if count == 0 {
            return Err(no_installers_found(&self.name));
        }
        Ok(count)
    }

    /// Aggregated parameter help of the unit's installables
    pub fn describe(&mut self, registry: &Registry) -> Result<String> {
        self.ensure_initialized(registry)?;
        Ok(self.tree.help_text(self.root))
    }

    /// The recorded state, if a state file exists. Read and parse problems
    /// are errors here; only uninstall tolerates them.
    pub fn saved_state(&self) -> Result<Option<NodeState>> {
        let path = self.state_path();
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)
            .map_err(|err| state_read_failed(path.display().to_string(), err.to_string()))?;
        let state: NodeState = serde_json::from_str(&text)?;
        Ok(Some(state))
    }

    fn ensure_initialized(&mut self, registry: &Registry) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        for payload in registry.discover(&self.name)? {
            let node = self.tree.insert(payload);
            self.tree.add_child(self.root, node)?;
        }
        self.initialized = true;
        Ok(())
    }

    fn banner(&self, phase: Phase) {
        self.ctx.log_message("");
        self.ctx.log_message("__________________________________________");
        self.ctx
            .log_message(&format!("Running the {phase} phase for unit '{}'", self.name));
        self.ctx.log_parameters();
    }

    fn load_state_lenient(&self) -> Option<NodeState> {
        let path = self.state_path();
        if !path.exists() {
            return None;
        }
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                self.warn_unreadable_state(&path, &err.to_string());
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(state) => Some(state),
            Err(err) => {
                self.warn_unreadable_state(&path, &err.to_string());
                None
            }
        }
    }

    fn warn_unreadable_state(&self, path: &Path, reason: &str) {
        self.ctx.log_message(&format!(
            "Warning: the saved state in '{}' could not be read: {reason}",
            path.display()
        ));
        self.ctx
            .log_message("Continuing the uninstall without recorded state");
    }

    fn write_state(&self, state: &NodeState) -> Result<()> {
        let path = self.state_path();
        let text = serde_json::to_string_pretty(state)
            .map_err(|err| state_write_failed(path.display().to_string(), err.to_string()))?;
        fs::write(&path, text)
            .map_err(|err| state_write_failed(path.display().to_string(), err.to_string()))
    }

    fn delete_state(&self) -> Result<()> {
        let path = self.state_path();
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|err| state_delete_failed(path.display().to_string(), err.to_string()))?;
        }
        Ok(())
    }

    /// A phase failure outranks a state-file housekeeping failure; the
    /// latter is then only logged
    fn prefer_phase_error(&self, phase_result: Result<()>, file_result: Result<()>) -> Result<()> {
        match (phase_result, file_result) {
            (Ok(()), file_result) => file_result,
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(file_err)) => {
                self.ctx.log_message(&format!("Warning: {file_err}"));
                Err(err)
            }
        }
    }
}
