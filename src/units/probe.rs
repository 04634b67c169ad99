//! Target location probe

use std::fs;
use std::path::Path;

use super::resolve_prefix;
use crate::context::InstallContext;
use crate::error::{Result, file_write_failed};
use crate::installer::Installable;
use crate::state::NodeState;

const PROBE_FILE: &str = ".stagehand-probe";

/// Checks that the install prefix (or its nearest existing ancestor) is
/// writable, without installing anything. Registered as a manual entry so
/// discovery skips it; `check` runs it by name.
#[derive(Debug, Default)]
pub struct ProbeUnit;

impl ProbeUnit {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Installable for ProbeUnit {
    fn name(&self) -> &str {
        "probe"
    }

    fn install(&mut self, ctx: &InstallContext, _state: &mut NodeState) -> Result<()> {
        let prefix = resolve_prefix(ctx)?;
        let target = nearest_existing(&prefix);
        let probe = target.join(PROBE_FILE);
        fs::write(&probe, b"probe")
            .map_err(|err| file_write_failed(probe.display().to_string(), err.to_string()))?;
        fs::remove_file(&probe)
            .map_err(|err| file_write_failed(probe.display().to_string(), err.to_string()))?;
        ctx.log_message(&format!("Probe: '{}' is writable", target.display()));
        Ok(())
    }
}

/// Walks up from `path` to the first component that exists on disk
fn nearest_existing(path: &Path) -> &Path {
    let mut current = path;
    while !current.exists() {
        match current.parent() {
            Some(parent) => current = parent,
            None => return path,
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn prefix_ctx(prefix: &Path) -> InstallContext {
        InstallContext::new(
            None,
            &[
                format!("-prefix={}", prefix.display()),
                "-logtoconsole=no".to_string(),
            ],
        )
    }

    #[test]
    fn test_probe_accepts_writable_prefix() {
        let dir = TempDir::new().unwrap();
        let ctx = prefix_ctx(dir.path());
        let mut state = NodeState::new();
        let mut unit = ProbeUnit::new();

        unit.install(&ctx, &mut state).unwrap();

        assert!(!dir.path().join(PROBE_FILE).exists());
    }

    #[test]
    fn test_probe_climbs_to_existing_ancestor() {
        let dir = TempDir::new().unwrap();
        let prefix = dir.path().join("not/yet/created");
        let ctx = prefix_ctx(&prefix);
        let mut state = NodeState::new();
        let mut unit = ProbeUnit::new();

        unit.install(&ctx, &mut state).unwrap();

        // nothing was created along the way
        assert!(!prefix.exists());
        assert!(!dir.path().join("not").exists());
    }

    #[test]
    fn test_nearest_existing_stops_at_first_present_dir() {
        let dir = TempDir::new().unwrap();
        let deep = dir.path().join("a/b/c");

        assert_eq!(nearest_existing(&deep), dir.path());
        assert_eq!(nearest_existing(dir.path()), dir.path());
    }
}
