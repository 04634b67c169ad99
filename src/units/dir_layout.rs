//! Directory layout unit

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::resolve_prefix;
use crate::context::InstallContext;
use crate::error::{Result, file_write_failed};
use crate::installer::Installable;
use crate::state::NodeState;

/// Subdirectories of the prefix, in creation order
const LAYOUT: [&str; 4] = ["bin", "etc", "var", "var/log"];

/// Creates the service directory layout under the prefix and removes the
/// directories it created, deepest first, when they are empty again.
#[derive(Debug, Default)]
pub struct DirLayoutUnit;

impl DirLayoutUnit {
    pub fn new() -> Self {
        Self::default()
    }

    fn remove_created(&self, ctx: &InstallContext, dirs: &[PathBuf]) {
        for dir in dirs.iter().rev() {
            if !dir.exists() {
                continue;
            }
            match is_empty_dir(dir) {
                Ok(true) => {
                    if fs::remove_dir(dir).is_ok() {
                        ctx.log_message(&format!("Removed directory '{}'", dir.display()));
                    }
                }
                Ok(false) => {
                    ctx.log_message(&format!(
                        "Leaving non-empty directory '{}'",
                        dir.display()
                    ));
                }
                Err(_) => {}
            }
        }
    }
}

impl Installable for DirLayoutUnit {
    fn name(&self) -> &str {
        "dir-layout"
    }

    fn help_text(&self) -> &str {
        "-prefix=<dir>  root directory of the service layout"
    }

    fn install(&mut self, ctx: &InstallContext, state: &mut NodeState) -> Result<()> {
        let prefix = resolve_prefix(ctx)?;
        let mut created: Vec<String> = Vec::new();
        for dir in layout_dirs(&prefix) {
            if !dir.exists() {
                fs::create_dir_all(&dir)
                    .map_err(|err| file_write_failed(dir.display().to_string(), err.to_string()))?;
                ctx.log_message(&format!("Created directory '{}'", dir.display()));
                created.push(dir.display().to_string());
            }
        }
        state.insert("prefix", prefix.display().to_string());
        state.insert("created", created);
        Ok(())
    }

    fn rollback(&mut self, ctx: &InstallContext, state: &mut NodeState) -> Result<()> {
        self.remove_created(ctx, &recorded_dirs(state));
        Ok(())
    }

    fn uninstall(&mut self, ctx: &InstallContext, state: Option<&mut NodeState>) -> Result<()> {
        let dirs = match &state {
            Some(st) => recorded_dirs(st),
            None => layout_dirs(&resolve_prefix(ctx)?),
        };
        self.remove_created(ctx, &dirs);
        Ok(())
    }
}

fn layout_dirs(prefix: &Path) -> Vec<PathBuf> {
    std::iter::once(prefix.to_path_buf())
        .chain(LAYOUT.iter().map(|dir| prefix.join(dir)))
        .collect()
}

/// The directories this unit created earlier, in creation order
fn recorded_dirs(state: &NodeState) -> Vec<PathBuf> {
    state
        .get("created")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(PathBuf::from)
                .collect()
        })
        .unwrap_or_default()
}

fn is_empty_dir(path: &Path) -> std::io::Result<bool> {
    Ok(fs::read_dir(path)?.next().is_none())
}
