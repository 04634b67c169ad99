//! Launcher script unit

use std::fs;
use std::path::{Path, PathBuf};

use super::{launcher_file_name, resolve_prefix, service_name};
use crate::context::InstallContext;
use crate::error::{Result, file_write_failed};
use crate::installer::Installable;
use crate::state::NodeState;

/// Writes the service launcher into `<prefix>/bin`, backing up any file
/// already sitting at that path. Rollback and uninstall remove the written
/// launcher and restore the backup.
#[derive(Debug, Default)]
pub struct LauncherUnit;

impl LauncherUnit {
    pub fn new() -> Self {
        Self::default()
    }

    fn remove_and_restore(
        &self,
        ctx: &InstallContext,
        path: &Path,
        backup: Option<&Path>,
    ) -> Result<()> {
        if path.exists() {
            fs::remove_file(path)
                .map_err(|err| file_write_failed(path.display().to_string(), err.to_string()))?;
            ctx.log_message(&format!("Removed launcher '{}'", path.display()));
        }
        if let Some(backup) = backup {
            if backup.exists() {
                fs::rename(backup, path)
                    .map_err(|err| file_write_failed(path.display().to_string(), err.to_string()))?;
                ctx.log_message(&format!("Restored previous launcher '{}'", path.display()));
            }
        }
        Ok(())
    }
}

impl Installable for LauncherUnit {
    fn name(&self) -> &str {
        "launcher"
    }

    fn help_text(&self) -> &str {
        "-name=<service>  launcher and manifest entry name"
    }

    fn install(&mut self, ctx: &InstallContext, state: &mut NodeState) -> Result<()> {
        let prefix = resolve_prefix(ctx)?;
        let name = service_name(ctx);
        let path = prefix.join("bin").join(launcher_file_name(&name));
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|err| {
                    file_write_failed(parent.display().to_string(), err.to_string())
                })?;
            }
        }
        if path.exists() {
            let backup = path.with_extension("orig");
            fs::rename(&path, &backup)
                .map_err(|err| file_write_failed(backup.display().to_string(), err.to_string()))?;
            ctx.log_message(&format!(
                "Backed up existing launcher to '{}'",
                backup.display()
            ));
            state.insert("backup", backup.display().to_string());
        }
        fs::write(&path, launcher_script(&name))
            .map_err(|err| file_write_failed(path.display().to_string(), err.to_string()))?;
        make_executable(&path)?;
        state.insert("launcher", path.display().to_string());
        ctx.log_message(&format!("Wrote launcher '{}'", path.display()));
        Ok(())
    }

    fn rollback(&mut self, ctx: &InstallContext, state: &mut NodeState) -> Result<()> {
        let Some(path) = state.get_str("launcher").map(PathBuf::from) else {
            return Ok(());
        };
        let backup = state.get_str("backup").map(PathBuf::from);
        self.remove_and_restore(ctx, &path, backup.as_deref())
    }

    fn uninstall(&mut self, ctx: &InstallContext, state: Option<&mut NodeState>) -> Result<()> {
        let (path, backup) = match &state {
            Some(st) => {
                let Some(path) = st.get_str("launcher").map(PathBuf::from) else {
                    return Ok(());
                };
                (path, st.get_str("backup").map(PathBuf::from))
            }
            None => {
                let prefix = resolve_prefix(ctx)?;
                let name = service_name(ctx);
                (prefix.join("bin").join(launcher_file_name(&name)), None)
            }
        };
        self.remove_and_restore(ctx, &path, backup.as_deref())
    }
}

fn launcher_script(name: &str) -> String {
    if cfg!(windows) {
        format!("@echo off\r\n\"%~dp0..\\libexec\\{name}.exe\" %*\r\n")
    } else {
        format!("#!/bin/sh\nexec \"$(dirname \"$0\")/../libexec/{name}\" \"$@\"\n")
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)
        .map_err(|err| file_write_failed(path.display().to_string(), err.to_string()))?
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
        .map_err(|err| file_write_failed(path.display().to_string(), err.to_string()))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
