//! Built-in installable units
//!
//! The units registered under the `stagehand` unit name install a small
//! service footprint: the directory layout, a launcher script and a
//! manifest entry. A manual probe entry checks the target location without
//! installing anything; `check` runs it by name.
//!
//! All of them read their target from the `-prefix` parameter, falling
//! back to the platform data directory.

mod dir_layout;
mod launcher;
mod manifest;
mod probe;

pub use dir_layout::DirLayoutUnit;
pub use launcher::LauncherUnit;
pub use manifest::ManifestUnit;
pub use probe::ProbeUnit;

use std::path::PathBuf;

use crate::context::InstallContext;
use crate::error::{Result, missing_argument};
use crate::installer::Installable;
use crate::registry::{Registry, UnitEntry};

/// Unit name the built-in entries are registered under
pub const BUILTIN_UNIT: &str = "stagehand";

/// Launcher and manifest entry name when `-name` is not given
pub const DEFAULT_SERVICE_NAME: &str = "stagehand-service";

/// The registry every command starts from
pub fn builtin_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register(BUILTIN_UNIT, UnitEntry::new("dir-layout", dir_layout_entry));
    registry.register(BUILTIN_UNIT, UnitEntry::new("launcher", launcher_entry));
    registry.register(BUILTIN_UNIT, UnitEntry::new("manifest", manifest_entry));
    registry.register(BUILTIN_UNIT, UnitEntry::manual("probe", probe_entry));
    registry
}

fn dir_layout_entry() -> Result<Box<dyn Installable>> {
    Ok(Box::new(DirLayoutUnit::new()))
}

fn launcher_entry() -> Result<Box<dyn Installable>> {
    Ok(Box::new(LauncherUnit::new()))
}

fn manifest_entry() -> Result<Box<dyn Installable>> {
    Ok(Box::new(ManifestUnit::new()))
}

fn probe_entry() -> Result<Box<dyn Installable>> {
    Ok(Box::new(ProbeUnit::new()))
}

/// The install prefix: the `-prefix` parameter, or the platform data
/// directory under a `stagehand` subdirectory
pub(crate) fn resolve_prefix(ctx: &InstallContext) -> Result<PathBuf> {
    if let Some(dir) = ctx.param("prefix") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    dirs::data_local_dir()
        .map(|base| base.join("stagehand"))
        .ok_or_else(|| missing_argument("prefix"))
}

/// The service name the launcher and manifest agree on
pub(crate) fn service_name(ctx: &InstallContext) -> String {
    ctx.param("name")
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string())
}

/// Platform file name of the launcher script
pub(crate) fn launcher_file_name(name: &str) -> String {
    if cfg!(windows) {
        format!("{name}.cmd")
    } else {
        name.to_string()
    }
}
