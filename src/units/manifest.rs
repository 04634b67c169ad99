//! Service manifest unit

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};

use super::{launcher_file_name, resolve_prefix, service_name};
use crate::context::InstallContext;
use crate::error::{Result, file_read_failed, file_write_failed};
use crate::installer::Installable;
use crate::state::NodeState;

const MANIFEST_FILE: &str = "services.json";

/// Registers the service in `<prefix>/etc/services.json`. An entry already
/// present under the same name is kept aside so rollback can put it back;
/// uninstall removes the entry outright.
#[derive(Debug, Default)]
pub struct ManifestUnit;

impl ManifestUnit {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Installable for ManifestUnit {
    fn name(&self) -> &str {
        "manifest"
    }

    fn install(&mut self, ctx: &InstallContext, state: &mut NodeState) -> Result<()> {
        let prefix = resolve_prefix(ctx)?;
        let name = service_name(ctx);
        let path = manifest_path(&prefix);
        let mut manifest = load_manifest(&path)?;
        let services = services_table(&path, &mut manifest)?;
        if let Some(previous) = services.get(&name).cloned() {
            state.insert("replaced", previous);
        }
        services.insert(
            name.clone(),
            json!({
                "launcher": format!("bin/{}", launcher_file_name(&name)),
                "version": env!("CARGO_PKG_VERSION"),
            }),
        );
        save_manifest(&path, &manifest)?;
        state.insert("manifest", path.display().to_string());
        state.insert("entry", name.clone());
        ctx.log_message(&format!("Registered '{name}' in '{}'", path.display()));
        Ok(())
    }

    fn rollback(&mut self, ctx: &InstallContext, state: &mut NodeState) -> Result<()> {
        let Some(path) = state.get_str("manifest").map(PathBuf::from) else {
            return Ok(());
        };
        let Some(entry) = state.get_str("entry").map(str::to_string) else {
            return Ok(());
        };
        if !path.exists() {
            return Ok(());
        }
        let mut manifest = load_manifest(&path)?;
        let services = services_table(&path, &mut manifest)?;
        match state.get("replaced").cloned() {
            Some(previous) => {
                services.insert(entry.clone(), previous);
                ctx.log_message(&format!("Restored the previous '{entry}' manifest entry"));
            }
            None => {
                services.remove(&entry);
                ctx.log_message(&format!("Removed '{entry}' from '{}'", path.display()));
            }
        }
        save_manifest(&path, &manifest)
    }

    fn uninstall(&mut self, ctx: &InstallContext, state: Option<&mut NodeState>) -> Result<()> {
        let (path, entry) = match &state {
            Some(st) => match (st.get_str("manifest"), st.get_str("entry")) {
                (Some(path), Some(entry)) => (PathBuf::from(path), entry.to_string()),
                _ => return Ok(()),
            },
            None => {
                let prefix = resolve_prefix(ctx)?;
                (manifest_path(&prefix), service_name(ctx))
            }
        };
        if !path.exists() {
            return Ok(());
        }
        let mut manifest = load_manifest(&path)?;
        let services = services_table(&path, &mut manifest)?;
        if services.remove(&entry).is_some() {
            ctx.log_message(&format!("Removed '{entry}' from '{}'", path.display()));
        }
        save_manifest(&path, &manifest)
    }
}

fn manifest_path(prefix: &Path) -> PathBuf {
    prefix.join("etc").join(MANIFEST_FILE)
}

fn load_manifest(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Ok(json!({ "services": {} }));
    }
    let text = fs::read_to_string(path)
        .map_err(|err| file_read_failed(path.display().to_string(), err.to_string()))?;
    serde_json::from_str(&text)
        .map_err(|err| file_read_failed(path.display().to_string(), err.to_string()))
}

/// The mutable `services` object inside the manifest, created when absent
fn services_table<'m>(path: &Path, manifest: &'m mut Value) -> Result<&'m mut Map<String, Value>> {
    let root = manifest
        .as_object_mut()
        .ok_or_else(|| file_read_failed(path.display().to_string(), "the manifest root is not an object"))?;
    let services = root
        .entry("services".to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    services
        .as_object_mut()
        .ok_or_else(|| file_read_failed(path.display().to_string(), "the services table is not an object"))
}

fn save_manifest(path: &Path, manifest: &Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)
                .map_err(|err| file_write_failed(parent.display().to_string(), err.to_string()))?;
        }
    }
    let text = serde_json::to_string_pretty(manifest)
        .map_err(|err| file_write_failed(path.display().to_string(), err.to_string()))?;
    fs::write(path, text)
        .map_err(|err| file_write_failed(path.display().to_string(), err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StagehandError;
    use tempfile::TempDir;

    fn named_ctx(prefix: &Path, name: &str) -> InstallContext {
        InstallContext::new(
            None,
            &[
                format!("-prefix={}", prefix.display()),
                format!("-name={name}"),
                "-logtoconsole=no".to_string(),
            ],
        )
    }

    fn manifest_value(prefix: &Path) -> Value {
        let text = fs::read_to_string(manifest_path(prefix)).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn test_install_creates_manifest_with_entry() {
        let dir = TempDir::new().unwrap();
        let ctx = named_ctx(dir.path(), "demo");
        let mut state = NodeState::new();
        let mut unit = ManifestUnit::new();

        unit.install(&ctx, &mut state).unwrap();

        let manifest = manifest_value(dir.path());
        assert_eq!(
            manifest["services"]["demo"]["launcher"],
            format!("bin/{}", launcher_file_name("demo"))
        );
        assert_eq!(state.get_str("entry"), Some("demo"));
    }

    #[test]
    fn test_install_keeps_other_entries() {
        let dir = TempDir::new().unwrap();
        let ctx = named_ctx(dir.path(), "demo");
        let path = manifest_path(dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{ "services": { "other": { "launcher": "bin/other" } } }"#).unwrap();
        let mut state = NodeState::new();
        let mut unit = ManifestUnit::new();

        unit.install(&ctx, &mut state).unwrap();

        let manifest = manifest_value(dir.path());
        assert_eq!(manifest["services"]["other"]["launcher"], "bin/other");
        assert!(manifest["services"]["demo"].is_object());
    }

    #[test]
    fn test_rollback_restores_replaced_entry() {
        let dir = TempDir::new().unwrap();
        let ctx = named_ctx(dir.path(), "demo");
        let path = manifest_path(dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{ "services": { "demo": { "launcher": "bin/old-demo" } } }"#).unwrap();
        let mut state = NodeState::new();
        let mut unit = ManifestUnit::new();
        unit.install(&ctx, &mut state).unwrap();

        unit.rollback(&ctx, &mut state).unwrap();

        let manifest = manifest_value(dir.path());
        assert_eq!(manifest["services"]["demo"]["launcher"], "bin/old-demo");
    }

    #[test]
    fn test_rollback_removes_fresh_entry() {
        let dir = TempDir::new().unwrap();
        let ctx = named_ctx(dir.path(), "demo");
        let mut state = NodeState::new();
        let mut unit = ManifestUnit::new();
        unit.install(&ctx, &mut state).unwrap();

        unit.rollback(&ctx, &mut state).unwrap();

        let manifest = manifest_value(dir.path());
        assert!(manifest["services"]["demo"].is_null());
    }

    #[test]
    fn test_uninstall_removes_entry() {
        let dir = TempDir::new().unwrap();
        let ctx = named_ctx(dir.path(), "demo");
        let mut state = NodeState::new();
        let mut unit = ManifestUnit::new();
        unit.install(&ctx, &mut state).unwrap();

        unit.uninstall(&ctx, Some(&mut state)).unwrap();

        let manifest = manifest_value(dir.path());
        assert!(manifest["services"]["demo"].is_null());
    }

    #[test]
    fn test_stateless_uninstall_removes_named_entry() {
        let dir = TempDir::new().unwrap();
        let ctx = named_ctx(dir.path(), "demo");
        let mut state = NodeState::new();
        let mut unit = ManifestUnit::new();
        unit.install(&ctx, &mut state).unwrap();

        unit.uninstall(&ctx, None).unwrap();

        let manifest = manifest_value(dir.path());
        assert!(manifest["services"]["demo"].is_null());
    }

    #[test]
    fn test_unparseable_manifest_is_a_read_failure() {
        let dir = TempDir::new().unwrap();
        let ctx = named_ctx(dir.path(), "demo");
        let path = manifest_path(dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();
        let mut state = NodeState::new();
        let mut unit = ManifestUnit::new();

        let err = unit.install(&ctx, &mut state).unwrap_err();

        assert!(matches!(err, StagehandError::FileReadFailed { .. }));
    }
}
