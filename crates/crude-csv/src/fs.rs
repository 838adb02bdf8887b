//! Directory-backed host implementations.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use serde_json::Value;
use tracing::trace;

use crate::error::{Error, Result};
use crate::host::{EntryKind, PluginRegistry, Vault, normalize_path};

/// Name of the per-vault configuration directory.
pub const CONFIG_DIR: &str = ".obsidian";

/// A vault rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a vault path onto disk. Paths escaping the root resolve to `None`.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let rel = Path::new(normalize_path(path));
        if rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }
        Some(self.root.join(rel))
    }

    fn resolve_or_err(&self, path: &str) -> Result<PathBuf> {
        self.resolve(path)
            .ok_or_else(|| Error::NotFound(path.to_string()))
    }
}

impl Vault for FsVault {
    fn kind(&self, path: &str) -> Option<EntryKind> {
        let meta = fs::metadata(self.resolve(path)?).ok()?;
        if meta.is_dir() {
            Some(EntryKind::Folder)
        } else if meta.is_file() {
            Some(EntryKind::File)
        } else {
            None
        }
    }

    fn read(&self, path: &str) -> Result<String> {
        let full = self.resolve_or_err(path)?;
        trace!(target: "fs", path = %full.display(), "vault_read");
        Ok(fs::read_to_string(full)?)
    }

    fn create(&mut self, path: &str, contents: &str) -> Result<()> {
        let full = self.resolve_or_err(path)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => Error::AlreadyExists(path.to_string()),
                _ => Error::Io(e),
            })?;
        file.write_all(contents.as_bytes())?;
        trace!(target: "fs", path = %full.display(), "vault_create");
        Ok(())
    }

    fn write(&mut self, path: &str, contents: &str) -> Result<()> {
        if !self.is_file(path) {
            return Err(Error::NotFound(path.to_string()));
        }
        let full = self.resolve_or_err(path)?;
        fs::write(full, contents)?;
        Ok(())
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        if self.kind(to).is_some() {
            return Err(Error::AlreadyExists(to.to_string()));
        }
        let (src, dst) = (self.resolve_or_err(from)?, self.resolve_or_err(to)?);
        fs::rename(&src, &dst)?;
        trace!(target: "fs", from = %src.display(), to = %dst.display(), "vault_rename");
        Ok(())
    }
}

/// Plugin state as recorded in a vault's configuration directory.
///
/// Community plugins are enabled by listing their id in
/// `community-plugins.json` and keep settings in `plugins/<id>/data.json`.
/// Core plugins are enabled in `core-plugins.json` (a list of ids, or an
/// object of id to bool) and keep options in `<id>.json`.
#[derive(Debug, Clone)]
pub struct VaultConfigRegistry {
    config_dir: PathBuf,
}

impl VaultConfigRegistry {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    pub fn for_vault(vault_root: &Path) -> Self {
        Self::new(vault_root.join(CONFIG_DIR))
    }

    fn read_json(&self, rel: impl AsRef<Path>) -> Result<Option<Value>> {
        let path = self.config_dir.join(rel);
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(serde_json::from_str(&s)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn string_field(value: Option<Value>, field: &str) -> Option<String> {
        value?.get(field)?.as_str().map(str::to_string)
    }
}

fn is_enabled(list: &Value, plugin_id: &str) -> bool {
    match list {
        Value::Array(ids) => ids.iter().any(|v| v.as_str() == Some(plugin_id)),
        Value::Object(map) => map.get(plugin_id).and_then(Value::as_bool).unwrap_or(false),
        _ => false,
    }
}

impl PluginRegistry for VaultConfigRegistry {
    fn community_setting(&self, plugin_id: &str, field: &str) -> Result<Option<String>> {
        let Some(enabled) = self.read_json("community-plugins.json")? else {
            return Ok(None);
        };
        if !is_enabled(&enabled, plugin_id) {
            return Ok(None);
        }
        let data = self.read_json(Path::new("plugins").join(plugin_id).join("data.json"))?;
        Ok(Self::string_field(data, field))
    }

    fn core_setting(&self, plugin_id: &str, field: &str) -> Result<Option<String>> {
        let Some(enabled) = self.read_json("core-plugins.json")? else {
            return Ok(None);
        };
        if !is_enabled(&enabled, plugin_id) {
            return Ok(None);
        }
        let options = self.read_json(format!("{plugin_id}.json"))?;
        Ok(Self::string_field(options, field))
    }
}
