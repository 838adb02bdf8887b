//! Narrow interfaces to the host environment.
//!
//! The core never touches storage, UI, or plugin internals directly; it is
//! handed implementations of these traits. In-memory implementations live
//! here, the directory-backed ones in [`crate::fs`].

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::grid::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Folder,
}

/// Document storage, addressed by `/`-separated vault-relative paths.
pub trait Vault {
    /// `None` when nothing exists at `path`.
    fn kind(&self, path: &str) -> Option<EntryKind>;
    fn read(&self, path: &str) -> Result<String>;
    fn create(&mut self, path: &str, contents: &str) -> Result<()>;
    fn write(&mut self, path: &str, contents: &str) -> Result<()>;
    fn rename(&mut self, from: &str, to: &str) -> Result<()>;

    fn is_file(&self, path: &str) -> bool {
        self.kind(path) == Some(EntryKind::File)
    }

    fn is_folder(&self, path: &str) -> bool {
        self.kind(path) == Some(EntryKind::Folder)
    }
}

/// Fire-and-forget user-visible messages.
pub trait Notifier {
    fn notice(&self, message: &str);
}

/// Callbacks an open CSV view needs from its host.
pub trait ViewHost: Notifier {
    fn request_save(&mut self);
    fn request_render(&mut self, grid: &Grid);
}

/// Lookup of other plugins' configuration.
///
/// `Ok(None)` covers "not installed", "disabled", and "field unset" alike.
pub trait PluginRegistry {
    fn community_setting(&self, plugin_id: &str, field: &str) -> Result<Option<String>>;
    fn core_setting(&self, plugin_id: &str, field: &str) -> Result<Option<String>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoPlugins;

impl PluginRegistry for NoPlugins {
    fn community_setting(&self, _plugin_id: &str, _field: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn core_setting(&self, _plugin_id: &str, _field: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Settings of enabled plugins captured up front, keyed by plugin id then field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginSnapshot {
    #[serde(default)]
    pub community: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    pub core: BTreeMap<String, BTreeMap<String, String>>,
}

impl PluginSnapshot {
    pub fn with_community(mut self, plugin_id: &str, field: &str, value: &str) -> Self {
        self.community
            .entry(plugin_id.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        self
    }

    pub fn with_core(mut self, plugin_id: &str, field: &str, value: &str) -> Self {
        self.core
            .entry(plugin_id.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        self
    }
}

impl PluginRegistry for PluginSnapshot {
    fn community_setting(&self, plugin_id: &str, field: &str) -> Result<Option<String>> {
        Ok(self.community.get(plugin_id).and_then(|p| p.get(field)).cloned())
    }

    fn core_setting(&self, plugin_id: &str, field: &str) -> Result<Option<String>> {
        Ok(self.core.get(plugin_id).and_then(|p| p.get(field)).cloned())
    }
}

/// Strip surrounding slashes; the vault root is the empty path.
pub fn normalize_path(path: &str) -> &str {
    path.trim_matches('/')
}

/// Parent folder of `path`, or the root (`""`) for top-level entries.
pub fn parent_path(path: &str) -> &str {
    let path = normalize_path(path);
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryVault {
    files: BTreeMap<String, String>,
    folders: BTreeSet<String>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, creating any missing parent folders.
    pub fn with_file(mut self, path: &str, contents: &str) -> Self {
        let path = normalize_path(path);
        self.add_parents(path);
        self.files.insert(path.to_string(), contents.to_string());
        self
    }

    pub fn with_folder(mut self, path: &str) -> Self {
        let path = normalize_path(path);
        self.add_parents(path);
        if !path.is_empty() {
            self.folders.insert(path.to_string());
        }
        self
    }

    pub fn files(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn add_parents(&mut self, path: &str) {
        let mut parent = parent_path(path);
        while !parent.is_empty() {
            self.folders.insert(parent.to_string());
            parent = parent_path(parent);
        }
    }
}

impl Vault for MemoryVault {
    fn kind(&self, path: &str) -> Option<EntryKind> {
        let path = normalize_path(path);
        if path.is_empty() || self.folders.contains(path) {
            Some(EntryKind::Folder)
        } else if self.files.contains_key(path) {
            Some(EntryKind::File)
        } else {
            None
        }
    }

    fn read(&self, path: &str) -> Result<String> {
        self.files
            .get(normalize_path(path))
            .cloned()
            .ok_or_else(|| Error::NotFound(path.to_string()))
    }

    fn create(&mut self, path: &str, contents: &str) -> Result<()> {
        let path = normalize_path(path);
        if self.kind(path).is_some() {
            return Err(Error::AlreadyExists(path.to_string()));
        }
        let parent = parent_path(path);
        if !self.is_folder(parent) {
            return Err(Error::NotFound(parent.to_string()));
        }
        self.files.insert(path.to_string(), contents.to_string());
        Ok(())
    }

    fn write(&mut self, path: &str, contents: &str) -> Result<()> {
        match self.files.get_mut(normalize_path(path)) {
            Some(existing) => {
                *existing = contents.to_string();
                Ok(())
            }
            None => Err(Error::NotFound(path.to_string())),
        }
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        let (from, to) = (normalize_path(from), normalize_path(to));
        if self.kind(to).is_some() {
            return Err(Error::AlreadyExists(to.to_string()));
        }
        if !self.is_folder(parent_path(to)) {
            return Err(Error::NotFound(parent_path(to).to_string()));
        }
        let contents = self
            .files
            .remove(from)
            .ok_or_else(|| Error::NotFound(from.to_string()))?;
        self.files.insert(to.to_string(), contents);
        Ok(())
    }
}
