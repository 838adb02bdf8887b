//! Seed content for newly created CSV documents.
//!
//! Candidate sources are tried in a fixed order and the first one that
//! yields readable text wins. A source that is missing, disabled, or fails
//! to read simply declines; the chain falls through to the next and ends at
//! [`DEFAULT_TEMPLATE`].

use tracing::debug;

use crate::error::Result;
use crate::host::{PluginRegistry, Vault};
use crate::settings::Settings;

pub const DEFAULT_TEMPLATE: &str = "A,B\n0,0\n1,1";

/// Conventional file name looked up inside template folders.
pub const TEMPLATE_FILE_NAME: &str = "template.csv";

pub const TEMPLATER_PLUGIN_ID: &str = "templater-obsidian";
pub const TEMPLATER_FOLDER_FIELD: &str = "templates_folder";
pub const CORE_TEMPLATES_PLUGIN_ID: &str = "templates";
pub const CORE_TEMPLATES_FOLDER_FIELD: &str = "folder";

/// Join a folder and a file name with exactly one `/` between them.
pub fn join_path(folder: &str, name: &str) -> String {
    if folder.is_empty() || folder == "/" {
        return name.to_string();
    }
    format!(
        "{}/{}",
        folder.trim_end_matches('/'),
        name.trim_start_matches('/')
    )
}

/// One place a template might come from.
pub trait TemplateSource {
    fn label(&self) -> &str;

    /// Path of the candidate template file, or `None` when this source
    /// does not apply.
    fn locate(&self, vault: &dyn Vault) -> Result<Option<String>>;
}

/// A configured path that names a template file directly.
pub struct ExplicitFile {
    path: String,
}

impl ExplicitFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl TemplateSource for ExplicitFile {
    fn label(&self) -> &str {
        "explicit file"
    }

    fn locate(&self, vault: &dyn Vault) -> Result<Option<String>> {
        Ok(vault.is_file(&self.path).then(|| self.path.clone()))
    }
}

/// A configured path that is not a file, treated as a folder holding
/// `template.csv`.
pub struct ExplicitFolder {
    path: String,
}

impl ExplicitFolder {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl TemplateSource for ExplicitFolder {
    fn label(&self) -> &str {
        "explicit folder"
    }

    fn locate(&self, vault: &dyn Vault) -> Result<Option<String>> {
        if vault.is_file(&self.path) {
            return Ok(None);
        }
        Ok(Some(join_path(&self.path, TEMPLATE_FILE_NAME)))
    }
}

/// A templates folder declared in an installed community plugin's settings.
pub struct CommunityPluginFolder<'a> {
    registry: &'a dyn PluginRegistry,
    plugin_id: String,
    field: String,
}

impl<'a> CommunityPluginFolder<'a> {
    pub fn new(registry: &'a dyn PluginRegistry, plugin_id: &str, field: &str) -> Self {
        Self {
            registry,
            plugin_id: plugin_id.to_string(),
            field: field.to_string(),
        }
    }

    pub fn templater(registry: &'a dyn PluginRegistry) -> Self {
        Self::new(registry, TEMPLATER_PLUGIN_ID, TEMPLATER_FOLDER_FIELD)
    }
}

impl TemplateSource for CommunityPluginFolder<'_> {
    fn label(&self) -> &str {
        &self.plugin_id
    }

    fn locate(&self, _vault: &dyn Vault) -> Result<Option<String>> {
        let folder = self.registry.community_setting(&self.plugin_id, &self.field)?;
        Ok(folder
            .filter(|f| !f.is_empty())
            .map(|f| join_path(&f, TEMPLATE_FILE_NAME)))
    }
}

/// The host's built-in templates feature, when enabled and configured.
pub struct CoreTemplatesFolder<'a> {
    registry: &'a dyn PluginRegistry,
}

impl<'a> CoreTemplatesFolder<'a> {
    pub fn new(registry: &'a dyn PluginRegistry) -> Self {
        Self { registry }
    }
}

impl TemplateSource for CoreTemplatesFolder<'_> {
    fn label(&self) -> &str {
        "core templates"
    }

    fn locate(&self, _vault: &dyn Vault) -> Result<Option<String>> {
        let folder = self
            .registry
            .core_setting(CORE_TEMPLATES_PLUGIN_ID, CORE_TEMPLATES_FOLDER_FIELD)?;
        Ok(folder
            .filter(|f| !f.is_empty())
            .map(|f| join_path(&f, TEMPLATE_FILE_NAME)))
    }
}

#[derive(Default)]
pub struct TemplateChain<'a> {
    sources: Vec<Box<dyn TemplateSource + 'a>>,
}

impl<'a> TemplateChain<'a> {
    pub fn new() -> Self {
        Self { sources: Vec::new() }
    }

    pub fn push(mut self, source: impl TemplateSource + 'a) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Explicit path (file, then folder), the community templater plugin's
    /// folder, the core templates folder.
    pub fn standard(settings: &Settings, plugins: &'a dyn PluginRegistry) -> Self {
        let mut chain = Self::new();
        if let Some(path) = settings.template_path() {
            chain = chain
                .push(ExplicitFile::new(path))
                .push(ExplicitFolder::new(path));
        }
        chain
            .push(CommunityPluginFolder::templater(plugins))
            .push(CoreTemplatesFolder::new(plugins))
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Text of the first source that resolves, without the fallback.
    pub fn try_resolve(&self, vault: &dyn Vault) -> Option<String> {
        self.sources
            .iter()
            .find_map(|source| attempt(source.as_ref(), vault))
    }

    pub fn resolve(&self, vault: &dyn Vault) -> String {
        self.try_resolve(vault).unwrap_or_else(|| {
            debug!(target: "template", "template_fallback_default");
            DEFAULT_TEMPLATE.to_string()
        })
    }
}

fn attempt(source: &dyn TemplateSource, vault: &dyn Vault) -> Option<String> {
    let label = source.label();
    let path = match source.locate(vault) {
        Ok(Some(path)) => path,
        Ok(None) => {
            debug!(target: "template", source = label, "template_source_declined");
            return None;
        }
        Err(e) => {
            debug!(target: "template", source = label, error = %e, "template_source_lookup_failed");
            return None;
        }
    };
    if !vault.is_file(&path) {
        debug!(target: "template", source = label, path = %path, "template_file_missing");
        return None;
    }
    match vault.read(&path) {
        Ok(text) => {
            debug!(target: "template", source = label, path = %path, "template_resolved");
            Some(text)
        }
        Err(e) => {
            debug!(target: "template", source = label, path = %path, error = %e, "template_read_failed");
            None
        }
    }
}

/// Content for a new CSV document. Never fails.
pub fn resolve_template_content(
    settings: &Settings,
    vault: &dyn Vault,
    plugins: &dyn PluginRegistry,
) -> String {
    TemplateChain::standard(settings, plugins).resolve(vault)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_path_handles_root_and_slashes() {
        assert_eq!(join_path("", "template.csv"), "template.csv");
        assert_eq!(join_path("/", "template.csv"), "template.csv");
        assert_eq!(join_path("Templates//", "/template.csv"), "Templates/template.csv");
        assert_eq!(join_path("a/b", "c.csv"), "a/b/c.csv");
    }

    #[test]
    fn standard_chain_skips_explicit_sources_without_a_path() {
        let settings = Settings::default();
        assert_eq!(TemplateChain::standard(&settings, &crate::host::NoPlugins).len(), 2);
        let settings = Settings::with_template_path("tpl");
        assert_eq!(TemplateChain::standard(&settings, &crate::host::NoPlugins).len(), 4);
    }
}
