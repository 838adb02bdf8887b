//! Creating a new CSV document from the resolved template.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{error, info};

use crate::error::{Error, Result};
use crate::host::{Notifier, PluginRegistry, Vault, parent_path};
use crate::settings::Settings;
use crate::template::{join_path, resolve_template_content};

/// Folder a new document goes into.
///
/// An explicit hint must name an existing folder; a blank hint counts as
/// none. Without one, the active file's folder is used, then the vault root,
/// which is always spelled `""`.
pub fn resolve_target_folder(
    vault: &dyn Vault,
    folder_hint: Option<&str>,
    active_file: Option<&str>,
) -> Result<String> {
    if let Some(hint) = folder_hint.filter(|h| !h.trim().is_empty()) {
        return if vault.is_folder(hint) {
            Ok(hint.to_string())
        } else {
            Err(Error::InvalidFolder)
        };
    }
    if let Some(active) = active_file {
        let parent = parent_path(active);
        if vault.is_folder(parent) {
            return Ok(parent.to_string());
        }
    }
    Ok(String::new())
}

/// Trim user input and make sure it ends in `.csv`.
pub fn normalize_file_name(input: &str) -> Result<String> {
    let name = input.trim();
    if name.is_empty() {
        return Err(Error::EmptyFileName);
    }
    if name.ends_with(".csv") {
        Ok(name.to_string())
    } else {
        Ok(format!("{name}.csv"))
    }
}

fn temp_file_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("temp-csv-{millis}.csv")
}

/// Where the new document should go and what to call it.
#[derive(Debug, Clone, Default)]
pub struct CreateRequest<'a> {
    pub file_name: &'a str,
    pub folder_hint: Option<&'a str>,
    pub active_file: Option<&'a str>,
}

impl<'a> CreateRequest<'a> {
    pub fn named(file_name: &'a str) -> Self {
        Self {
            file_name,
            ..Self::default()
        }
    }

    pub fn in_folder(mut self, folder: &'a str) -> Self {
        self.folder_hint = Some(folder);
        self
    }

    pub fn beside(mut self, active_file: &'a str) -> Self {
        self.active_file = Some(active_file);
        self
    }
}

/// Create the document under a temporary name, then rename it into place.
/// Returns the final path. A failure part-way leaves the temporary file
/// behind; nothing is retried.
pub fn create_csv(
    vault: &mut dyn Vault,
    settings: &Settings,
    plugins: &dyn PluginRegistry,
    request: &CreateRequest<'_>,
) -> Result<String> {
    let folder = resolve_target_folder(vault, request.folder_hint, request.active_file)?;
    let file_name = normalize_file_name(request.file_name)?;
    let content = resolve_template_content(settings, vault, plugins);

    let final_path = join_path(&folder, &file_name);
    if vault.kind(&final_path).is_some() {
        return Err(Error::NameTaken(file_name));
    }

    let temp_path = join_path(&folder, &temp_file_name());
    vault.create(&temp_path, &content)?;
    vault.rename(&temp_path, &final_path)?;
    info!(target: "create", path = %final_path, bytes = content.len(), "csv_created");
    Ok(final_path)
}

/// [`create_csv`] with the outcome reported through `notifier`.
pub fn new_csv(
    vault: &mut dyn Vault,
    settings: &Settings,
    plugins: &dyn PluginRegistry,
    request: &CreateRequest<'_>,
    notifier: &dyn Notifier,
) -> Option<String> {
    match create_csv(vault, settings, plugins, request) {
        Ok(path) => {
            let name = path.rsplit('/').next().unwrap_or(&path);
            notifier.notice(&format!("Created {name}"));
            Some(path)
        }
        Err(e @ (Error::NameTaken(_) | Error::InvalidFolder | Error::EmptyFileName)) => {
            notifier.notice(&e.to_string());
            None
        }
        Err(e) => {
            error!(target: "create", error = %e, "csv_create_failed");
            notifier.notice("Failed to create CSV file.");
            None
        }
    }
}
