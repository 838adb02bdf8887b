//! Persisted plugin settings.
//!
//! A single optional field: an explicit template file, or a folder holding
//! `template.csv`. Stored as JSON (`{"templatePath": "..."}`). A missing or
//! unreadable settings file falls back to defaults so a broken file never
//! blocks document creation.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub template_path: String,
}

impl Settings {
    pub fn with_template_path(path: impl Into<String>) -> Self {
        Self {
            template_path: path.into(),
        }
    }

    /// The configured template path, trimmed; `None` when blank.
    pub fn template_path(&self) -> Option<&str> {
        let p = self.template_path.trim();
        if p.is_empty() { None } else { Some(p) }
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn load_from(path: &Path) -> Settings {
    let Ok(content) = fs::read_to_string(path) else {
        return Settings::default();
    };
    match Settings::from_json(&content) {
        Ok(settings) => {
            info!(target: "settings", path = %path.display(), "settings_loaded");
            settings
        }
        Err(e) => {
            warn!(target: "settings", path = %path.display(), error = %e, "settings_parse_failed");
            Settings::default()
        }
    }
}

pub fn save_to(path: &Path, settings: &Settings) -> Result<()> {
    fs::write(path, settings.to_json()?)?;
    Ok(())
}
