#![doc = include_str!("../README.md")]

pub mod error;
pub mod settings;
pub mod decode;
pub mod encode;
pub mod grid;
pub mod host;
pub mod template;
pub mod view;
pub mod create;

#[cfg(feature = "fs")]
pub mod fs;

pub use crate::create::{create_csv, new_csv};
pub use crate::error::{Error, Result};
pub use crate::grid::{Edit, Grid, Refusal};
pub use crate::host::{EntryKind, MemoryVault, NoPlugins, Notifier, PluginRegistry, Vault, ViewHost};
pub use crate::settings::Settings;
pub use crate::template::{DEFAULT_TEMPLATE, TemplateChain, resolve_template_content};
pub use crate::view::{CsvView, ViewState};

use std::io::{Read, Write};

/// Parse CSV text into a rectangular [`Grid`].
pub fn decode_from_str(s: &str) -> Grid {
    Grid::parse(s)
}

pub fn decode_from_reader<R: Read>(mut reader: R) -> Result<Grid> {
    let mut s = String::new();
    reader.read_to_string(&mut s)?;
    Ok(decode_from_str(&s))
}

pub fn encode_to_string(grid: &Grid) -> String {
    grid.serialize()
}

pub fn encode_to_writer<W: Write>(mut writer: W, grid: &Grid) -> Result<()> {
    let s = encode_to_string(grid);
    writer.write_all(s.as_bytes())?;
    Ok(())
}
