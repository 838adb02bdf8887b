use std::collections::BTreeMap;

use crude_csv::host::PluginSnapshot;
use crude_csv::{CsvView, Edit, Grid, MemoryVault, Notifier, Settings, ViewHost};
use js_sys::Function;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

/// Use wee_alloc as the global allocator for smaller WASM binary size
#[cfg(feature = "size_opt")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Maximum input size in bytes (10 MB)
const MAX_INPUT_SIZE: usize = 10 * 1024 * 1024;

/// Initialize panic hook for better error messages in browser console.
/// Call this once when the module is loaded for improved debugging.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn check_size(input: &str) -> Result<(), String> {
    if input.len() > MAX_INPUT_SIZE {
        return Err(format!(
            "Input exceeds maximum size limit of {} bytes",
            MAX_INPUT_SIZE
        ));
    }
    Ok(())
}

/// Convert CSV text to a JSON array of rows
#[wasm_bindgen(js_name = csvToJson)]
pub fn csv_to_json(csv: &str, pretty: bool) -> Result<String, String> {
    check_size(csv)?;
    let grid = Grid::parse(csv);
    if pretty {
        serde_json::to_string_pretty(&grid).map_err(|e| format!("JSON encoding error: {}", e))
    } else {
        serde_json::to_string(&grid).map_err(|e| format!("JSON encoding error: {}", e))
    }
}

/// Convert a JSON array of rows to CSV text
#[wasm_bindgen(js_name = jsonToCsv)]
pub fn json_to_csv(json: &str) -> Result<String, String> {
    check_size(json)?;
    let grid: Grid = serde_json::from_str(json).map_err(|e| format!("Invalid JSON: {}", e))?;
    Ok(grid.serialize())
}

/// Vault contents the host hands over for template resolution.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VaultSnapshot {
    pub files: BTreeMap<String, String>,
    pub folders: Vec<String>,
    pub plugins: PluginSnapshot,
}

impl VaultSnapshot {
    fn into_parts(self) -> (MemoryVault, PluginSnapshot) {
        let mut vault = MemoryVault::new();
        for folder in &self.folders {
            vault = vault.with_folder(folder);
        }
        for (path, text) in &self.files {
            vault = vault.with_file(path, text);
        }
        (vault, self.plugins)
    }
}

pub fn resolve_from_snapshot(settings_json: &str, snapshot: VaultSnapshot) -> Result<String, String> {
    let settings = if settings_json.trim().is_empty() {
        Settings::default()
    } else {
        Settings::from_json(settings_json).map_err(|e| format!("Invalid settings: {}", e))?
    };
    let (vault, plugins) = snapshot.into_parts();
    Ok(crude_csv::resolve_template_content(&settings, &vault, &plugins))
}

/// Resolve the content of a new CSV document.
///
/// `snapshot` is `{ files: {path: text}, folders: [path], plugins: { community, core } }`.
#[wasm_bindgen(js_name = resolveTemplate)]
pub fn resolve_template(settings_json: &str, snapshot: JsValue) -> Result<String, String> {
    let snapshot: VaultSnapshot = if snapshot.is_undefined() || snapshot.is_null() {
        VaultSnapshot::default()
    } else {
        serde_wasm_bindgen::from_value(snapshot).map_err(|e| format!("Invalid snapshot: {}", e))?
    };
    resolve_from_snapshot(settings_json, snapshot)
}

struct JsHost {
    notice: Function,
    save: Function,
    render: Function,
}

impl Notifier for JsHost {
    fn notice(&self, message: &str) {
        if let Err(e) = self.notice.call1(&JsValue::NULL, &JsValue::from_str(message)) {
            web_sys::console::error_2(&"notice callback failed".into(), &e);
        }
    }
}

impl ViewHost for JsHost {
    fn request_save(&mut self) {
        if let Err(e) = self.save.call0(&JsValue::NULL) {
            web_sys::console::error_2(&"save callback failed".into(), &e);
        }
    }

    fn request_render(&mut self, grid: &Grid) {
        let rows = match serde_wasm_bindgen::to_value(grid) {
            Ok(v) => v,
            Err(e) => {
                web_sys::console::error_1(&format!("grid conversion failed: {}", e).into());
                return;
            }
        };
        if let Err(e) = self.render.call1(&JsValue::NULL, &rows) {
            web_sys::console::error_2(&"render callback failed".into(), &e);
        }
    }
}

/// A CSV view driven from JavaScript.
#[wasm_bindgen]
pub struct CsvGridView {
    inner: CsvView<JsHost>,
}

fn applied(r: crude_csv::Result<Option<Edit>>) -> Result<bool, String> {
    r.map(|e| e.is_some()).map_err(|e| e.to_string())
}

#[wasm_bindgen]
impl CsvGridView {
    /// `notice(message)`, `requestSave()`, `render(rows)`.
    #[wasm_bindgen(constructor)]
    pub fn new(notice: Function, request_save: Function, render: Function) -> CsvGridView {
        let host = JsHost {
            notice,
            save: request_save,
            render,
        };
        CsvGridView {
            inner: CsvView::new(host),
        }
    }

    #[wasm_bindgen(js_name = viewType)]
    pub fn view_type(&self) -> String {
        self.inner.view_type().to_string()
    }

    pub fn icon(&self) -> String {
        self.inner.icon().to_string()
    }

    #[wasm_bindgen(js_name = displayText)]
    pub fn display_text(&self) -> String {
        self.inner.display_text().to_string()
    }

    #[wasm_bindgen(js_name = setFileName)]
    pub fn set_file_name(&mut self, name: String) {
        self.inner.set_file_name(name);
    }

    #[wasm_bindgen(js_name = onOpen)]
    pub fn on_open(&mut self) -> Result<(), String> {
        self.inner.on_open().map_err(|e| e.to_string())
    }

    #[wasm_bindgen(js_name = setViewData)]
    pub fn set_view_data(&mut self, data: &str, clear: bool) -> Result<(), String> {
        check_size(data)?;
        self.inner.set_view_data(data, clear).map_err(|e| e.to_string())
    }

    #[wasm_bindgen(js_name = getViewData)]
    pub fn get_view_data(&self) -> Result<String, String> {
        self.inner.get_view_data().map_err(|e| e.to_string())
    }

    pub fn clear(&mut self) -> Result<(), String> {
        self.inner.clear().map_err(|e| e.to_string())
    }

    #[wasm_bindgen(js_name = addRow)]
    pub fn add_row(&mut self) -> Result<bool, String> {
        applied(self.inner.add_row())
    }

    #[wasm_bindgen(js_name = removeRow)]
    pub fn remove_row(&mut self) -> Result<bool, String> {
        applied(self.inner.remove_row())
    }

    #[wasm_bindgen(js_name = addColumn)]
    pub fn add_column(&mut self) -> Result<bool, String> {
        applied(self.inner.add_column())
    }

    #[wasm_bindgen(js_name = removeColumn)]
    pub fn remove_column(&mut self) -> Result<bool, String> {
        applied(self.inner.remove_column())
    }

    #[wasm_bindgen(js_name = editCell)]
    pub fn edit_cell(&mut self, row: usize, column: usize, text: &str) -> Result<bool, String> {
        applied(self.inner.edit_cell(row, column, text))
    }

    #[wasm_bindgen(js_name = onClose)]
    pub fn on_close(&mut self) {
        self.inner.on_close();
    }
}

/// Get the version of the crude-csv library
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_to_json_simple() {
        let out = csv_to_json("a,b\n1,2", false).unwrap();
        assert_eq!(out, r#"[["a","b"],["1","2"]]"#);
    }

    #[test]
    fn test_json_to_csv_pads_ragged_rows() {
        let out = json_to_csv(r#"[["a","b"],["1"]]"#).unwrap();
        assert_eq!(out, "a,b\n1,");
    }

    #[test]
    fn test_json_to_csv_rejects_non_grid() {
        let result = json_to_csv(r#"{"a": 1}"#);
        assert!(result.unwrap_err().contains("Invalid JSON"));
    }

    #[test]
    fn test_csv_to_json_size_limit() {
        let large = "x".repeat(MAX_INPUT_SIZE + 1);
        let result = csv_to_json(&large, false);
        assert!(
            result
                .unwrap_err()
                .contains("Input exceeds maximum size limit")
        );
    }

    #[test]
    fn test_snapshot_resolution_prefers_explicit_path() {
        let mut snapshot = VaultSnapshot::default();
        snapshot.files.insert("t/template.csv".into(), "mine".into());
        snapshot.files.insert("C/template.csv".into(), "core".into());
        snapshot.plugins = PluginSnapshot::default().with_core("templates", "folder", "C");
        let out = resolve_from_snapshot(r#"{"templatePath": "t"}"#, snapshot).unwrap();
        assert_eq!(out, "mine");
    }

    #[test]
    fn test_snapshot_resolution_defaults() {
        let out = resolve_from_snapshot("", VaultSnapshot::default()).unwrap();
        assert_eq!(out, crude_csv::DEFAULT_TEMPLATE);
    }

    #[test]
    fn test_snapshot_rejects_bad_settings() {
        let result = resolve_from_snapshot("{", VaultSnapshot::default());
        assert!(result.unwrap_err().contains("Invalid settings"));
    }
}
