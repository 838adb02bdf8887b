//! One open CSV document.
//!
//! A [`CsvView`] owns the grid for exactly as long as the view is open. The
//! host feeds it raw text on load, asks for text back on save, and forwards
//! toolbar and cell-edit actions. Effects flow back through [`ViewHost`].

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::grid::{Edit, EditResult, Grid, Refusal};
use crate::host::ViewHost;

pub const VIEW_TYPE: &str = "crude-csv";
pub const VIEW_ICON: &str = "table";
pub const CSV_EXTENSION: &str = "csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Uninitialized,
    Loaded,
    Edited,
    Closed,
}

pub struct CsvView<H: ViewHost> {
    host: H,
    grid: Grid,
    state: ViewState,
    file_name: Option<String>,
}

impl<H: ViewHost> CsvView<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            grid: Grid::empty(),
            state: ViewState::Uninitialized,
            file_name: None,
        }
    }

    pub fn view_type(&self) -> &'static str {
        VIEW_TYPE
    }

    pub fn icon(&self) -> &'static str {
        VIEW_ICON
    }

    pub fn display_text(&self) -> &str {
        self.file_name.as_deref().unwrap_or("CSV")
    }

    pub fn set_file_name(&mut self, name: impl Into<String>) {
        self.file_name = Some(name.into());
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    fn ensure_open(&self) -> Result<()> {
        if self.state == ViewState::Closed {
            Err(Error::ViewClosed)
        } else {
            Ok(())
        }
    }

    pub fn on_open(&mut self) -> Result<()> {
        self.ensure_open()?;
        debug!(target: "view", file = self.display_text(), "view_opened");
        Ok(())
    }

    /// Replace the grid with freshly parsed `data`. Also used when the file
    /// changes underneath the view.
    pub fn set_view_data(&mut self, data: &str, clear: bool) -> Result<()> {
        self.ensure_open()?;
        self.grid = Grid::parse(data);
        self.state = ViewState::Loaded;
        debug!(
            target: "view",
            rows = self.grid.row_count(),
            columns = self.grid.column_count(),
            clear,
            "view_data_loaded"
        );
        self.host.request_render(&self.grid);
        Ok(())
    }

    /// Text to persist. Cells that will not survive reloading are logged.
    pub fn get_view_data(&self) -> Result<String> {
        self.ensure_open()?;
        let lossy = self.grid.lossy_cells();
        if !lossy.is_empty() {
            debug!(target: "view", cells = ?lossy, "unescaped_cells_on_save");
        }
        Ok(self.grid.serialize())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.grid.clear();
        Ok(())
    }

    pub fn add_row(&mut self) -> Result<Option<Edit>> {
        self.apply(Grid::add_row)
    }

    pub fn remove_row(&mut self) -> Result<Option<Edit>> {
        self.apply(Grid::remove_row)
    }

    pub fn add_column(&mut self) -> Result<Option<Edit>> {
        self.apply(Grid::add_column)
    }

    pub fn remove_column(&mut self) -> Result<Option<Edit>> {
        self.apply(Grid::remove_column)
    }

    pub fn edit_cell(&mut self, row: usize, column: usize, text: &str) -> Result<Option<Edit>> {
        self.apply(|g| g.set_cell(row, column, text))
    }

    /// Run one edit and translate its outcome into host effects. Returns
    /// `None` when the edit was refused.
    fn apply<F>(&mut self, op: F) -> Result<Option<Edit>>
    where
        F: FnOnce(&mut Grid) -> EditResult,
    {
        self.ensure_open()?;
        match op(&mut self.grid) {
            Ok(edit) => {
                self.state = ViewState::Edited;
                trace!(target: "view", ?edit, rows = self.grid.row_count(), columns = self.grid.column_count(), "grid_edited");
                if edit == Edit::Structural {
                    self.host.request_render(&self.grid);
                }
                self.host.request_save();
                Ok(Some(edit))
            }
            Err(refusal @ Refusal::OutOfBounds { .. }) => {
                debug!(target: "view", %refusal, "cell_edit_ignored");
                Ok(None)
            }
            Err(refusal) => {
                self.host.notice(&refusal.to_string());
                Ok(None)
            }
        }
    }

    /// Tear down. Every later call returns [`Error::ViewClosed`].
    pub fn on_close(&mut self) {
        if self.state != ViewState::Closed {
            debug!(target: "view", file = self.display_text(), "view_closed");
        }
        self.grid.clear();
        self.state = ViewState::Closed;
    }
}
