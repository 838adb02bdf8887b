//! Rectangular cell grid and its structural edits.
//!
//! Every row of a [`Grid`] has exactly [`Grid::column_count`] cells. Ragged
//! input is padded with empty cells up to the widest row when the grid is
//! built, and each mutation keeps the shape intact, so callers never have to
//! resynchronise row lengths themselves.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::decode::{Row, parse_document};
use crate::encode::{RowWriter, needs_quoting};

/// What a successful edit changed, and therefore what the host must redo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// Row or column count changed: re-render, then save.
    Structural,
    /// A single cell's text changed: save only.
    Content,
}

/// An edit that was declined. The grid is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Refusal {
    #[error("Cannot remove the last row")]
    LastRow,
    #[error("Cannot remove the last column")]
    LastColumn,
    #[error("no cell at row {row}, column {column}")]
    OutOfBounds { row: usize, column: usize },
}

pub type EditResult = Result<Edit, Refusal>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grid {
    columns: usize,
    rows: Vec<Row>,
}

impl Grid {
    /// A grid with no rows. Only seen between a clear and the next load.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rows(mut rows: Vec<Row>) -> Self {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(columns, String::new());
        }
        Self { columns, rows }
    }

    pub fn parse(input: &str) -> Self {
        Self::from_rows(parse_document(input))
    }

    pub fn serialize(&self) -> String {
        let mut w = RowWriter::with_capacity(self.rows.len() * (self.columns + 1) * 4);
        for row in &self.rows {
            w.row(row.as_slice());
        }
        w.into_string()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Positions of cells whose text would be altered by a save/load cycle.
    pub fn lossy_cells(&self) -> Vec<(usize, usize)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, cell)| needs_quoting(cell))
                    .map(move |(c, _)| (r, c))
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.columns = 0;
    }

    /// Append an empty row, or seed an `A, B, C` row when the grid is empty.
    pub fn add_row(&mut self) -> EditResult {
        if self.rows.is_empty() {
            *self = Self::from_rows(vec![vec!["A".into(), "B".into(), "C".into()]]);
        } else {
            self.rows.push(vec![String::new(); self.columns]);
        }
        Ok(Edit::Structural)
    }

    /// Drop the last row. A grid never loses its final row this way.
    pub fn remove_row(&mut self) -> EditResult {
        if self.rows.len() <= 1 {
            return Err(Refusal::LastRow);
        }
        self.rows.pop();
        Ok(Edit::Structural)
    }

    /// Append an empty cell to every row, or seed a single `A` cell when empty.
    pub fn add_column(&mut self) -> EditResult {
        if self.rows.is_empty() {
            *self = Self::from_rows(vec![vec!["A".into()]]);
        } else {
            for row in &mut self.rows {
                row.push(String::new());
            }
            self.columns += 1;
        }
        Ok(Edit::Structural)
    }

    /// Drop the last cell of every row. At least one column always remains.
    pub fn remove_column(&mut self) -> EditResult {
        if self.rows.is_empty() || self.columns <= 1 {
            return Err(Refusal::LastColumn);
        }
        for row in &mut self.rows {
            row.pop();
        }
        self.columns -= 1;
        Ok(Edit::Structural)
    }

    pub fn set_cell(&mut self, row: usize, column: usize, text: impl Into<String>) -> EditResult {
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|r| r.get_mut(column))
            .ok_or(Refusal::OutOfBounds { row, column })?;
        *cell = text.into();
        Ok(Edit::Content)
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.rows.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Row>::deserialize(deserializer).map(Self::from_rows)
    }
}
