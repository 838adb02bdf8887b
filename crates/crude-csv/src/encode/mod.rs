//! Encoding pipeline: rows back to CSV text.
//!
//! The writer does not quote or escape. Cells containing a delimiter, a quote,
//! a line break, or boundary whitespace do not survive a save/load cycle;
//! [`needs_quoting`] reports such cells so a host can warn about them.

pub mod writer;

pub use writer::RowWriter;

/// Join cells with `,` and rows with `\n`.
pub fn serialize<R: AsRef<[String]>>(rows: &[R]) -> String {
    let mut w = RowWriter::new();
    for row in rows {
        w.row(row.as_ref());
    }
    w.into_string()
}

/// True when writing `cell` unescaped would not parse back to the same text.
pub fn needs_quoting(cell: &str) -> bool {
    if crate::decode::trim_field(cell) != cell {
        return true;
    }
    cell.chars().any(|c| matches!(c, ',' | '"' | '\n' | '\r'))
}
