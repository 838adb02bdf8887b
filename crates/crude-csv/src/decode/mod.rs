//! Decoding pipeline: one line at a time into cells, then the whole document into rows.

pub mod document;
pub mod line;

pub use document::{Row, default_rows, parse_document};
pub use line::{parse_line, trim_field};
