use super::line::{parse_line, trim_field};

pub type Row = Vec<String>;

const DEFAULT_ROWS: [[&str; 3]; 4] = [
    ["A", "B", "C"],
    ["0", "0", "0"],
    ["1", "1", "1"],
    ["2", "2", "2"],
];

/// The grid shown for a document with no usable content.
pub fn default_rows() -> Vec<Row> {
    DEFAULT_ROWS
        .iter()
        .map(|row| row.iter().map(|c| (*c).to_string()).collect())
        .collect()
}

/// Parse a whole document into rows.
///
/// Blank lines are dropped rather than becoming empty rows. A document that
/// is blank, or has no rows left after filtering, becomes [`default_rows`].
/// Rows are returned as parsed and may differ in length.
pub fn parse_document(input: &str) -> Vec<Row> {
    let trimmed = trim_field(input);
    if trimmed.is_empty() {
        return default_rows();
    }

    let rows: Vec<Row> = trimmed
        .split('\n')
        .filter(|l| !trim_field(l).is_empty())
        .map(parse_line)
        .filter(|row| !row.is_empty())
        .collect();

    if rows.is_empty() { default_rows() } else { rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_documents_parse_like_lf() {
        let rows = parse_document("a,b\r\nc,d\r\n");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn ragged_rows_are_kept_as_parsed() {
        let rows = parse_document("a,b,c\nd\n");
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[1].len(), 1);
    }
}
