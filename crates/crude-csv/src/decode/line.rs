//! Quote-aware splitting of a single CSV line.

/// Trim whitespace and byte-order marks from both ends.
pub fn trim_field(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Split one line into trimmed cells.
///
/// A single state bit tracks whether the scanner is inside a quoted field.
/// Inside quotes a doubled `""` yields a literal quote; any other `"` toggles
/// the state without being emitted. Commas outside quotes end the current
/// field. Only field boundaries are trimmed, so whitespace inside a field is
/// kept. An unterminated quote at end of line is tolerated.
///
/// Always returns at least one cell.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    cur.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                out.push(trim_field(&cur).to_string());
                cur.clear();
            }
            _ => cur.push(ch),
        }
    }
    out.push(trim_field(&cur).to_string());
    out
}
