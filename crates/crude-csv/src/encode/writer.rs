pub struct RowWriter {
    out: String,
    rows: usize,
}

impl RowWriter {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            rows: 0,
        }
    }

    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            out: String::with_capacity(bytes),
            rows: 0,
        }
    }

    /// Append one row. Rows are separated, not terminated, by `\n`.
    pub fn row<S: AsRef<str>>(&mut self, cells: &[S]) {
        if self.rows > 0 {
            self.out.push('\n');
        }
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.out.push_str(cell.as_ref());
        }
        self.rows += 1;
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

impl Default for RowWriter {
    fn default() -> Self {
        Self::new()
    }
}
