//! Minimal CSV worksheet
//!
//! One header row followed by data rows. Fields may be double-quoted so that
//! list cells like `"Mapping, Thermal"` survive; a doubled quote inside a
//! quoted field is a literal quote. Quoted fields cannot span lines.
//!
//! Blank lines are not rows, but their positions are remembered so error
//! messages cite the physical file line and a rewrite keeps the layout.

use std::borrow::Cow;

/// A parsed worksheet: header plus raw string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// 1-based file line of the header
    header_line: usize,
    /// 1-based file line of each row, parallel to `rows`
    row_lines: Vec<usize>,
}

impl Sheet {
    /// Parse worksheet text. Blank lines are skipped.
    pub fn parse(text: &str) -> Self {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim_end_matches('\r')))
            .filter(|(_, l)| !l.trim().is_empty());

        let (header_line, header): (usize, Vec<String>) = lines
            .next()
            .map(|(n, l)| {
                let names = split_record(l).into_iter().map(|h| h.trim().to_string());
                (n, names.collect())
            })
            .unwrap_or_default();
        let (row_lines, rows): (Vec<usize>, Vec<Vec<String>>) =
            lines.map(|(n, l)| (n, split_record(l))).unzip();

        Self {
            header,
            rows,
            header_line,
            row_lines,
        }
    }

    /// File line a data row was read from. Rows past the parsed ones are
    /// numbered as if they followed the last line.
    pub fn line_number(&self, row: usize) -> usize {
        match self.row_lines.get(row) {
            Some(&line) => line,
            None => {
                let last = self.row_lines.last().copied().unwrap_or(self.header_line.max(1));
                last + (row + 1 - self.row_lines.len())
            }
        }
    }

    /// Index of a column, matched case-insensitively on trimmed names.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    /// Index of a column, appending it to the header if absent.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column(name) {
            return idx;
        }
        self.header.push(name.to_string());
        self.header.len() - 1
    }

    /// Cell at (row, column); short rows read as empty.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map_or("", String::as_str)
    }

    /// Overwrite a cell, padding the row if it is short.
    pub fn set_cell(&mut self, row: usize, column: usize, value: &str) {
        if let Some(r) = self.rows.get_mut(row) {
            if r.len() <= column {
                r.resize(column + 1, String::new());
            }
            r[column] = value.to_string();
        }
    }

    /// Row index of the first row whose `column` cell equals `value` (trimmed).
    pub fn find_row(&self, column: usize, value: &str) -> Option<usize> {
        let value = value.trim();
        (0..self.rows.len()).find(|&row| self.cell(row, column).trim() == value)
    }

    /// Render back to CSV text with a trailing newline, restoring blank
    /// lines where the source had them.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut line = 1;
        let mut pad_to = |out: &mut String, target: usize| {
            while line < target {
                out.push('\n');
                line += 1;
            }
            line += 1;
        };

        pad_to(&mut out, self.header_line);
        push_record(&mut out, &self.header);
        for (index, row) in self.rows.iter().enumerate() {
            pad_to(&mut out, self.line_number(index));
            push_record(&mut out, row);
        }
        out
    }
}

fn push_record(out: &mut String, fields: &[String]) {
    let line: Vec<Cow<'_, str>> = fields.iter().map(|f| quote_field(f)).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

fn quote_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Split one CSV line into fields, honouring double quotes.
pub fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}
