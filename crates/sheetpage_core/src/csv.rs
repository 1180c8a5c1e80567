//! Quoted-CSV parsing and serialization for published sheet exports.

use std::mem::take;

/// Parse CSV text into rows of cells.
///
/// Commas and line breaks are delimiters only outside quotes. A doubled
/// quote inside a quoted cell is a literal quote. Rows end at LF, CRLF or
/// a bare CR. The final row is kept even when the text has no trailing
/// line break, and a trailing line break does not produce an extra row.
///
/// A line that is entirely empty is not a row; a line holding just a
/// quoted empty cell (`""`) is a one-cell row. An unterminated quote runs
/// to the end of the input and the remainder becomes part of the cell.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    // Distinguishes a blank line from a lone quoted empty cell.
    let mut cell_quoted = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        cell.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                    cell_quoted = true;
                }
            }
            ',' if !in_quotes => {
                row.push(take(&mut cell));
                cell_quoted = false;
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                if row.is_empty() && cell.is_empty() && !cell_quoted {
                    continue;
                }
                row.push(take(&mut cell));
                rows.push(take(&mut row));
                cell_quoted = false;
            }
            other => cell.push(other),
        }
    }

    if !row.is_empty() || !cell.is_empty() || cell_quoted {
        row.push(cell);
        rows.push(row);
    }

    rows
}

fn needs_quoting(cell: &str) -> bool {
    cell.contains(',') || cell.contains('"') || cell.contains('\n') || cell.contains('\r')
}

/// Append one row to `out` in canonical form: cells containing a comma,
/// quote or line break are quoted with inner quotes doubled, everything
/// else is written bare, and the row ends with a single LF. A row holding
/// a single empty cell is written as `""`; bare, it would be a blank line
/// and `parse_rows` would not read it back as a row.
pub fn write_row(out: &mut String, row: &[String]) {
    if let [cell] = row {
        if cell.is_empty() {
            out.push_str("\"\"\n");
            return;
        }
    }
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if needs_quoting(cell) {
            out.push('"');
            out.push_str(&cell.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(cell);
        }
    }
    out.push('\n');
}

/// Serialize rows to canonical CSV text. `parse_rows` reads the result
/// back to the same rows.
pub fn rows_to_string(rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    for row in rows {
        write_row(&mut out, row);
    }
    out
}

/// A parsed sheet: the first row is the header, everything after is data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sheet {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Parse CSV text and split off the header row.
    pub fn parse(text: &str) -> Self {
        Self::from_rows(parse_rows(text))
    }

    /// Build a sheet from pre-parsed rows (header row first). An empty
    /// input yields a sheet with no headers and no rows.
    pub fn from_rows(mut all: Vec<Vec<String>>) -> Self {
        if all.is_empty() {
            return Self::default();
        }
        let headers = all.remove(0);
        Self { headers, rows: all }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}
