//! CSV/TSV loading and writing.
//!
//! A minimal quote-aware splitter for export endpoints that hand back CSV
//! text. Parsing is lenient and never fails: double-quote escaping and
//! separators or newlines inside quotes are handled, CRLF is tolerated,
//! and an unterminated quote simply flushes the trailing field.

use std::io::{self, Write};
use std::mem::take;

use crate::table::Row;

/// Split CSV/TSV text into raw rows of fields.
pub fn parse(text: &str, sep: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // double-quote escape
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            c if c == sep && !in_quotes => {
                row.push(take(&mut field));
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) {
                    chars.next();
                }
                row.push(take(&mut field));
                if !row.is_empty() && !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Flush the trailing field/row even if a quote was left open
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/// Parse CSV/TSV text into [`Row`]s, taking the first line as the header.
///
/// The header width governs: short rows pad with the empty string, long
/// rows truncate.
pub fn records(text: &str, sep: char) -> Vec<Row> {
    let mut rows = parse(text, sep);
    if rows.is_empty() {
        return Vec::new();
    }
    let labels = rows.remove(0);
    rows.into_iter()
        .map(|mut values| {
            values.resize(labels.len(), String::new());
            Row::new(labels.iter().cloned().zip(values).collect())
        })
        .collect()
}

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV/TSV row, quoting fields only where required.
pub fn write_row<W: Write, S: AsRef<str>>(mut w: W, row: &[S], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        let cell = cell.as_ref();
        if !first {
            write!(w, "{sep}")?;
        } else {
            first = false;
        }
        if needs_quotes(cell, sep) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{escaped}\"")?;
        } else {
            write!(w, "{cell}")?;
        }
    }
    writeln!(w)
}
