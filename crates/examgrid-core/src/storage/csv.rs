//! CSV lesson import/export.
//!
//! A lesson file holds one grid row per line with the columns
//! `name,val1,c,d,e`. A first line naming those columns is treated as a
//! header. Short lines are padded with empty cells.

use crate::error::{ExamgridError, Result};
use examgrid_engine::engine::{Column, Row};

/// Parse lesson CSV content into grid rows.
pub fn parse_lesson_csv(content: &str) -> Result<Vec<Row>> {
    let mut rows = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let fields = parse_csv_line(line);
        if idx == 0 && is_header(&fields) {
            continue;
        }
        if fields.len() > Column::ALL.len() {
            return Err(ExamgridError::Parse {
                line: line_no,
                message: format!(
                    "expected at most {} fields, found {}",
                    Column::ALL.len(),
                    fields.len()
                ),
            });
        }

        let mut row = Row::default();
        for (col, field) in Column::ALL.into_iter().zip(fields) {
            *row.get_mut(col) = field;
        }
        rows.push(row);
    }

    // Trailing blank lines carry no lesson data.
    while rows.last().is_some_and(Row::is_blank) {
        rows.pop();
    }
    Ok(rows)
}

fn is_header(fields: &[String]) -> bool {
    fields.len() == Column::ALL.len()
        && Column::ALL
            .iter()
            .zip(fields)
            .all(|(col, field)| field.eq_ignore_ascii_case(col.field_name()))
}

/// Parse a single CSV line, handling quoted fields
pub(crate) fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut field_was_quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                // Check for escaped quote
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else {
            match c {
                '"' => {
                    in_quotes = true;
                    field_was_quoted = true;
                }
                ',' => {
                    if field_was_quoted {
                        fields.push(std::mem::take(&mut current));
                    } else {
                        fields.push(current.trim().to_string());
                        current.clear();
                    }
                    field_was_quoted = false;
                }
                _ => current.push(c),
            }
        }
    }
    if field_was_quoted {
        fields.push(current);
    } else {
        fields.push(current.trim().to_string());
    }
    fields
}

/// Serialize rows as lesson CSV (raw cell contents, formulas included), with a header.
/// Trailing blank placeholder rows are omitted.
pub fn write_lesson_csv(rows: &[Row]) -> String {
    let used = rows
        .iter()
        .rposition(|row| !row.is_blank())
        .map_or(0, |idx| idx + 1);

    let header: Vec<&str> = Column::ALL.iter().map(|c| c.field_name()).collect();
    let mut out = header.join(",");
    out.push('\n');
    for row in &rows[..used] {
        let fields: Vec<String> = Column::ALL
            .iter()
            .map(|&col| escape_csv_field(row.get(col)))
            .collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.trim() != field {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
