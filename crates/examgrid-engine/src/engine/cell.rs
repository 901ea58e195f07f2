//! Cell data structures for the exercise grid.
//!
//! This module provides the core data types for representing cells:
//! - [`Column`] - The five exercise columns `A..E` and their row field names
//! - [`Row`] - One grid row with fields `name, val1, c, d, e`
//! - [`CellContent`] - Classification of raw cell text (empty, text, number, or formula)
//! - [`CellSource`] - Read access to a grid snapshot, used by the evaluator

use serde::{Deserialize, Serialize};

use super::cell_ref::CellRef;

/// Maximum number of rows in an exercise grid.
pub const MAX_ROWS: usize = 20;

/// An exercise column.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum Column {
    A,
    B,
    C,
    D,
    E,
}

impl Column {
    pub const ALL: [Column; 5] = [Column::A, Column::B, Column::C, Column::D, Column::E];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Column> {
        Column::ALL.get(index).copied()
    }

    /// Case-insensitive.
    pub fn from_letter(letter: char) -> Option<Column> {
        match letter.to_ascii_uppercase() {
            'A' => Some(Column::A),
            'B' => Some(Column::B),
            'C' => Some(Column::C),
            'D' => Some(Column::D),
            'E' => Some(Column::E),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        (b'A' + self as u8) as char
    }

    /// Name of the [`Row`] field this column is bound to.
    pub fn field_name(self) -> &'static str {
        match self {
            Column::A => "name",
            Column::B => "val1",
            Column::C => "c",
            Column::D => "d",
            Column::E => "e",
        }
    }
}

/// One row of the exercise grid. Every cell is stored as the text the user typed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub val1: String,
    #[serde(default)]
    pub c: String,
    #[serde(default)]
    pub d: String,
    #[serde(default)]
    pub e: String,
}

impl Row {
    pub fn new(name: &str, val1: &str, c: &str, d: &str, e: &str) -> Row {
        Row {
            name: name.to_string(),
            val1: val1.to_string(),
            c: c.to_string(),
            d: d.to_string(),
            e: e.to_string(),
        }
    }

    pub fn get(&self, col: Column) -> &str {
        match col {
            Column::A => &self.name,
            Column::B => &self.val1,
            Column::C => &self.c,
            Column::D => &self.d,
            Column::E => &self.e,
        }
    }

    pub fn get_mut(&mut self, col: Column) -> &mut String {
        match col {
            Column::A => &mut self.name,
            Column::B => &mut self.val1,
            Column::C => &mut self.c,
            Column::D => &mut self.d,
            Column::E => &mut self.e,
        }
    }

    pub fn is_blank(&self) -> bool {
        Column::ALL.iter().all(|&col| self.get(col).trim().is_empty())
    }
}

/// The kind of content stored in a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellContent<'a> {
    Empty,
    Text(&'a str),
    Number(f64),
    /// Formula text including the leading '='.
    Formula(&'a str),
}

impl<'a> CellContent<'a> {
    /// Classify raw cell text.
    /// - Empty string or whitespace -> Empty
    /// - Starts with '=' -> Formula
    /// - Finite number -> Number
    /// - Otherwise -> Text
    pub fn classify(raw: &'a str) -> CellContent<'a> {
        if raw.starts_with('=') {
            return CellContent::Formula(raw);
        }
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellContent::Empty;
        }
        match parse_number(trimmed) {
            Some(n) => CellContent::Number(n),
            None => CellContent::Text(raw),
        }
    }

    /// Numeric value in arithmetic context. Anything non-numeric is 0.
    pub fn as_number(&self) -> f64 {
        match self {
            CellContent::Number(n) => *n,
            _ => 0.0,
        }
    }
}

/// Parse literal text as a finite number. `NaN` and `inf` spellings are rejected.
pub fn parse_number(text: &str) -> Option<f64> {
    let n = text.trim().parse::<f64>().ok()?;
    n.is_finite().then_some(n)
}

/// Read access to a grid snapshot.
pub trait CellSource {
    /// Raw text of a cell, or None when the reference is outside the grid.
    fn raw(&self, cell: &CellRef) -> Option<&str>;
}

impl CellSource for [Row] {
    fn raw(&self, cell: &CellRef) -> Option<&str> {
        let col = cell.column()?;
        self.get(cell.row).map(|row| row.get(col))
    }
}

impl CellSource for Vec<Row> {
    fn raw(&self, cell: &CellRef) -> Option<&str> {
        self.as_slice().raw(cell)
    }
}
