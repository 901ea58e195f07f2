//! Cell and range reference parsing and formatting.
//!
//! Provides bidirectional conversion between exercise-style references
//! (e.g., "A1", "E20", "B2:D5") and zero-indexed column/row coordinates.
//! Only the five exercise columns `A..E` are addressable.
//!
//! # Examples
//!
//! ```
//! use examgrid_engine::engine::CellRef;
//!
//! let cell = CellRef::parse("B3").unwrap();
//! assert_eq!(cell.col, 1); // 0-indexed
//! assert_eq!(cell.row, 2);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use super::cell::Column;

/// A reference to a cell by column and row indices (0-indexed).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

fn cell_ref_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?<letter>[A-Ea-e])(?<number>[1-9][0-9]*)$")
            .expect("cell reference regex must compile")
    })
}

impl CellRef {
    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse a cell reference like "C3" (case-insensitive).
    /// Returns None for unknown columns, row 0, or rows that overflow.
    pub fn parse(name: &str) -> Option<CellRef> {
        let caps = cell_ref_re().captures(name.trim())?;
        let letter = caps["letter"].chars().next()?;
        let col = Column::from_letter(letter)?.index();
        let row = caps["number"].parse::<usize>().ok()?.checked_sub(1)?;
        Some(CellRef::new(col, row))
    }

    /// The column this reference points at, if it is one of `A..E`.
    pub fn column(&self) -> Option<Column> {
        Column::from_index(self.col)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column() {
            Some(col) => write!(f, "{}{}", col.letter(), self.row + 1),
            None => write!(f, "#{}:{}", self.col, self.row + 1),
        }
    }
}

/// A rectangular range between two cell references, inclusive on both ends.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct RangeRef {
    pub start: CellRef,
    pub end: CellRef,
}

impl RangeRef {
    pub fn new(start: CellRef, end: CellRef) -> RangeRef {
        RangeRef { start, end }
    }

    /// Parse a range like "A1:E5".
    pub fn parse(range: &str) -> Option<RangeRef> {
        let (start, end) = range.split_once(':')?;
        Some(RangeRef::new(CellRef::parse(start)?, CellRef::parse(end)?))
    }

    /// Number of cells swept, saturating. Inverted ranges cover zero cells.
    pub fn len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let rows = self.end.row - self.start.row + 1;
        let cols = self.end.col - self.start.col + 1;
        rows.saturating_mul(cols)
    }

    pub fn is_empty(&self) -> bool {
        self.start.row > self.end.row || self.start.col > self.end.col
    }

    /// Sweep rows top to bottom, and within each row the columns in `A..E` order.
    pub fn cells(&self) -> impl Iterator<Item = CellRef> + '_ {
        let cols = if self.start.col <= self.end.col {
            self.start.col..=self.end.col
        } else {
            // Inverted column span: an empty inclusive range.
            1..=0
        };
        (self.start.row..=self.end.row)
            .flat_map(move |row| cols.clone().map(move |col| CellRef::new(col, row)))
    }
}

impl fmt::Display for RangeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::{CellRef, RangeRef};

    #[test]
    fn test_parse_lowercase_and_display_uppercase() {
        let cr = CellRef::parse("c12").unwrap();
        assert_eq!(cr, CellRef::new(2, 11));
        assert_eq!(cr.to_string(), "C12");
    }

    #[test]
    fn test_parse_rejects_outside_exercise_columns() {
        assert!(CellRef::parse("F1").is_none());
        assert!(CellRef::parse("AA1").is_none());
        assert!(CellRef::parse("A0").is_none());
        assert!(CellRef::parse("A").is_none());
        assert!(CellRef::parse("1A").is_none());
    }

    #[test]
    fn test_parse_row_overflow_returns_none() {
        let huge = format!("A{}", "9".repeat(40));
        assert!(CellRef::parse(&huge).is_none());
    }

    #[test]
    fn test_range_sweeps_row_major() {
        let range = RangeRef::parse("B1:C2").unwrap();
        let names: Vec<String> = range.cells().map(|c| c.to_string()).collect();
        assert_eq!(names, vec!["B1", "C1", "B2", "C2"]);
        assert_eq!(range.len(), 4);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let cols = RangeRef::parse("D1:C1").unwrap();
        assert!(cols.is_empty());
        assert_eq!(cols.cells().count(), 0);

        let rows = RangeRef::parse("C5:C1").unwrap();
        assert!(rows.is_empty());
        assert_eq!(rows.cells().count(), 0);
        assert_eq!(rows.len(), 0);
    }
}
