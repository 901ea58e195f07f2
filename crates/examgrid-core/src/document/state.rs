use examgrid_engine::engine::{
    CellRef, DEFAULT_DECIMALS, EvalError, MAX_ROWS, Row, Value, evaluate_cell, format_result,
};
use std::path::PathBuf;

/// UI-agnostic state for one spreadsheet exercise.
///
/// The grid always holds exactly [`MAX_ROWS`] rows: lesson rows first, blank
/// placeholders after. Values are never cached; every read re-evaluates.
pub struct Exercise {
    /// The exercise grid
    pub(crate) rows: Vec<Row>,
    /// Show raw formula text instead of computed values
    pub formula_view: bool,
    /// Decimal places for non-integer results
    pub decimals: usize,
    /// Lesson file the grid was loaded from
    pub file_path: Option<PathBuf>,
    /// Whether the grid has been edited since loading
    pub modified: bool,
}

impl Exercise {
    /// Create an exercise with an all-blank grid.
    pub fn new() -> Self {
        Self::from_rows(Vec::new())
    }

    /// Create an exercise from lesson rows.
    /// Rows past [`MAX_ROWS`] are dropped; missing rows are blank placeholders.
    pub fn from_rows(mut rows: Vec<Row>) -> Self {
        if rows.len() > MAX_ROWS {
            log::warn!(
                "lesson has {} rows, keeping the first {}",
                rows.len(),
                MAX_ROWS
            );
            rows.truncate(MAX_ROWS);
        }
        rows.resize_with(MAX_ROWS, Row::default);

        Exercise {
            rows,
            formula_view: false,
            decimals: DEFAULT_DECIMALS,
            file_path: None,
            modified: false,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Raw text stored in a cell, or None outside the grid.
    pub fn raw(&self, cell_ref: &CellRef) -> Option<&str> {
        let col = cell_ref.column()?;
        self.rows.get(cell_ref.row).map(|row| row.get(col))
    }

    /// Evaluate a cell against the current grid.
    pub fn value(&self, cell_ref: &CellRef) -> Result<Value, EvalError> {
        evaluate_cell(cell_ref, self.rows.as_slice())
    }

    /// Text shown in a cell: the raw formula in formula view, else the computed result.
    pub fn display(&self, cell_ref: &CellRef) -> String {
        if self.formula_view {
            return self.raw(cell_ref).unwrap_or_default().to_string();
        }
        format_result(&self.value(cell_ref), self.decimals)
    }

    /// Number of leading rows that hold any content.
    pub fn used_rows(&self) -> usize {
        self.rows
            .iter()
            .rposition(|row| !row.is_blank())
            .map_or(0, |idx| idx + 1)
    }
}

impl Default for Exercise {
    fn default() -> Self {
        Self::new()
    }
}
