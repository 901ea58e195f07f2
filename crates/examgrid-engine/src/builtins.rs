//! Built-in range aggregates and their metadata.
//!
//! Conventions:
//! - Spreadsheet-facing names are ALL CAPS (e.g. `SUM`, `AVERAGE`) and are
//!   matched case-insensitively.
//! - Every aggregate takes exactly one `ref:ref` range argument.
//! - If you add a new aggregate, add a variant to [`Aggregate`], a row to
//!   `RANGE_BUILTINS`, and its arm in [`Aggregate::apply`].

use crate::engine::{CellContent, CellSource, EvalError, RangeRef, Value, evaluate};

/// Ranges larger than this are refused instead of swept.
pub const MAX_RANGE_CELLS: usize = 100_000;

/// Aggregate functions over a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregate {
    Sum,
    Average,
    Min,
    Max,
    Count,
}

pub struct RangeBuiltin {
    pub sheet_name: &'static str,
    pub func: Aggregate,
    pub description: &'static str,
}

pub const RANGE_BUILTINS: &[RangeBuiltin] = &[
    RangeBuiltin {
        sheet_name: "SUM",
        func: Aggregate::Sum,
        description: "Sum of the values in a cell range",
    },
    RangeBuiltin {
        sheet_name: "AVERAGE",
        func: Aggregate::Average,
        description: "Average of the values in a cell range",
    },
    RangeBuiltin {
        sheet_name: "MIN",
        func: Aggregate::Min,
        description: "Minimum value in a cell range",
    },
    RangeBuiltin {
        sheet_name: "MAX",
        func: Aggregate::Max,
        description: "Maximum value in a cell range",
    },
    RangeBuiltin {
        sheet_name: "COUNT",
        func: Aggregate::Count,
        description: "Number of cells in a cell range",
    },
];

impl Aggregate {
    /// Look up an aggregate by spreadsheet name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Aggregate> {
        RANGE_BUILTINS
            .iter()
            .find(|b| b.sheet_name.eq_ignore_ascii_case(name))
            .map(|b| b.func)
    }

    pub fn name(self) -> &'static str {
        self.builtin().sheet_name
    }

    fn builtin(self) -> &'static RangeBuiltin {
        RANGE_BUILTINS
            .iter()
            .find(|b| b.func == self)
            .expect("every aggregate has a RANGE_BUILTINS entry")
    }

    /// Reduce expanded range values.
    ///
    /// `SUM` of nothing is 0 and `COUNT` is the number of cells touched;
    /// `AVERAGE`, `MIN` and `MAX` of an empty range are errors.
    pub fn apply(self, values: &[f64]) -> Result<f64, EvalError> {
        let empty = || EvalError::evaluation(format!("{} of an empty range", self.name()));
        match self {
            Aggregate::Sum => Ok(values.iter().sum()),
            Aggregate::Average => {
                if values.is_empty() {
                    return Err(empty());
                }
                Ok(values.iter().sum::<f64>() / values.len() as f64)
            }
            Aggregate::Min => values.iter().copied().reduce(f64::min).ok_or_else(empty),
            Aggregate::Max => values.iter().copied().reduce(f64::max).ok_or_else(empty),
            Aggregate::Count => Ok(values.len() as f64),
        }
    }
}

/// Expand a range into one number per cell touched, row by row.
///
/// Formula cells are evaluated one level deeper; a formula that errors or
/// yields text contributes 0, as do empty, non-numeric and out-of-grid cells.
pub fn expand_range<S>(range: &RangeRef, grid: &S, depth: usize) -> Result<Vec<f64>, EvalError>
where
    S: CellSource + ?Sized,
{
    let len = range.len();
    if len > MAX_RANGE_CELLS {
        return Err(EvalError::evaluation(format!(
            "range {} covers more than {} cells",
            range, MAX_RANGE_CELLS
        )));
    }

    let mut values = Vec::with_capacity(len);
    for cell in range.cells() {
        let Some(raw) = grid.raw(&cell) else {
            values.push(0.0);
            continue;
        };
        let value = match CellContent::classify(raw) {
            CellContent::Formula(formula) => match evaluate(formula, grid, depth + 1) {
                Ok(Value::Number(n)) => n,
                Ok(Value::Text(_)) => 0.0,
                Err(err) => {
                    log::trace!("{} in range {} counts as 0: {}", cell, range, err);
                    0.0
                }
            },
            literal => literal.as_number(),
        };
        values.push(value);
    }
    Ok(values)
}
