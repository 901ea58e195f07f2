//! Recursive formula evaluation.
//!
//! [`evaluate`] is the entry point used by the display layer. It parses a
//! formula once and walks the tree, resolving cell references and aggregate
//! ranges against the grid it is handed. A referenced cell that holds a
//! formula is evaluated one level deeper; past [`MAX_DEPTH`] the result is
//! [`EvalError::Circular`]. There is no visited-set: the depth ceiling is the
//! only cycle guard, so a 2-cycle is reported once the chase runs out of depth.

use super::arith::finite;
use super::cell::{CellContent, CellSource, parse_number};
use super::cell_ref::CellRef;
use super::error::EvalError;
use super::parser::{Expr, parse};
use crate::builtins::expand_range;

/// Deepest formula nesting level that is still evaluated.
pub const MAX_DEPTH: usize = 10;

/// A successfully evaluated cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    /// Literal text, returned as typed for cells that are not formulas.
    Text(String),
}

impl Value {
    /// Numeric value in arithmetic context (text is 0).
    pub fn as_number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::Text(_) => 0.0,
        }
    }
}

/// Evaluate cell text against a grid.
///
/// Text not starting with '=' is returned as a literal. Callers start at depth 0.
pub fn evaluate<S>(formula: &str, grid: &S, depth: usize) -> Result<Value, EvalError>
where
    S: CellSource + ?Sized,
{
    let Some(body) = formula.strip_prefix('=') else {
        return Ok(match parse_number(formula) {
            Some(n) => Value::Number(n),
            None => Value::Text(formula.to_string()),
        });
    };

    if depth > MAX_DEPTH {
        log::debug!("depth ceiling reached at {} evaluating '{}'", depth, formula);
        return Err(EvalError::Circular);
    }
    log::trace!("evaluating '{}' at depth {}", formula, depth);

    let expr = parse(body)?;
    eval_expr(&expr, grid, depth).map(Value::Number)
}

/// Evaluate whatever is stored at `cell`, starting at depth 0.
pub fn evaluate_cell<S>(cell: &CellRef, grid: &S) -> Result<Value, EvalError>
where
    S: CellSource + ?Sized,
{
    match grid.raw(cell) {
        Some(raw) => evaluate(raw, grid, 0),
        None => Ok(Value::Text(String::new())),
    }
}

/// Numeric value of a single referenced cell.
///
/// Cells outside the grid and non-numeric literals are 0. A formula cell is
/// evaluated at `depth + 1`; its errors propagate to the referencing formula.
pub fn resolve_cell<S>(cell: &CellRef, grid: &S, depth: usize) -> Result<f64, EvalError>
where
    S: CellSource + ?Sized,
{
    let Some(raw) = grid.raw(cell) else {
        return Ok(0.0);
    };
    match CellContent::classify(raw) {
        CellContent::Formula(formula) => Ok(evaluate(formula, grid, depth + 1)?.as_number()),
        literal => Ok(literal.as_number()),
    }
}

pub(crate) fn eval_expr<S>(expr: &Expr, grid: &S, depth: usize) -> Result<f64, EvalError>
where
    S: CellSource + ?Sized,
{
    match expr {
        Expr::Number(n) => finite(*n),
        Expr::Cell(cell) => resolve_cell(cell, grid, depth),
        Expr::Aggregate { func, range } => {
            let values = expand_range(range, grid, depth)?;
            finite(func.apply(&values)?)
        }
        Expr::Neg(inner) => Ok(-eval_expr(inner, grid, depth)?),
        Expr::Binary { op, left, right } => {
            let l = eval_expr(left, grid, depth)?;
            let r = eval_expr(right, grid, depth)?;
            op.apply(l, r)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Row;

    fn grid_with_c(values: &[&str]) -> Vec<Row> {
        values.iter().map(|v| Row::new("", "", v, "", "")).collect()
    }

    #[test]
    fn test_literal_passthrough() {
        let grid: Vec<Row> = Vec::new();
        assert_eq!(evaluate("hello", &grid, 0), Ok(Value::Text("hello".into())));
        assert_eq!(evaluate("42", &grid, 0), Ok(Value::Number(42.0)));
        assert_eq!(evaluate("", &grid, 0), Ok(Value::Text(String::new())));
    }

    #[test]
    fn test_literal_ignores_depth() {
        let grid: Vec<Row> = Vec::new();
        assert_eq!(evaluate("7", &grid, MAX_DEPTH + 5), Ok(Value::Number(7.0)));
    }

    #[test]
    fn test_formula_past_ceiling_is_circular() {
        let grid: Vec<Row> = Vec::new();
        assert_eq!(evaluate("=1", &grid, MAX_DEPTH), Ok(Value::Number(1.0)));
        assert_eq!(evaluate("=1", &grid, MAX_DEPTH + 1), Err(EvalError::Circular));
    }

    #[test]
    fn test_resolve_cell_out_of_bounds_is_zero() {
        let grid = grid_with_c(&["3"]);
        assert_eq!(resolve_cell(&CellRef::new(2, 0), &grid, 0), Ok(3.0));
        assert_eq!(resolve_cell(&CellRef::new(2, 19), &grid, 0), Ok(0.0));
    }

    #[test]
    fn test_resolve_cell_propagates_nested_errors() {
        let grid = grid_with_c(&["=4/0"]);
        assert!(matches!(
            resolve_cell(&CellRef::new(2, 0), &grid, 0),
            Err(EvalError::Evaluation(_))
        ));
    }

    #[test]
    fn test_negative_cell_values_subtract_cleanly() {
        let grid = grid_with_c(&["-3"]);
        assert_eq!(evaluate("=2-C1", &grid, 0), Ok(Value::Number(5.0)));
    }

    #[test]
    fn test_evaluate_cell_reads_stored_content() {
        let grid = grid_with_c(&["4", "=C1*C1"]);
        assert_eq!(evaluate_cell(&CellRef::new(2, 1), &grid), Ok(Value::Number(16.0)));
        assert_eq!(
            evaluate_cell(&CellRef::new(2, 5), &grid),
            Ok(Value::Text(String::new()))
        );
    }
}
