//! Safe arithmetic evaluation.
//!
//! The four operators below are the only computation a formula can perform.

use super::error::EvalError;
use super::parser::{Op, parse};
use super::{Row, eval};

impl Op {
    /// Apply a binary operator. Division by zero and overflow to infinity are errors.
    pub fn apply(self, left: f64, right: f64) -> Result<f64, EvalError> {
        let result = match self {
            Op::Add => left + right,
            Op::Sub => left - right,
            Op::Mul => left * right,
            Op::Div => {
                if right == 0.0 {
                    return Err(EvalError::evaluation("division by zero"));
                }
                left / right
            }
        };
        finite(result)
    }
}

pub(crate) fn finite(n: f64) -> Result<f64, EvalError> {
    if n.is_finite() {
        Ok(n)
    } else {
        Err(EvalError::evaluation("result is not a finite number"))
    }
}

/// Evaluate a pure arithmetic string: digits, `+ - * / ( ) .` and whitespace.
///
/// Any other character is a [`EvalError::Syntax`], so cell references and
/// functions are not accepted here.
pub fn eval_arithmetic(s: &str) -> Result<f64, EvalError> {
    if let Some(bad) = s
        .chars()
        .find(|c| !(c.is_ascii_digit() || c.is_whitespace() || "+-*/().".contains(*c)))
    {
        return Err(EvalError::syntax(format!("unexpected character '{}'", bad)));
    }
    let expr = parse(s)?;
    let no_cells: &[Row] = &[];
    eval::eval_expr(&expr, no_cells, 0)
}
