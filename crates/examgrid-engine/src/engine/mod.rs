//! Spreadsheet exercise engine API.
//!
//! This module provides the formula evaluator behind the grid exercise:
//!
//! - [`Row`], [`Column`], [`CellContent`], [`CellSource`] - Grid data and read access
//! - [`CellRef`], [`RangeRef`] - Reference parsing (A1 notation ↔ row/col indices)
//! - [`evaluate`], [`resolve_cell`] - Recursive formula evaluation with a depth ceiling
//! - [`eval_arithmetic`] - Safe evaluation of pure arithmetic strings
//! - [`extract_dependencies`], [`detect_cycle`] - Dependency and cycle diagnostics
//! - [`format_result`] - Format values and error codes for display

mod arith;
mod cell;
mod cell_ref;
mod cycle;
mod deps;
mod error;
mod eval;
mod format;
mod parser;

pub use arith::eval_arithmetic;
pub use cell::{CellContent, CellSource, Column, MAX_ROWS, Row, parse_number};
pub use cell_ref::{CellRef, RangeRef};
pub use cycle::detect_cycle;
pub use deps::extract_dependencies;
pub use error::EvalError;
pub use eval::{MAX_DEPTH, Value, evaluate, evaluate_cell, resolve_cell};
pub use format::{DEFAULT_DECIMALS, format_number, format_result};
pub use parser::{Expr, Op, RefNode, parse};
