//! Dependency extraction from formula strings.
//!
//! Finds every cell a formula reads (e.g. `A1`, or each cell of `SUM(B2:C5)`).
//! This feeds cycle diagnostics in the host; the evaluator itself never needs
//! a dependency list.
//!
//! Handles:
//! - Simple cell references: `A1`, `b2`
//! - Aggregate ranges: `SUM(A1:B5)` expands to each cell swept
//! - Non-formulas and formulas that do not parse have no dependencies

use super::cell_ref::CellRef;
use super::parser::{RefNode, parse};

const MAX_DEPENDENCY_RANGE_CELLS: usize = 10_000;

/// Extract all cell references a cell's content depends on.
pub fn extract_dependencies(content: &str) -> Vec<CellRef> {
    let Some(body) = content.strip_prefix('=') else {
        return Vec::new();
    };
    let Ok(expr) = parse(body) else {
        return Vec::new();
    };

    let mut deps = Vec::new();
    expr.walk_refs(&mut |node| match node {
        RefNode::Cell(cell) => deps.push(*cell),
        RefNode::Range(range) => {
            if range.len() <= MAX_DEPENDENCY_RANGE_CELLS {
                deps.extend(range.cells());
            }
        }
    });
    deps.dedup();
    deps
}
