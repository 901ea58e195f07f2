//! Circular dependency diagnostics for formula cells.
//!
//! The evaluator only guards against cycles with its depth ceiling. Hosts
//! use [`detect_cycle`] after an edit to find a true cycle (e.g. C1 references
//! C2, C2 references C1) and report the path.

use std::collections::HashSet;

use super::cell::CellSource;
use super::cell_ref::CellRef;
use super::deps::extract_dependencies;

/// Detect circular dependencies reachable from a cell.
/// Returns Some(cycle_path) if a cycle is found, None otherwise.
/// The path ends with the cell that closes the cycle.
pub fn detect_cycle<S>(start: &CellRef, grid: &S) -> Option<Vec<CellRef>>
where
    S: CellSource + ?Sized,
{
    let mut visiting = HashSet::new();
    let mut finished = HashSet::new();
    let mut path = Vec::new();

    if detect_cycle_dfs(start, grid, &mut visiting, &mut finished, &mut path) {
        Some(path)
    } else {
        None
    }
}

fn detect_cycle_dfs<S>(
    current: &CellRef,
    grid: &S,
    visiting: &mut HashSet<CellRef>,
    finished: &mut HashSet<CellRef>,
    path: &mut Vec<CellRef>,
) -> bool
where
    S: CellSource + ?Sized,
{
    if visiting.contains(current) {
        path.push(*current);
        return true;
    }
    if finished.contains(current) {
        return false;
    }

    let deps = match grid.raw(current) {
        Some(raw) => extract_dependencies(raw),
        None => return false,
    };

    visiting.insert(*current);
    path.push(*current);

    for dep in &deps {
        if detect_cycle_dfs(dep, grid, visiting, finished, path) {
            return true;
        }
    }

    path.pop();
    visiting.remove(current);
    finished.insert(*current);
    false
}
