use super::Exercise;
use crate::error::{ExamgridError, Result};
use examgrid_engine::engine::{CellRef, Column, detect_cycle};

impl Exercise {
    /// Set cell contents from user input (a cell-edit event).
    ///
    /// Circular formulas are accepted; they display `#CIRCULAR!` until edited.
    /// Returns the cycle path when the edit closes one, for the UI to highlight.
    pub fn set_cell(&mut self, cell_ref: CellRef, input: &str) -> Result<Option<Vec<CellRef>>> {
        let col = cell_ref
            .column()
            .ok_or(ExamgridError::OutOfBounds(cell_ref))?;
        let row = self
            .rows
            .get_mut(cell_ref.row)
            .ok_or(ExamgridError::OutOfBounds(cell_ref))?;

        *row.get_mut(col) = input.to_string();
        self.modified = true;
        log::debug!("set {} to {:?}", cell_ref, input);

        let cycle = if input.starts_with('=') {
            detect_cycle(&cell_ref, self.rows.as_slice())
        } else {
            None
        };
        if let Some(path) = &cycle {
            let names: Vec<String> = path.iter().map(|c| c.to_string()).collect();
            log::warn!("{} closes a circular reference: {}", cell_ref, names.join(" -> "));
        }
        Ok(cycle)
    }

    /// Set a cell addressed by name, e.g. `"C3"`.
    pub fn set_cell_by_name(&mut self, name: &str, input: &str) -> Result<Option<Vec<CellRef>>> {
        let cell_ref =
            CellRef::parse(name).ok_or_else(|| ExamgridError::InvalidCellRef(name.to_string()))?;
        self.set_cell(cell_ref, input)
    }

    /// Clear the specified cell.
    pub fn clear_cell(&mut self, cell_ref: CellRef) -> Result<()> {
        self.set_cell(cell_ref, "").map(|_| ())
    }

    /// Flip between formula view and value view.
    pub fn toggle_formula_view(&mut self) -> bool {
        self.formula_view = !self.formula_view;
        self.formula_view
    }

    /// Cells whose formulas take part in a true reference cycle, in grid order.
    pub fn circular_cells(&self) -> Vec<CellRef> {
        let mut cells = Vec::new();
        for row in 0..self.rows.len() {
            for col in Column::ALL {
                let cell_ref = CellRef::new(col.index(), row);
                let Some(path) = detect_cycle(&cell_ref, self.rows.as_slice()) else {
                    continue;
                };
                // Only cells on the loop itself, not cells that merely lead into it.
                let closing = path.last().copied();
                let on_loop = path
                    .iter()
                    .skip_while(|c| Some(**c) != closing)
                    .any(|c| *c == cell_ref);
                if on_loop {
                    cells.push(cell_ref);
                }
            }
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use examgrid_engine::engine::{EvalError, MAX_ROWS, Row, Value};

    fn c(name: &str) -> CellRef {
        CellRef::parse(name).unwrap()
    }

    #[test]
    fn test_edit_recomputes_dependents() {
        let mut ex = Exercise::from_rows(vec![Row::new("Rent", "1200", "=B1*12", "", "")]);
        assert_eq!(ex.value(&c("C1")), Ok(Value::Number(14400.0)));

        ex.set_cell_by_name("B1", "1000").unwrap();
        assert_eq!(ex.value(&c("C1")), Ok(Value::Number(12000.0)));
        assert!(ex.modified);
    }

    #[test]
    fn test_edit_outside_grid_is_rejected() {
        let mut ex = Exercise::new();
        let err = ex.set_cell(CellRef::new(2, MAX_ROWS), "1").unwrap_err();
        assert!(matches!(err, ExamgridError::OutOfBounds(_)));
        assert!(matches!(
            ex.set_cell_by_name("F1", "1"),
            Err(ExamgridError::InvalidCellRef(_))
        ));
        assert!(!ex.modified);
    }

    #[test]
    fn test_circular_edit_is_accepted_and_reported() {
        let mut ex = Exercise::new();
        assert!(ex.set_cell_by_name("C1", "=C2").unwrap().is_none());
        let cycle = ex.set_cell_by_name("C2", "=C1").unwrap().unwrap();
        assert_eq!(cycle.first(), Some(&c("C2")));

        assert_eq!(ex.value(&c("C1")), Err(EvalError::Circular));
        assert_eq!(ex.display(&c("C2")), "#CIRCULAR!");
        assert_eq!(ex.circular_cells(), vec![c("C1"), c("C2")]);

        ex.clear_cell(c("C2")).unwrap();
        assert!(ex.circular_cells().is_empty());
        assert_eq!(ex.value(&c("C1")), Ok(Value::Number(0.0)));
    }

    #[test]
    fn test_cells_leading_into_a_cycle_are_not_circular() {
        let mut ex = Exercise::new();
        ex.set_cell_by_name("D1", "=C1+1").unwrap();
        ex.set_cell_by_name("C1", "=C2").unwrap();
        ex.set_cell_by_name("C2", "=C1").unwrap();
        assert_eq!(ex.circular_cells(), vec![c("C1"), c("C2")]);
    }

    #[test]
    fn test_toggle_formula_view() {
        let mut ex = Exercise::new();
        assert!(ex.toggle_formula_view());
        assert!(!ex.toggle_formula_view());
    }
}
