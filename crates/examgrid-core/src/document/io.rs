use super::Exercise;
use crate::error::{ExamgridError, Result};
use crate::storage::{parse_lesson_csv, write_lesson_csv, write_markdown};
use std::path::{Path, PathBuf};

impl Exercise {
    /// Create an exercise from a lesson CSV file.
    pub fn from_lesson_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let rows = parse_lesson_csv(&content)?;
        if rows.is_empty() {
            return Err(ExamgridError::EmptyLesson);
        }
        log::debug!("loaded {} lesson rows from {}", rows.len(), path.display());

        let mut exercise = Exercise::from_rows(rows);
        exercise.file_path = Some(path.to_path_buf());
        Ok(exercise)
    }

    /// Save raw cell contents back to the lesson file.
    /// Returns the path saved to.
    pub fn save_lesson(&mut self) -> Result<PathBuf> {
        let Some(path) = &self.file_path else {
            return Err(ExamgridError::NoFilePath);
        };

        std::fs::write(path, write_lesson_csv(&self.rows))?;
        self.modified = false;
        Ok(path.clone())
    }

    /// Export the grid as a markdown table of display values.
    pub fn export_markdown(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)?;
        write_markdown(&mut file, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use examgrid_engine::engine::{CellRef, Value};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("examgrid-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_load_edit_save_roundtrip() {
        let path = temp_path("lesson.csv");
        std::fs::write(&path, "name,val1,c,d,e\nRent,1200,=B1*12\n").unwrap();

        let mut ex = Exercise::from_lesson_file(&path).unwrap();
        assert_eq!(ex.used_rows(), 1);
        ex.set_cell_by_name("D1", "=C1/2").unwrap();
        assert_eq!(ex.save_lesson().unwrap(), path);
        assert!(!ex.modified);

        let reloaded = Exercise::from_lesson_file(&path).unwrap();
        assert_eq!(
            reloaded.value(&CellRef::parse("D1").unwrap()),
            Ok(Value::Number(7200.0))
        );
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_empty_lesson_is_an_error() {
        let path = temp_path("empty.csv");
        std::fs::write(&path, "name,val1,c,d,e\n").unwrap();
        assert!(matches!(
            Exercise::from_lesson_file(&path),
            Err(ExamgridError::EmptyLesson)
        ));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_save_without_path() {
        let mut ex = Exercise::new();
        assert!(matches!(ex.save_lesson(), Err(ExamgridError::NoFilePath)));
    }

    #[test]
    fn test_export_markdown_writes_file() {
        let path = temp_path("export.md");
        let ex = Exercise::from_rows(vec![examgrid_engine::engine::Row::new("x", "2", "=B1*B1", "", "")]);
        ex.export_markdown(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("| 1 | x | 2 | 4 |  |  |"));
        let _ = std::fs::remove_file(&path);
    }
}
