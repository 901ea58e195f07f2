//! Error types for examgrid core.

use thiserror::Error;

use examgrid_engine::engine::CellRef;

/// Errors that can occur while hosting an exercise.
#[derive(Error, Debug)]
pub enum ExamgridError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Cell {0} is outside the exercise grid")]
    OutOfBounds(CellRef),

    #[error("Invalid cell reference: {0}")]
    InvalidCellRef(String),

    #[error("Lesson file is empty")]
    EmptyLesson,

    #[error("No file path set")]
    NoFilePath,
}

pub type Result<T> = std::result::Result<T, ExamgridError>;
