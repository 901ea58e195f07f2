//! examgrid-core - UI-agnostic exercise document + lesson storage.

pub mod document;
pub mod error;
pub mod storage;

pub use document::Exercise;
pub use error::{ExamgridError, Result};

pub use examgrid_engine::engine::{CellRef, Row};
