//! Lesson storage: CSV import/export and Markdown export.

pub mod csv;
pub mod md;

pub use csv::{parse_lesson_csv, write_lesson_csv};
pub use md::write_markdown;
