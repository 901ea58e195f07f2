//! examgrid_engine - Formula evaluator for the spreadsheet exercise.

pub mod builtins;
pub mod engine;

pub use builtins::{Aggregate, expand_range};
