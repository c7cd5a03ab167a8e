//! Export functionality for analysis and research
//!
//! Currently supports CSV export of learning curves.

mod curve_csv;

pub use curve_csv::{CurveRecord, write_curves, write_learning_curves};
