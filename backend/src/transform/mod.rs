//! Transformation module.
//!
//! This module copies cells from a source workbook into an output workbook:
//! - Operations: the copy steps a profile is made of
//! - Column map: source→destination column groups for split copies
//! - Copier / Scanner: cell copy and end-of-data detection
//! - Engine: runs operations in order
//! - Pipeline: opens documents, runs a profile, saves the result

pub mod column_map;
pub mod copier;
pub mod engine;
pub mod operations;
pub mod pipeline;
pub mod scanner;

pub use column_map::{invert, ColumnMap, InvertedColumnMap, SplitPlan};
pub use copier::{copy_cell, copy_into, unsupported_kind, CopyOutcome};
pub use engine::{execute, Engine, EngineReport, OperationSummary, UnsupportedCell};
pub use operations::{operations_description, ColumnCopy, Operation, OperationKind, RowCopy, SplitRowCopy};
pub use pipeline::{default_output_path, output_file_name, run_profile, RunSummary};
pub use scanner::{are_next_rows_empty, is_row_empty, DATA_END_LOOKAHEAD};
