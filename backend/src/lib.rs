//! # Reformatter - Profile-driven spreadsheet reformatting
//!
//! Reformatter copies cells from a source spreadsheet into an output
//! document seeded from a template, following the ordered operations of a
//! stored profile. Its central operation turns each wide source row into
//! several narrow output rows ("split row copy").
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ XLSX / CSV  │────▶│    Codec    │────▶│   Engine    │────▶│ Output XLSX │
//! │  (source)   │     │ (workbook)  │     │ (profile)   │     │ (template)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use reformatter::{run_profile, ConsoleSink, ProfileRegistry, Settings};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::from_env();
//!     let registry = ProfileRegistry::with_dir(&settings.profiles_dir);
//!     let summary = run_profile(
//!         registry.get("monthly-split")?,
//!         Path::new("march.xlsx"),
//!         None,
//!         &settings,
//!         &ConsoleSink,
//!     )?;
//!     println!("Wrote {}", summary.output.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Directories from the environment
//! - [`diagnostics`] - Injected log sinks
//! - [`document`] - In-memory workbooks, sheets, rows and cells
//! - [`codec`] - XLSX and CSV reading, XLSX writing
//! - [`transform`] - Operations, engine and pipeline
//! - [`profiles`] - Profile model and registry
//! - [`validation`] - Profile schema validation

// Core modules
pub mod config;
pub mod diagnostics;
pub mod error;

// Documents
pub mod codec;
pub mod document;

// Transformation
pub mod transform;

// Profiles
pub mod profiles;

// Validation
pub mod validation;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigurationError, DocumentError, OperationError, ProfileError, RunError,
};

// =============================================================================
// Re-exports - Settings & diagnostics
// =============================================================================

pub use config::Settings;
pub use diagnostics::{ConsoleSink, DiagnosticSink, LogEntry, LogLevel, MemorySink, NullSink};

// =============================================================================
// Re-exports - Documents
// =============================================================================

pub use codec::{open_source, open_template, save_workbook, DocumentFormat};
pub use document::{Cell, CellSlot, CellValue, Row, Sheet, Style, Workbook};

// =============================================================================
// Re-exports - Engine
// =============================================================================

pub use transform::{
    copy_cell,
    execute,
    operations_description,
    ColumnMap,
    CopyOutcome,
    Engine,
    EngineReport,
    Operation,
    OperationKind,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{output_file_name, run_profile, RunSummary};

// =============================================================================
// Re-exports - Profiles & validation
// =============================================================================

pub use profiles::{example_profile, Profile, ProfileRegistry};
pub use validation::{is_valid_profile, validate_profile};
