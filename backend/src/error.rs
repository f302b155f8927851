//! Error types for the reformatter.
//!
//! The hierarchy mirrors the layers of the crate:
//!
//! - [`DocumentError`] - reading/writing spreadsheet files (the I/O collaborator)
//! - [`ConfigurationError`] - an operation that cannot run against the documents it was given
//! - [`OperationError`] - a [`ConfigurationError`] tied to its position in a profile
//! - [`ProfileError`] - profile registry and profile document errors
//! - [`RunError`] - top-level profile run errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;

use thiserror::Error;

use crate::transform::operations::OperationKind;

// =============================================================================
// Document Errors
// =============================================================================

/// Errors raised while opening, decoding or saving spreadsheet documents.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Failed to read or write a file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The XLSX container could not be read or written.
    #[error("XLSX error: {0}")]
    Xlsx(#[from] umya_spreadsheet::XlsxError),

    /// A sheet could not be added to the output document.
    #[error("Sheet error: {0}")]
    Sheet(String),

    /// Malformed CSV content.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Text content could not be decoded.
    #[error("Failed to decode content: {0}")]
    Encoding(String),

    /// File extension is not a known spreadsheet format.
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// The document has no sheets at all.
    #[error("Document contains no sheets: {0}")]
    NoSheets(String),
}

// =============================================================================
// Configuration Errors (engine-fatal)
// =============================================================================

/// An operation references something that does not exist, or is malformed.
///
/// These abort the remaining operations of a profile. Output already written
/// stays in place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Source sheet index is out of range.
    #[error("Source sheet {index} does not exist (source has {count} sheets)")]
    MissingSourceSheet { index: usize, count: usize },

    /// Output sheet index is out of range.
    #[error("Output sheet {index} does not exist (output has {count} sheets)")]
    MissingOutputSheet { index: usize, count: usize },

    /// A row copy hit a source row that is not present.
    #[error("Source sheet {sheet} has no row {row}")]
    MissingSourceRow { sheet: usize, row: u32 },

    /// Header copy was requested but the source sheet has no header row.
    #[error("Source sheet {sheet} has no header row")]
    MissingHeaderRow { sheet: usize },

    /// A split row copy was given nothing to map.
    #[error("Column map of a split row copy is empty")]
    EmptyColumnMap,

    /// Start row is after end row.
    #[error("Invalid row range: start row {start} is after end row {end}")]
    InvertedRowRange { start: u32, end: u32 },

    /// Row index beyond the spreadsheet grid.
    #[error("Row index {0} is outside the sheet grid")]
    RowOutOfRange(u64),

    /// Column index beyond the spreadsheet grid.
    #[error("Column index {0} is outside the sheet grid")]
    ColumnOutOfRange(u64),
}

/// A fatal error together with the operation that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Operation #{index} ({kind}) failed: {source}")]
pub struct OperationError {
    /// Zero-based position of the operation in its profile.
    pub index: usize,
    pub kind: OperationKind,
    #[source]
    pub source: ConfigurationError,
}

// =============================================================================
// Profile Errors
// =============================================================================

/// Errors from the profile registry and profile documents.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Profile not found.
    #[error("Profile not found: {0}")]
    NotFound(String),

    /// A profile with that name is already stored.
    #[error("Profile already exists: {0}")]
    AlreadyExists(String),

    /// Profile document failed schema validation.
    #[error("Invalid profile: {}", .0.join("; "))]
    Invalid(Vec<String>),

    /// IO error.
    #[error("Profile IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("Profile JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Run Errors (top-level)
// =============================================================================

/// Top-level errors of a profile run.
///
/// This is the error type returned by [`crate::transform::pipeline::run_profile`].
#[derive(Debug, Error)]
pub enum RunError {
    /// Document error.
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Profile error.
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    /// The template referenced by the profile does not exist.
    #[error("Template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// An operation aborted the run; the partial output was still saved.
    #[error("{source} (partial output saved to {})", .output.display())]
    Aborted {
        #[source]
        source: OperationError,
        output: PathBuf,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Result type for engine operations.
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;

/// Result type for profile operations.
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Result type for profile runs.
pub type RunResult<T> = Result<T, RunError>;
