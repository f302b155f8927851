//! Spreadsheet file codec.
//!
//! Opens source and template files into [`Workbook`]s and saves output
//! workbooks. XLSX goes through umya-spreadsheet in both directions, and an
//! output seeded from a template is written over that template's layout.
//! CSV sources are imported as a single sheet.

pub mod csv;
pub mod xlsx;

use std::fs;
use std::path::Path;

use crate::document::Workbook;
use crate::error::{DocumentError, DocumentResult};

/// File formats the codec understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Xlsx,
    Csv,
}

impl DocumentFormat {
    /// Format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> DocumentResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" => Ok(Self::Xlsx),
            "csv" | "tsv" | "txt" => Ok(Self::Csv),
            "" => Err(DocumentError::UnsupportedFormat(path.display().to_string())),
            other => Err(DocumentError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Open a source document (XLSX or CSV).
pub fn open_source(path: &Path) -> DocumentResult<Workbook> {
    match DocumentFormat::from_path(path)? {
        DocumentFormat::Xlsx => xlsx::load_xlsx(path),
        DocumentFormat::Csv => Ok(self::csv::load_csv(path)?.workbook),
    }
}

/// Open a template. Templates must be XLSX: they define the output sheets.
pub fn open_template(path: &Path) -> DocumentResult<Workbook> {
    match DocumentFormat::from_path(path)? {
        DocumentFormat::Xlsx => xlsx::load_xlsx(path),
        DocumentFormat::Csv => Err(DocumentError::UnsupportedFormat(format!(
            "template must be an XLSX file: {}",
            path.display()
        ))),
    }
}

/// Save an output workbook as XLSX, creating the parent directory.
pub fn save_workbook(workbook: &Workbook, path: &Path) -> DocumentResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    xlsx::save_xlsx(workbook, path)
}
