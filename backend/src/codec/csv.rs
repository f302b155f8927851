//! CSV import with encoding and delimiter auto-detection.
//!
//! A CSV file becomes a single-sheet workbook. Every record, the header
//! line included, is stored at its record index so that row numbers in a
//! profile mean the same thing for CSV and XLSX sources.

use std::path::Path;

use csv::ReaderBuilder;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

use crate::document::{Cell, Sheet, Workbook};
use crate::error::{DocumentError, DocumentResult};

/// Result of decoding CSV bytes, with what was detected.
#[derive(Debug, Clone)]
pub struct CsvImport {
    pub workbook: Workbook,
    /// Name of the encoding the bytes were read with
    pub encoding: &'static str,
    pub delimiter: char,
}

/// Delimiters tried on the header line. Earlier ones win ties.
const DELIMITERS: [char; 4] = [';', ',', '\t', '|'];

/// Guess the encoding a source file was saved with.
///
/// Plain ASCII is read as UTF-8. Latin-1 is read as windows-1252, which
/// agrees with it everywhere except the C1 range, where spreadsheet exports
/// mean the windows-1252 characters anyway.
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    let (charset, _, _) = chardet::detect(bytes);
    match charset.to_ascii_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => UTF_8,
        "iso-8859-1" | "latin-1" | "latin1" => WINDOWS_1252,
        label => Encoding::for_label(label.as_bytes()).unwrap_or(UTF_8),
    }
}

/// Decode a source file. A byte-order mark overrides `encoding` and is dropped.
pub fn decode_content(bytes: &[u8], encoding: &'static Encoding) -> DocumentResult<String> {
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DocumentError::Encoding(format!(
            "source is not valid {}",
            used.name()
        )));
    }
    Ok(text.into_owned())
}

/// Pick the delimiter that splits the header line into the most fields.
///
/// Characters inside double quotes are not counted, so a quoted header such
/// as `"Qty; boxes"` does not vote for `;`.
pub fn detect_delimiter(content: &str) -> char {
    let header = content.lines().next().unwrap_or("");

    let mut counts = [0usize; DELIMITERS.len()];
    let mut quoted = false;
    for c in header.chars() {
        if c == '"' {
            quoted = !quoted;
        } else if !quoted {
            if let Some(i) = DELIMITERS.iter().position(|d| *d == c) {
                counts[i] += 1;
            }
        }
    }

    // max_by_key keeps the last maximum, so scan in reverse to favour earlier entries.
    DELIMITERS
        .iter()
        .zip(counts)
        .rev()
        .max_by_key(|(_, count)| *count)
        .map_or(DELIMITERS[0], |(d, _)| *d)
}

/// Parse decoded CSV text into a single sheet.
pub fn parse_sheet(content: &str, delimiter: char, sheet_name: &str) -> DocumentResult<Sheet> {
    let delimiter = u8::try_from(delimiter)
        .map_err(|_| DocumentError::Encoding(format!("delimiter '{}' is not ASCII", delimiter)))?;

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut sheet = Sheet::new(sheet_name);

    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        let Ok(row) = u32::try_from(row_idx) else {
            break;
        };

        for (col_idx, field) in record.iter().enumerate() {
            let Ok(col) = u16::try_from(col_idx) else {
                break;
            };
            if let Some(cell) = field_to_cell(field) {
                sheet.set_cell(row, col, cell);
            }
        }
    }

    Ok(sheet)
}

/// Type a raw CSV field. Empty fields are absent cells.
fn field_to_cell(field: &str) -> Option<Cell> {
    if field.is_empty() {
        return None;
    }

    let trimmed = field.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        return Some(Cell::boolean(true));
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Some(Cell::boolean(false));
    }
    if looks_numeric(trimmed) {
        if let Ok(n) = trimmed.parse::<f64>() {
            if n.is_finite() {
                return Some(Cell::number(n));
            }
        }
    }

    Some(Cell::text(field))
}

/// Digits with an optional sign, decimal point and exponent. Codes with a
/// leading zero (`007`, `0123`) stay text.
fn looks_numeric(s: &str) -> bool {
    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    let mut chars = unsigned.chars();
    match (chars.next(), chars.next()) {
        (Some(c), _) if !c.is_ascii_digit() && c != '.' => false,
        (Some('0'), Some(d)) if d.is_ascii_digit() => false,
        (Some(_), _) => unsigned
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '-' | '+')),
        (None, _) => false,
    }
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8], sheet_name: &str) -> DocumentResult<CsvImport> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, encoding)?;
    let delimiter = detect_delimiter(&content);
    let sheet = parse_sheet(&content, delimiter, sheet_name)?;

    Ok(CsvImport {
        workbook: Workbook::from_sheets(vec![sheet]),
        encoding: encoding.name(),
        delimiter,
    })
}

/// Load a CSV file as a single-sheet workbook named after the file stem.
pub fn load_csv(path: &Path) -> DocumentResult<CsvImport> {
    let bytes = std::fs::read(path)?;
    let sheet_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sheet1");
    parse_bytes_auto(&bytes, sheet_name)
}
