//! Type-aware copy of one cell into another.

use crate::document::date::{datetime_to_serial, serial_to_datetime};
use crate::document::{Cell, CellValue, Sheet};

/// What happened to the destination of a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Value and style were copied.
    Copied,
    /// There was no source cell; the destination is blank with a default style.
    Blanked,
    /// The source holds a value kind that is not copied; destination untouched.
    Unsupported(&'static str),
}

/// Copy `source` into `destination`.
///
/// The destination gets its own clone of the source style. A number is
/// treated as a date when it is flagged as one or when its number format is
/// a date format; the copy then goes through the calendar interpretation of
/// the serial and comes out date-flagged.
pub fn copy_cell(source: Option<&Cell>, destination: &mut Cell) -> CopyOutcome {
    let Some(source) = source else {
        *destination = Cell::blank();
        return CopyOutcome::Blanked;
    };

    let value = match &source.value {
        CellValue::Text(s) => CellValue::Text(s.clone()),
        CellValue::Number { value, is_date } => {
            if *is_date || source.style.is_date_formatted() {
                let value = serial_to_datetime(*value).map_or(*value, datetime_to_serial);
                CellValue::Number { value, is_date: true }
            } else {
                CellValue::Number { value: *value, is_date: false }
            }
        }
        CellValue::Boolean(b) => CellValue::Boolean(*b),
        CellValue::Formula(f) => CellValue::Formula(f.clone()),
        CellValue::Blank => CellValue::Blank,
        unsupported @ CellValue::Error(_) => return CopyOutcome::Unsupported(unsupported.kind()),
    };

    destination.value = value;
    destination.style = source.style.clone();
    CopyOutcome::Copied
}

/// Kind of a source cell that is not copied, if it is one.
pub fn unsupported_kind(source: Option<&Cell>) -> Option<&'static str> {
    match source.map(|cell| &cell.value) {
        Some(value @ CellValue::Error(_)) => Some(value.kind()),
        _ => None,
    }
}

/// Copy `source` to `(row, column)` of `sheet`.
///
/// The destination cell (and its row) is replaced only when the source can
/// be copied; an unsupported source leaves the sheet as it was.
pub fn copy_into(source: Option<&Cell>, sheet: &mut Sheet, row: u32, column: u16) -> CopyOutcome {
    if let Some(kind) = unsupported_kind(source) {
        return CopyOutcome::Unsupported(kind);
    }
    copy_cell(source, sheet.row_or_create(row).create_cell(column))
}
