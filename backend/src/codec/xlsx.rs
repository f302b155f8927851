//! XLSX reading and writing (umya-spreadsheet).
//!
//! Reading keeps each cell's value, formula and the parts of its style the
//! document model carries. Writing starts from the file the workbook was
//! read from, when there is one, so everything the model does not carry
//! (column widths, merged cells, borders, fonts) survives in the output.
//! Only cells whose content changed are rewritten.

use std::path::Path;

use umya_spreadsheet::{
    reader, writer, Cell as XlsxCell, CellRawValue, Spreadsheet, Style as XlsxStyle, Worksheet,
};

use crate::document::style::{DEFAULT_DATE_FORMAT, GENERAL_FORMAT};
use crate::document::{Cell, CellValue, Sheet, Style, Workbook};
use crate::error::{DocumentError, DocumentResult};

/// Read every sheet of an XLSX/XLSM file, in workbook order.
pub fn load_xlsx(path: &Path) -> DocumentResult<Workbook> {
    let book = reader::xlsx::read(path)?;
    let count = book.get_sheet_count();

    if count == 0 {
        return Err(DocumentError::NoSheets(path.display().to_string()));
    }

    let sheets = (0..count)
        .filter_map(|index| book.get_sheet(&index))
        .map(read_sheet)
        .collect();

    Ok(Workbook::from_sheets(sheets).with_origin(path))
}

fn read_sheet(worksheet: &Worksheet) -> Sheet {
    let mut sheet = Sheet::new(worksheet.get_name());

    for cell in worksheet.get_cell_collection() {
        let coordinate = cell.get_coordinate();
        let Some((row, column)) = model_position(*coordinate.get_col_num(), *coordinate.get_row_num()) else {
            continue;
        };
        if let Some(cell) = read_cell(cell) {
            sheet.set_cell(row, column, cell);
        }
    }

    sheet
}

/// XLSX coordinates are one-based `(column, row)`.
fn model_position(column: u32, row: u32) -> Option<(u32, u16)> {
    let row = row.checked_sub(1)?;
    let column = u16::try_from(column.checked_sub(1)?).ok()?;
    Some((row, column))
}

fn xlsx_position(row: u32, column: u16) -> (u32, u32) {
    (u32::from(column) + 1, row + 1)
}

/// Convert one stored cell. Empty cells without formatting are skipped.
fn read_cell(cell: &XlsxCell) -> Option<Cell> {
    let style = read_style(cell.get_style());
    let content = cell.get_cell_value();

    let value = if content.is_formula() && !content.get_formula().is_empty() {
        let formula = content.get_formula();
        CellValue::Formula(formula.strip_prefix('=').unwrap_or(formula).to_string())
    } else {
        match content.get_raw_value() {
            CellRawValue::String(s) => CellValue::Text(s.to_string()),
            CellRawValue::RichText(rich) => CellValue::Text(rich.get_text().to_string()),
            CellRawValue::Numeric(n) => CellValue::Number { value: *n, is_date: style.is_date_formatted() },
            CellRawValue::Bool(b) => CellValue::Boolean(*b),
            CellRawValue::Error(_) => CellValue::Error(content.get_value().to_string()),
            CellRawValue::Empty => CellValue::Blank,
            #[allow(unreachable_patterns)]
            _ => untyped_value(&content.get_value(), &style),
        }
    };

    if matches!(value, CellValue::Blank) && style.is_default() {
        return None;
    }
    Some(Cell { value, style })
}

/// Values the reader left untyped.
fn untyped_value(text: &str, style: &Style) -> CellValue {
    if let Ok(value) = text.parse::<f64>() {
        CellValue::Number { value, is_date: style.is_date_formatted() }
    } else if text.eq_ignore_ascii_case("TRUE") {
        CellValue::Boolean(true)
    } else if text.eq_ignore_ascii_case("FALSE") {
        CellValue::Boolean(false)
    } else if text.is_empty() {
        CellValue::Blank
    } else {
        CellValue::Text(text.to_string())
    }
}

fn read_style(style: &XlsxStyle) -> Style {
    let mut out = Style::default();

    if let Some(format) = style.get_number_format() {
        let code = format.get_format_code();
        if !code.is_empty() {
            out.number_format = code.to_string();
        }
    }
    if let Some(font) = style.get_font() {
        out.bold = *font.get_bold();
        out.italic = *font.get_italic();
        out.underline = !matches!(font.get_underline(), "" | "none");
        out.font_color = parse_argb(font.get_color().get_argb());
    }
    if let Some(alignment) = style.get_alignment() {
        out.wrap_text = *alignment.get_wrap_text();
    }
    out.fill_color = style.get_background_color().and_then(|color| parse_argb(color.get_argb()));

    out
}

/// `AARRGGBB` or `RRGGBB` to `0xRRGGBB`. Theme and indexed colours have no
/// ARGB value and read as `None`.
fn parse_argb(argb: &str) -> Option<u32> {
    let rgb = match argb.len() {
        8 => &argb[2..],
        6 => argb,
        _ => return None,
    };
    u32::from_str_radix(rgb, 16).ok()
}

fn argb(rgb: u32) -> String {
    format!("FF{:06X}", rgb & 0x00FF_FFFF)
}

/// Write a workbook as XLSX.
///
/// A workbook read from a file is written over a fresh copy of that file;
/// any other workbook starts from an empty document.
pub fn save_xlsx(workbook: &Workbook, path: &Path) -> DocumentResult<()> {
    if workbook.sheet_count() == 0 {
        return Err(DocumentError::NoSheets(path.display().to_string()));
    }

    let mut book = match workbook.origin() {
        Some(origin) if origin.is_file() => reader::xlsx::read(origin)?,
        _ => umya_spreadsheet::new_file(),
    };

    for (index, sheet) in workbook.sheets().iter().enumerate() {
        let worksheet = worksheet_for(&mut book, index, sheet.name())?;
        write_sheet(sheet, worksheet);
    }

    writer::xlsx::write(&book, path)?;
    Ok(())
}

/// The document sheet at `index`, renamed to `name`, or a new sheet when
/// the document has fewer sheets.
fn worksheet_for<'b>(book: &'b mut Spreadsheet, index: usize, name: &str) -> DocumentResult<&'b mut Worksheet> {
    let current = book.get_sheet(&index).map(|ws| ws.get_name().to_string());

    match current {
        Some(current) if current != name => {
            if let Some(ws) = book.get_sheet_by_name_mut(&current) {
                ws.set_name(name);
            }
        }
        Some(_) => {}
        None => {
            book.new_sheet(name)
                .map_err(|e| DocumentError::Sheet(format!("{}: {}", name, e)))?;
            book.read_sheet_collection();
        }
    }

    book.get_sheet_by_name_mut(name)
        .ok_or_else(|| DocumentError::Sheet(format!("{}: sheet could not be created", name)))
}

fn write_sheet(sheet: &Sheet, worksheet: &mut Worksheet) {
    // Cells the model no longer has are cleared, formatting included.
    let stored: Vec<(u32, u32)> = worksheet
        .get_cell_collection()
        .into_iter()
        .map(|cell| {
            let coordinate = cell.get_coordinate();
            (*coordinate.get_col_num(), *coordinate.get_row_num())
        })
        .collect();
    for (column, row) in stored {
        let kept = model_position(column, row).and_then(|(r, c)| sheet.cell(r, c));
        if kept.is_none() {
            let cell = worksheet.get_cell_mut((column, row));
            cell.set_blank();
            cell.set_style(XlsxStyle::default());
        }
    }

    for (row, cells) in sheet.rows() {
        for (column, cell) in cells.cells() {
            let position = xlsx_position(row, column);
            let existing = worksheet.get_cell(position);

            if existing.and_then(read_cell).as_ref() == Some(cell) {
                continue;
            }
            if existing.is_none() && cell.is_blank() && cell.style.is_default() {
                continue;
            }
            write_cell(worksheet.get_cell_mut(position), cell);
        }
    }
}

fn write_cell(target: &mut XlsxCell, cell: &Cell) {
    match &cell.value {
        CellValue::Text(s) => {
            target.set_value_string(s.as_str());
        }
        CellValue::Number { value, .. } => {
            target.set_value_number(*value);
        }
        CellValue::Boolean(b) => {
            target.set_value_bool(*b);
        }
        CellValue::Formula(f) => {
            target.set_formula(f.as_str());
        }
        CellValue::Blank => {
            target.set_blank();
        }
        CellValue::Error(code) => {
            target.set_value_string(code.as_str());
        }
    }
    target.set_style(write_style(cell));
}

fn write_style(cell: &Cell) -> XlsxStyle {
    let style = &cell.style;
    let mut out = XlsxStyle::default();

    // A date needs a date format to display as one.
    let format = match cell.value {
        CellValue::Number { is_date: true, .. } if !style.is_date_formatted() => DEFAULT_DATE_FORMAT,
        _ => style.number_format.as_str(),
    };
    if !format.is_empty() && format != GENERAL_FORMAT {
        out.get_number_format_mut().set_format_code(format);
    }

    if style.bold || style.italic || style.underline || style.font_color.is_some() {
        let font = out.get_font_mut();
        font.set_bold(style.bold);
        font.set_italic(style.italic);
        if style.underline {
            font.set_underline("single");
        }
        if let Some(rgb) = style.font_color {
            font.get_color_mut().set_argb(argb(rgb));
        }
    }
    if style.wrap_text {
        out.get_alignment_mut().set_wrap_text(true);
    }
    if let Some(rgb) = style.fill_color {
        out.set_background_color(argb(rgb));
    }

    out
}
