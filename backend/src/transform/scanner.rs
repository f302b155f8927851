//! Emptiness checks used to find where the data of a sheet ends.

use crate::document::{Row, Sheet};

/// Consecutive empty rows that mark the end of the data.
pub const DATA_END_LOOKAHEAD: u32 = 10;

/// A row is empty when it is absent, has no cells, or every cell is blank
/// or renders as whitespace.
pub fn is_row_empty(row: Option<&Row>) -> bool {
    row.map_or(true, |r| {
        r.cells()
            .all(|(_, cell)| cell.is_blank() || cell.display_text().trim().is_empty())
    })
}

/// Whether rows `start..start + n` are all empty.
///
/// Rows past the last present row count as empty, so this is true for any
/// `start` beyond the end of the sheet.
pub fn are_next_rows_empty(sheet: &Sheet, start: u32, n: u32) -> bool {
    let Some(last) = sheet.last_row() else {
        return true;
    };
    let end = start.saturating_add(n);

    (start..end)
        .take_while(|&i| i <= last)
        .all(|i| is_row_empty(sheet.row(i)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Cell, Style};

    #[test]
    fn test_row_emptiness() {
        assert!(is_row_empty(None));
        assert!(is_row_empty(Some(&Row::new())));

        let blank: Row = [(0, Cell::blank()), (3, Cell::text("   "))].into_iter().collect();
        assert!(is_row_empty(Some(&blank)));

        let styled_blank: Row = [(1, Cell::blank().with_style(Style::default().with_number_format("0%")))]
            .into_iter()
            .collect();
        assert!(is_row_empty(Some(&styled_blank)));

        let zero: Row = [(0, Cell::number(0.0))].into_iter().collect();
        assert!(!is_row_empty(Some(&zero)));
    }

    #[test]
    fn test_lookahead_window() {
        let mut sheet = Sheet::new("S");
        sheet.set_cell(0, 0, Cell::text("a"));
        sheet.set_cell(11, 0, Cell::text("b"));

        // Rows 1..=10 are empty, row 11 is not.
        assert!(are_next_rows_empty(&sheet, 1, 10));
        assert!(!are_next_rows_empty(&sheet, 2, 10));
        assert!(!are_next_rows_empty(&sheet, 0, 10));
    }

    #[test]
    fn test_past_the_end_is_empty() {
        let mut sheet = Sheet::new("S");
        sheet.set_cell(3, 0, Cell::text("x"));

        assert!(are_next_rows_empty(&sheet, 4, DATA_END_LOOKAHEAD));
        assert!(are_next_rows_empty(&sheet, u32::MAX, DATA_END_LOOKAHEAD));
        assert!(are_next_rows_empty(&Sheet::new("empty"), 0, DATA_END_LOOKAHEAD));
    }

    #[test]
    fn test_window_clipped_at_last_row() {
        let mut sheet = Sheet::new("S");
        sheet.set_cell(0, 0, Cell::text("x"));
        sheet.set_cell(2, 0, Cell::blank());

        assert!(are_next_rows_empty(&sheet, 1, DATA_END_LOOKAHEAD));
    }
}
