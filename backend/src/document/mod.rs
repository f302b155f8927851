//! In-memory spreadsheet documents.
//!
//! A [`Workbook`] owns its sheets, a [`Sheet`] owns its rows and a [`Row`]
//! owns its cells. Everything is addressed by zero-based index; rows and
//! cells are sparse, so an index with nothing stored reads as "not present",
//! which is different from a present [`CellValue::Blank`] cell.
//!
//! Documents are plain owned values: the engine reads one and writes another,
//! and a destination is named by a [`CellSlot`] rather than a reference.

pub mod cell;
pub mod date;
pub mod style;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use cell::{Cell, CellValue};
pub use style::{is_date_format, Style};

/// Number of rows in a sheet grid.
pub const MAX_ROWS: u64 = 1_048_576;

/// Number of columns in a sheet grid.
pub const MAX_COLUMNS: u64 = 16_384;

/// Whether a row index lies inside the sheet grid.
pub fn row_in_grid(row: u64) -> bool {
    row < MAX_ROWS
}

/// Whether a column index lies inside the sheet grid.
pub fn column_in_grid(column: u64) -> bool {
    column < MAX_COLUMNS
}

/// Address of one cell in a workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellSlot {
    pub sheet: usize,
    pub row: u32,
    pub column: u16,
}

impl CellSlot {
    pub fn new(sheet: usize, row: u32, column: u16) -> Self {
        Self { sheet, row, column }
    }
}

// ============================================================================
// ROW
// ============================================================================

/// A sparse row of cells keyed by column index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    cells: BTreeMap<u16, Cell>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(&self, column: u16) -> Option<&Cell> {
        self.cells.get(&column)
    }

    pub fn cell_mut(&mut self, column: u16) -> Option<&mut Cell> {
        self.cells.get_mut(&column)
    }

    /// Replace whatever is at `column` with a fresh blank cell and return it.
    pub fn create_cell(&mut self, column: u16) -> &mut Cell {
        let slot = self.cells.entry(column).or_default();
        *slot = Cell::blank();
        slot
    }

    pub fn set_cell(&mut self, column: u16, cell: Cell) {
        self.cells.insert(column, cell);
    }

    pub fn remove_cell(&mut self, column: u16) -> Option<Cell> {
        self.cells.remove(&column)
    }

    /// Present cells in column order.
    pub fn cells(&self) -> impl Iterator<Item = (u16, &Cell)> {
        self.cells.iter().map(|(col, cell)| (*col, cell))
    }

    /// Number of present cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when no cell is present.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Highest present column index.
    pub fn last_column(&self) -> Option<u16> {
        self.cells.keys().next_back().copied()
    }
}

impl<C: Into<Cell>> FromIterator<(u16, C)> for Row {
    fn from_iter<I: IntoIterator<Item = (u16, C)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|(col, c)| (col, c.into())).collect(),
        }
    }
}

// ============================================================================
// SHEET
// ============================================================================

/// A named, sparse sequence of rows keyed by row index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    name: String,
    rows: BTreeMap<u32, Row>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), rows: BTreeMap::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn row(&self, index: u32) -> Option<&Row> {
        self.rows.get(&index)
    }

    pub fn row_mut(&mut self, index: u32) -> Option<&mut Row> {
        self.rows.get_mut(&index)
    }

    /// Replace whatever is at `index` with a fresh empty row and return it.
    pub fn create_row(&mut self, index: u32) -> &mut Row {
        let slot = self.rows.entry(index).or_default();
        *slot = Row::new();
        slot
    }

    /// The row at `index`, created empty if not present.
    pub fn row_or_create(&mut self, index: u32) -> &mut Row {
        self.rows.entry(index).or_default()
    }

    pub fn set_row(&mut self, index: u32, row: Row) {
        self.rows.insert(index, row);
    }

    /// Cell at `(row, column)`, if both are present.
    pub fn cell(&self, row: u32, column: u16) -> Option<&Cell> {
        self.row(row).and_then(|r| r.cell(column))
    }

    /// Store a cell, creating its row if needed.
    pub fn set_cell(&mut self, row: u32, column: u16, cell: Cell) {
        self.row_or_create(row).set_cell(column, cell);
    }

    /// Highest present row index; `None` for a sheet without rows.
    pub fn last_row(&self) -> Option<u32> {
        self.rows.keys().next_back().copied()
    }

    /// Present rows in index order.
    pub fn rows(&self) -> impl Iterator<Item = (u32, &Row)> {
        self.rows.iter().map(|(idx, row)| (*idx, row))
    }

    /// Present rows at or after `start`, in index order.
    pub fn rows_from(&self, start: u32) -> impl Iterator<Item = (u32, &Row)> {
        self.rows.range(start..).map(|(idx, row)| (*idx, row))
    }

    /// Number of present rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

// ============================================================================
// WORKBOOK
// ============================================================================

/// An ordered collection of sheets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    sheets: Vec<Sheet>,
    /// File the workbook was read from. Saving writes over a copy of it so
    /// that formatting the model does not track is kept.
    #[serde(skip)]
    origin: Option<PathBuf>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sheets(sheets: Vec<Sheet>) -> Self {
        Self { sheets, origin: None }
    }

    pub fn with_origin(mut self, path: impl Into<PathBuf>) -> Self {
        self.origin = Some(path.into());
        self
    }

    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// Append a sheet and return its index.
    pub fn add_sheet(&mut self, sheet: Sheet) -> usize {
        self.sheets.push(sheet);
        self.sheets.len() - 1
    }

    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    pub fn sheet_mut(&mut self, index: usize) -> Option<&mut Sheet> {
        self.sheets.get_mut(index)
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Index of the sheet with the given name.
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.sheets.iter().position(|s| s.name == name)
    }

    /// Read the cell at a slot.
    pub fn cell(&self, slot: CellSlot) -> Option<&Cell> {
        self.sheet(slot.sheet).and_then(|s| s.cell(slot.row, slot.column))
    }

    /// Create a fresh blank cell at a slot, creating the row if needed.
    ///
    /// Returns `None` when the slot's sheet does not exist.
    pub fn create_cell(&mut self, slot: CellSlot) -> Option<&mut Cell> {
        self.sheet_mut(slot.sheet)
            .map(|s| s.row_or_create(slot.row).create_cell(slot.column))
    }
}
