//! Copy operations that make up a profile.
//!
//! Operations are plain data. They serialize as
//! `{"type": "COPY_SPLIT_ROW", "parameters": {...}}` with camelCase
//! parameter keys, and are executed by [`crate::transform::engine`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::{column_in_grid, row_in_grid};
use crate::error::{ConfigurationError, ConfigurationResult};

use super::column_map::ColumnMap;

/// Copy every present cell of rows `start_row..=end_row`, same indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RowCopy {
    pub src_sheet: usize,
    pub dst_sheet: usize,
    pub start_row: u32,
    pub end_row: u32,
}

/// Copy one column from `start_row` to the last source row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ColumnCopy {
    pub src_sheet: usize,
    pub src_col: u16,
    pub dst_sheet: usize,
    pub dst_col: u16,
    pub start_row: u32,
}

/// Fan each source row out into several destination rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SplitRowCopy {
    pub src_sheet: usize,
    pub dst_sheet: usize,
    pub start_row: u32,
    pub col_map: ColumnMap,
    pub include_headers: bool,
    pub header_col: u16,
}

/// The kind of an operation, as written in profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    #[serde(rename = "COPY_ROWS")]
    RowCopy,
    #[serde(rename = "COPY_COLUMN")]
    ColumnCopy,
    #[serde(rename = "COPY_SPLIT_ROW")]
    SplitRowCopy,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::RowCopy => "COPY_ROWS",
            OperationKind::ColumnCopy => "COPY_COLUMN",
            OperationKind::SplitRowCopy => "COPY_SPLIT_ROW",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "parameters")]
pub enum Operation {
    #[serde(rename = "COPY_ROWS")]
    RowCopy(RowCopy),
    #[serde(rename = "COPY_COLUMN")]
    ColumnCopy(ColumnCopy),
    #[serde(rename = "COPY_SPLIT_ROW")]
    SplitRowCopy(SplitRowCopy),
}

impl Operation {
    pub fn row_copy(src_sheet: usize, dst_sheet: usize, start_row: u32, end_row: u32) -> Self {
        Operation::RowCopy(RowCopy { src_sheet, dst_sheet, start_row, end_row })
    }

    pub fn column_copy(
        src_sheet: usize,
        src_col: u16,
        dst_sheet: usize,
        dst_col: u16,
        start_row: u32,
    ) -> Self {
        Operation::ColumnCopy(ColumnCopy { src_sheet, src_col, dst_sheet, dst_col, start_row })
    }

    pub fn split_row_copy(
        src_sheet: usize,
        dst_sheet: usize,
        start_row: u32,
        col_map: ColumnMap,
        include_headers: bool,
        header_col: u16,
    ) -> Self {
        Operation::SplitRowCopy(SplitRowCopy {
            src_sheet,
            dst_sheet,
            start_row,
            col_map,
            include_headers,
            header_col,
        })
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::RowCopy(_) => OperationKind::RowCopy,
            Operation::ColumnCopy(_) => OperationKind::ColumnCopy,
            Operation::SplitRowCopy(_) => OperationKind::SplitRowCopy,
        }
    }

    pub fn src_sheet(&self) -> usize {
        match self {
            Operation::RowCopy(p) => p.src_sheet,
            Operation::ColumnCopy(p) => p.src_sheet,
            Operation::SplitRowCopy(p) => p.src_sheet,
        }
    }

    pub fn dst_sheet(&self) -> usize {
        match self {
            Operation::RowCopy(p) => p.dst_sheet,
            Operation::ColumnCopy(p) => p.dst_sheet,
            Operation::SplitRowCopy(p) => p.dst_sheet,
        }
    }

    /// Check the parameters that do not depend on any document.
    pub fn validate(&self) -> ConfigurationResult<()> {
        match self {
            Operation::RowCopy(p) => {
                if p.start_row > p.end_row {
                    return Err(ConfigurationError::InvertedRowRange {
                        start: p.start_row,
                        end: p.end_row,
                    });
                }
                check_row(p.end_row)
            }
            Operation::ColumnCopy(p) => {
                check_row(p.start_row)?;
                check_column(p.src_col)?;
                check_column(p.dst_col)
            }
            Operation::SplitRowCopy(p) => {
                if p.col_map.is_empty() {
                    return Err(ConfigurationError::EmptyColumnMap);
                }
                check_row(p.start_row)?;
                check_column(p.header_col)?;
                for (src, dst) in p.col_map.iter() {
                    check_column(src)?;
                    check_column(dst)?;
                }
                Ok(())
            }
        }
    }

    /// Human-readable lines: a kind line, then indented column lines.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "{} - Source Sheet: {} - Destination Sheet: {}",
            self.kind(),
            self.src_sheet(),
            self.dst_sheet()
        )];

        match self {
            Operation::RowCopy(p) => {
                lines.push(format!("    Rows:{} to Row:{}", p.start_row, p.end_row));
            }
            Operation::ColumnCopy(p) => {
                lines.push(format!(
                    "    Col:{} copy to Col:{} from Row:{}",
                    p.src_col, p.dst_col, p.start_row
                ));
            }
            Operation::SplitRowCopy(p) => {
                for (src, dst) in p.col_map.iter() {
                    lines.push(format!("    Col:{} copy to Col:{}", src, dst));
                }
                if p.include_headers {
                    lines.push(format!("    Headers to Col:{}", p.header_col));
                }
            }
        }

        lines
    }
}

fn check_row(row: u32) -> ConfigurationResult<()> {
    if row_in_grid(u64::from(row)) {
        Ok(())
    } else {
        Err(ConfigurationError::RowOutOfRange(u64::from(row)))
    }
}

fn check_column(column: u16) -> ConfigurationResult<()> {
    if column_in_grid(u64::from(column)) {
        Ok(())
    } else {
        Err(ConfigurationError::ColumnOutOfRange(u64::from(column)))
    }
}

/// Reference of the operation kinds and their parameters.
pub fn operations_description() -> String {
    r#"Available copy operations:

| Operation | Description | Parameters |
|-----------|-------------|------------|
| COPY_ROWS | Copy rows startRow..=endRow to the same indices | srcSheet, dstSheet, startRow, endRow |
| COPY_COLUMN | Copy one column from startRow to the last source row | srcSheet, srcCol, dstSheet, dstCol, startRow |
| COPY_SPLIT_ROW | Fan each source row out into one row per mapped source column | srcSheet, dstSheet, startRow, colMap: {source: destination}, includeHeaders, headerCol |

Sheet, row and column indices are zero-based.

COPY_SPLIT_ROW groups the source columns of colMap by destination. The
largest group sets how many rows each source row becomes; its destination
column takes the group's sources one per row, every other destination keeps
its first source. The copy stops at the first run of 10 empty rows.

Example operations in JSON:
[
  {"type": "COPY_ROWS", "parameters": {"srcSheet": 0, "dstSheet": 0, "startRow": 0, "endRow": 3}},
  {"type": "COPY_COLUMN", "parameters": {"srcSheet": 0, "srcCol": 1, "dstSheet": 0, "dstCol": 4, "startRow": 4}},
  {"type": "COPY_SPLIT_ROW", "parameters": {"srcSheet": 1, "dstSheet": 1, "startRow": 1,
    "colMap": {"0": 0, "1": 0, "2": 1}, "includeHeaders": true, "headerCol": 2}}
]"#
    .to_string()
}
