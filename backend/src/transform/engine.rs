//! Executes copy operations from a source workbook into an output workbook.
//!
//! Operations run in order. A [`ConfigurationError`] aborts the run: the
//! operations after it are skipped and whatever was already written to the
//! output stays there. Unsupported cells are not fatal; they are reported
//! and their destination is left untouched.

use serde::Serialize;

use crate::diagnostics::{log_error, log_info, log_info_indent, log_success, log_warning, DiagnosticSink};
use crate::document::{row_in_grid, CellSlot, Sheet, Workbook};
use crate::error::{ConfigurationError, ConfigurationResult, OperationError};

use super::copier::{copy_into, CopyOutcome};
use super::operations::{ColumnCopy, Operation, OperationKind, RowCopy, SplitRowCopy};
use super::scanner::{are_next_rows_empty, DATA_END_LOOKAHEAD};

/// What one operation wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSummary {
    pub index: usize,
    pub kind: OperationKind,
    /// Destination rows written (or created) by the operation.
    pub rows_written: usize,
    /// Destination cells copied or blanked.
    pub cells_copied: usize,
}

impl OperationSummary {
    fn new(index: usize, kind: OperationKind) -> Self {
        Self { index, kind, rows_written: 0, cells_copied: 0 }
    }
}

/// A source cell whose value kind could not be copied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsupportedCell {
    pub operation: usize,
    pub source: CellSlot,
    pub destination: CellSlot,
    pub kind: String,
}

/// Outcome of running a list of operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineReport {
    pub operations_applied: usize,
    pub operations: Vec<OperationSummary>,
    pub unsupported: Vec<UnsupportedCell>,
}

impl EngineReport {
    pub fn rows_written(&self) -> usize {
        self.operations.iter().map(|o| o.rows_written).sum()
    }

    pub fn cells_copied(&self) -> usize {
        self.operations.iter().map(|o| o.cells_copied).sum()
    }

    pub fn summary(&self) -> String {
        format!(
            "Applied: {} operations, {} rows, {} cells, {} unsupported",
            self.operations_applied,
            self.rows_written(),
            self.cells_copied(),
            self.unsupported.len()
        )
    }
}

/// Runs operations against one source/output pair.
///
/// The source is only ever read. The output is mutated in place.
pub struct Engine<'a> {
    source: &'a Workbook,
    output: &'a mut Workbook,
    sink: &'a dyn DiagnosticSink,
    report: EngineReport,
}

impl<'a> Engine<'a> {
    pub fn new(source: &'a Workbook, output: &'a mut Workbook, sink: &'a dyn DiagnosticSink) -> Self {
        Self { source, output, sink, report: EngineReport::default() }
    }

    /// Run every operation in order, stopping at the first fatal error.
    pub fn run(&mut self, operations: &[Operation]) -> Result<(), OperationError> {
        for (index, operation) in operations.iter().enumerate() {
            if let Err(source) = self.apply(index, operation) {
                let err = OperationError { index, kind: operation.kind(), source };
                log_error(self.sink, err.to_string());
                if index + 1 < operations.len() {
                    log_warning(
                        self.sink,
                        format!("Skipping {} remaining operation(s)", operations.len() - index - 1),
                    );
                }
                return Err(err);
            }
        }
        Ok(())
    }

    /// Run a single operation. `index` is its position in the profile.
    pub fn apply(&mut self, index: usize, operation: &Operation) -> ConfigurationResult<OperationSummary> {
        operation.validate()?;

        for (i, line) in operation.describe().into_iter().enumerate() {
            if i == 0 {
                log_info(self.sink, format!("[{}] {}", index, line));
            } else {
                log_info_indent(self.sink, line.trim_start(), 1);
            }
        }

        let mut summary = OperationSummary::new(index, operation.kind());
        match operation {
            Operation::RowCopy(p) => self.copy_rows(p, &mut summary)?,
            Operation::ColumnCopy(p) => self.copy_column(p, &mut summary)?,
            Operation::SplitRowCopy(p) => self.copy_split_rows(p, &mut summary)?,
        }

        log_success(
            self.sink,
            format!("{} rows written, {} cells copied", summary.rows_written, summary.cells_copied),
        );
        self.report.operations_applied += 1;
        self.report.operations.push(summary.clone());
        Ok(summary)
    }

    pub fn report(&self) -> &EngineReport {
        &self.report
    }

    pub fn into_report(self) -> EngineReport {
        self.report
    }

    fn source_sheet(&self, index: usize) -> ConfigurationResult<&'a Sheet> {
        let source: &'a Workbook = self.source;
        source.sheet(index).ok_or(ConfigurationError::MissingSourceSheet {
            index,
            count: source.sheet_count(),
        })
    }

    fn copy_rows(&mut self, p: &RowCopy, summary: &mut OperationSummary) -> ConfigurationResult<()> {
        let sink = self.sink;
        let src = self.source_sheet(p.src_sheet)?;
        let dst = output_sheet(self.output, p.dst_sheet)?;

        for row in p.start_row..=p.end_row {
            let src_row = src
                .row(row)
                .ok_or(ConfigurationError::MissingSourceRow { sheet: p.src_sheet, row })?;
            dst.create_row(row);
            summary.rows_written += 1;

            for (column, cell) in src_row.cells() {
                let outcome = copy_into(Some(cell), dst, row, column);
                record(
                    &mut self.report,
                    sink,
                    summary,
                    outcome,
                    CellSlot::new(p.src_sheet, row, column),
                    CellSlot::new(p.dst_sheet, row, column),
                );
            }
        }
        Ok(())
    }

    fn copy_column(&mut self, p: &ColumnCopy, summary: &mut OperationSummary) -> ConfigurationResult<()> {
        let sink = self.sink;
        let src = self.source_sheet(p.src_sheet)?;
        let dst = output_sheet(self.output, p.dst_sheet)?;

        for (row, src_row) in src.rows_from(p.start_row) {
            let outcome = copy_into(src_row.cell(p.src_col), dst, row, p.dst_col);
            summary.rows_written += 1;
            record(
                &mut self.report,
                sink,
                summary,
                outcome,
                CellSlot::new(p.src_sheet, row, p.src_col),
                CellSlot::new(p.dst_sheet, row, p.dst_col),
            );
        }
        Ok(())
    }

    fn copy_split_rows(&mut self, p: &SplitRowCopy, summary: &mut OperationSummary) -> ConfigurationResult<()> {
        let sink = self.sink;
        let src = self.source_sheet(p.src_sheet)?;
        let dst = output_sheet(self.output, p.dst_sheet)?;

        let inverted = p.col_map.invert();
        log_info_indent(sink, format!("Column groups: {}", inverted), 1);

        let plan = inverted.split_plan().ok_or(ConfigurationError::EmptyColumnMap)?;
        log_info_indent(
            sink,
            format!("Split factor: {} (pivot column {})", plan.factor, plan.pivot),
            1,
        );
        let pivot_sources = inverted.get(plan.pivot).unwrap_or_default();

        let Some(last_row) = src.last_row() else {
            return Ok(());
        };

        let mut target = p.start_row;
        for row in p.start_row..=last_row {
            if are_next_rows_empty(src, row, DATA_END_LOOKAHEAD) {
                log_info_indent(sink, format!("Data ends at row {}", row), 1);
                break;
            }
            let Some(src_row) = src.row(row) else {
                continue;
            };

            for j in 0..plan.factor {
                if !row_in_grid(u64::from(target)) {
                    return Err(ConfigurationError::RowOutOfRange(u64::from(target)));
                }
                dst.create_row(target);

                for (dst_col, sources) in inverted.iter() {
                    let Some(src_col) = plan.select(dst_col, sources, j) else {
                        continue;
                    };
                    let outcome = copy_into(src_row.cell(src_col), dst, target, dst_col);
                    record(
                        &mut self.report,
                        sink,
                        summary,
                        outcome,
                        CellSlot::new(p.src_sheet, row, src_col),
                        CellSlot::new(p.dst_sheet, target, dst_col),
                    );
                }

                if p.include_headers {
                    let header = src
                        .row(0)
                        .ok_or(ConfigurationError::MissingHeaderRow { sheet: p.src_sheet })?;
                    if let Some(src_col) = plan.select(plan.pivot, pivot_sources, j) {
                        let outcome = copy_into(header.cell(src_col), dst, target, p.header_col);
                        record(
                            &mut self.report,
                            sink,
                            summary,
                            outcome,
                            CellSlot::new(p.src_sheet, 0, src_col),
                            CellSlot::new(p.dst_sheet, target, p.header_col),
                        );
                    }
                }

                summary.rows_written += 1;
                target += 1;
            }
        }
        Ok(())
    }
}

fn output_sheet(output: &mut Workbook, index: usize) -> ConfigurationResult<&mut Sheet> {
    let count = output.sheet_count();
    output
        .sheet_mut(index)
        .ok_or(ConfigurationError::MissingOutputSheet { index, count })
}

fn record(
    report: &mut EngineReport,
    sink: &dyn DiagnosticSink,
    summary: &mut OperationSummary,
    outcome: CopyOutcome,
    source: CellSlot,
    destination: CellSlot,
) {
    match outcome {
        CopyOutcome::Copied | CopyOutcome::Blanked => summary.cells_copied += 1,
        CopyOutcome::Unsupported(kind) => {
            log_warning(
                sink,
                format!(
                    "Unsupported {} cell at sheet {} row {} column {} not copied",
                    kind, source.sheet, source.row, source.column
                ),
            );
            report.unsupported.push(UnsupportedCell {
                operation: summary.index,
                source,
                destination,
                kind: kind.to_string(),
            });
        }
    }
}

/// Run `operations` from `source` into `output`.
pub fn execute(
    source: &Workbook,
    output: &mut Workbook,
    operations: &[Operation],
    sink: &dyn DiagnosticSink,
) -> Result<EngineReport, OperationError> {
    let mut engine = Engine::new(source, output, sink);
    engine.run(operations)?;
    Ok(engine.into_report())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{LogLevel, MemorySink, NullSink};
    use crate::document::{Cell, CellValue, Style};
    use crate::transform::column_map::ColumnMap;

    fn text(sheet: &Sheet, row: u32, col: u16) -> Option<String> {
        sheet.cell(row, col).map(|c| c.display_text())
    }

    fn output_with(sheets: usize) -> Workbook {
        Workbook::from_sheets((0..sheets).map(|i| Sheet::new(format!("Out{}", i))).collect())
    }

    fn map(pairs: &[(u16, u16)]) -> ColumnMap {
        pairs.iter().copied().collect()
    }

    fn fan_out_source() -> Workbook {
        let mut sheet = Sheet::new("Data");
        sheet.set_cell(0, 0, Cell::text("Name"));
        sheet.set_cell(0, 1, Cell::text("Qty"));
        sheet.set_cell(5, 0, Cell::text("Jan"));
        sheet.set_cell(5, 1, Cell::text("Feb"));
        sheet.set_cell(5, 2, Cell::number(100.0));
        Workbook::from_sheets(vec![sheet])
    }

    #[test]
    fn test_split_fan_out_with_headers() {
        let source = fan_out_source();
        let mut output = output_with(1);
        let op = Operation::split_row_copy(0, 0, 5, map(&[(0, 0), (1, 0), (2, 1)]), true, 2);

        let report = execute(&source, &mut output, &[op], &NullSink).unwrap();
        let out = output.sheet(0).unwrap();

        assert_eq!(out.row_count(), 2);
        assert_eq!(text(out, 5, 0).as_deref(), Some("Jan"));
        assert_eq!(text(out, 5, 1).as_deref(), Some("100"));
        assert_eq!(text(out, 5, 2).as_deref(), Some("Name"));
        assert_eq!(text(out, 6, 0).as_deref(), Some("Feb"));
        assert_eq!(text(out, 6, 1).as_deref(), Some("100"));
        assert_eq!(text(out, 6, 2).as_deref(), Some("Qty"));
        assert_eq!(report.operations[0].rows_written, 2);
    }

    #[test]
    fn test_split_row_count_is_factor_times_data_rows() {
        let mut sheet = Sheet::new("Data");
        for row in 1..=4 {
            for col in 0..4 {
                sheet.set_cell(row, col, Cell::number(f64::from(row * 10 + u32::from(col))));
            }
        }
        let source = Workbook::from_sheets(vec![sheet]);
        let mut output = output_with(1);
        let op = Operation::split_row_copy(0, 0, 1, map(&[(0, 0), (1, 0), (2, 0), (3, 1)]), false, 0);

        execute(&source, &mut output, &[op], &NullSink).unwrap();
        let out = output.sheet(0).unwrap();

        assert_eq!(out.row_count(), 12);
        assert_eq!(out.last_row(), Some(12));
        // Source row 2 fans out to destination rows 4, 5 and 6.
        assert_eq!(text(out, 4, 0).as_deref(), Some("20"));
        assert_eq!(text(out, 5, 0).as_deref(), Some("21"));
        assert_eq!(text(out, 6, 0).as_deref(), Some("22"));
        for row in 4..=6 {
            assert_eq!(text(out, row, 1).as_deref(), Some("23"));
        }
    }

    #[test]
    fn test_split_pivot_clamps_and_other_groups_hold_first() {
        let mut sheet = Sheet::new("Data");
        for col in 0..5 {
            sheet.set_cell(1, col, Cell::text(format!("c{}", col)));
        }
        let source = Workbook::from_sheets(vec![sheet]);
        let mut output = output_with(1);
        // Pivot 0 has three sources, destination 1 has two.
        let op = Operation::split_row_copy(0, 0, 1, map(&[(0, 0), (1, 0), (2, 0), (3, 1), (4, 1)]), false, 0);

        execute(&source, &mut output, &[op], &NullSink).unwrap();
        let out = output.sheet(0).unwrap();

        for row in 1..=3 {
            assert_eq!(text(out, row, 1).as_deref(), Some("c3"));
        }
        assert_eq!(text(out, 3, 0).as_deref(), Some("c2"));
    }

    #[test]
    fn test_split_tie_break_follows_map_order() {
        let mut sheet = Sheet::new("Data");
        for col in 0..5 {
            sheet.set_cell(0, col, Cell::text(format!("h{}", col)));
            sheet.set_cell(1, col, Cell::text(format!("v{}", col)));
        }
        let source = Workbook::from_sheets(vec![sheet]);
        let mut output = output_with(1);
        // Destinations 7 and 3 both have two sources; 7 is declared first.
        let op = Operation::split_row_copy(0, 0, 1, map(&[(0, 7), (1, 3), (2, 7), (4, 3)]), true, 9);

        execute(&source, &mut output, &[op], &NullSink).unwrap();
        let out = output.sheet(0).unwrap();

        assert_eq!(text(out, 1, 7).as_deref(), Some("v0"));
        assert_eq!(text(out, 2, 7).as_deref(), Some("v2"));
        assert_eq!(text(out, 1, 3).as_deref(), Some("v1"));
        assert_eq!(text(out, 2, 3).as_deref(), Some("v1"));
        assert_eq!(text(out, 1, 9).as_deref(), Some("h0"));
        assert_eq!(text(out, 2, 9).as_deref(), Some("h2"));
    }

    #[test]
    fn test_split_degenerate_factor_one() {
        let mut sheet = Sheet::new("Data");
        sheet.set_cell(2, 3, Cell::text("a"));
        sheet.set_cell(2, 4, Cell::text("b"));
        sheet.set_cell(3, 3, Cell::text("c"));
        let source = Workbook::from_sheets(vec![sheet]);
        let mut output = output_with(1);
        let op = Operation::split_row_copy(0, 0, 2, map(&[(3, 0), (4, 1)]), false, 0);

        execute(&source, &mut output, &[op], &NullSink).unwrap();
        let out = output.sheet(0).unwrap();

        assert_eq!(out.row_count(), 2);
        assert_eq!(text(out, 2, 0).as_deref(), Some("a"));
        assert_eq!(text(out, 2, 1).as_deref(), Some("b"));
        assert_eq!(text(out, 3, 0).as_deref(), Some("c"));
        // Missing source cell becomes a blank destination cell.
        assert!(out.cell(3, 1).unwrap().is_blank());
    }

    #[test]
    fn test_split_stops_at_ten_empty_rows() {
        let mut sheet = Sheet::new("Data");
        for row in 1..=3 {
            sheet.set_cell(row, 0, Cell::text(format!("r{}", row)));
        }
        // Rows 4..=13 are empty; row 14 must never be reached.
        sheet.set_cell(8, 0, Cell::text("  "));
        sheet.set_cell(14, 0, Cell::text("late"));
        let source = Workbook::from_sheets(vec![sheet]);
        let mut output = output_with(1);
        let sink = MemorySink::new();
        let op = Operation::split_row_copy(0, 0, 1, map(&[(0, 0)]), false, 0);

        execute(&source, &mut output, &[op], &sink).unwrap();
        let out = output.sheet(0).unwrap();

        assert_eq!(out.last_row(), Some(3));
        assert!(sink.contains("Data ends at row 4"));
    }

    #[test]
    fn test_split_short_gap_is_skipped_without_gaps_in_output() {
        let mut sheet = Sheet::new("Data");
        sheet.set_cell(1, 0, Cell::text("first"));
        // Nine absent rows (2..=10), then more data.
        sheet.set_cell(11, 0, Cell::text("second"));
        let source = Workbook::from_sheets(vec![sheet]);
        let mut output = output_with(1);
        let op = Operation::split_row_copy(0, 0, 1, map(&[(0, 0)]), false, 0);

        execute(&source, &mut output, &[op], &NullSink).unwrap();
        let out = output.sheet(0).unwrap();

        assert_eq!(out.row_count(), 2);
        assert_eq!(text(out, 1, 0).as_deref(), Some("first"));
        assert_eq!(text(out, 2, 0).as_deref(), Some("second"));
    }

    #[test]
    fn test_split_without_header_row_fails() {
        let mut sheet = Sheet::new("Data");
        sheet.set_cell(1, 0, Cell::text("x"));
        let source = Workbook::from_sheets(vec![sheet]);
        let mut output = output_with(1);
        let op = Operation::split_row_copy(0, 0, 1, map(&[(0, 0)]), true, 1);

        let err = execute(&source, &mut output, &[op], &NullSink).unwrap_err();
        assert_eq!(err.source, ConfigurationError::MissingHeaderRow { sheet: 0 });
    }

    #[test]
    fn test_row_copy_replaces_destination_rows() {
        let mut sheet = Sheet::new("Data");
        sheet.set_cell(1, 0, Cell::text("a"));
        sheet.set_cell(1, 4, Cell::number(2.5));
        sheet.set_cell(2, 1, Cell::boolean(true));
        let source = Workbook::from_sheets(vec![sheet]);

        let mut output = output_with(1);
        output.sheet_mut(0).unwrap().set_cell(1, 2, Cell::text("template"));
        output.sheet_mut(0).unwrap().set_cell(3, 0, Cell::text("kept"));

        execute(&source, &mut output, &[Operation::row_copy(0, 0, 1, 2)], &NullSink).unwrap();
        let out = output.sheet(0).unwrap();

        assert_eq!(text(out, 1, 0).as_deref(), Some("a"));
        assert_eq!(text(out, 1, 4).as_deref(), Some("2.5"));
        assert!(out.cell(1, 2).is_none());
        assert_eq!(out.cell(2, 1).unwrap().value, CellValue::Boolean(true));
        assert_eq!(text(out, 3, 0).as_deref(), Some("kept"));
    }

    #[test]
    fn test_row_copy_missing_source_row() {
        let mut sheet = Sheet::new("Data");
        sheet.set_cell(0, 0, Cell::text("a"));
        let source = Workbook::from_sheets(vec![sheet]);
        let mut output = output_with(1);

        let err = execute(&source, &mut output, &[Operation::row_copy(0, 0, 0, 1)], &NullSink).unwrap_err();

        assert_eq!(err.source, ConfigurationError::MissingSourceRow { sheet: 0, row: 1 });
        // Row 0 was written before the failure.
        assert_eq!(text(output.sheet(0).unwrap(), 0, 0).as_deref(), Some("a"));
    }

    #[test]
    fn test_column_copy() {
        let mut sheet = Sheet::new("Data");
        sheet.set_cell(0, 1, Cell::text("header"));
        sheet.set_cell(1, 1, Cell::number(1.0));
        sheet.set_cell(2, 0, Cell::text("no col 1 here"));
        sheet.set_cell(5, 1, Cell::number(5.0));
        let source = Workbook::from_sheets(vec![sheet]);

        let mut output = output_with(1);
        output.sheet_mut(0).unwrap().set_cell(1, 0, Cell::text("neighbour"));

        let report =
            execute(&source, &mut output, &[Operation::column_copy(0, 1, 0, 3, 1)], &NullSink).unwrap();
        let out = output.sheet(0).unwrap();

        assert!(out.cell(0, 3).is_none());
        assert_eq!(text(out, 1, 3).as_deref(), Some("1"));
        assert!(out.cell(2, 3).unwrap().is_blank());
        assert!(out.row(3).is_none());
        assert_eq!(text(out, 5, 3).as_deref(), Some("5"));
        assert_eq!(text(out, 1, 0).as_deref(), Some("neighbour"));
        assert_eq!(report.operations[0].rows_written, 3);
    }

    #[test]
    fn test_missing_sheets() {
        let source = fan_out_source();
        let mut output = output_with(1);

        let err = execute(&source, &mut output, &[Operation::row_copy(3, 0, 0, 0)], &NullSink).unwrap_err();
        assert_eq!(err.source, ConfigurationError::MissingSourceSheet { index: 3, count: 1 });

        let err = execute(&source, &mut output, &[Operation::row_copy(0, 2, 0, 0)], &NullSink).unwrap_err();
        assert_eq!(err.source, ConfigurationError::MissingOutputSheet { index: 2, count: 1 });
    }

    #[test]
    fn test_abort_skips_remaining_operations() {
        let source = fan_out_source();
        let mut output = output_with(1);
        let ops = vec![
            Operation::row_copy(0, 0, 0, 0),
            Operation::split_row_copy(4, 0, 1, map(&[(0, 0)]), false, 0),
            Operation::row_copy(0, 0, 5, 5),
        ];
        let sink = MemorySink::new();

        let mut engine = Engine::new(&source, &mut output, &sink);
        let err = engine.run(&ops).unwrap_err();
        let report = engine.into_report();

        assert_eq!(err.index, 1);
        assert_eq!(err.kind, OperationKind::SplitRowCopy);
        assert_eq!(report.operations_applied, 1);
        let out = output.sheet(0).unwrap();
        assert_eq!(text(out, 0, 0).as_deref(), Some("Name"));
        assert!(out.row(5).is_none());
        assert_eq!(sink.at_level(LogLevel::Error).len(), 1);
    }

    #[test]
    fn test_invalid_operation_rejected_before_writing() {
        let source = fan_out_source();
        let mut output = output_with(1);

        let err = execute(&source, &mut output, &[Operation::row_copy(0, 0, 5, 0)], &NullSink).unwrap_err();

        assert_eq!(err.source, ConfigurationError::InvertedRowRange { start: 5, end: 0 });
        assert_eq!(output.sheet(0).unwrap().row_count(), 0);
    }

    #[test]
    fn test_unsupported_cells_reported() {
        let mut sheet = Sheet::new("Data");
        sheet.set_cell(0, 0, Cell::text("ok"));
        sheet.set_cell(0, 1, Cell::error("#REF!"));
        let source = Workbook::from_sheets(vec![sheet]);
        let mut output = output_with(1);
        let sink = MemorySink::new();

        let report = execute(&source, &mut output, &[Operation::row_copy(0, 0, 0, 0)], &sink).unwrap();

        assert_eq!(report.unsupported.len(), 1);
        assert_eq!(report.unsupported[0].kind, "error");
        assert_eq!(report.unsupported[0].destination, CellSlot::new(0, 0, 1));
        // The row was replaced by the copy, and the error cell was not written into it.
        assert!(output.sheet(0).unwrap().cell(0, 1).is_none());
        assert!(sink.contains("Unsupported error cell"));
        assert_eq!(report.cells_copied(), 1);
    }

    #[test]
    fn test_unsupported_cell_keeps_existing_destination() {
        let mut sheet = Sheet::new("Data");
        sheet.set_cell(0, 0, Cell::text("ok"));
        sheet.set_cell(1, 0, Cell::error("#REF!"));
        let source = Workbook::from_sheets(vec![sheet]);
        let mut output = output_with(1);
        output.sheet_mut(0).unwrap().set_cell(1, 2, Cell::text("template value"));

        let report = execute(&source, &mut output, &[Operation::column_copy(0, 0, 0, 2, 0)], &NullSink).unwrap();

        assert_eq!(report.unsupported.len(), 1);
        assert_eq!(report.unsupported[0].destination, CellSlot::new(0, 1, 2));
        let out = output.sheet(0).unwrap();
        assert_eq!(out.cell(1, 2), Some(&Cell::text("template value")));
        assert_eq!(out.cell(0, 2), Some(&Cell::text("ok")));
    }

    #[test]
    fn test_source_is_never_modified() {
        let source = fan_out_source();
        let before = source.clone();
        let mut output = output_with(1);
        let ops = vec![
            Operation::row_copy(0, 0, 0, 0),
            Operation::column_copy(0, 2, 0, 5, 0),
            Operation::split_row_copy(0, 0, 5, map(&[(0, 0), (1, 0), (2, 1)]), true, 2),
        ];

        execute(&source, &mut output, &ops, &NullSink).unwrap();
        assert_eq!(source, before);
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let mut sheet = Sheet::new("Data");
        sheet.set_cell(0, 0, Cell::text("H"));
        sheet.set_cell(1, 0, Cell::number(45000.0).with_style(Style::default().with_number_format("yyyy-mm-dd")));
        sheet.set_cell(1, 1, Cell::text("x"));
        let source = Workbook::from_sheets(vec![sheet]);
        let ops = vec![
            Operation::row_copy(0, 0, 0, 1),
            Operation::split_row_copy(0, 0, 1, map(&[(0, 0), (1, 0)]), true, 3),
        ];

        let mut once = output_with(1);
        execute(&source, &mut once, &ops, &NullSink).unwrap();
        let mut twice = once.clone();
        execute(&source, &mut twice, &ops, &NullSink).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_diagnostics_mention_groups_and_factor() {
        let source = fan_out_source();
        let mut output = output_with(1);
        let sink = MemorySink::new();
        let op = Operation::split_row_copy(0, 0, 5, map(&[(0, 0), (1, 0), (2, 1)]), false, 0);

        execute(&source, &mut output, &[op], &sink).unwrap();

        assert!(sink.contains("Column groups: {0: [0, 1], 1: [2]}"));
        assert!(sink.contains("Split factor: 2 (pivot column 0)"));
        assert!(sink.contains("2 rows written"));
    }
}
