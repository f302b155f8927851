//! Cells and their typed values.

use serde::{Deserialize, Serialize};

use super::style::Style;

/// The value held by a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Text(String),
    /// `is_date` marks a number that is a date/time serial.
    Number { value: f64, is_date: bool },
    Boolean(bool),
    /// Formula text without evaluation. No leading `=`.
    Formula(String),
    Blank,
    /// Error code read from a document (`#N/A`, `#DIV/0!`...). The engine
    /// does not copy these.
    Error(String),
}

impl CellValue {
    /// Short name of the value's kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            CellValue::Text(_) => "text",
            CellValue::Number { is_date: false, .. } => "number",
            CellValue::Number { is_date: true, .. } => "date",
            CellValue::Boolean(_) => "boolean",
            CellValue::Formula(_) => "formula",
            CellValue::Blank => "blank",
            CellValue::Error(_) => "error",
        }
    }
}

/// One cell: a value and the style it is displayed with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub value: CellValue,
    #[serde(default)]
    pub style: Style,
}

impl Cell {
    /// A blank cell with a fresh default style.
    pub fn blank() -> Self {
        Self { value: CellValue::Blank, style: Style::default() }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self { value: CellValue::Text(s.into()), style: Style::default() }
    }

    pub fn number(value: f64) -> Self {
        Self { value: CellValue::Number { value, is_date: false }, style: Style::default() }
    }

    pub fn boolean(value: bool) -> Self {
        Self { value: CellValue::Boolean(value), style: Style::default() }
    }

    pub fn formula(text: impl Into<String>) -> Self {
        Self { value: CellValue::Formula(text.into()), style: Style::default() }
    }

    pub fn error(code: impl Into<String>) -> Self {
        Self { value: CellValue::Error(code.into()), style: Style::default() }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn is_blank(&self) -> bool {
        matches!(self.value, CellValue::Blank)
    }

    /// Text rendering of the value, as a spreadsheet would show it unformatted.
    pub fn display_text(&self) -> String {
        match &self.value {
            CellValue::Text(s) => s.clone(),
            CellValue::Number { value, .. } => format_number(*value),
            CellValue::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::Formula(f) => f.clone(),
            CellValue::Blank => String::new(),
            CellValue::Error(code) => code.clone(),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank()
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
