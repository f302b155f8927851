//! Cell styles and number formats.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Number format used for cells that carry no explicit format.
pub const GENERAL_FORMAT: &str = "General";

/// Format written for date cells that carry no date format of their own.
pub const DEFAULT_DATE_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Visual formatting of a cell.
///
/// Every cell owns its style; copying a cell clones it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    /// Number-format pattern, e.g. `0.00` or `dd/mm/yyyy`.
    pub number_format: String,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub wrap_text: bool,
    /// Font colour as `0xRRGGBB`.
    #[serde(default)]
    pub font_color: Option<u32>,
    /// Fill colour as `0xRRGGBB`.
    #[serde(default)]
    pub fill_color: Option<u32>,
}

impl Style {
    pub fn with_number_format(mut self, pattern: impl Into<String>) -> Self {
        self.number_format = pattern.into();
        self
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Whether the number format displays a date or time.
    pub fn is_date_formatted(&self) -> bool {
        is_date_format(&self.number_format)
    }
}

impl Default for Style {
    fn default() -> Self {
        Self {
            number_format: GENERAL_FORMAT.to_string(),
            bold: false,
            italic: false,
            underline: false,
            wrap_text: false,
            font_color: None,
            fill_color: None,
        }
    }
}

static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#""[^"]*""#).expect("valid regex"));
static ESCAPED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\.|[_*].").expect("valid regex"));
static ELAPSED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\[(h+|m+|s+)\]").expect("valid regex"));
static BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").expect("valid regex"));
static AM_PM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)am/pm|a/p").expect("valid regex"));
static DATE_TOKENS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[ymdhse\-/,.: ]+0*$").expect("valid regex"));
static DATE_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[ymdhs]").expect("valid regex"));

/// Whether a number-format pattern denotes a date or time.
///
/// Only the first (positive) section is inspected. Literal text, escapes,
/// padding, colours and conditions are ignored; elapsed-time tokens such as
/// `[h]` count as time.
pub fn is_date_format(pattern: &str) -> bool {
    let section = pattern.split(';').next().unwrap_or("").trim();
    if section.is_empty() || section.eq_ignore_ascii_case(GENERAL_FORMAT) {
        return false;
    }

    let stripped = QUOTED.replace_all(section, "");
    let stripped = ESCAPED.replace_all(&stripped, "");
    if ELAPSED.is_match(&stripped) {
        return true;
    }
    let stripped = BRACKETED.replace_all(&stripped, "");
    let stripped = AM_PM.replace_all(&stripped, "");

    DATE_TOKENS.is_match(&stripped) && DATE_LETTER.is_match(&stripped)
}
