//! Diagnostic output for engine and pipeline runs.
//!
//! Diagnostics are sent to a [`DiagnosticSink`] that the caller passes in
//! explicitly. Nothing here is global: the CLI hands a [`ConsoleSink`] to the
//! pipeline, tests hand a [`MemorySink`] and inspect what was emitted.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Log level for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Optional indentation level (for nested logs)
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Render the entry as a single console line.
    pub fn render(&self) -> String {
        let prefix = match self.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        let indent = "   ".repeat(self.indent as usize);
        format!("{}{} {}", indent, prefix, self.message)
    }
}

/// Receives diagnostics from the engine and the pipeline.
pub trait DiagnosticSink {
    /// Accept one entry.
    fn emit(&self, entry: LogEntry);

    fn info(&self, msg: impl Into<String>)
    where
        Self: Sized,
    {
        self.emit(LogEntry::info(msg));
    }

    fn success(&self, msg: impl Into<String>)
    where
        Self: Sized,
    {
        self.emit(LogEntry::success(msg));
    }

    fn warning(&self, msg: impl Into<String>)
    where
        Self: Sized,
    {
        self.emit(LogEntry::warning(msg));
    }

    fn error(&self, msg: impl Into<String>)
    where
        Self: Sized,
    {
        self.emit(LogEntry::error(msg));
    }
}

/// Convenient logging functions for `&dyn DiagnosticSink`
pub fn log_info(sink: &dyn DiagnosticSink, msg: impl Into<String>) {
    sink.emit(LogEntry::info(msg));
}

pub fn log_success(sink: &dyn DiagnosticSink, msg: impl Into<String>) {
    sink.emit(LogEntry::success(msg));
}

pub fn log_warning(sink: &dyn DiagnosticSink, msg: impl Into<String>) {
    sink.emit(LogEntry::warning(msg));
}

pub fn log_error(sink: &dyn DiagnosticSink, msg: impl Into<String>) {
    sink.emit(LogEntry::error(msg));
}

pub fn log_info_indent(sink: &dyn DiagnosticSink, msg: impl Into<String>, indent: u8) {
    sink.emit(LogEntry::info(msg).with_indent(indent));
}

/// Writes entries to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl DiagnosticSink for ConsoleSink {
    fn emit(&self, entry: LogEntry) {
        eprintln!("{}", entry.render());
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _entry: LogEntry) {}
}

/// Keeps every entry in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the entries emitted so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Entries at the given level.
    pub fn at_level(&self, level: LogLevel) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.level == level)
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries().iter().any(|e| e.message.contains(needle))
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, entry: LogEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }
}
