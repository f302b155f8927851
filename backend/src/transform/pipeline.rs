//! High-level pipeline API: run a profile against a source document.
//!
//! This module combines all steps: open the source, seed the output from
//! the profile's template, execute the operations and save the result.
//!
//! # Example
//!
//! ```rust,ignore
//! use reformatter::{run_profile, ConsoleSink, ProfileRegistry, Settings};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::from_env();
//!     let registry = ProfileRegistry::with_dir(&settings.profiles_dir);
//!     let profile = registry.get("monthly-split")?;
//!
//!     let summary = run_profile(profile, Path::new("march.xlsx"), None, &settings, &ConsoleSink)?;
//!     println!("Wrote {}", summary.output.display());
//!     Ok(())
//! }
//! ```

use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::codec::{open_source, open_template, save_workbook};
use crate::config::Settings;
use crate::diagnostics::{log_error, log_info, log_success, DiagnosticSink};
use crate::error::{RunError, RunResult};
use crate::profiles::Profile;

use super::engine::{Engine, EngineReport};

/// Naming convention used when a profile leaves it empty.
pub const DEFAULT_NAMING_CONVENTION: &str = "{source}_{profile}";

/// Extension of produced documents.
pub const OUTPUT_EXTENSION: &str = "xlsx";

/// Record of one profile run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub run_id: Uuid,
    pub profile: String,
    pub source: PathBuf,
    pub output: PathBuf,
    /// RFC 3339
    pub started_at: String,
    /// RFC 3339
    pub finished_at: String,
    pub report: EngineReport,
}

impl RunSummary {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Expand a naming convention into an output file name (with extension).
///
/// Placeholders: `{source}` (source file stem), `{profile}` and `{date}`
/// (`YYYY-MM-DD`). Characters that cannot appear in file names become `_`.
pub fn output_file_name(convention: &str, source: &Path, profile: &str, date: NaiveDate) -> String {
    let pattern = if convention.trim().is_empty() {
        DEFAULT_NAMING_CONVENTION
    } else {
        convention.trim()
    };
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let name = pattern
        .replace("{source}", stem)
        .replace("{profile}", profile)
        .replace("{date}", &date.format("%Y-%m-%d").to_string());

    let mut name = sanitize_file_name(&name);
    let has_extension = Path::new(&name)
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(OUTPUT_EXTENSION));
    if !has_extension {
        name.push('.');
        name.push_str(OUTPUT_EXTENSION);
    }
    name
}

fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Where a run writes when no output path is given.
pub fn default_output_path(profile: &Profile, source: &Path, settings: &Settings) -> PathBuf {
    let today = Local::now().date_naive();
    settings
        .output_dir
        .join(output_file_name(&profile.naming_convention, source, &profile.name, today))
}

/// Run a profile against a source document and save the output.
///
/// The output starts as a copy of the profile's template. When an operation
/// fails, the operations after it are skipped, the partial output is saved
/// anyway, and [`RunError::Aborted`] carries the path it was saved to.
pub fn run_profile(
    profile: &Profile,
    source_path: &Path,
    output_path: Option<&Path>,
    settings: &Settings,
    sink: &dyn DiagnosticSink,
) -> RunResult<RunSummary> {
    let run_id = Uuid::new_v4();
    let started_at = Local::now().to_rfc3339();

    log_info(sink, format!("Running profile '{}' on {}", profile.name, source_path.display()));

    let source = open_source(source_path)?;
    log_info(sink, format!("Source opened: {} sheet(s)", source.sheet_count()));

    let template_path = settings.resolve_template(&profile.template_path);
    if !template_path.is_file() {
        log_error(sink, format!("Template not found: {}", template_path.display()));
        return Err(RunError::TemplateNotFound(template_path));
    }
    let mut output = open_template(&template_path)?;
    log_info(sink, format!("Template loaded: {}", template_path.display()));

    let (result, report) = {
        let mut engine = Engine::new(&source, &mut output, sink);
        let result = engine.run(&profile.operations);
        (result, engine.into_report())
    };

    let output_path = output_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(profile, source_path, settings));
    save_workbook(&output, &output_path)?;

    if let Err(err) = result {
        log_error(sink, format!("Partial output saved to {}", output_path.display()));
        return Err(RunError::Aborted { source: err, output: output_path });
    }

    log_success(sink, format!("{} → {}", report.summary(), output_path.display()));

    Ok(RunSummary {
        run_id,
        profile: profile.name.clone(),
        source: source_path.to_path_buf(),
        output: output_path,
        started_at,
        finished_at: Local::now().to_rfc3339(),
        report,
    })
}
