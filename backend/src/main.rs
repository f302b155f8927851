//! Reformatter CLI - Reshape spreadsheets into templates using profiles
//!
//! # Main Commands
//!
//! ```bash
//! reformatter run --profile monthly --source march.xlsx   # Run a profile
//! reformatter profile list                               # Manage profiles
//! reformatter templates                                  # List output templates
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! reformatter inspect march.xlsx --sheet 0   # Print the cells of a document
//! reformatter operations                     # Show available copy operations
//! reformatter example-profile                # Show an example profile
//! ```

use clap::{Parser, Subcommand};
use reformatter::{
    example_profile, open_source, operations_description, run_profile, validate_profile,
    ConsoleSink, Profile, ProfileRegistry, Settings,
};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "reformatter")]
#[command(about = "Reshape spreadsheet documents into templates using stored profiles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a profile against a source document
    Run {
        /// Profile name
        #[arg(short, long)]
        profile: String,

        /// Source document (XLSX or CSV)
        #[arg(short, long)]
        source: PathBuf,

        /// Output file (default: output dir + naming convention)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the run summary as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Manage profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// List available output templates
    Templates,

    /// Print the cells of a document
    Inspect {
        /// Document to read (XLSX or CSV)
        file: PathBuf,

        /// Sheet index (default: all sheets)
        #[arg(short, long)]
        sheet: Option<usize>,

        /// Maximum rows per sheet
        #[arg(short, long, default_value = "20")]
        rows: usize,
    },

    /// Show available copy operations
    Operations,

    /// Show example profile
    ExampleProfile,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// List all stored profiles
    List,

    /// Show details of a profile
    Show {
        /// Profile name
        name: String,
    },

    /// Create an empty profile
    Create {
        /// Profile name
        name: String,
        /// Template file (relative to the templates directory)
        #[arg(short, long)]
        template: String,
        /// Output naming convention, e.g. "{source}_{date}"
        #[arg(short, long)]
        naming: Option<String>,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },

    /// Import a profile JSON file
    Import {
        /// Profile JSON file to import
        file: PathBuf,
        /// Store under this name instead of the declared one
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Validate a profile JSON file without storing it
    Validate {
        /// Profile JSON file
        file: PathBuf,
    },
}

fn main() {
    let settings = Settings::from_env();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { profile, source, output, report } => {
            cmd_run(&settings, &profile, &source, output.as_deref(), report.as_deref())
        }
        Commands::Profile { action } => cmd_profile(&settings, action),
        Commands::Templates => cmd_templates(&settings),
        Commands::Inspect { file, sheet, rows } => cmd_inspect(&file, sheet, rows),
        Commands::Operations => cmd_operations(),
        Commands::ExampleProfile => cmd_example_profile(),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_run(
    settings: &Settings,
    profile_name: &str,
    source: &Path,
    output: Option<&Path>,
    report: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = ProfileRegistry::with_dir(&settings.profiles_dir);
    let profile = registry.get(profile_name)?;

    eprintln!("📄 Processing: {}", source.display());
    eprintln!("   Profile: {} ({} operations)", profile.name, profile.operations.len());

    let summary = run_profile(profile, source, output, settings, &ConsoleSink)?;

    eprintln!("\n⚙️  {}", summary.report.summary());
    if !summary.report.unsupported.is_empty() {
        eprintln!("   ⚠️  {} cell(s) could not be copied", summary.report.unsupported.len());
    }
    if let Some(path) = report {
        fs::write(path, summary.to_json()?)?;
        eprintln!("   💾 Report saved to: {}", path.display());
    }

    eprintln!("\n✨ Done! Output: {}", summary.output.display());
    Ok(())
}

fn cmd_profile(settings: &Settings, action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = ProfileRegistry::with_dir(&settings.profiles_dir);

    match action {
        ProfileAction::List => {
            let profiles = registry.list();
            if profiles.is_empty() {
                eprintln!("📋 No profiles stored yet.");
                eprintln!("   Use 'reformatter profile create <name> --template <file>' to add one.");
                return Ok(());
            }

            eprintln!("📋 Stored profiles ({}):\n", profiles.len());
            for p in profiles {
                println!("  📄 {}", p.name);
                println!("     Template: {}", p.template_path);
                println!("     Operations: {}", p.operations.len());
                println!();
            }
        }

        ProfileAction::Show { name } => {
            let profile = registry.get(&name)?;
            for line in profile.describe() {
                println!("{}", line);
            }
        }

        ProfileAction::Create { name, template, naming } => {
            let template_path = settings.resolve_template(&template);
            if !template_path.is_file() {
                eprintln!("⚠️  Template not found yet: {}", template_path.display());
            }

            registry.create(&name, &template)?;
            if let Some(naming) = naming {
                let profile = registry.get(&name)?.clone().with_naming(naming);
                registry.save(profile)?;
            }
            eprintln!("✅ Profile created: {}", name);
        }

        ProfileAction::Delete { name } => {
            registry.delete(&name)?;
            eprintln!("🗑️  Profile deleted: {}", name);
        }

        ProfileAction::Import { file, name } => {
            eprintln!("📥 Importing profile from: {}", file.display());
            let stored = registry.import(&file, name.as_deref())?;
            eprintln!("✅ Profile saved as: {}", stored);
        }

        ProfileAction::Validate { file } => {
            eprintln!("✔️  Validating: {}", file.display());

            let content = fs::read_to_string(&file)?;
            let value: Value = serde_json::from_str(&content)?;

            if let Err(errors) = validate_profile(&value) {
                eprintln!("\n❌ Profile invalid:");
                for err in &errors {
                    eprintln!("   - {}", err);
                }
                std::process::exit(1);
            }

            let profile: Profile = serde_json::from_value(value)?;
            profile.validate()?;
            eprintln!("✅ Profile '{}' is valid ({} operations)", profile.name, profile.operations.len());
        }
    }

    Ok(())
}

fn cmd_templates(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let templates = settings.available_templates();
    if templates.is_empty() {
        eprintln!("📋 No templates in {}", settings.templates_dir.display());
        return Ok(());
    }

    eprintln!("📋 Templates in {} ({}):\n", settings.templates_dir.display(), templates.len());
    for t in templates {
        println!("  📄 {}", t);
    }
    Ok(())
}

fn cmd_inspect(file: &Path, sheet: Option<usize>, rows: usize) -> Result<(), Box<dyn std::error::Error>> {
    let workbook = open_source(file)?;
    eprintln!("📄 {} ({} sheets)", file.display(), workbook.sheet_count());

    for (index, s) in workbook.sheets().iter().enumerate() {
        if sheet.is_some_and(|wanted| wanted != index) {
            continue;
        }

        println!("\n[{}] {} ({} rows)", index, s.name(), s.row_count());
        for (row_index, row) in s.rows().take(rows) {
            let cells: Vec<String> = row
                .cells()
                .map(|(col, cell)| format!("{}={}", col, cell.display_text()))
                .collect();
            println!("  {:>6} | {}", row_index, cells.join("  "));
        }
    }
    Ok(())
}

fn cmd_operations() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", operations_description());
    Ok(())
}

fn cmd_example_profile() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", example_profile().to_json()?);
    Ok(())
}
