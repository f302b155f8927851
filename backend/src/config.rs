//! Runtime settings.
//!
//! Settings come from the environment (optionally seeded from a `.env` file)
//! and fall back to directories under `.reformatter/` in the current directory.

use std::fs;
use std::path::{Path, PathBuf};

/// Default directory for stored profiles (relative to current dir)
pub const DEFAULT_PROFILES_DIR: &str = ".reformatter/profiles";

/// Default directory for output templates (relative to current dir)
pub const DEFAULT_TEMPLATES_DIR: &str = ".reformatter/templates";

/// Default directory for produced documents
pub const DEFAULT_OUTPUT_DIR: &str = ".";

pub const ENV_PROFILES_DIR: &str = "REFORMATTER_PROFILES_DIR";
pub const ENV_TEMPLATES_DIR: &str = "REFORMATTER_TEMPLATES_DIR";
pub const ENV_OUTPUT_DIR: &str = "REFORMATTER_OUTPUT_DIR";

/// Template file extensions the codec can seed an output document from.
const TEMPLATE_EXTENSIONS: [&str; 2] = ["xlsx", "xlsm"];

/// Directories used by the registry and the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub profiles_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// A `.env` file in the current directory is read first, if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            profiles_dir: env_path(ENV_PROFILES_DIR, DEFAULT_PROFILES_DIR),
            templates_dir: env_path(ENV_TEMPLATES_DIR, DEFAULT_TEMPLATES_DIR),
            output_dir: env_path(ENV_OUTPUT_DIR, DEFAULT_OUTPUT_DIR),
        }
    }

    /// All directories below a single root.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            profiles_dir: root.join("profiles"),
            templates_dir: root.join("templates"),
            output_dir: root.join("output"),
        }
    }

    /// Create the profile and template directories if missing.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.profiles_dir)?;
        fs::create_dir_all(&self.templates_dir)?;
        Ok(())
    }

    /// Resolve a profile's template path.
    ///
    /// Absolute paths are kept, relative ones live in the templates directory.
    pub fn resolve_template(&self, template_path: &str) -> PathBuf {
        let path = Path::new(template_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.templates_dir.join(path)
        }
    }

    /// Template files available in the templates directory, sorted by name.
    pub fn available_templates(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.templates_dir) {
            Ok(e) => e,
            Err(_) => return Vec::new(),
        };

        let mut templates: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| TEMPLATE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
            })
            .filter_map(|path| path.file_name().and_then(|n| n.to_str()).map(String::from))
            .collect();

        templates.sort();
        templates
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            profiles_dir: PathBuf::from(DEFAULT_PROFILES_DIR),
            templates_dir: PathBuf::from(DEFAULT_TEMPLATES_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

fn env_path(key: &str, default: &str) -> PathBuf {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}
