//! Profile Registry - Store and reuse reformatting profiles
//!
//! A profile names a template and the ordered operations that fill it from
//! a source document. Profiles are stored as `<name>.json` files in the
//! profiles directory.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::DEFAULT_PROFILES_DIR;
use crate::error::{OperationError, ProfileError, ProfileResult};
use crate::transform::column_map::ColumnMap;
use crate::transform::operations::Operation;
use crate::validation::validate_profile;

/// A named list of operations and the template they write into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Profile {
    pub name: String,
    /// Template file, absolute or relative to the templates directory
    pub template_path: String,
    /// Output file name pattern; empty means the default pattern
    #[serde(default)]
    pub naming_convention: String,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

/// Number of header lines in [`Profile::describe`] before the operations.
const DESCRIBE_HEADER_LINES: usize = 3;

impl Profile {
    pub fn new(name: impl Into<String>, template_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template_path: template_path.into(),
            naming_convention: String::new(),
            operations: Vec::new(),
        }
    }

    pub fn with_naming(mut self, naming_convention: impl Into<String>) -> Self {
        self.naming_convention = naming_convention.into();
        self
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Remove the operation at `index`.
    pub fn remove_operation(&mut self, index: usize) -> Option<Operation> {
        (index < self.operations.len()).then(|| self.operations.remove(index))
    }

    /// Move the operation at `from` so that it ends up at `to`.
    pub fn move_operation(&mut self, from: usize, to: usize) -> bool {
        if from >= self.operations.len() || to >= self.operations.len() {
            return false;
        }
        let operation = self.operations.remove(from);
        self.operations.insert(to, operation);
        true
    }

    /// Parse and validate a profile from JSON text.
    pub fn from_json(json: &str) -> ProfileResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Validate a JSON value against the profile schema, then deserialize it.
    pub fn from_value(value: Value) -> ProfileResult<Self> {
        validate_profile(&value).map_err(ProfileError::Invalid)?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> ProfileResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every operation's static parameters.
    pub fn validate(&self) -> Result<(), OperationError> {
        for (index, operation) in self.operations.iter().enumerate() {
            operation
                .validate()
                .map_err(|source| OperationError { index, kind: operation.kind(), source })?;
        }
        Ok(())
    }

    /// Human-readable listing: profile header lines, then each operation.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Profile Name: {}", self.name),
            format!("Template Path: {}", self.template_path),
            format!("Naming Convention: {}", self.naming_convention),
        ];
        for operation in &self.operations {
            lines.extend(operation.describe());
        }
        lines
    }

    /// Index of the operation whose kind line is at `line` in [`describe`].
    ///
    /// [`describe`]: Profile::describe
    pub fn operation_at_line(&self, line: usize) -> Option<usize> {
        let mut current = DESCRIBE_HEADER_LINES;
        for (index, operation) in self.operations.iter().enumerate() {
            if current == line {
                return Some(index);
            }
            current += operation.describe().len();
        }
        None
    }
}

/// A representative profile: keep the header rows, fan out three monthly
/// columns into one row each, and carry a reference column to a second sheet.
pub fn example_profile() -> Profile {
    let col_map: ColumnMap = [(0, 0), (1, 1), (2, 1), (3, 1)].into_iter().collect();

    Profile::new("monthly-split", "monthly.xlsx")
        .with_naming("{source}_{profile}_{date}")
        .with_operation(Operation::row_copy(0, 0, 0, 0))
        .with_operation(Operation::split_row_copy(0, 0, 1, col_map, true, 2))
        .with_operation(Operation::column_copy(0, 4, 1, 0, 1))
}

/// Registry for managing stored profiles
pub struct ProfileRegistry {
    /// Directory where profiles are stored
    profiles_dir: PathBuf,
    /// Loaded profiles (name -> profile)
    profiles: BTreeMap<String, Profile>,
}

impl ProfileRegistry {
    /// Create a registry over the default directory, loading existing profiles
    pub fn new() -> Self {
        Self::with_dir(DEFAULT_PROFILES_DIR)
    }

    /// Create a registry with a custom directory
    pub fn with_dir(dir: impl AsRef<Path>) -> Self {
        let mut registry = Self {
            profiles_dir: PathBuf::from(dir.as_ref()),
            profiles: BTreeMap::new(),
        };
        registry.load_all();
        registry
    }

    /// Load all profiles from the registry directory. Files that do not hold
    /// a valid profile are skipped.
    fn load_all(&mut self) {
        let entries = match fs::read_dir(&self.profiles_dir) {
            Ok(e) => e,
            Err(_) => return,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                if let Ok(content) = fs::read_to_string(&path) {
                    if let Ok(profile) = Profile::from_json(&content) {
                        self.profiles.insert(profile.name.clone(), profile);
                    }
                }
            }
        }
    }

    pub fn dir(&self) -> &Path {
        &self.profiles_dir
    }

    /// All stored profiles, sorted by name
    pub fn list(&self) -> Vec<&Profile> {
        self.profiles.values().collect()
    }

    /// Names of all stored profiles, sorted
    pub fn names(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    /// Get a profile by name
    pub fn get(&self, name: &str) -> ProfileResult<&Profile> {
        self.profiles
            .get(name)
            .ok_or_else(|| ProfileError::NotFound(name.to_string()))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    /// Create and store an empty profile
    pub fn create(&mut self, name: &str, template_path: &str) -> ProfileResult<&Profile> {
        if self.exists(name) {
            return Err(ProfileError::AlreadyExists(name.to_string()));
        }
        self.save(Profile::new(name, template_path))?;
        self.get(name)
    }

    /// Store a profile, replacing any profile with the same name
    pub fn save(&mut self, profile: Profile) -> ProfileResult<()> {
        check_name(&profile.name)?;
        fs::create_dir_all(&self.profiles_dir)?;

        fs::write(self.path_for(&profile.name), profile.to_json()?)?;
        self.profiles.insert(profile.name.clone(), profile);
        Ok(())
    }

    /// Delete a profile and its file
    pub fn delete(&mut self, name: &str) -> ProfileResult<()> {
        if self.profiles.remove(name).is_none() {
            return Err(ProfileError::NotFound(name.to_string()));
        }
        fs::remove_file(self.path_for(name))?;
        Ok(())
    }

    /// Import a profile from a JSON file, optionally under another name.
    ///
    /// Returns the name it was stored under.
    pub fn import(&mut self, path: &Path, name: Option<&str>) -> ProfileResult<String> {
        let content = fs::read_to_string(path)?;
        let mut profile = Profile::from_json(&content)?;

        if let Some(name) = name {
            profile.name = name.to_string();
        }

        let stored_name = profile.name.clone();
        self.save(profile)?;
        Ok(stored_name)
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.profiles_dir.join(format!("{}.json", name))
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Profile names double as file names.
fn check_name(name: &str) -> ProfileResult<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        return Err(ProfileError::Invalid(vec![format!("invalid profile name '{}'", name)]));
    }
    if name.contains(['/', '\\']) || name.chars().any(char::is_control) {
        return Err(ProfileError::Invalid(vec![format!(
            "profile name '{}' must not contain path separators",
            name
        )]));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_profile_json_shape() {
        let json = json!({
            "name": "inventory",
            "templatePath": "inventory.xlsx",
            "namingConvention": "{source}_out",
            "operations": [
                {"type": "COPY_SPLIT_ROW", "parameters": {
                    "srcSheet": 0, "dstSheet": 0, "startRow": 1,
                    "colMap": {"2": 0, "1": 0},
                    "includeHeaders": false, "headerCol": 0
                }}
            ]
        });

        let profile = Profile::from_value(json.clone()).unwrap();
        assert_eq!(profile.operations.len(), 1);
        assert_eq!(serde_json::to_value(&profile).unwrap(), json);
    }

    #[test]
    fn test_naming_convention_defaults_to_empty() {
        let profile = Profile::from_json(r#"{"name": "p", "templatePath": "t.xlsx", "operations": []}"#).unwrap();
        assert_eq!(profile.naming_convention, "");
    }

    #[test]
    fn test_invalid_profile_reports_schema_errors() {
        let result = Profile::from_json(r#"{"name": "p", "operations": [{"type": "COPY_ROWS"}]}"#);
        match result {
            Err(ProfileError::Invalid(errors)) => assert!(errors.len() >= 2),
            other => panic!("expected schema errors, got {:?}", other),
        }
    }

    #[test]
    fn test_describe_and_line_lookup() {
        let profile = example_profile();
        let lines = profile.describe();

        assert_eq!(lines[0], "Profile Name: monthly-split");
        assert_eq!(lines[3], "COPY_ROWS - Source Sheet: 0 - Destination Sheet: 0");
        assert_eq!(profile.operation_at_line(3), Some(0));
        // Row copy takes two lines, so the split copy starts at line 5.
        assert_eq!(lines[5], "COPY_SPLIT_ROW - Source Sheet: 0 - Destination Sheet: 0");
        assert_eq!(profile.operation_at_line(5), Some(1));
        assert_eq!(profile.operation_at_line(6), None);
        assert_eq!(profile.operation_at_line(0), None);
    }

    #[test]
    fn test_edit_operations() {
        let mut profile = example_profile();

        assert!(profile.move_operation(2, 0));
        assert_eq!(profile.operations[0], Operation::column_copy(0, 4, 1, 0, 1));
        assert!(!profile.move_operation(0, 9));

        assert!(profile.remove_operation(0).is_some());
        assert!(profile.remove_operation(5).is_none());
        assert_eq!(profile.operations.len(), 2);
    }

    #[test]
    fn test_example_profile_is_valid() {
        let profile = example_profile();
        assert!(profile.validate().is_ok());
        let json = profile.to_json().unwrap();
        assert_eq!(Profile::from_json(&json).unwrap(), profile);
    }

    #[test]
    fn test_registry_crud() {
        let dir = tempdir().unwrap();
        let mut registry = ProfileRegistry::with_dir(dir.path());
        assert!(registry.list().is_empty());

        registry.create("weekly", "weekly.xlsx").unwrap();
        registry.save(example_profile()).unwrap();
        assert!(matches!(
            registry.create("weekly", "other.xlsx"),
            Err(ProfileError::AlreadyExists(_))
        ));
        assert_eq!(registry.names(), vec!["monthly-split".to_string(), "weekly".to_string()]);

        // A fresh registry sees what was written to disk.
        let reloaded = ProfileRegistry::with_dir(dir.path());
        assert_eq!(reloaded.get("monthly-split").unwrap(), &example_profile());

        registry.delete("weekly").unwrap();
        assert!(!registry.exists("weekly"));
        assert!(!dir.path().join("weekly.json").exists());
        assert!(matches!(registry.delete("weekly"), Err(ProfileError::NotFound(_))));
    }

    #[test]
    fn test_split_profile_survives_reopen() {
        let dir = tempdir().unwrap();
        let text = r#"{
            "name": "fan-out",
            "templatePath": "fan.xlsx",
            "operations": [
                {"type": "COPY_SPLIT_ROW", "parameters": {
                    "srcSheet": 0, "dstSheet": 0, "startRow": 1,
                    "colMap": {"0": 0, "3": 1, "1": 1},
                    "includeHeaders": true, "headerCol": 2
                }}
            ]
        }"#;

        let parsed = Profile::from_json(text).unwrap();
        let expected: ColumnMap = [(0, 0), (3, 1), (1, 1)].into_iter().collect();
        assert_eq!(parsed.operations, vec![Operation::split_row_copy(0, 0, 1, expected, true, 2)]);

        fs::write(dir.path().join("fan-out.json"), text).unwrap();
        let registry = ProfileRegistry::with_dir(dir.path());
        assert_eq!(registry.get("fan-out").unwrap(), &parsed);
    }

    #[test]
    fn test_save_updates_existing() {
        let dir = tempdir().unwrap();
        let mut registry = ProfileRegistry::with_dir(dir.path());

        registry.create("p", "a.xlsx").unwrap();
        let updated = registry.get("p").unwrap().clone().with_operation(Operation::row_copy(0, 0, 0, 1));
        registry.save(updated).unwrap();

        assert_eq!(ProfileRegistry::with_dir(dir.path()).get("p").unwrap().operations.len(), 1);
    }

    #[test]
    fn test_import_with_name_override() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("incoming.json");
        fs::write(&file, example_profile().to_json().unwrap()).unwrap();

        let mut registry = ProfileRegistry::with_dir(dir.path().join("profiles"));
        let name = registry.import(&file, Some("renamed")).unwrap();

        assert_eq!(name, "renamed");
        assert_eq!(registry.get("renamed").unwrap().operations.len(), 3);
    }

    #[test]
    fn test_invalid_files_are_skipped() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        assert!(ProfileRegistry::with_dir(dir.path()).list().is_empty());
    }

    #[test]
    fn test_path_like_names_rejected() {
        let dir = tempdir().unwrap();
        let mut registry = ProfileRegistry::with_dir(dir.path());

        assert!(matches!(registry.create("../escape", "t.xlsx"), Err(ProfileError::Invalid(_))));
        assert!(matches!(registry.create(" ", "t.xlsx"), Err(ProfileError::Invalid(_))));
    }
}
