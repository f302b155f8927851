//! JSON Schema validation for profile documents.
//!
//! Profiles are checked against an embedded JSON Schema (Draft 7) before
//! they are deserialized, so a malformed profile produces messages that
//! point at the offending field instead of a single serde error.
//!
//! # Embedded Schemas
//!
//! Schemas are embedded at compile time from `schemas/` directory:
//! - `profile.schema.json`
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use reformatter::validation::validate_profile;
//!
//! let profile = json!({
//!     "name": "monthly",
//!     "templatePath": "monthly.xlsx",
//!     "operations": [
//!         {"type": "COPY_ROWS", "parameters": {"srcSheet": 0, "dstSheet": 0, "startRow": 0, "endRow": 2}}
//!     ]
//! });
//! assert!(validate_profile(&profile).is_ok());
//! ```

use once_cell::sync::Lazy;
use serde_json::Value;

static PROFILE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/profile.schema.json"))
        .expect("Invalid embedded schema")
});

/// Validate a JSON value against a JSON schema.
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(Vec<String>)` with one message per violation
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Quick check: true/false only.
pub fn is_valid(schema: &Value, data: &Value) -> bool {
    jsonschema::draft7::is_valid(schema, data)
}

/// The embedded profile schema.
pub fn profile_schema() -> &'static Value {
    &PROFILE_SCHEMA
}

/// Validate a profile document.
pub fn validate_profile(data: &Value) -> Result<(), Vec<String>> {
    validate(&PROFILE_SCHEMA, data)
}

/// Quick check against the profile schema.
pub fn is_valid_profile(data: &Value) -> bool {
    is_valid(&PROFILE_SCHEMA, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn split_profile() -> Value {
        json!({
            "name": "inventory",
            "templatePath": "inventory.xlsx",
            "namingConvention": "{source}_split",
            "operations": [
                {"type": "COPY_ROWS", "parameters": {"srcSheet": 0, "dstSheet": 0, "startRow": 0, "endRow": 0}},
                {"type": "COPY_SPLIT_ROW", "parameters": {
                    "srcSheet": 0, "dstSheet": 0, "startRow": 1,
                    "colMap": {"1": 0, "2": 0, "3": 1},
                    "includeHeaders": true, "headerCol": 2
                }}
            ]
        })
    }

    #[test]
    fn test_valid_profile() {
        assert!(is_valid_profile(&split_profile()));
        assert!(validate_profile(&split_profile()).is_ok());
    }

    #[test]
    fn test_missing_name() {
        let mut profile = split_profile();
        profile.as_object_mut().unwrap().remove("name");

        let errors = validate_profile(&profile).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("name")));
    }

    #[test]
    fn test_unknown_operation_type() {
        let profile = json!({
            "name": "p",
            "templatePath": "t.xlsx",
            "operations": [{"type": "DELETE_ROWS", "parameters": {}}]
        });
        assert!(!is_valid_profile(&profile));
    }

    #[test]
    fn test_parameters_checked_per_type() {
        let profile = json!({
            "name": "p",
            "templatePath": "t.xlsx",
            "operations": [{"type": "COPY_COLUMN", "parameters": {"srcSheet": 0, "dstSheet": 0, "startRow": 0}}]
        });

        let errors = validate_profile(&profile).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("srcCol")));
    }

    #[test]
    fn test_negative_and_non_numeric_indices() {
        let mut profile = split_profile();
        profile["operations"][0]["parameters"]["endRow"] = json!(-1);
        assert!(!is_valid_profile(&profile));

        let mut profile = split_profile();
        profile["operations"][1]["parameters"]["colMap"] = json!({"A": 0});
        assert!(!is_valid_profile(&profile));

        let mut profile = split_profile();
        profile["operations"][1]["parameters"]["colMap"] = json!({});
        assert!(!is_valid_profile(&profile));
    }
}
