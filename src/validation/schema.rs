//! Schema module for validating model files.
//!
//! This module provides functionality to validate JSON model files against
//! the JSON schema derived from the [`Model`] type. Schema validation checks
//! the structure of a file only; use the consistency check for references,
//! units and identifiers.

use std::{error::Error, fmt};

use colored::Colorize;
use jsonschema::validator_for;
use schemars::schema::RootSchema;
use schemars::schema_for;
use serde_json::Value;

use crate::prelude::Model;

/// Report containing validation results
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ValidationReport {
    /// Whether the document is valid
    pub valid: bool,
    /// List of validation errors if any
    pub errors: Vec<ValidationError>,
}

/// Individual validation error details
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ValidationError {
    /// JSON path where the error occurred
    pub location: String,
    /// Description of the validation error
    pub message: String,
}

impl fmt::Display for ValidationError {
    /// Formats the validation error for display
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = if self.location.is_empty() {
            "/"
        } else {
            self.location.as_str()
        };

        write!(
            f,
            "{}\n\t└── {}",
            location.bold(),
            self.message.bold().red()
        )
    }
}

/// JSON schema of a model file.
pub fn model_schema() -> RootSchema {
    schema_for!(Model)
}

/// Validates a model file against its JSON schema
///
/// # Arguments
/// * `content` - JSON string containing the model
///
/// # Returns
/// * `Result<ValidationReport, Box<dyn Error>>` - Validation report or error if the
///   content is not JSON at all
pub fn validate_json(content: &str) -> Result<ValidationReport, Box<dyn Error>> {
    let json: Value = serde_json::from_str(content)?;
    let schema = serde_json::to_value(model_schema())?;
    let validator = validator_for(&schema)?;

    let errors = validator
        .iter_errors(&json)
        .map(|error| ValidationError {
            location: error.instance_path.to_string(),
            message: error.to_string().replace('"', "'"),
        })
        .collect::<Vec<_>>();

    Ok(ValidationReport {
        valid: errors.is_empty(),
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_model_file() {
        let content =
            std::fs::read_to_string("tests/data/linear_chain.json").expect("Failed to read file");
        let report = validate_json(&content).expect("Failed to validate");
        assert!(report.valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_missing_required_fields() {
        let content = r#"{
            "compartments": [{ "id": "c" }],
            "species": [{ "id": "glc", "initial": { "amount": "ten" } }]
        }"#;
        let report = validate_json(content).expect("Failed to validate");

        assert!(!report.valid);
        assert!(report.errors.len() >= 3);
        assert!(report.errors.iter().any(|error| error.location.is_empty()));
    }

    #[test]
    fn test_not_json() {
        assert!(validate_json("not json").is_err());
    }
}
