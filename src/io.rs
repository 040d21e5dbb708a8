use std::path::PathBuf;

use thiserror::Error;

use crate::prelude::Model;

/// Loads and parses a model from a JSON file.
///
/// Loading checks the structure of the file only. Identifiers and references
/// are not validated, so that inconsistent files can still be inspected;
/// run [`check_consistency`](crate::validation::consistency::check_consistency)
/// on the result before exporting it.
///
/// # Arguments
///
/// * `path` - Path to the JSON file containing the model
///
/// # Errors
///
/// This function will return an error if:
/// * The file cannot be found or opened (`IOError::FileNotFound`)
/// * The file contents cannot be parsed as a model (`IOError::JsonParseError`)
pub fn load_model(path: impl Into<PathBuf>) -> Result<Model, IOError> {
    let path = path.into();
    let file = std::fs::File::open(path).map_err(IOError::FileNotFound)?;
    serde_json::from_reader(file).map_err(IOError::JsonParseError)
}

/// Saves a model to a pretty-printed JSON file.
///
/// # Arguments
///
/// * `path` - Path of the JSON file to write
/// * `model` - The model to save
///
/// # Errors
///
/// Returns `IOError::FileNotFound` if the file cannot be created and
/// `IOError::JsonParseError` if serialization fails.
pub fn save_model(path: impl Into<PathBuf>, model: &Model) -> Result<(), IOError> {
    let path = path.into();
    let file = std::fs::File::create(path).map_err(IOError::FileNotFound)?;
    serde_json::to_writer_pretty(file, model).map_err(IOError::JsonParseError)
}

/// Represents errors that can occur while reading and writing model files.
#[derive(Error, Debug)]
pub enum IOError {
    /// Indicates that the specified file could not be found, opened or created.
    #[error("File not found: {0}")]
    FileNotFound(#[from] std::io::Error),

    /// Indicates that the file contents could not be parsed or written as JSON.
    #[error("Failed to parse JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),
}
