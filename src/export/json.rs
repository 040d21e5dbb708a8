use std::fs::File;
use std::path::{Path, PathBuf};

use crate::export::collaborators::{CollaboratorError, ModelSerializer};
use crate::prelude::Model;
use crate::registry::is_valid_sid;

/// Serializes models as pretty-printed JSON files named `<model id>.json`.
/// Models whose id is not a valid SId are refused, so the file always lands
/// directly inside the output directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl JsonSerializer {
    pub const FORMAT: &'static str = "application/json";
}

impl ModelSerializer for JsonSerializer {
    fn format(&self) -> &str {
        Self::FORMAT
    }

    fn serialize(&self, model: &Model, output_dir: &Path) -> Result<PathBuf, CollaboratorError> {
        if !is_valid_sid(model.id()) {
            return Err(format!("'{}' is not a valid model identifier", model.id()).into());
        }

        let path = output_dir.join(format!("{}.json", model.id()));
        let file = File::create(&path)?;
        serde_json::to_writer_pretty(file, model)?;
        Ok(path)
    }
}
