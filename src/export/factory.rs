//! Export pipeline for models.
//!
//! [`create_model`] turns a model under construction into an exported file:
//!
//! - Runs the consistency check and refuses to export inconsistent models
//! - Optionally runs the unit consistency check
//! - Creates the output directory
//! - Hands the model to a [`ModelSerializer`]
//! - Marks the model as exported
//!
//! The resulting [`FactoryResult`] can then be passed to a simulator,
//! visualizer or archiver. Failures of these collaborators are returned
//! unchanged inside a [`FactoryError`].

use std::fs;
use std::path::PathBuf;

use derive_builder::Builder;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::export::collaborators::{
    ArchiveEntry, Archiver, ModelSerializer, Simulator, TimeCourse, TimeSeries, Visualizer,
};
use crate::export::error::FactoryError;
use crate::prelude::Model;
use crate::validation::consistency::{
    check_consistency, check_unit_consistency, Report, Severity, ViolationKind,
};

/// Configuration of the export pipeline
///
/// # Fields
///
/// * `output_dir` - Directory the exported file is written to (default: `results`)
/// * `validate` - Whether inconsistent models are refused (default: true)
/// * `units_consistency` - Whether models with missing or mismatching units are refused (default: false)
///
/// # Examples
///
/// ```
/// use pathwayml::prelude::FactoryOptionsBuilder;
///
/// let options = FactoryOptionsBuilder::default()
///     .output_dir("results")
///     .units_consistency(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct FactoryOptions {
    #[builder(default = "PathBuf::from(\"results\")", setter(into))]
    pub output_dir: PathBuf,
    #[builder(default = "true")]
    pub validate: bool,
    #[builder(default = "false")]
    pub units_consistency: bool,
}

impl Default for FactoryOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("results"),
            validate: true,
            units_consistency: false,
        }
    }
}

/// Outcome of a successful export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactoryResult {
    /// Path of the exported model file.
    pub model_path: PathBuf,
    /// Format tag reported by the serializer.
    pub format: String,
    /// Consistency report of the exported model. Contains warnings only.
    pub report: Report,
}

/// Checks, serializes and marks a model as exported
///
/// # Arguments
///
/// * `model` - The model to export
/// * `options` - Configuration of the pipeline
/// * `serializer` - Writer of the output file
///
/// # Errors
///
/// * `FactoryError::Inconsistent` if validation is enabled and the model has errors
/// * `FactoryError::UnitInconsistency` if unit consistency is requested and a quantity
///   has no unit or a rate law is not in extent per time
/// * `FactoryError::OutputDirectory` if the output directory cannot be created
/// * `FactoryError::Serializer` with the serializer's own error
pub fn create_model(
    model: &mut Model,
    options: &FactoryOptions,
    serializer: &dyn ModelSerializer,
) -> Result<FactoryResult, FactoryError> {
    let mut report = check_consistency(model);
    if options.units_consistency {
        report.merge(check_unit_consistency(model));
    }

    if options.validate && !report.is_valid {
        return Err(FactoryError::Inconsistent {
            model: model.id().to_string(),
            report,
        });
    }

    let unit_issues = report.violations_of(ViolationKind::MissingUnit).len()
        + report.violations_of(ViolationKind::UnitMismatch).len();
    if options.units_consistency && unit_issues > 0 {
        return Err(FactoryError::UnitInconsistency {
            model: model.id().to_string(),
            report,
        });
    }

    for result in report
        .errors
        .iter()
        .filter(|result| result.severity() == &Severity::Warning)
    {
        warn!("{}: {}", result.location(), result.message());
    }

    fs::create_dir_all(&options.output_dir)?;
    let model_path = serializer
        .serialize(model, &options.output_dir)
        .map_err(FactoryError::Serializer)?;

    model.mark_exported();
    info!(
        "Exported model '{}' to '{}'",
        model.id(),
        model_path.display()
    );

    Ok(FactoryResult {
        model_path,
        format: serializer.format().to_string(),
        report,
    })
}

/// Simulates an exported model.
///
/// # Errors
///
/// Returns `FactoryError::InvalidTimeCourse` for empty or reversed time courses
/// and `FactoryError::Simulator` with the simulator's own error.
pub fn simulate(
    result: &FactoryResult,
    simulator: &dyn Simulator,
    time_course: &TimeCourse,
) -> Result<TimeSeries, FactoryError> {
    if !time_course.is_valid() {
        return Err(FactoryError::InvalidTimeCourse);
    }

    simulator
        .simulate(&result.model_path, time_course)
        .map_err(FactoryError::Simulator)
}

/// Visualizes an exported model.
pub fn visualize(result: &FactoryResult, visualizer: &dyn Visualizer) -> Result<(), FactoryError> {
    visualizer
        .visualize(&result.model_path)
        .map_err(FactoryError::Visualizer)
}

/// Archives an exported model as master entry, together with additional files.
pub fn archive(
    result: &FactoryResult,
    archiver: &dyn Archiver,
    additional: &[ArchiveEntry],
    destination: impl Into<PathBuf>,
) -> Result<PathBuf, FactoryError> {
    let entries = std::iter::once(ArchiveEntry::new(
        &result.model_path,
        &result.format,
        true,
    ))
    .chain(additional.iter().map(|entry| ArchiveEntry {
        master: false,
        ..entry.clone()
    }))
    .collect::<Vec<_>>();

    let archive = archiver
        .archive(&entries, &destination.into())
        .map_err(FactoryError::Archiver)?;

    info!("Archived model to '{}'", archive.display());
    Ok(archive)
}
