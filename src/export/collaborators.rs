//! Contracts of the external collaborators of the export pipeline.
//!
//! The library does not write markup formats, integrate kinetics, render
//! graphs or build archives itself. Each of these steps is delegated to an
//! implementation of one of the traits in this module. Errors of a
//! collaborator are passed through as [`CollaboratorError`] without being
//! interpreted.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::prelude::Model;

/// Error returned by a collaborator.
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync>;

/// Writes a model into an output directory.
pub trait ModelSerializer {
    /// Format tag of the written file, used in archive manifests.
    fn format(&self) -> &str;

    /// Writes `model` into `output_dir` and returns the path of the file.
    fn serialize(&self, model: &Model, output_dir: &Path) -> Result<PathBuf, CollaboratorError>;
}

/// Runs a time-course simulation of an exported model file.
pub trait Simulator {
    fn simulate(
        &self,
        model_path: &Path,
        time_course: &TimeCourse,
    ) -> Result<TimeSeries, CollaboratorError>;
}

/// Renders an exported model file. Only the side effect matters.
pub trait Visualizer {
    fn visualize(&self, model_path: &Path) -> Result<(), CollaboratorError>;
}

/// Packages exported files into an archive at `destination`.
pub trait Archiver {
    fn archive(
        &self,
        entries: &[ArchiveEntry],
        destination: &Path,
    ) -> Result<PathBuf, CollaboratorError>;
}

/// Time span of a simulation, sampled at `steps + 1` equidistant points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeCourse {
    pub start: f64,
    pub end: f64,
    pub steps: usize,
}

impl TimeCourse {
    pub fn new(start: f64, end: f64, steps: usize) -> Self {
        Self { start, end, steps }
    }

    /// Whether the time course spans a positive, finite interval with at
    /// least one step.
    pub fn is_valid(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.end > self.start && self.steps > 0
    }

    /// The sampled time points, including start and end.
    pub fn time_points(&self) -> Vec<f64> {
        let dt = (self.end - self.start) / self.steps as f64;
        (0..=self.steps)
            .map(|step| self.start + dt * step as f64)
            .collect()
    }
}

/// Result of a simulation: a time column plus one column per species.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub time: Vec<f64>,
    pub species: BTreeMap<String, Vec<f64>>,
}

impl TimeSeries {
    pub fn new(time: Vec<f64>) -> Self {
        Self {
            time,
            species: BTreeMap::new(),
        }
    }

    /// Adds the trajectory of a species. Returns `false` and leaves the
    /// series unchanged if the column length does not match the time column.
    pub fn add_species(&mut self, id: impl Into<String>, values: Vec<f64>) -> bool {
        if values.len() != self.time.len() {
            return false;
        }
        self.species.insert(id.into(), values);
        true
    }

    pub fn get(&self, id: &str) -> Option<&[f64]> {
        self.species.get(id).map(Vec::as_slice)
    }

    /// Number of time points.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// A file to be placed into an archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    /// Path of the file to archive.
    pub location: PathBuf,
    /// Format tag of the file.
    pub format: String,
    /// Whether this is the main file of the archive.
    pub master: bool,
}

impl ArchiveEntry {
    pub fn new(location: impl Into<PathBuf>, format: impl Into<String>, master: bool) -> Self {
        Self {
            location: location.into(),
            format: format.into(),
            master,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_time_points() {
        let time_course = TimeCourse::new(0.0, 10.0, 4);
        let points = time_course.time_points();

        assert_eq!(points.len(), 5);
        assert_relative_eq!(points[1], 2.5);
        assert_relative_eq!(points[4], 10.0);
    }

    #[test]
    fn test_invalid_time_course() {
        assert!(!TimeCourse::new(10.0, 0.0, 10).is_valid());
        assert!(!TimeCourse::new(0.0, 10.0, 0).is_valid());
        assert!(TimeCourse::new(0.0, 10.0, 1).is_valid());
    }

    #[test]
    fn test_time_series_columns() {
        let mut series = TimeSeries::new(vec![0.0, 1.0]);
        assert!(series.add_species("S0", vec![10.0, 9.0]));
        assert!(!series.add_species("S1", vec![0.0]));

        assert_eq!(series.len(), 2);
        assert_eq!(series.get("S0"), Some([10.0, 9.0].as_slice()));
        assert_eq!(series.get("S1"), None);
    }
}
