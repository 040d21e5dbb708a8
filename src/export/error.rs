use thiserror::Error;

use crate::export::collaborators::CollaboratorError;
use crate::validation::consistency::Report;

/// Errors raised by the export pipeline.
///
/// Collaborator failures are wrapped as-is; the wrapped error is available
/// through [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("Model '{model}' is not consistent: {} error(s) found", .report.error_count())]
    Inconsistent { model: String, report: Report },

    #[error("Model '{model}' has missing or inconsistent units")]
    UnitInconsistency { model: String, report: Report },

    #[error("Failed to prepare output directory: {0}")]
    OutputDirectory(#[from] std::io::Error),

    #[error("Invalid time course: end must be after start and steps must be positive")]
    InvalidTimeCourse,

    #[error("Serializer failed")]
    Serializer(#[source] CollaboratorError),

    #[error("Simulator failed")]
    Simulator(#[source] CollaboratorError),

    #[error("Visualizer failed")]
    Visualizer(#[source] CollaboratorError),

    #[error("Archiver failed")]
    Archiver(#[source] CollaboratorError),
}
