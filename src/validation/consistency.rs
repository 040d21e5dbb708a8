//! Consistency module for checking whether a model is ready for export.
//!
//! This module provides functionality to validate models by checking:
//! - Identifier syntax and uniqueness across all collections
//! - Unit definitions and every unit reference
//! - Compartment references of species and reactions
//! - Species references of reaction equations
//! - Symbols of rate-law expressions
//!
//! The main entry point is the `check_consistency` function which runs all validation
//! checks and returns a `Report` with every violation found. Checks never stop at the
//! first problem.
//!
//! `check_unit_consistency` additionally compares the units of the model's
//! quantities. It is run on request, e.g. by the export pipeline.

use std::fmt;

use colored::Colorize;
use log::debug;

use crate::prelude::{Model, UnitRef};
use crate::reference::{Entity, EntityKind, Reference};
use crate::registry::{Duplicate, IdRegistry};
use crate::units::error::UnitError;
use crate::units::registry::UnitRegistry;
use crate::validation::compartments::check_compartments;
use crate::validation::dimensions::check_dimensions;
use crate::validation::identifiers::check_identifiers;
use crate::validation::kinetics::check_kinetics;
use crate::validation::parameters::check_parameters;
use crate::validation::reactions::check_reactions;
use crate::validation::species::check_species;
use crate::validation::units::check_units;

/// The `check_consistency` function is used to check whether a `Model` can be exported.
/// It returns a `Report` containing the results of the checks.
///
/// # Arguments
///
/// * `model` - A reference to the `Model` to be checked.
///
/// # Returns
///
/// Returns a `Report` containing the results of the consistency checks.
pub fn check_consistency(model: &Model) -> Report {
    let context = ValidationContext::new(model);
    let mut report = Report::new();

    check_identifiers(model, &context, &mut report);
    check_units(model, &context, &mut report);
    check_compartments(model, &context, &mut report);
    check_species(model, &context, &mut report);
    check_parameters(model, &context, &mut report);
    check_reactions(model, &context, &mut report);
    check_kinetics(model, &context, &mut report);

    debug!(
        "Consistency check of model '{}' found {} issue(s)",
        model.id(),
        report.errors.len()
    );

    report
}

/// Checks that every compartment, species and rate law has a unit, either
/// its own or a default from the model units, and that every rate law is
/// expressed in extent per time.
///
/// Results are warnings of kind `MissingUnit` or `UnitMismatch`. Unresolved
/// unit references are left to [`check_consistency`].
pub fn check_unit_consistency(model: &Model) -> Report {
    let context = ValidationContext::new(model);
    let mut report = Report::new();

    check_dimensions(model, &context, &mut report);

    debug!(
        "Unit consistency check of model '{}' found {} issue(s)",
        model.id(),
        report.errors.len()
    );

    report
}

/// Registries shared by the individual checks.
pub(crate) struct ValidationContext {
    pub(crate) ids: IdRegistry,
    pub(crate) duplicates: Vec<Duplicate>,
    pub(crate) units: UnitRegistry,
    pub(crate) unit_errors: Vec<(usize, UnitError)>,
}

impl ValidationContext {
    pub(crate) fn new(model: &Model) -> Self {
        let (ids, duplicates) = IdRegistry::from_model(model);
        let (units, unit_errors) = UnitRegistry::from_definitions(model.unit_definitions());

        Self {
            ids,
            duplicates,
            units,
            unit_errors,
        }
    }

    /// Reports a reference that does not resolve to an entity of kind `K`.
    pub(crate) fn check_reference<K: Entity>(
        &self,
        report: &mut Report,
        reference: &Reference<K>,
        location: String,
        referenced_by: &str,
    ) {
        if self.ids.kind_of(reference.id()) == Some(K::KIND) {
            return;
        }

        report.add_result(ValidationResult::new(
            location,
            format!(
                "'{}' references {} '{}', which is not defined in the model.",
                referenced_by,
                K::KIND,
                reference
            ),
            Severity::Error,
            Some(referenced_by.to_string()),
            ViolationKind::UnresolvedReference,
        ));
    }

    /// Reports a unit reference that is neither a declared unit definition
    /// nor an SBML base kind.
    pub(crate) fn check_unit(
        &self,
        report: &mut Report,
        unit: &UnitRef,
        location: String,
        referenced_by: &str,
    ) {
        if self.units.is_known(unit.id()) {
            return;
        }

        report.add_result(ValidationResult::new(
            location,
            format!(
                "'{}' references unit '{}', which is neither defined in the model nor an SBML base unit.",
                referenced_by, unit
            ),
            Severity::Error,
            Some(referenced_by.to_string()),
            ViolationKind::UnresolvedReference,
        ));
    }
}

/// The `Report` struct is used to store the results of the validation checks.
///
/// Contains a boolean indicating overall validity and a vector of individual validation results.
/// The model is considered invalid if any validation results have Error severity.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct Report {
    /// Whether the model is valid overall. False if any errors were found.
    pub is_valid: bool,
    /// Vector of individual validation results found during checks.
    pub errors: Vec<ValidationResult>,
}

impl Report {
    /// Creates a new, valid `Report` without results.
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// Adds a validation result to the report.
    ///
    /// If the result has Error severity, marks the overall report as invalid.
    pub fn add_result(&mut self, result: ValidationResult) {
        if result.severity == Severity::Error {
            self.is_valid = false;
        }
        self.errors.push(result);
    }

    /// Appends the results of another report.
    pub fn merge(&mut self, other: Report) {
        for result in other.errors {
            self.add_result(result);
        }
    }

    /// Filters the results by the identifier.
    ///
    /// # Arguments
    ///
    /// * `identifier` - The identifier of the object.
    ///
    /// # Returns
    ///
    /// Returns a vector of `ValidationResult`s with the given identifier.
    pub fn filter_results(&self, identifier: &str) -> Vec<ValidationResult> {
        self.errors
            .iter()
            .filter(|result| result.identifier.as_deref() == Some(identifier))
            .cloned()
            .collect()
    }

    /// Returns all results of the given kind.
    pub fn violations_of(&self, kind: ViolationKind) -> Vec<&ValidationResult> {
        self.errors.iter().filter(|result| result.kind == kind).collect()
    }

    /// Number of results with Error severity.
    pub fn error_count(&self) -> usize {
        self.errors
            .iter()
            .filter(|result| result.severity == Severity::Error)
            .count()
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.errors {
            writeln!(f, "{result}")?;
        }
        Ok(())
    }
}

/// The `ValidationResult` struct represents a single validation issue found during checking.
///
/// Contains the location where the issue was found, a descriptive message, the severity
/// level and the kind of violation.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct ValidationResult {
    /// JSON pointer path to the location of the validation issue
    location: String,
    /// Human readable description of the validation issue
    message: String,
    /// Severity level of the validation issue
    severity: Severity,
    /// The identifier of the object, if any
    identifier: Option<String>,
    /// Category of the validation issue
    kind: ViolationKind,
}

impl ValidationResult {
    /// Creates a new `ValidationResult`.
    ///
    /// # Arguments
    ///
    /// * `location` - The location of the validation issue as a JSON pointer path.
    /// * `message` - A message describing the validation issue.
    /// * `severity` - The severity of the validation issue.
    /// * `identifier` - The identifier of the offending object, if any.
    /// * `kind` - The category of the validation issue.
    pub fn new(
        location: String,
        message: String,
        severity: Severity,
        identifier: Option<String>,
        kind: ViolationKind,
    ) -> Self {
        Self {
            location,
            message,
            severity,
            identifier,
            kind,
        }
    }

    /// JSON pointer path to the offending part of the model, e.g. `/species/0/compartment`.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> &Severity {
        &self.severity
    }

    /// Identifier of the entity the issue belongs to. For unresolved references
    /// this is the referencing entity, not the missing target.
    pub fn identifier(&self) -> &Option<String> {
        &self.identifier
    }

    pub fn kind(&self) -> ViolationKind {
        self.kind
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self.severity {
            Severity::Error => self.message.bold().red(),
            Severity::Warning => self.message.bold().yellow(),
            Severity::Info => self.message.bold().green(),
        };

        let severity = match self.severity {
            Severity::Error => "Error".bold().red(),
            Severity::Warning => "Warning".bold().yellow(),
            Severity::Info => "Info".bold().green(),
        };

        write!(
            f,
            "[{}] {} ({}):\n\t└── {}",
            self.location.bold(),
            severity,
            self.kind,
            message
        )
    }
}

/// Severity levels for validation issues.
///
/// Used to indicate how serious a validation issue is:
/// - Error: The model cannot be exported
/// - Warning: The model may have issues but can be exported
/// - Info: Informational message about potential improvements
#[derive(Debug, Clone, PartialEq, Copy, serde::Serialize, serde::Deserialize)]
pub enum Severity {
    /// Critical issue that blocks export
    Error,
    /// Non-critical issue that should be reviewed
    Warning,
    /// Informational message about potential improvements
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "Error"),
            Severity::Warning => write!(f, "Warning"),
            Severity::Info => write!(f, "Info"),
        }
    }
}

/// Categories of validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// An identifier is declared more than once.
    DuplicateIdentifier,
    /// A reference does not resolve to an entity of the expected kind.
    UnresolvedReference,
    /// A unit definition cannot be composed.
    UnitComposition,
    /// An identifier does not follow the SId syntax.
    InvalidIdentifier,
    /// A rate-law expression cannot be parsed.
    InvalidExpression,
    /// A quantity has no unit.
    MissingUnit,
    /// A unit does not match the unit its quantity requires.
    UnitMismatch,
    /// An SBO term does not follow the `SBO:nnnnnnn` syntax.
    InvalidSboTerm,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViolationKind::DuplicateIdentifier => "duplicate identifier",
            ViolationKind::UnresolvedReference => "unresolved reference",
            ViolationKind::UnitComposition => "unit composition",
            ViolationKind::InvalidIdentifier => "invalid identifier",
            ViolationKind::InvalidExpression => "invalid expression",
            ViolationKind::MissingUnit => "missing unit",
            ViolationKind::UnitMismatch => "unit mismatch",
            ViolationKind::InvalidSboTerm => "invalid SBO term",
        };
        write!(f, "{name}")
    }
}

/// JSON pointer of the entity of kind `kind` at `index` in its collection.
pub(crate) fn pointer(kind: EntityKind, index: usize) -> String {
    format!("/{}/{}", kind.collection(), index)
}
