use crate::prelude::{Model, Parameter};
use crate::validation::consistency::{
    Report, Severity, ValidationContext, ValidationResult, ViolationKind,
};

/// Validates parameters in a model by checking units
///
/// # Arguments
/// * `model` - The model containing parameters to validate
/// * `context` - Registries of the model
/// * `report` - Validation report to add any validation warnings to
///
/// # Details
/// For each parameter in the model, checks if it has a unit defined and whether that
/// unit is known. Adds a warning to the report for any parameters missing units.
pub fn check_parameters(model: &Model, context: &ValidationContext, report: &mut Report) {
    for (param_idx, parameter) in model.parameters().iter().enumerate() {
        check_parameter_units(report, context, parameter, &format!("/parameters/{param_idx}"));
    }
}

/// Validates that a parameter has a known unit
///
/// # Arguments
/// * `report` - Validation report to add any warnings to
/// * `context` - Registries of the model
/// * `parameter` - The parameter to validate
/// * `location` - JSON pointer of the parameter
///
/// # Details
/// Also used for the local parameters of reactions.
pub(crate) fn check_parameter_units(
    report: &mut Report,
    context: &ValidationContext,
    parameter: &Parameter,
    location: &str,
) {
    match &parameter.unit {
        Some(unit) => context.check_unit(report, unit, format!("{location}/unit"), &parameter.id),
        None => {
            let result = ValidationResult::new(
                location.to_string(),
                format!(
                    "Parameter '{}' has no unit. It is advisable to equip parameters with a unit.",
                    parameter.id
                ),
                Severity::Warning,
                Some(parameter.id.clone()),
                ViolationKind::MissingUnit,
            );

            report.add_result(result);
        }
    }
}
