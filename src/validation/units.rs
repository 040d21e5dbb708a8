use crate::prelude::Model;
use crate::reference::EntityKind;
use crate::units::error::UnitError;
use crate::validation::consistency::{
    pointer, Report, Severity, ValidationContext, ValidationResult, ViolationKind,
};

/// Validates unit definitions and the model-wide default units
///
/// # Arguments
/// * `model` - The model containing the unit definitions to validate
/// * `context` - Registries of the model
/// * `report` - Validation report to add any errors to
///
/// # Details
/// Every unit definition that could not be composed from SBML base kinds and
/// previously declared units is reported, as is every model unit that does
/// not reference a known unit.
pub fn check_units(model: &Model, context: &ValidationContext, report: &mut Report) {
    for (idx, error) in &context.unit_errors {
        let unit = &model.unit_definitions()[*idx];
        let field = match error {
            UnitError::UnknownPrimitive(_) => "id",
            _ => "definition",
        };

        report.add_result(ValidationResult::new(
            format!("{}/{}", pointer(EntityKind::UnitDefinition, *idx), field),
            error.to_string(),
            Severity::Error,
            Some(unit.id.clone()),
            ViolationKind::UnitComposition,
        ));
    }

    if let Some(model_units) = model.model_units() {
        for (role, unit) in model_units.iter() {
            context.check_unit(report, unit, format!("/model_units/{role}"), model.id());
        }
    }
}
