use crate::prelude::{Compartment, Model, ModelUnits, UnitRef};
use crate::reference::EntityKind;
use crate::units::registry::ResolvedUnit;
use crate::validation::consistency::{
    pointer, Report, Severity, ValidationContext, ValidationResult, ViolationKind,
};

/// Validates that every quantity of the model carries a consistent unit
///
/// # Arguments
/// * `model` - The model to validate
/// * `context` - Registries of the model
/// * `report` - Validation report to add any warnings to
///
/// # Details
/// Compartments without a unit fall back to the model unit matching their
/// spatial dimensions, species to the model substance unit and rate laws to
/// model extent per model time. A rate law with its own unit must be
/// equivalent to extent per time.
pub fn check_dimensions(model: &Model, context: &ValidationContext, report: &mut Report) {
    let defaults = model.model_units().cloned().unwrap_or_default();

    for (idx, compartment) in model.compartments().iter().enumerate() {
        if !has_size_unit(&defaults, compartment) {
            report.add_result(missing_unit(
                pointer(EntityKind::Compartment, idx),
                format!(
                    "Compartment '{}' has no unit and the model defines no default unit for its size.",
                    compartment.id
                ),
                &compartment.id,
            ));
        }
    }

    for (idx, species) in model.species().iter().enumerate() {
        if species.substance_unit.is_none() && defaults.substance.is_none() {
            report.add_result(missing_unit(
                pointer(EntityKind::Species, idx),
                format!(
                    "Species '{}' has no substance unit and the model defines no default substance unit.",
                    species.id
                ),
                &species.id,
            ));
        }
    }

    check_rate_law_units(model, context, &defaults, report);
}

fn check_rate_law_units(
    model: &Model,
    context: &ValidationContext,
    defaults: &ModelUnits,
    report: &mut Report,
) {
    if model.reactions().iter().all(|r| r.kinetic_law.is_none()) {
        return;
    }

    let (Some(extent), Some(time)) = (&defaults.extent, &defaults.time) else {
        report.add_result(missing_unit(
            "/model_units".to_string(),
            format!(
                "Model '{}' defines no extent and time units, so the units of its rate laws cannot be checked.",
                model.id()
            ),
            model.id(),
        ));
        return;
    };

    let Some(expected) = per_time(context, extent, time) else {
        return;
    };

    for (idx, reaction) in model.reactions().iter().enumerate() {
        let Some(unit) = reaction
            .kinetic_law
            .as_ref()
            .and_then(|kinetic_law| kinetic_law.unit.as_ref())
        else {
            continue;
        };

        // Unknown or broken units are reported by the consistency check
        let Some(actual) = context.units.get(unit.id()) else {
            continue;
        };

        if !actual.is_equivalent(&expected) {
            report.add_result(ValidationResult::new(
                format!("{}/kinetic_law/unit", pointer(EntityKind::Reaction, idx)),
                format!(
                    "Rate law of reaction '{}' is given in '{}' ({}), but the model requires {} per {} ({}).",
                    reaction.id, unit, actual, extent, time, expected
                ),
                Severity::Warning,
                Some(reaction.id.clone()),
                ViolationKind::UnitMismatch,
            ));
        }
    }
}

fn has_size_unit(defaults: &ModelUnits, compartment: &Compartment) -> bool {
    if compartment.unit.is_some() {
        return true;
    }

    let default = match compartment.spatial_dimensions {
        d if d == 0.0 => return true,
        d if d == 1.0 => &defaults.length,
        d if d == 2.0 => &defaults.area,
        _ => &defaults.volume,
    };
    default.is_some()
}

fn per_time(context: &ValidationContext, extent: &UnitRef, time: &UnitRef) -> Option<ResolvedUnit> {
    let extent = context.units.get(extent.id())?;
    let time = context.units.get(time.id())?;
    extent.checked_multiply(&time.checked_powi(-1)?)
}

fn missing_unit(location: String, message: String, identifier: &str) -> ValidationResult {
    ValidationResult::new(
        location,
        message,
        Severity::Warning,
        Some(identifier.to_string()),
        ViolationKind::MissingUnit,
    )
}
