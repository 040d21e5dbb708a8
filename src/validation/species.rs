use crate::prelude::{Model, Species};
use crate::reference::EntityKind;
use crate::validation::consistency::{pointer, Report, ValidationContext};

/// Validates the compartment and substance unit of every species
///
/// # Arguments
/// * `model` - The model containing the species to validate
/// * `context` - Registries of the model
/// * `report` - Validation report to add any errors to
pub fn check_species(model: &Model, context: &ValidationContext, report: &mut Report) {
    for (idx, species) in model.species().iter().enumerate() {
        check_species_references(report, context, species, idx);
    }
}

fn check_species_references(
    report: &mut Report,
    context: &ValidationContext,
    species: &Species,
    idx: usize,
) {
    let location = pointer(EntityKind::Species, idx);

    context.check_reference(
        report,
        &species.compartment,
        format!("{location}/compartment"),
        &species.id,
    );

    if let Some(unit) = &species.substance_unit {
        context.check_unit(
            report,
            unit,
            format!("{location}/substance_unit"),
            &species.id,
        );
    }
}
