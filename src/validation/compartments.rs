use crate::prelude::Model;
use crate::reference::EntityKind;
use crate::validation::consistency::{pointer, Report, ValidationContext};

/// Validates that compartment sizes reference known units.
pub fn check_compartments(model: &Model, context: &ValidationContext, report: &mut Report) {
    for (idx, compartment) in model.compartments().iter().enumerate() {
        if let Some(unit) = &compartment.unit {
            context.check_unit(
                report,
                unit,
                format!("{}/unit", pointer(EntityKind::Compartment, idx)),
                &compartment.id,
            );
        }
    }
}
