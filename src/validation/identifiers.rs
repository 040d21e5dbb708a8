use crate::prelude::Model;
use crate::reference::Entity;
use crate::registry::is_valid_sid;
use crate::sbo::is_valid_sbo_term;
use crate::validation::consistency::{
    pointer, Report, Severity, ValidationContext, ValidationResult, ViolationKind,
};

/// Validates identifier syntax and uniqueness, and the syntax of SBO terms.
///
/// Duplicates are reported at the later declaration; the first declaration
/// of an identifier is considered the valid one.
pub fn check_identifiers(model: &Model, context: &ValidationContext, report: &mut Report) {
    if !is_valid_sid(model.id()) {
        report.add_result(invalid_identifier("/id".to_string(), model.id()));
    }

    check_entities(model.unit_definitions(), report);
    check_entities(model.compartments(), report);
    check_entities(model.species(), report);
    check_entities(model.parameters(), report);
    check_entities(model.reactions(), report);

    for duplicate in &context.duplicates {
        report.add_result(ValidationResult::new(
            format!("{}/id", pointer(duplicate.duplicate, duplicate.index)),
            format!(
                "Identifier '{}' of this {} is already used by a {}.",
                duplicate.id, duplicate.duplicate, duplicate.first
            ),
            Severity::Error,
            Some(duplicate.id.clone()),
            ViolationKind::DuplicateIdentifier,
        ));
    }
}

fn check_entities<E: Entity>(entities: &[E], report: &mut Report) {
    for (idx, entity) in entities.iter().enumerate() {
        let location = pointer(E::KIND, idx);

        if !is_valid_sid(entity.id()) {
            report.add_result(invalid_identifier(format!("{location}/id"), entity.id()));
        }

        if let Some(term) = entity.sbo_term() {
            if !is_valid_sbo_term(term) {
                report.add_result(ValidationResult::new(
                    format!("{location}/sbo_term"),
                    format!(
                        "SBO term '{}' of {} '{}' does not match 'SBO:nnnnnnn'.",
                        term,
                        E::KIND,
                        entity.id()
                    ),
                    Severity::Warning,
                    Some(entity.id().to_string()),
                    ViolationKind::InvalidSboTerm,
                ));
            }
        }
    }
}

fn invalid_identifier(location: String, id: &str) -> ValidationResult {
    ValidationResult::new(
        location,
        format!("Identifier '{id}' must start with a letter or underscore and contain only letters, digits and underscores."),
        Severity::Error,
        Some(id.to_string()),
        ViolationKind::InvalidIdentifier,
    )
}
