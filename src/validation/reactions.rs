use std::collections::HashSet;

use crate::prelude::{Model, Reaction};
use crate::reference::EntityKind;
use crate::registry::is_valid_sid;
use crate::validation::consistency::{
    pointer, Report, Severity, ValidationContext, ValidationResult, ViolationKind,
};
use crate::validation::parameters::check_parameter_units;

/// Validates reaction equations, reaction compartments and local parameters.
pub fn check_reactions(model: &Model, context: &ValidationContext, report: &mut Report) {
    for (reaction_idx, reaction) in model.reactions().iter().enumerate() {
        let location = pointer(EntityKind::Reaction, reaction_idx);
        check_reaction_species(report, context, reaction, &location);
        check_local_parameters(report, context, reaction, &location);

        if let Some(compartment) = &reaction.compartment {
            context.check_reference(
                report,
                compartment,
                format!("{location}/compartment"),
                &reaction.id,
            );
        }
    }
}

fn check_reaction_species(
    report: &mut Report,
    context: &ValidationContext,
    reaction: &Reaction,
    location: &str,
) {
    for (suffix, species) in reaction.equation.located_species() {
        context.check_reference(report, species, format!("{location}/{suffix}"), &reaction.id);
    }
}

/// Local parameters live in the scope of their reaction. They may shadow
/// global identifiers but must be unique among themselves.
fn check_local_parameters(
    report: &mut Report,
    context: &ValidationContext,
    reaction: &Reaction,
    location: &str,
) {
    let mut seen = HashSet::new();

    for (idx, parameter) in reaction.local_parameters.iter().enumerate() {
        let param_location = format!("{location}/local_parameters/{idx}");

        if !is_valid_sid(&parameter.id) {
            report.add_result(ValidationResult::new(
                format!("{param_location}/id"),
                format!(
                    "Local parameter '{}' of reaction '{}' is not a valid identifier.",
                    parameter.id, reaction.id
                ),
                Severity::Error,
                Some(reaction.id.clone()),
                ViolationKind::InvalidIdentifier,
            ));
        }

        if !seen.insert(parameter.id.as_str()) {
            report.add_result(ValidationResult::new(
                format!("{param_location}/id"),
                format!(
                    "Local parameter '{}' is declared more than once in reaction '{}'.",
                    parameter.id, reaction.id
                ),
                Severity::Error,
                Some(reaction.id.clone()),
                ViolationKind::DuplicateIdentifier,
            ));
        }

        check_parameter_units(report, context, parameter, &param_location);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    fn model_with(reaction: Reaction) -> Model {
        Model {
            id: "test".to_string(),
            compartments: vec![CompartmentBuilder::default()
                .id("c")
                .value(1.0)
                .build()
                .expect("Failed to build compartment")],
            species: vec![
                SpeciesBuilder::default()
                    .id("S0")
                    .compartment("c")
                    .build()
                    .expect("Failed to build species"),
                SpeciesBuilder::default()
                    .id("S1")
                    .compartment("c")
                    .build()
                    .expect("Failed to build species"),
            ],
            reactions: vec![reaction],
            ..Default::default()
        }
    }

    #[test]
    fn test_undefined_species_in_equation() {
        let reaction = ReactionBuilder::default()
            .id("R0")
            .try_equation("S0 + S2 -> S1 [E]")
            .expect("Failed to parse equation")
            .compartment("cell")
            .build()
            .expect("Failed to build reaction");
        let model = model_with(reaction);

        let mut report = Report::new();
        check_reactions(&model, &ValidationContext::new(&model), &mut report);

        let locations = report
            .errors
            .iter()
            .map(|result| result.location())
            .collect::<Vec<_>>();
        assert_eq!(
            locations,
            vec![
                "/reactions/0/equation/reactants/1",
                "/reactions/0/equation/modifiers/0",
                "/reactions/0/compartment",
            ]
        );
        assert!(report
            .errors
            .iter()
            .all(|result| result.identifier() == &Some("R0".to_string())));
    }

    #[test]
    fn test_duplicate_local_parameters() {
        let k = ParameterBuilder::default()
            .id("k")
            .value(1.0)
            .unit("second")
            .build()
            .expect("Failed to build parameter");
        let reaction = ReactionBuilder::default()
            .id("R0")
            .try_equation("S0 -> S1")
            .expect("Failed to parse equation")
            .to_local_parameters(k.clone())
            .to_local_parameters(k)
            .build()
            .expect("Failed to build reaction");
        let model = model_with(reaction);

        let mut report = Report::new();
        check_reactions(&model, &ValidationContext::new(&model), &mut report);

        assert_eq!(report.errors.len(), 1);
        assert_eq!(
            report.errors[0].location(),
            "/reactions/0/local_parameters/1/id"
        );
        assert_eq!(report.errors[0].kind(), ViolationKind::DuplicateIdentifier);
    }
}
