use crate::equation::extract_symbols;
use crate::prelude::{Model, Reaction};
use crate::reference::EntityKind;
use crate::validation::consistency::{
    pointer, Report, Severity, ValidationContext, ValidationResult, ViolationKind,
};

/// Validates the rate laws of all reactions
///
/// # Arguments
/// * `model` - The model containing the reactions to validate
/// * `context` - Registries of the model
/// * `report` - Validation report to add any errors to
///
/// # Details
/// Every rate law must parse. Every symbol it uses must be a local parameter
/// of the reaction or a species, compartment, parameter or reaction of the
/// model. The unit of the rate law must be known.
pub fn check_kinetics(model: &Model, context: &ValidationContext, report: &mut Report) {
    for (reaction_idx, reaction) in model.reactions().iter().enumerate() {
        let location = format!(
            "{}/kinetic_law",
            pointer(EntityKind::Reaction, reaction_idx)
        );
        check_rate_law(report, context, reaction, &location);
    }
}

fn check_rate_law(
    report: &mut Report,
    context: &ValidationContext,
    reaction: &Reaction,
    location: &str,
) {
    let Some(kinetic_law) = &reaction.kinetic_law else {
        return;
    };

    if let Some(unit) = &kinetic_law.unit {
        context.check_unit(report, unit, format!("{location}/unit"), &reaction.id);
    }

    let symbols = match extract_symbols(&kinetic_law.math) {
        Ok(symbols) => symbols,
        Err(error) => {
            report.add_result(ValidationResult::new(
                format!("{location}/math"),
                format!(
                    "Rate law '{}' of reaction '{}' cannot be parsed: {}",
                    kinetic_law.math, reaction.id, error
                ),
                Severity::Error,
                Some(reaction.id.clone()),
                ViolationKind::InvalidExpression,
            ));
            return;
        }
    };

    for symbol in symbols {
        let is_local = reaction
            .local_parameters
            .iter()
            .any(|parameter| parameter.id == symbol);

        let is_global = matches!(
            context.ids.kind_of(&symbol),
            Some(
                EntityKind::Species
                    | EntityKind::Compartment
                    | EntityKind::Parameter
                    | EntityKind::Reaction
            )
        );

        if !is_local && !is_global {
            report.add_result(ValidationResult::new(
                format!("{location}/math"),
                format!(
                    "Symbol '{}' in the rate law of reaction '{}' is not defined in the model.",
                    symbol, reaction.id
                ),
                Severity::Error,
                Some(reaction.id.clone()),
                ViolationKind::UnresolvedReference,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    fn model_with(kinetic_law: KineticLaw) -> Model {
        ModelBuilder::default()
            .id("test")
            .to_compartments(
                CompartmentBuilder::default()
                    .id("c")
                    .value(1.0)
                    .build()
                    .expect("Failed to build compartment"),
            )
            .to_species(
                SpeciesBuilder::default()
                    .id("S0")
                    .compartment("c")
                    .build()
                    .expect("Failed to build species"),
            )
            .to_parameters(
                ParameterBuilder::default()
                    .id("Vmax")
                    .value(10.0)
                    .build()
                    .expect("Failed to build parameter"),
            )
            .to_reactions(
                ReactionBuilder::default()
                    .id("R0")
                    .try_equation("S0 ->")
                    .expect("Failed to parse equation")
                    .kinetic_law(kinetic_law)
                    .to_local_parameters(
                        ParameterBuilder::default()
                            .id("Km")
                            .value(0.5)
                            .build()
                            .expect("Failed to build parameter"),
                    )
                    .build()
                    .expect("Failed to build reaction"),
            )
            .build()
            .expect("Failed to build model")
    }

    #[test]
    fn test_resolved_rate_law() {
        let model = model_with(("c * Vmax * S0 / (Km + S0) * exp(-pi)", "katal").into());
        let mut report = Report::new();
        check_kinetics(&model, &ValidationContext::new(&model), &mut report);
        assert!(report.errors.is_empty(), "{report}");
    }

    #[test]
    fn test_undefined_symbols() {
        let model = model_with(("kcat * E * S0", "mM_per_s").into());
        let mut report = Report::new();
        check_kinetics(&model, &ValidationContext::new(&model), &mut report);

        assert_eq!(report.errors.len(), 3);
        assert_eq!(report.errors[0].location(), "/reactions/0/kinetic_law/unit");
        assert_eq!(
            report.filter_results("R0").len(),
            3,
            "all issues belong to the reaction"
        );
    }

    #[test]
    fn test_unparsable_rate_law() {
        let model = model_with("Vmax * (S0".into());
        let mut report = Report::new();
        check_kinetics(&model, &ValidationContext::new(&model), &mut report);

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind(), ViolationKind::InvalidExpression);
    }
}
