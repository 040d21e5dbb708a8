#[cfg(test)]
mod test_models {
    use pathwayml::prelude::*;
    use pathwayml::sbo;
    use pretty_assertions::assert_eq;

    fn cytosol() -> Compartment {
        CompartmentBuilder::default()
            .id("c")
            .name("cytosol")
            .value(1.0)
            .sbo_term(sbo::PHYSICAL_COMPARTMENT)
            .to_annotations((Qualifier::BqbIs, "GO:0005829"))
            .build()
            .expect("Failed to build compartment")
    }

    fn species(id: &str, initial: f64) -> Species {
        SpeciesBuilder::default()
            .id(id)
            .compartment("c")
            .initial_concentration(initial)
            .build()
            .expect("Failed to build species")
    }

    fn reaction(id: &str, equation: &str) -> Reaction {
        ReactionBuilder::default()
            .id(id)
            .try_equation(equation)
            .expect("Failed to parse equation")
            .build()
            .expect("Failed to build reaction")
    }

    /// Builds the linear chain S0 -> S1 -> ... -> Sn by appending.
    fn linear_chain(n: usize) -> Model {
        let mut model = ModelBuilder::default()
            .id("chain")
            .to_units(UnitDefinition::new("min"))
            .to_units(UnitDefinition::new("mmole"))
            .to_units(UnitDefinition::composite("mmole_per_min", "mmole/min"))
            .to_units(UnitDefinition::composite("mM", "mmole/liter"))
            .to_compartments(cytosol())
            .to_parameters(
                ParameterBuilder::default()
                    .id("R_Vmax")
                    .value(10.0)
                    .unit("mmole_per_min")
                    .build()
                    .expect("Failed to build parameter"),
            )
            .to_parameters(
                ParameterBuilder::default()
                    .id("R_Km")
                    .value(0.1)
                    .unit("mM")
                    .build()
                    .expect("Failed to build parameter"),
            )
            .to_species(species("S0", 10.0))
            .build()
            .expect("Failed to build model");

        for k in 0..n {
            model
                .add_species(species(&format!("S{}", k + 1), 0.0))
                .expect("Failed to add species");
            model
                .add_reaction(
                    ReactionBuilder::default()
                        .id(format!("R{k}"))
                        .try_equation(format!("S{k} -> S{}", k + 1))
                        .expect("Failed to parse equation")
                        .kinetic_law((format!("R_Vmax * S{k}/(S{k} + R_Km)"), "mmole_per_min"))
                        .build()
                        .expect("Failed to build reaction"),
                )
                .expect("Failed to add reaction");
        }

        model
    }

    #[test]
    fn test_single_species_model() {
        // ARRANGE
        let model = ModelBuilder::default()
            .id("model1")
            .to_compartments(cytosol())
            .to_species(species("glc", 10.0))
            .build()
            .expect("Failed to build model");

        // ACT
        let report = check_consistency(&model);

        // ASSERT
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
        assert_eq!(model.species().len(), 1);
        assert_eq!(model.species()[0].id, "glc");
        assert_eq!(model.species()[0].initial, InitialValue::Concentration(10.0));
    }

    #[test]
    fn test_duplicate_append_leaves_model_unchanged() {
        // ARRANGE
        let mut model = linear_chain(2);
        let snapshot = serde_json::to_value(&model).expect("Failed to serialize model");

        // ACT
        let species_result = model.add_species(species("S1", 5.0));
        let reaction_result = model.add_reaction(reaction("R0", "S2 -> S0"));
        let parameter_result = model.add_parameter(
            ParameterBuilder::default()
                .id("c")
                .value(1.0)
                .build()
                .expect("Failed to build parameter"),
        );

        // ASSERT
        assert!(matches!(
            species_result,
            Err(ModelError::DuplicateIdentifier { ref id, existing: EntityKind::Species }) if id == "S1"
        ));
        assert!(matches!(
            reaction_result,
            Err(ModelError::DuplicateIdentifier { existing: EntityKind::Reaction, .. })
        ));
        assert!(matches!(
            parameter_result,
            Err(ModelError::DuplicateIdentifier { existing: EntityKind::Compartment, .. })
        ));
        assert_eq!(
            serde_json::to_value(&model).expect("Failed to serialize model"),
            snapshot
        );
    }

    #[test]
    fn test_removed_species_is_reported() {
        // ARRANGE
        let mut model = linear_chain(1);
        assert!(check_consistency(&model).is_valid);

        // ACT
        model.remove_species("S1").expect("S1 is part of the model");
        let report = check_consistency(&model);

        // ASSERT
        assert!(!report.is_valid);
        let unresolved = report.violations_of(ViolationKind::UnresolvedReference);
        assert!(!unresolved.is_empty());
        assert_eq!(unresolved[0].location(), "/reactions/0/equation/products/0");
        assert_eq!(unresolved[0].identifier(), &Some("R0".to_string()));
    }

    #[test]
    fn test_linear_chain() {
        // ARRANGE
        let n = 10;

        // ACT
        let model = linear_chain(n);
        let report = check_consistency(&model);

        // ASSERT
        assert!(report.is_valid, "{report}");
        assert!(report.errors.is_empty());
        assert_eq!(model.species().len(), n + 1);
        assert_eq!(model.reactions().len(), n);

        for (k, reaction) in model.reactions().iter().enumerate() {
            assert_eq!(reaction.id, format!("R{k}"));
            assert_eq!(reaction.equation.reactants[0].species, format!("S{k}").as_str());
            assert_eq!(
                reaction.equation.products[0].species,
                format!("S{}", k + 1).as_str()
            );
        }
    }

    #[test]
    fn test_unit_composition_requires_registered_units() {
        // ARRANGE
        let mut without = ModelBuilder::default()
            .id("m")
            .build()
            .expect("Failed to build model");
        let mut with = ModelBuilder::default()
            .id("m")
            .to_units(UnitDefinition::new("mmole"))
            .build()
            .expect("Failed to build model");

        // ACT
        let rejected = without.add_unit_definition(UnitDefinition::composite("mM", "mmole/liter"));
        let accepted = with.add_unit_definition(UnitDefinition::composite("mM", "mmole/liter"));

        // ASSERT
        assert!(matches!(
            rejected,
            Err(ModelError::UnitComposition(UnitError::UnknownUnit { ref reference, .. })) if reference == "mmole"
        ));
        assert!(accepted.is_ok());

        let unit = with.resolve_unit("mM").expect("Failed to resolve mM");
        assert_eq!(unit.base_units.len(), 2);
        assert_eq!(unit.base_units[0].kind, UnitKind::Mole);
        assert_eq!(unit.base_units[0].scale, -3);
        assert_eq!(unit.base_units[1].kind, UnitKind::Litre);
        assert_eq!(unit.base_units[1].exponent, -1);
    }

    #[test]
    fn test_exponent_overflow_is_reported() {
        // ARRANGE
        let model = ModelBuilder::default()
            .id("m")
            .to_units(UnitDefinition::composite("big", "metre^2147483647*metre"))
            .to_units(UnitDefinition::composite("m100", "metre^100"))
            .to_units(UnitDefinition::composite("m10k", "m100^100"))
            .to_units(UnitDefinition::composite("m1m", "m10k^100"))
            .to_units(UnitDefinition::composite("m100m", "m1m^100"))
            .build()
            .expect("Failed to build model");
        let mut appended = model.clone();

        // ACT
        let report = check_consistency(&model);
        let rejected = appended.add_unit_definition(UnitDefinition::composite("huge", "m100m^100"));

        // ASSERT
        let composition = report.violations_of(ViolationKind::UnitComposition);
        assert_eq!(composition.len(), 1);
        assert_eq!(composition[0].location(), "/units/0/definition");

        assert!(matches!(
            rejected,
            Err(ModelError::UnitComposition(UnitError::ExponentOverflow(ref unit))) if unit == "huge"
        ));
        assert_eq!(appended.unit_definitions().len(), model.unit_definitions().len());
        assert!(matches!(
            appended.resolve_unit("m100m^50"),
            Err(ModelError::UnitComposition(UnitError::ExponentOverflow(_)))
        ));
    }

    #[test]
    fn test_annotations_pass_through() {
        // ARRANGE
        let model = ModelBuilder::default()
            .id("annotated")
            .to_annotations((Qualifier::BqmIsDescribedBy, "doi:10.1000/182"))
            .to_compartments(cytosol())
            .build()
            .expect("Failed to build model");

        // ACT
        let json = serde_json::to_string(&model).expect("Failed to serialize model");
        let parsed: Model = serde_json::from_str(&json).expect("Failed to parse model");

        // ASSERT
        assert!(json.contains("\"BQM_IS_DESCRIBED_BY\""));
        assert_eq!(parsed.annotations(), model.annotations());
        assert_eq!(
            parsed.compartments()[0].annotations,
            vec![Annotation::new(Qualifier::BqbIs, "GO:0005829")]
        );
    }
}
