//! Operations on the [`Model`] aggregate.
//!
//! A model is built once from its initial collections and then extended
//! with the `add_*` methods, which validate the new entity against the
//! identifier registry before touching the model. A failed append leaves
//! the model exactly as it was.
//!
//! The registries used by the appends are built once and then updated with
//! every appended entity, so extending a model costs time proportional to
//! the new entity only.

use log::{debug, warn};

use crate::error::ModelError;
use crate::prelude::{
    Annotation, Compartment, InitialValue, Model, ModelState, ModelUnits, Parameter, Reaction,
    Species, SpeciesBuilder, UnitDefinition,
};
use crate::reference::{Entity, EntityKind};
use crate::registry::{is_valid_sid, IdRegistry};
use crate::units::registry::{ResolvedUnit, UnitRegistry};

/// Identifier and unit registries of a model.
#[derive(Debug, Clone, Default)]
pub(crate) struct ModelIndex {
    pub(crate) ids: IdRegistry,
    pub(crate) units: UnitRegistry,
}

impl ModelIndex {
    fn new(model: &Model) -> Self {
        Self {
            ids: model.registry(),
            units: model.unit_registry(),
        }
    }
}

impl Model {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn unit_definitions(&self) -> &[UnitDefinition] {
        &self.units
    }

    pub fn model_units(&self) -> Option<&ModelUnits> {
        self.model_units.as_ref()
    }

    pub fn compartments(&self) -> &[Compartment] {
        &self.compartments
    }

    pub fn species(&self) -> &[Species] {
        &self.species
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn state(&self) -> ModelState {
        self.state
    }

    pub fn get_compartment(&self, id: &str) -> Option<&Compartment> {
        self.compartments.iter().find(|c| c.id == id)
    }

    pub fn get_species(&self, id: &str) -> Option<&Species> {
        self.species.iter().find(|s| s.id == id)
    }

    pub fn get_parameter(&self, id: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.id == id)
    }

    pub fn get_reaction(&self, id: &str) -> Option<&Reaction> {
        self.reactions.iter().find(|r| r.id == id)
    }

    /// Builds the identifier registry of the model. Duplicate declarations
    /// are ignored; the first declaration wins.
    pub fn registry(&self) -> IdRegistry {
        IdRegistry::from_model(self).0
    }

    /// Resolves the unit definitions of the model in declaration order.
    pub fn unit_registry(&self) -> UnitRegistry {
        UnitRegistry::from_definitions(&self.units).0
    }

    /// Resolves a unit reference or expression, e.g. `mM` or `mmole/liter`.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnitComposition` if the expression references
    /// units that are neither declared nor SBML base kinds.
    pub fn resolve_unit(&self, expression: &str) -> Result<ResolvedUnit, ModelError> {
        Ok(self.unit_registry().resolve(expression)?)
    }

    /// Appends a unit definition. Composite definitions may only reference
    /// units that are already part of the model.
    ///
    /// # Errors
    ///
    /// * `ModelError::InvalidIdentifier` for malformed identifiers.
    /// * `ModelError::DuplicateIdentifier` if the identifier is taken.
    /// * `ModelError::UnitComposition` if the unit cannot be resolved.
    pub fn add_unit_definition(&mut self, unit: UnitDefinition) -> Result<(), ModelError> {
        let index = self.admit(&unit)?;
        index.units.register(&unit)?;
        index.ids.insert(&unit.id, EntityKind::UnitDefinition)?;

        debug!("Adding unit definition '{}' to model '{}'", unit.id, self.id);
        self.units.push(unit);
        Ok(())
    }

    /// Appends a compartment.
    ///
    /// # Errors
    ///
    /// * `ModelError::InvalidIdentifier` for malformed identifiers.
    /// * `ModelError::DuplicateIdentifier` if the identifier is taken.
    pub fn add_compartment(&mut self, compartment: Compartment) -> Result<(), ModelError> {
        self.admit(&compartment)?
            .ids
            .insert(&compartment.id, EntityKind::Compartment)?;

        debug!("Adding compartment '{}' to model '{}'", compartment.id, self.id);
        self.compartments.push(compartment);
        Ok(())
    }

    /// Appends a species. Its compartment must already be part of the model.
    ///
    /// # Errors
    ///
    /// * `ModelError::InvalidIdentifier` for malformed identifiers.
    /// * `ModelError::DuplicateIdentifier` if the identifier is taken.
    /// * `ModelError::UnresolvedReference` if the compartment is undeclared.
    pub fn add_species(&mut self, species: Species) -> Result<(), ModelError> {
        let index = self.admit(&species)?;
        species.compartment.resolve(&index.ids, &species.id)?;
        index.ids.insert(&species.id, EntityKind::Species)?;

        debug!("Adding species '{}' to model '{}'", species.id, self.id);
        self.species.push(species);
        Ok(())
    }

    /// Appends a global parameter.
    ///
    /// # Errors
    ///
    /// * `ModelError::InvalidIdentifier` for malformed identifiers.
    /// * `ModelError::DuplicateIdentifier` if the identifier is taken.
    pub fn add_parameter(&mut self, parameter: Parameter) -> Result<(), ModelError> {
        self.admit(&parameter)?
            .ids
            .insert(&parameter.id, EntityKind::Parameter)?;

        debug!("Adding parameter '{}' to model '{}'", parameter.id, self.id);
        self.parameters.push(parameter);
        Ok(())
    }

    /// Appends a reaction. Every species named in its equation, including
    /// modifiers, must already be part of the model.
    ///
    /// # Errors
    ///
    /// * `ModelError::InvalidIdentifier` for malformed identifiers.
    /// * `ModelError::DuplicateIdentifier` if the identifier is taken.
    /// * `ModelError::UnresolvedReference` for the first undeclared species.
    pub fn add_reaction(&mut self, reaction: Reaction) -> Result<(), ModelError> {
        let index = self.admit(&reaction)?;
        for species in reaction.equation.species() {
            species.resolve(&index.ids, &reaction.id)?;
        }
        index.ids.insert(&reaction.id, EntityKind::Reaction)?;

        debug!(
            "Adding reaction '{}' ({}) to model '{}'",
            reaction.id, reaction.equation, self.id
        );
        self.reactions.push(reaction);
        Ok(())
    }

    /// Removes a species. Reactions referencing it are kept and will be
    /// reported by the consistency check.
    pub fn remove_species(&mut self, id: &str) -> Option<Species> {
        self.warn_if_exported();
        let idx = self.species.iter().position(|s| s.id == id)?;
        self.index = None;
        Some(self.species.remove(idx))
    }

    /// Removes a reaction.
    pub fn remove_reaction(&mut self, id: &str) -> Option<Reaction> {
        self.warn_if_exported();
        let idx = self.reactions.iter().position(|r| r.id == id)?;
        self.index = None;
        Some(self.reactions.remove(idx))
    }

    /// Marks the model as exported. Later mutations are still possible but
    /// logged, since exported artifacts no longer reflect them.
    pub fn mark_exported(&mut self) {
        self.state = ModelState::Exported;
    }

    /// Checks syntax and uniqueness of every identifier, failing on the
    /// first problem. The consistency check reports all of them instead.
    pub(crate) fn check_identifiers(&self) -> Result<(), ModelError> {
        if !is_valid_sid(&self.id) {
            return Err(ModelError::InvalidIdentifier(self.id.clone()));
        }

        let mut ids = self
            .units
            .iter()
            .map(Entity::id)
            .chain(self.compartments.iter().map(Entity::id))
            .chain(self.species.iter().map(Entity::id))
            .chain(self.parameters.iter().map(Entity::id))
            .chain(self.reactions.iter().map(Entity::id));

        if let Some(invalid) = ids.find(|id| !is_valid_sid(id)) {
            return Err(ModelError::InvalidIdentifier(invalid.to_string()));
        }

        let (registry, duplicates) = IdRegistry::from_model(self);
        match duplicates.into_iter().next() {
            Some(duplicate) => Err(ModelError::DuplicateIdentifier {
                id: duplicate.id,
                existing: duplicate.first,
            }),
            None => {
                debug!(
                    "Built model '{}' with {} identifiers",
                    self.id,
                    registry.len()
                );
                Ok(())
            }
        }
    }

    /// Validates the identifier of a new entity and returns the registries
    /// for further reference checks. The caller registers the entity once
    /// all of its checks passed.
    fn admit<E: Entity>(&mut self, entity: &E) -> Result<&mut ModelIndex, ModelError> {
        self.warn_if_exported();

        if !is_valid_sid(entity.id()) {
            return Err(ModelError::InvalidIdentifier(entity.id().to_string()));
        }

        let index = self.index();
        if let Some(existing) = index.ids.kind_of(entity.id()) {
            return Err(ModelError::DuplicateIdentifier {
                id: entity.id().to_string(),
                existing,
            });
        }

        Ok(index)
    }

    fn index(&mut self) -> &mut ModelIndex {
        let index = match self.index.take() {
            Some(index) => index,
            None => ModelIndex::new(self),
        };
        self.index.insert(index)
    }

    fn warn_if_exported(&self) {
        if self.state == ModelState::Exported {
            warn!(
                "Model '{}' is modified after export; exported files do not reflect this change",
                self.id
            );
        }
    }
}

impl SpeciesBuilder {
    /// Sets the initial quantity as a concentration.
    pub fn initial_concentration(&mut self, value: f64) -> &mut Self {
        self.initial(InitialValue::Concentration(value))
    }

    /// Sets the initial quantity as an amount.
    pub fn initial_amount(&mut self, value: f64) -> &mut Self {
        self.initial(InitialValue::Amount(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    fn base_model() -> Model {
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
                    .initial_concentration(10.0)
                    .build()
                    .expect("Failed to build species"),
            )
            .build()
            .expect("Failed to build model")
    }

    fn species(id: &str) -> Species {
        SpeciesBuilder::default()
            .id(id)
            .compartment("c")
            .build()
            .expect("Failed to build species")
    }

    #[test]
    fn test_build_rejects_duplicates() {
        let result = ModelBuilder::default()
            .id("test")
            .to_compartments(
                CompartmentBuilder::default()
                    .id("c")
                    .value(1.0)
                    .build()
                    .expect("Failed to build compartment"),
            )
            .to_species(species("glc"))
            .to_species(species("glc"))
            .build();

        assert!(matches!(
            result,
            Err(ModelError::DuplicateIdentifier { ref id, existing: EntityKind::Species }) if id == "glc"
        ));
    }

    #[test]
    fn test_build_rejects_invalid_identifier() {
        let result = ModelBuilder::default()
            .id("test")
            .to_parameters(
                ParameterBuilder::default()
                    .id("k-1")
                    .value(1.0)
                    .build()
                    .expect("Failed to build parameter"),
            )
            .build();

        assert!(matches!(result, Err(ModelError::InvalidIdentifier(ref id)) if id == "k-1"));
    }

    #[test]
    fn test_build_requires_id() {
        let result = ModelBuilder::default().build();
        assert!(matches!(result, Err(ModelError::UninitializedField(_))));
    }

    #[test]
    fn test_add_species_duplicate_leaves_model_unchanged() {
        let mut model = base_model();
        let before = model.species().to_vec();

        let result = model.add_species(species("S0"));
        assert!(matches!(result, Err(ModelError::DuplicateIdentifier { .. })));
        assert_eq!(model.species(), before.as_slice());

        // Identifiers are unique across collections
        let result = model.add_species(species("c"));
        assert!(matches!(
            result,
            Err(ModelError::DuplicateIdentifier {
                existing: EntityKind::Compartment,
                ..
            })
        ));
        assert_eq!(model.species().len(), 1);
    }

    #[test]
    fn test_add_species_with_unknown_compartment() {
        let mut model = base_model();
        let orphan = SpeciesBuilder::default()
            .id("S1")
            .compartment("nucleus")
            .build()
            .expect("Failed to build species");

        let result = model.add_species(orphan);
        assert!(matches!(
            result,
            Err(ModelError::UnresolvedReference { ref id, expected: EntityKind::Compartment, .. }) if id == "nucleus"
        ));
        assert_eq!(model.species().len(), 1);
    }

    #[test]
    fn test_add_reaction_with_unknown_species() {
        let mut model = base_model();
        let reaction = ReactionBuilder::default()
            .id("R0")
            .try_equation("S0 -> S1")
            .expect("Failed to parse equation")
            .build()
            .expect("Failed to build reaction");

        let result = model.add_reaction(reaction.clone());
        assert!(matches!(
            result,
            Err(ModelError::UnresolvedReference { ref id, .. }) if id == "S1"
        ));
        assert!(model.reactions().is_empty());

        model.add_species(species("S1")).expect("Failed to add S1");
        model.add_reaction(reaction).expect("Failed to add R0");
        assert_eq!(model.reactions().len(), 1);
        assert!(model.get_reaction("R0").is_some());
    }

    #[test]
    fn test_add_reaction_checks_modifiers() {
        let mut model = base_model();
        model.add_species(species("S1")).expect("Failed to add S1");
        let reaction = ReactionBuilder::default()
            .id("R0")
            .try_equation("S0 -> S1 [E]")
            .expect("Failed to parse equation")
            .build()
            .expect("Failed to build reaction");

        assert!(matches!(
            model.add_reaction(reaction),
            Err(ModelError::UnresolvedReference { ref id, .. }) if id == "E"
        ));
    }

    #[test]
    fn test_add_unit_definitions_in_order() {
        let mut model = base_model();

        let result = model.add_unit_definition(UnitDefinition::composite("mM", "mmole/liter"));
        assert!(matches!(result, Err(ModelError::UnitComposition(_))));
        assert!(model.unit_definitions().is_empty());

        model
            .add_unit_definition(UnitDefinition::new("mmole"))
            .expect("Failed to add mmole");
        model
            .add_unit_definition(UnitDefinition::composite("mM", "mmole/liter"))
            .expect("Failed to add mM");

        assert_eq!(model.unit_definitions().len(), 2);
        assert!(model.resolve_unit("mM").is_ok());
        assert!(model.resolve_unit("mM/min").is_err());
    }

    #[test]
    fn test_remove_species() {
        let mut model = base_model();
        assert!(model.remove_species("S0").is_some());
        assert!(model.remove_species("S0").is_none());
        assert!(model.species().is_empty());
    }

    #[test]
    fn test_mutation_after_export_is_allowed() {
        let mut model = base_model();
        model.mark_exported();
        assert_eq!(model.state(), ModelState::Exported);

        model.add_species(species("S1")).expect("Failed to add S1");
        assert_eq!(model.species().len(), 2);
    }

    #[test]
    fn test_index_follows_appends_and_removals() {
        let mut model = base_model();
        model.add_species(species("S1")).expect("Failed to add S1");
        model
            .add_unit_definition(UnitDefinition::new("mmole"))
            .expect("Failed to add mmole");
        model
            .add_unit_definition(UnitDefinition::composite("mM", "mmole/liter"))
            .expect("Failed to add mM");

        let index = model.index.as_ref().expect("Index is built by the first append");
        assert_eq!(index.ids.len(), model.registry().len());
        assert!(index.ids.is_species("S1"));
        assert!(index.units.get("mM").is_some());

        // A failed append does not register anything
        assert!(model
            .add_unit_definition(UnitDefinition::composite("mM_per_s", "mM/sec"))
            .is_err());
        assert!(model.add_species(species("mM_per_s")).is_ok());

        // Removal frees the identifier again
        model.remove_species("S1").expect("S1 is part of the model");
        assert!(model.index.is_none());
        model.add_species(species("S1")).expect("Failed to re-add S1");
        assert_eq!(model.species().len(), 3);
    }
}
