//! Identifier registry of a model.
//!
//! All compartments, species, parameters, reactions and unit definitions of
//! a model share one identifier namespace. The registry maps every declared
//! identifier to the kind of entity that declared it.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ModelError;
use crate::prelude::Model;
use crate::reference::{Entity, EntityKind};

lazy_static! {
    static ref SID_PATTERN: Regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("SId pattern is a valid regex");
}

/// Checks the SBML `SId` syntax: a letter or underscore followed by letters,
/// digits and underscores.
pub fn is_valid_sid(id: &str) -> bool {
    SID_PATTERN.is_match(id)
}

/// An identifier that was declared more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub id: String,
    /// Kind of the entity that registered the identifier first.
    pub first: EntityKind,
    /// Kind of the entity that tried to register it again.
    pub duplicate: EntityKind,
    /// Position of the duplicate within its own collection.
    pub index: usize,
}

/// Maps identifiers to the kind of entity declaring them.
#[derive(Debug, Clone, Default)]
pub struct IdRegistry {
    entries: HashMap<String, EntityKind>,
}

impl IdRegistry {
    /// Builds the registry of a model.
    ///
    /// Entities are registered collection by collection in the order unit
    /// definitions, compartments, species, parameters, reactions. The first
    /// declaration of an identifier wins; every later one is returned as a
    /// [`Duplicate`].
    pub fn from_model(model: &Model) -> (Self, Vec<Duplicate>) {
        let mut registry = IdRegistry::default();
        let mut duplicates = Vec::new();

        registry.register_all(&model.units, &mut duplicates);
        registry.register_all(&model.compartments, &mut duplicates);
        registry.register_all(&model.species, &mut duplicates);
        registry.register_all(&model.parameters, &mut duplicates);
        registry.register_all(&model.reactions, &mut duplicates);

        (registry, duplicates)
    }

    fn register_all<E: Entity>(&mut self, entities: &[E], duplicates: &mut Vec<Duplicate>) {
        for (index, entity) in entities.iter().enumerate() {
            if let Err(first) = self.try_register(entity.id(), E::KIND) {
                duplicates.push(Duplicate {
                    id: entity.id().to_string(),
                    first,
                    duplicate: E::KIND,
                    index,
                });
            }
        }
    }

    fn try_register(&mut self, id: &str, kind: EntityKind) -> Result<(), EntityKind> {
        match self.entries.get(id) {
            Some(existing) => Err(*existing),
            None => {
                self.entries.insert(id.to_string(), kind);
                Ok(())
            }
        }
    }

    /// Registers a single identifier.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::DuplicateIdentifier` if the identifier is taken.
    pub fn insert(&mut self, id: &str, kind: EntityKind) -> Result<(), ModelError> {
        self.try_register(id, kind)
            .map_err(|existing| ModelError::DuplicateIdentifier {
                id: id.to_string(),
                existing,
            })
    }

    /// Kind of the entity registered under `id`.
    pub fn kind_of(&self, id: &str) -> Option<EntityKind> {
        self.entries.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Whether `id` names a species.
    pub fn is_species(&self, id: &str) -> bool {
        self.kind_of(id) == Some(EntityKind::Species)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn test_sid_syntax() {
        assert!(is_valid_sid("glc"));
        assert!(is_valid_sid("_S1"));
        assert!(is_valid_sid("R_Vmax"));
        assert!(!is_valid_sid("1S"));
        assert!(!is_valid_sid("S-1"));
        assert!(!is_valid_sid(""));
    }

    #[test]
    fn test_duplicates_across_collections() {
        let model = Model {
            id: "m".to_string(),
            compartments: vec![CompartmentBuilder::default()
                .id("x")
                .value(1.0)
                .build()
                .expect("Failed to build compartment")],
            species: vec![SpeciesBuilder::default()
                .id("x")
                .compartment("x")
                .build()
                .expect("Failed to build species")],
            ..Default::default()
        };

        let (registry, duplicates) = IdRegistry::from_model(&model);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.kind_of("x"), Some(EntityKind::Compartment));
        assert_eq!(
            duplicates,
            vec![Duplicate {
                id: "x".to_string(),
                first: EntityKind::Compartment,
                duplicate: EntityKind::Species,
                index: 0,
            }]
        );
    }

    #[test]
    fn test_insert_rejects_taken_identifier() {
        let mut registry = IdRegistry::default();
        registry
            .insert("S0", EntityKind::Species)
            .expect("Failed to register species");
        let result = registry.insert("S0", EntityKind::Reaction);
        assert!(matches!(
            result,
            Err(ModelError::DuplicateIdentifier {
                existing: EntityKind::Species,
                ..
            })
        ));
        assert!(registry.is_species("S0"));
    }
}
