//! Typed identifier references.
//!
//! A species points at its compartment, a reaction at its participants and
//! quantities at their units. Instead of raw strings these links are
//! [`Reference`]s tagged with the kind of entity they must resolve to. On
//! the wire they are plain identifier strings.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ModelError;
use crate::prelude::{Annotation, Compartment, Parameter, Reaction, Species, UnitDefinition};
use crate::registry::IdRegistry;

/// Reference to a compartment.
pub type CompartmentRef = Reference<Compartment>;
/// Reference to a species.
pub type SpeciesRef = Reference<Species>;
/// Reference to a parameter.
pub type ParameterRef = Reference<Parameter>;
/// Reference to a declared unit definition or an SBML base unit kind.
pub type UnitRef = Reference<UnitDefinition>;

/// The kinds of entities that share the identifier namespace of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    UnitDefinition,
    Compartment,
    Species,
    Parameter,
    Reaction,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::UnitDefinition => write!(f, "unit definition"),
            EntityKind::Compartment => write!(f, "compartment"),
            EntityKind::Species => write!(f, "species"),
            EntityKind::Parameter => write!(f, "parameter"),
            EntityKind::Reaction => write!(f, "reaction"),
        }
    }
}

impl EntityKind {
    /// Name of the model collection holding entities of this kind, as used
    /// in JSON pointers.
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::UnitDefinition => "units",
            EntityKind::Compartment => "compartments",
            EntityKind::Species => "species",
            EntityKind::Parameter => "parameters",
            EntityKind::Reaction => "reactions",
        }
    }
}

/// Common view on every identifiable entity of a model.
pub trait Entity {
    /// Kind under which the entity is registered.
    const KIND: EntityKind;

    /// Identifier of the entity.
    fn id(&self) -> &str;

    /// SBO term, if any.
    fn sbo_term(&self) -> Option<&str> {
        None
    }

    /// Semantic annotations in declaration order.
    fn annotations(&self) -> &[Annotation] {
        &[]
    }
}

impl Entity for UnitDefinition {
    const KIND: EntityKind = EntityKind::UnitDefinition;

    fn id(&self) -> &str {
        &self.id
    }
}

macro_rules! annotated_entity {
    ($entity:ty, $kind:expr) => {
        impl Entity for $entity {
            const KIND: EntityKind = $kind;

            fn id(&self) -> &str {
                &self.id
            }

            fn sbo_term(&self) -> Option<&str> {
                self.sbo_term.as_deref()
            }

            fn annotations(&self) -> &[Annotation] {
                &self.annotations
            }
        }
    };
}

annotated_entity!(Compartment, EntityKind::Compartment);
annotated_entity!(Species, EntityKind::Species);
annotated_entity!(Parameter, EntityKind::Parameter);
annotated_entity!(Reaction, EntityKind::Reaction);

/// An identifier that must resolve to an entity of kind `K`.
pub struct Reference<K> {
    id: String,
    kind: PhantomData<fn() -> K>,
}

impl<K> Reference<K> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: PhantomData,
        }
    }

    /// The referenced identifier.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl<K: Entity> Reference<K> {
    /// Looks the reference up in the registry.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnresolvedReference` if the identifier is not
    /// registered or belongs to an entity of another kind.
    pub fn resolve(&self, registry: &IdRegistry, referenced_by: &str) -> Result<(), ModelError> {
        match registry.kind_of(&self.id) {
            Some(kind) if kind == K::KIND => Ok(()),
            _ => Err(ModelError::UnresolvedReference {
                id: self.id.clone(),
                expected: K::KIND,
                referenced_by: referenced_by.to_string(),
            }),
        }
    }
}

impl<K> Clone for Reference<K> {
    fn clone(&self) -> Self {
        Self::new(self.id.clone())
    }
}

impl<K> fmt::Debug for Reference<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Reference").field(&self.id).finish()
    }
}

impl<K> fmt::Display for Reference<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<K> Default for Reference<K> {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl<K> PartialEq for Reference<K> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<K> Eq for Reference<K> {}

impl<K> PartialEq<str> for Reference<K> {
    fn eq(&self, other: &str) -> bool {
        self.id == other
    }
}

impl<K> PartialEq<&str> for Reference<K> {
    fn eq(&self, other: &&str) -> bool {
        self.id == *other
    }
}

impl<K> Hash for Reference<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<K> AsRef<str> for Reference<K> {
    fn as_ref(&self) -> &str {
        &self.id
    }
}

impl<K> From<&str> for Reference<K> {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl<K> From<String> for Reference<K> {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl<K> From<&String> for Reference<K> {
    fn from(id: &String) -> Self {
        Self::new(id.as_str())
    }
}

impl<K> Serialize for Reference<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.id)
    }
}

impl<'de, K> Deserialize<'de> for Reference<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

impl<K> JsonSchema for Reference<K> {
    fn is_referenceable() -> bool {
        false
    }

    fn schema_name() -> String {
        "Reference".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_serializes_as_string() {
        let reference: CompartmentRef = "c".into();
        let json = serde_json::to_string(&reference).expect("Failed to serialize reference");
        assert_eq!(json, "\"c\"");

        let parsed: SpeciesRef = serde_json::from_str("\"glc\"").expect("Failed to parse");
        assert_eq!(parsed, "glc");
    }

    #[test]
    fn test_reference_resolves_by_kind() {
        let mut registry = IdRegistry::default();
        registry
            .insert("c", EntityKind::Compartment)
            .expect("Failed to register compartment");

        let compartment: CompartmentRef = "c".into();
        assert!(compartment.resolve(&registry, "glc").is_ok());

        // Same identifier, wrong kind
        let species: SpeciesRef = "c".into();
        assert!(matches!(
            species.resolve(&registry, "R0"),
            Err(ModelError::UnresolvedReference { .. })
        ));
    }
}
