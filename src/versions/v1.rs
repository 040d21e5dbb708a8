//! Serializable data model of a reaction network.
//!
//! All entities are plain value types with `derive_builder` builders. Cross
//! references between entities are typed [`Reference`]s that serialize as
//! bare identifier strings, so a model file stays a flat, readable document.

use derive_builder::Builder;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::equation::ReactionEquation;
use crate::error::ModelError;
use crate::model::ModelIndex;
use crate::reference::{CompartmentRef, Reference, UnitRef};

//
// Type definitions
//
/// The Model is the aggregate root of a reaction network. It owns ordered
/// collections of unit definitions, compartments, species, parameters and
/// reactions together with descriptive metadata. Entities refer to each
/// other exclusively through identifiers.
///
/// Collections are only reachable through accessors; use the `add_*`
/// methods to extend a model after it has been built.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Builder, Default)]
#[builder(build_fn(private, name = "build_unchecked", error = "ModelError"))]
pub struct Model {
    /// Identifier of the model.
    ///
    #[builder(setter(into))]
    pub(crate) id: String,

    /// Human readable name of the model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub(crate) name: Option<String>,

    /// Free-text notes in markdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub(crate) notes: Option<String>,

    /// Unit definitions in declaration order. A composite definition may
    /// only reference units declared before it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_units")))]
    pub(crate) units: Vec<UnitDefinition>,

    /// Model-wide default units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub(crate) model_units: Option<ModelUnits>,

    /// Compartments of the model.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_compartments")))]
    pub(crate) compartments: Vec<Compartment>,

    /// Species of the model.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_species")))]
    pub(crate) species: Vec<Species>,

    /// Global parameters of the model.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_parameters")))]
    pub(crate) parameters: Vec<Parameter>,

    /// Reactions of the model.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_reactions")))]
    pub(crate) reactions: Vec<Reaction>,

    /// Semantic annotations of the model itself.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_annotations", into)))]
    pub(crate) annotations: Vec<Annotation>,

    #[serde(skip)]
    #[builder(setter(skip))]
    pub(crate) state: ModelState,

    /// Registries maintained by the `add_*` methods, built on first append.
    #[serde(skip)]
    #[builder(setter(skip))]
    pub(crate) index: Option<ModelIndex>,
}

impl ModelBuilder {
    /// Builds the model and checks that every identifier is well formed and
    /// unique across all collections.
    ///
    /// # Errors
    ///
    /// * `ModelError::UninitializedField` if the model id was not set.
    /// * `ModelError::InvalidIdentifier` for identifiers violating the SId syntax.
    /// * `ModelError::DuplicateIdentifier` for the first identifier declared twice.
    pub fn build(&self) -> Result<Model, ModelError> {
        let model = self.build_unchecked()?;
        model.check_identifiers()?;
        Ok(model)
    }
}

/// Lifecycle of a model. Export marks a model as `Exported`; the state is
/// informational and is not persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModelState {
    #[default]
    Building,
    Exported,
}

/// A named unit. Without a `definition` the identifier itself is read as a
/// prefixed unit name (`mmole`, `min`). With a definition the unit is
/// composed from previously declared units and SBML base kinds, e.g.
/// `mmole/liter`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Builder, Default, PartialEq)]
pub struct UnitDefinition {
    /// Identifier of the unit definition.
    ///
    #[builder(setter(into))]
    pub id: String,

    /// Common name of the unit definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub name: Option<String>,

    /// Unit expression this unit is composed of.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub definition: Option<String>,
}

impl UnitDefinition {
    /// Creates a primitive unit whose identifier is its own definition.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            definition: None,
        }
    }

    /// Creates a unit composed from other units.
    pub fn composite(id: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            definition: Some(definition.into()),
        }
    }
}

/// Default units applied to quantities that do not carry their own unit.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Builder, Default, PartialEq)]
pub struct ModelUnits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub time: Option<UnitRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub extent: Option<UnitRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub substance: Option<UnitRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub length: Option<UnitRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub area: Option<UnitRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub volume: Option<UnitRef>,
}

impl ModelUnits {
    /// Iterates over the set unit references together with their role.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &UnitRef)> {
        [
            ("time", &self.time),
            ("extent", &self.extent),
            ("substance", &self.substance),
            ("length", &self.length),
            ("area", &self.area),
            ("volume", &self.volume),
        ]
        .into_iter()
        .filter_map(|(role, unit)| unit.as_ref().map(|unit| (role, unit)))
    }
}

/// A bounded region containing species.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Builder, Default, PartialEq)]
pub struct Compartment {
    /// Identifier of the compartment.
    ///
    #[builder(setter(into))]
    pub id: String,

    /// Name of the compartment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub name: Option<String>,

    /// Size of the compartment.
    ///
    #[builder(setter(into))]
    pub value: f64,

    /// Unit of the compartment size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub unit: Option<UnitRef>,

    /// Number of spatial dimensions. Default is 3.
    #[serde(default = "default_dimensions")]
    #[builder(default = "3.0")]
    pub spatial_dimensions: f64,

    /// Whether the size is constant. Default is True.
    #[serde(default = "default_true")]
    #[builder(default = "true")]
    pub constant: bool,

    /// SBO term classifying the compartment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub sbo_term: Option<String>,

    /// Semantic annotations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_annotations", into)))]
    pub annotations: Vec<Annotation>,
}

/// A chemical entity located in exactly one compartment.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Builder, Default, PartialEq)]
pub struct Species {
    /// Identifier of the species.
    ///
    #[builder(setter(into))]
    pub id: String,

    /// Name of the species.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub name: Option<String>,

    /// Compartment the species is located in.
    ///
    #[builder(setter(into))]
    pub compartment: CompartmentRef,

    /// Initial quantity, either an amount or a concentration.
    #[serde(default)]
    #[builder(default)]
    pub initial: InitialValue,

    /// Whether the species quantity is interpreted as an amount in math.
    #[serde(default)]
    #[builder(default)]
    pub has_only_substance_units: bool,

    /// Unit of the substance quantity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub substance_unit: Option<UnitRef>,

    /// Whether the quantity is constant. Default is False.
    #[serde(default)]
    #[builder(default)]
    pub constant: bool,

    /// Whether the quantity is fixed at the boundary of the system.
    #[serde(default)]
    #[builder(default)]
    pub boundary_condition: bool,

    /// SBO term classifying the species.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub sbo_term: Option<String>,

    /// Semantic annotations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_annotations", into)))]
    pub annotations: Vec<Annotation>,
}

/// Initial quantity of a species.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum InitialValue {
    Amount(f64),
    Concentration(f64),
}

impl Default for InitialValue {
    fn default() -> Self {
        InitialValue::Concentration(0.0)
    }
}

impl InitialValue {
    /// The numeric value regardless of its interpretation.
    pub fn value(&self) -> f64 {
        match self {
            InitialValue::Amount(value) | InitialValue::Concentration(value) => *value,
        }
    }
}

/// A named numeric constant.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Builder, Default, PartialEq)]
pub struct Parameter {
    /// Identifier of the parameter.
    ///
    #[builder(setter(into))]
    pub id: String,

    /// Name of the parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub name: Option<String>,

    /// Numerical value of the parameter.
    ///
    #[builder(setter(into))]
    pub value: f64,

    /// Unit of the parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub unit: Option<UnitRef>,

    /// Specifies if this parameter is constant. Default is True.
    #[serde(default = "default_true")]
    #[builder(default = "true")]
    pub constant: bool,

    /// SBO term classifying the parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub sbo_term: Option<String>,

    /// Semantic annotations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_annotations", into)))]
    pub annotations: Vec<Annotation>,
}

/// A directed transformation of reactant species into product species.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Builder, PartialEq)]
pub struct Reaction {
    /// Identifier of the reaction.
    ///
    #[builder(setter(into))]
    pub id: String,

    /// Name of the reaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub name: Option<String>,

    /// Reaction equation, e.g. `2 A + B <-> C [E]`.
    ///
    #[builder(setter(into), try_setter)]
    pub equation: ReactionEquation,

    /// Rate law of the reaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub kinetic_law: Option<KineticLaw>,

    /// Parameters only visible inside the rate law of this reaction.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_local_parameters")))]
    pub local_parameters: Vec<Parameter>,

    /// Compartment the reaction takes place in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub compartment: Option<CompartmentRef>,

    /// SBO term classifying the reaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub sbo_term: Option<String>,

    /// Semantic annotations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_annotations", into)))]
    pub annotations: Vec<Annotation>,
}

impl Reaction {
    /// Whether the reaction equation uses a reversible arrow.
    pub fn reversible(&self) -> bool {
        self.equation.reversible
    }
}

/// Rate-law expression of a reaction together with its unit.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct KineticLaw {
    /// Mathematical expression over species, parameter and compartment ids.
    pub math: String,

    /// Unit of the reaction rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<UnitRef>,
}

impl From<&str> for KineticLaw {
    fn from(math: &str) -> Self {
        KineticLaw {
            math: math.to_string(),
            unit: None,
        }
    }
}

impl From<String> for KineticLaw {
    fn from(math: String) -> Self {
        KineticLaw { math, unit: None }
    }
}

impl<M: Into<String>, U: Into<String>> From<(M, U)> for KineticLaw {
    fn from((math, unit): (M, U)) -> Self {
        KineticLaw {
            math: math.into(),
            unit: Some(Reference::from(unit.into())),
        }
    }
}

/// A (qualifier, resource) pair linking an entity to an external ontology
/// term, e.g. (`BQB_IS`, `GO:0005829`). Annotations are opaque metadata.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Annotation {
    /// Relation between the entity and the resource.
    pub qualifier: Qualifier,

    /// External resource, e.g. `CHEBI:17234` or `ncit/C2831`.
    pub resource: String,
}

impl Annotation {
    pub fn new(qualifier: Qualifier, resource: impl Into<String>) -> Self {
        Self {
            qualifier,
            resource: resource.into(),
        }
    }
}

impl<R: Into<String>> From<(Qualifier, R)> for Annotation {
    fn from((qualifier, resource): (Qualifier, R)) -> Self {
        Annotation::new(qualifier, resource)
    }
}

//
// Enum definitions
//
/// Biology (BQB) and model (BQM) qualifiers of the MIRIAM annotation scheme.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub enum Qualifier {
    #[serde(rename = "BQB_IS")]
    BqbIs,
    #[serde(rename = "BQB_HAS_PART")]
    BqbHasPart,
    #[serde(rename = "BQB_IS_PART_OF")]
    BqbIsPartOf,
    #[serde(rename = "BQB_IS_VERSION_OF")]
    BqbIsVersionOf,
    #[serde(rename = "BQB_HAS_VERSION")]
    BqbHasVersion,
    #[serde(rename = "BQB_IS_HOMOLOG_TO")]
    BqbIsHomologTo,
    #[serde(rename = "BQB_IS_DESCRIBED_BY")]
    BqbIsDescribedBy,
    #[serde(rename = "BQB_IS_ENCODED_BY")]
    BqbIsEncodedBy,
    #[serde(rename = "BQB_ENCODES")]
    BqbEncodes,
    #[serde(rename = "BQB_OCCURS_IN")]
    BqbOccursIn,
    #[serde(rename = "BQB_HAS_PROPERTY")]
    BqbHasProperty,
    #[serde(rename = "BQB_IS_PROPERTY_OF")]
    BqbIsPropertyOf,
    #[serde(rename = "BQB_HAS_TAXON")]
    BqbHasTaxon,
    #[serde(rename = "BQM_IS")]
    BqmIs,
    #[serde(rename = "BQM_IS_DESCRIBED_BY")]
    BqmIsDescribedBy,
    #[serde(rename = "BQM_IS_DERIVED_FROM")]
    BqmIsDerivedFrom,
    #[serde(rename = "BQM_IS_INSTANCE_OF")]
    BqmIsInstanceOf,
    #[serde(rename = "BQM_HAS_INSTANCE")]
    BqmHasInstance,
}

impl std::fmt::Display for Qualifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Qualifier::BqbIs => "BQB_IS",
            Qualifier::BqbHasPart => "BQB_HAS_PART",
            Qualifier::BqbIsPartOf => "BQB_IS_PART_OF",
            Qualifier::BqbIsVersionOf => "BQB_IS_VERSION_OF",
            Qualifier::BqbHasVersion => "BQB_HAS_VERSION",
            Qualifier::BqbIsHomologTo => "BQB_IS_HOMOLOG_TO",
            Qualifier::BqbIsDescribedBy => "BQB_IS_DESCRIBED_BY",
            Qualifier::BqbIsEncodedBy => "BQB_IS_ENCODED_BY",
            Qualifier::BqbEncodes => "BQB_ENCODES",
            Qualifier::BqbOccursIn => "BQB_OCCURS_IN",
            Qualifier::BqbHasProperty => "BQB_HAS_PROPERTY",
            Qualifier::BqbIsPropertyOf => "BQB_IS_PROPERTY_OF",
            Qualifier::BqbHasTaxon => "BQB_HAS_TAXON",
            Qualifier::BqmIs => "BQM_IS",
            Qualifier::BqmIsDescribedBy => "BQM_IS_DESCRIBED_BY",
            Qualifier::BqmIsDerivedFrom => "BQM_IS_DERIVED_FROM",
            Qualifier::BqmIsInstanceOf => "BQM_IS_INSTANCE_OF",
            Qualifier::BqmHasInstance => "BQM_HAS_INSTANCE",
        };
        write!(f, "{name}")
    }
}

fn default_true() -> bool {
    true
}

fn default_dimensions() -> f64 {
    3.0
}
