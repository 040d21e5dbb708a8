//! PathwayML Rust Library
//!
//! This library provides an in-memory representation of biochemical reaction
//! networks, including:
//! - Building models of compartments, species, parameters and reactions
//! - Typed, identifier-based cross references between entities
//! - Composing units from SBML base kinds and declared unit definitions
//! - Checking models for consistency before export
//! - Exporting models through pluggable serializers, simulators and archivers

#![warn(unused_imports)]

pub mod versions {
    pub use crate::versions::v1 as latest;
    pub mod v1;
}

/// Commonly used types and functionality re-exported for convenience
pub mod prelude {
    pub use crate::equation::*;
    pub use crate::error::*;
    pub use crate::export::archive::*;
    pub use crate::export::collaborators::*;
    pub use crate::export::error::*;
    pub use crate::export::factory::*;
    pub use crate::export::json::*;
    pub use crate::io::*;
    pub use crate::reference::*;
    pub use crate::units::error::*;
    pub use crate::units::kinds::*;
    pub use crate::units::registry::*;
    pub use crate::validation::consistency::*;
    pub use crate::versions::latest::*;
}

/// Reaction equations and rate-law symbol extraction
pub mod equation;

/// Errors raised while building or extending models
pub mod error;

/// Operations on the model aggregate
pub mod model;

/// Typed identifier references
pub mod reference;

/// Identifier namespace of a model
pub mod registry;

/// Systems Biology Ontology terms
pub mod sbo;

/// Unit kinds, unit expressions and unit resolution
pub mod units {
    pub use crate::units::registry::{BaseUnit, ResolvedUnit, UnitRegistry};

    pub mod error;
    /// Unit expression grammar
    pub mod expression;
    /// SBML base unit kinds
    pub mod kinds;
    /// Unit name and prefix tables
    pub mod maps;
    pub mod registry;
}

/// Validation of models
pub mod validation {
    pub use crate::validation::schema::*;
    /// Main consistency interface
    pub mod consistency;
    /// Validation of compartment references
    mod compartments;
    /// Unit consistency of quantities and rate laws
    mod dimensions;
    /// Validation of identifier syntax, uniqueness and SBO terms
    mod identifiers;
    /// Validation of rate laws
    mod kinetics;
    /// Validation of global parameters
    mod parameters;
    /// Validation of reaction equations and local parameters
    mod reactions;
    /// Main schema validation interface
    pub mod schema;
    /// Validation of species references
    mod species;
    /// Validation of unit definitions and model units
    mod units;
}

/// Export of models through external collaborators
pub mod export {
    /// Built-in directory archiver
    pub mod archive;
    /// Contracts of serializers, simulators, visualizers and archivers
    pub mod collaborators;
    pub mod error;
    /// Export pipeline of a model
    pub mod factory;
    /// Built-in JSON serializer
    pub mod json;
}

/// Table rendering of models
pub mod info;

/// IO functionality
pub mod io;
