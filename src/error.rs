use derive_builder::UninitializedFieldError;
use thiserror::Error;

use crate::equation::EquationError;
use crate::reference::EntityKind;
use crate::units::error::UnitError;

/// Errors raised while building or extending a model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// An identifier is already used by another entity of the model.
    #[error("Identifier '{id}' is already used by a {existing}")]
    DuplicateIdentifier { id: String, existing: EntityKind },

    /// A reference points at an identifier that is not declared, or that is
    /// declared by an entity of another kind.
    #[error("'{referenced_by}' references {expected} '{id}', which is not defined in the model")]
    UnresolvedReference {
        id: String,
        expected: EntityKind,
        referenced_by: String,
    },

    /// A unit definition could not be resolved.
    #[error("Failed to compose unit: {0}")]
    UnitComposition(#[from] UnitError),

    /// An identifier does not follow the SId syntax.
    #[error("Invalid identifier '{0}': identifiers must match [A-Za-z_][A-Za-z0-9_]*")]
    InvalidIdentifier(String),

    /// A reaction equation could not be parsed.
    #[error("Invalid reaction equation: {0}")]
    InvalidEquation(#[from] EquationError),

    /// A required builder field was not set.
    #[error("Missing field: {0}")]
    UninitializedField(#[from] UninitializedFieldError),
}
