use thiserror::Error;

/// Errors raised while composing or resolving units.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UnitError {
    /// A unit expression references a name that is neither a declared unit
    /// nor an SBML base kind.
    #[error("Unit '{unit}' references unknown unit '{reference}'")]
    UnknownUnit { unit: String, reference: String },

    /// A unit expression references a unit that is declared further down.
    #[error("Unit '{unit}' references '{reference}' before it is declared")]
    ForwardReference { unit: String, reference: String },

    /// A unit expression references the unit being defined.
    #[error("Unit '{0}' is defined in terms of itself")]
    CyclicDefinition(String),

    /// A primitive unit identifier is not a (prefixed) unit name.
    #[error("Cannot interpret '{0}' as a prefixed unit name")]
    UnknownPrimitive(String),

    /// A unit expression does not follow the unit grammar.
    #[error("Invalid unit expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },

    /// Combining the factors of a unit overflows an exponent.
    #[error("Exponents of unit '{0}' are out of range")]
    ExponentOverflow(String),
}
