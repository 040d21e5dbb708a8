//! One-pass unit registry.
//!
//! Unit definitions are resolved strictly in declaration order. A composite
//! definition may reference SBML base kinds and units registered before it;
//! anything else is an error. Because a unit can never reference a later
//! one, the dependency graph is acyclic by construction.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::prelude::UnitDefinition;
use crate::units::error::UnitError;
use crate::units::expression::parse_unit_expression;
use crate::units::kinds::UnitKind;
use crate::units::maps::{parse_prefixed, BASE_KINDS};

/// A base unit in SBML form: `(multiplier * 10^scale * kind)^exponent`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BaseUnit {
    pub kind: UnitKind,
    pub exponent: i32,
    pub scale: i32,
    pub multiplier: f64,
}

impl BaseUnit {
    fn same_factor(&self, other: &BaseUnit) -> bool {
        self.kind == other.kind && self.scale == other.scale && self.multiplier == other.multiplier
    }
}

impl fmt::Display for BaseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut factor = String::new();
        if self.multiplier != 1.0 {
            factor.push_str(&format!("{}*", self.multiplier));
        }
        if self.scale != 0 {
            factor.push_str(&format!("10^{}*", self.scale));
        }
        factor.push_str(self.kind.name());

        match (self.exponent, factor.contains('*')) {
            (1, _) => write!(f, "{factor}"),
            (exponent, true) => write!(f, "({factor})^{exponent}"),
            (exponent, false) => write!(f, "{factor}^{exponent}"),
        }
    }
}

/// A unit flattened into SBML base units. Factors with equal kind, scale
/// and multiplier are merged; factors whose exponents cancel are dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResolvedUnit {
    pub base_units: Vec<BaseUnit>,
}

impl ResolvedUnit {
    fn base(kind: UnitKind) -> Self {
        Self::scaled(kind, 0, 1.0)
    }

    fn scaled(kind: UnitKind, scale: i32, multiplier: f64) -> Self {
        if kind == UnitKind::Dimensionless {
            return Self::default();
        }

        Self {
            base_units: vec![BaseUnit {
                kind,
                exponent: 1,
                scale,
                multiplier,
            }],
        }
    }

    /// Raises the unit to an integer power. Returns `None` if an exponent
    /// overflows.
    pub fn checked_powi(&self, exponent: i32) -> Option<Self> {
        let base_units = self
            .base_units
            .iter()
            .map(|unit| {
                Some(BaseUnit {
                    exponent: unit.exponent.checked_mul(exponent)?,
                    ..*unit
                })
            })
            .collect::<Option<Vec<_>>>()?
            .into_iter()
            .filter(|unit| unit.exponent != 0)
            .collect();

        Some(Self { base_units })
    }

    /// Multiplies two units. Returns `None` if an exponent overflows.
    pub fn checked_multiply(&self, other: &ResolvedUnit) -> Option<Self> {
        let mut base_units = self.base_units.clone();

        for unit in &other.base_units {
            match base_units.iter_mut().find(|u| u.same_factor(unit)) {
                Some(existing) => existing.exponent = existing.exponent.checked_add(unit.exponent)?,
                None => base_units.push(*unit),
            }
        }

        base_units.retain(|unit| unit.exponent != 0);
        Some(Self { base_units })
    }

    /// Whether both units describe the same quantity. Factors are compared
    /// by kind and exponent; scales and multipliers are folded into a single
    /// conversion factor, so `mmole/min` and `(1/60000) mole/s` are equivalent.
    pub fn is_equivalent(&self, other: &ResolvedUnit) -> bool {
        let (dimensions, factor) = self.dimensions();
        let (other_dimensions, other_factor) = other.dimensions();

        dimensions == other_dimensions
            && (factor - other_factor).abs() <= 1e-9 * factor.abs().max(other_factor.abs())
    }

    /// Exponent per base kind and the overall conversion factor.
    fn dimensions(&self) -> (BTreeMap<UnitKind, i64>, f64) {
        let mut dimensions = BTreeMap::new();
        let mut factor = 1.0;

        for unit in &self.base_units {
            *dimensions.entry(unit.kind).or_insert(0) += i64::from(unit.exponent);
            factor *= (unit.multiplier * 10f64.powi(unit.scale)).powf(f64::from(unit.exponent));
        }

        dimensions.retain(|_, exponent| *exponent != 0);
        (dimensions, factor)
    }

    pub fn is_dimensionless(&self) -> bool {
        self.base_units.is_empty()
    }
}

impl fmt::Display for ResolvedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "dimensionless");
        }
        write!(f, "{}", self.base_units.iter().join(" * "))
    }
}

/// Registry of resolved unit definitions.
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    resolved: HashMap<String, ResolvedUnit>,
    declared: HashSet<String>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a list of unit definitions in order.
    ///
    /// Every definition is attempted; failures are collected together with
    /// the index of the failing definition instead of aborting. A failed
    /// unit stays declared but unresolved, so units depending on it fail
    /// as well.
    pub fn from_definitions(definitions: &[UnitDefinition]) -> (Self, Vec<(usize, UnitError)>) {
        let mut registry = Self::new();
        let mut errors = Vec::new();

        for (index, definition) in definitions.iter().enumerate() {
            let later: HashSet<&str> = definitions[index + 1..]
                .iter()
                .map(|d| d.id.as_str())
                .collect();

            match registry.resolve_definition(definition, &later) {
                Ok(unit) => {
                    registry.resolved.insert(definition.id.clone(), unit);
                }
                Err(error) => errors.push((index, error)),
            }
            registry.declared.insert(definition.id.clone());
        }

        (registry, errors)
    }

    /// Resolves and registers a single unit definition.
    ///
    /// # Errors
    ///
    /// Returns a `UnitError` if the definition cannot be resolved against
    /// the units registered so far. The registry is left unchanged.
    pub fn register(&mut self, definition: &UnitDefinition) -> Result<&ResolvedUnit, UnitError> {
        let unit = self.resolve_definition(definition, &HashSet::new())?;
        self.declared.insert(definition.id.clone());
        Ok(self.resolved.entry(definition.id.clone()).or_insert(unit))
    }

    /// Resolves a unit expression such as `mmole/liter` against the
    /// registered units and the SBML base kinds.
    ///
    /// # Errors
    ///
    /// Returns `UnitError::InvalidExpression` for malformed expressions and
    /// `UnitError::UnknownUnit` for unregistered names.
    pub fn resolve(&self, expression: &str) -> Result<ResolvedUnit, UnitError> {
        self.compose(expression, None, &HashSet::new())
    }

    /// Looks up a registered unit or base kind by name.
    pub fn get(&self, name: &str) -> Option<ResolvedUnit> {
        self.resolved
            .get(name)
            .cloned()
            .or_else(|| BASE_KINDS.get(name).map(|kind| ResolvedUnit::base(*kind)))
    }

    /// Whether `name` can be used as a unit reference: either a base kind
    /// or a declared unit definition, resolved or not.
    pub fn is_known(&self, name: &str) -> bool {
        self.declared.contains(name) || BASE_KINDS.contains_key(name)
    }

    /// Whether a unit definition with this identifier was declared.
    pub fn is_declared(&self, name: &str) -> bool {
        self.declared.contains(name)
    }

    fn resolve_definition(
        &self,
        definition: &UnitDefinition,
        later: &HashSet<&str>,
    ) -> Result<ResolvedUnit, UnitError> {
        match definition.definition.as_deref().map(str::trim) {
            None => Self::primitive(&definition.id),
            Some(expression) if expression == definition.id => Self::primitive(&definition.id),
            Some(expression) => self.compose(expression, Some(&definition.id), later),
        }
    }

    fn primitive(id: &str) -> Result<ResolvedUnit, UnitError> {
        parse_prefixed(id)
            .map(|(kind, scale, multiplier)| ResolvedUnit::scaled(kind, scale, multiplier))
            .ok_or_else(|| UnitError::UnknownPrimitive(id.to_string()))
    }

    /// Multiplies out the factors of `expression`. `defining` names the
    /// unit whose definition is being resolved, if any.
    fn compose(
        &self,
        expression: &str,
        defining: Option<&str>,
        later: &HashSet<&str>,
    ) -> Result<ResolvedUnit, UnitError> {
        let factors = parse_unit_expression(expression)?;
        let unit = defining.unwrap_or(expression);

        factors
            .iter()
            .try_fold(ResolvedUnit::default(), |acc, factor| {
                let resolved = match self.get(&factor.name) {
                    Some(resolved) => resolved,
                    None if defining == Some(factor.name.as_str()) => {
                        return Err(UnitError::CyclicDefinition(unit.to_string()))
                    }
                    None if later.contains(factor.name.as_str()) => {
                        return Err(UnitError::ForwardReference {
                            unit: unit.to_string(),
                            reference: factor.name.clone(),
                        })
                    }
                    None => {
                        return Err(UnitError::UnknownUnit {
                            unit: unit.to_string(),
                            reference: factor.name.clone(),
                        })
                    }
                };

                resolved
                    .checked_powi(factor.exponent)
                    .and_then(|power| acc.checked_multiply(&power))
                    .ok_or_else(|| UnitError::ExponentOverflow(unit.to_string()))
            })
    }
}
