//! Reaction equations and rate-law expressions.
//!
//! Reaction equations use the textual form of the pathway scripts:
//!
//! ```text
//! 2 A + B -> C          irreversible
//! A <-> B               reversible ("<=>" is accepted as well)
//! -> S1                 source reaction without reactants
//! A -> B [E1, E2]       with modifier species
//! ```
//!
//! Rate laws are arbitrary arithmetic expressions; only the identifiers they
//! reference matter to the model, which are extracted with `meval`.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use meval::tokenizer::Token;
use meval::Expr;
use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reference::SpeciesRef;
use crate::registry::is_valid_sid;

/// Arrows in the order they are searched for. Two-character arrows must
/// come after the three-character ones containing them.
const ARROWS: [(&str, bool); 4] = [("<->", true), ("<=>", true), ("->", false), ("=>", false)];

/// Identifiers that `meval` treats as variables but which are constants.
const BUILTIN_CONSTANTS: [&str; 2] = ["pi", "e"];

/// Errors raised while parsing a reaction equation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EquationError {
    #[error("'{0}' contains no reaction arrow (->, =>, <-> or <=>)")]
    MissingArrow(String),

    #[error("'{0}' contains more than one reaction arrow")]
    MultipleArrows(String),

    #[error("'{0}' has neither reactants nor products")]
    Empty(String),

    #[error("'{equation}' contains an empty term")]
    EmptyTerm { equation: String },

    #[error("'{term}' is not a valid stoichiometric term")]
    InvalidTerm { term: String },

    #[error("'{0}' has an unterminated modifier list")]
    UnterminatedModifiers(String),
}

/// A species taking part in a reaction with its stoichiometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub species: SpeciesRef,
    pub stoichiometry: f64,
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.stoichiometry == 1.0 {
            write!(f, "{}", self.species)
        } else {
            write!(f, "{} {}", self.stoichiometry, self.species)
        }
    }
}

/// Parsed reaction equation.
///
/// Serializes as its textual form so model files keep the notation of the
/// pathway scripts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReactionEquation {
    pub reactants: Vec<Participant>,
    pub products: Vec<Participant>,
    pub modifiers: Vec<SpeciesRef>,
    pub reversible: bool,
}

impl ReactionEquation {
    /// All species referenced by the equation: reactants, products and
    /// modifiers, in that order.
    pub fn species(&self) -> impl Iterator<Item = &SpeciesRef> {
        self.reactants
            .iter()
            .chain(self.products.iter())
            .map(|participant| &participant.species)
            .chain(self.modifiers.iter())
    }

    /// Species references together with their JSON pointer suffix relative
    /// to the reaction, e.g. `equation/reactants/0`.
    pub fn located_species(&self) -> Vec<(String, &SpeciesRef)> {
        let reactants = self
            .reactants
            .iter()
            .enumerate()
            .map(|(idx, p)| (format!("equation/reactants/{idx}"), &p.species));
        let products = self
            .products
            .iter()
            .enumerate()
            .map(|(idx, p)| (format!("equation/products/{idx}"), &p.species));
        let modifiers = self
            .modifiers
            .iter()
            .enumerate()
            .map(|(idx, m)| (format!("equation/modifiers/{idx}"), m));

        reactants.chain(products).chain(modifiers).collect()
    }
}

impl FromStr for ReactionEquation {
    type Err = EquationError;

    fn from_str(equation: &str) -> Result<Self, Self::Err> {
        let (body, modifiers) = split_modifiers(equation)?;
        let (lhs, rhs, reversible) = split_arrow(body, equation)?;

        let reactants = parse_side(lhs, equation)?;
        let products = parse_side(rhs, equation)?;
        if reactants.is_empty() && products.is_empty() {
            return Err(EquationError::Empty(equation.to_string()));
        }

        Ok(ReactionEquation {
            reactants,
            products,
            modifiers,
            reversible,
        })
    }
}

impl TryFrom<&str> for ReactionEquation {
    type Error = EquationError;

    fn try_from(equation: &str) -> Result<Self, Self::Error> {
        equation.parse()
    }
}

impl TryFrom<String> for ReactionEquation {
    type Error = EquationError;

    fn try_from(equation: String) -> Result<Self, Self::Error> {
        equation.parse()
    }
}

impl From<ReactionEquation> for String {
    fn from(equation: ReactionEquation) -> Self {
        equation.to_string()
    }
}

impl fmt::Display for ReactionEquation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = if self.reversible { "<->" } else { "->" };
        let lhs = self.reactants.iter().join(" + ");
        let rhs = self.products.iter().join(" + ");

        let mut equation = match (lhs.is_empty(), rhs.is_empty()) {
            (true, _) => format!("{arrow} {rhs}"),
            (_, true) => format!("{lhs} {arrow}"),
            _ => format!("{lhs} {arrow} {rhs}"),
        };

        if !self.modifiers.is_empty() {
            equation.push_str(&format!(" [{}]", self.modifiers.iter().join(", ")));
        }

        write!(f, "{equation}")
    }
}

impl JsonSchema for ReactionEquation {
    fn is_referenceable() -> bool {
        false
    }

    fn schema_name() -> String {
        "ReactionEquation".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}

/// Splits a trailing `[A, B]` modifier list off the equation.
fn split_modifiers(equation: &str) -> Result<(&str, Vec<SpeciesRef>), EquationError> {
    let Some(start) = equation.find('[') else {
        return Ok((equation, Vec::new()));
    };

    let list = equation[start + 1..]
        .trim_end()
        .strip_suffix(']')
        .ok_or_else(|| EquationError::UnterminatedModifiers(equation.to_string()))?;

    let modifiers = list
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            if is_valid_sid(id) {
                Ok(SpeciesRef::from(id))
            } else {
                Err(EquationError::InvalidTerm {
                    term: id.to_string(),
                })
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((&equation[..start], modifiers))
}

fn split_arrow<'a>(
    body: &'a str,
    equation: &str,
) -> Result<(&'a str, &'a str, bool), EquationError> {
    let (arrow, reversible) = ARROWS
        .iter()
        .find(|(arrow, _)| body.contains(arrow))
        .ok_or_else(|| EquationError::MissingArrow(equation.to_string()))?;

    let (lhs, rhs) = body
        .split_once(arrow)
        .ok_or_else(|| EquationError::MissingArrow(equation.to_string()))?;

    if ARROWS.iter().any(|(other, _)| rhs.contains(other)) || lhs.contains("<") {
        return Err(EquationError::MultipleArrows(equation.to_string()));
    }

    Ok((lhs, rhs, *reversible))
}

fn parse_side(side: &str, equation: &str) -> Result<Vec<Participant>, EquationError> {
    if side.trim().is_empty() {
        return Ok(Vec::new());
    }

    side.split('+')
        .map(|term| parse_term(term.trim(), equation))
        .collect()
}

/// Parses `[stoichiometry] species`, e.g. `2 A` or `0.5 glc`.
fn parse_term(term: &str, equation: &str) -> Result<Participant, EquationError> {
    let invalid = || EquationError::InvalidTerm {
        term: term.to_string(),
    };

    let tokens = term.split_whitespace().collect::<Vec<_>>();
    let (stoichiometry, species) = match tokens.as_slice() {
        [] => {
            return Err(EquationError::EmptyTerm {
                equation: equation.to_string(),
            })
        }
        [species] => (1.0, *species),
        [stoichiometry, species] => {
            let stoichiometry: f64 = stoichiometry.parse().map_err(|_| invalid())?;
            if !stoichiometry.is_finite() || stoichiometry <= 0.0 {
                return Err(invalid());
            }
            (stoichiometry, *species)
        }
        _ => return Err(invalid()),
    };

    if !is_valid_sid(species) {
        return Err(invalid());
    }

    Ok(Participant {
        species: SpeciesRef::from(species),
        stoichiometry,
    })
}

/// Extracts the identifiers referenced by a rate-law expression.
///
/// Function names and the constants `pi` and `e` are not reported. The
/// result is sorted for deterministic reporting.
///
/// # Errors
///
/// Returns the `meval` parse error if the expression is malformed.
pub fn extract_symbols(math: &str) -> Result<Vec<String>, meval::Error> {
    let expr: Expr = math.parse()?;
    let mut symbols: HashSet<String> = HashSet::new();

    for token in expr.iter() {
        if let Token::Var(name) = token {
            if !BUILTIN_CONSTANTS.contains(&name.as_str()) {
                symbols.insert(name.clone());
            }
        }
    }

    Ok(symbols.into_iter().sorted().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_simple_equation() {
        let equation: ReactionEquation = "S0 -> S1".parse().expect("Failed to parse equation");

        assert!(!equation.reversible);
        assert_eq!(equation.reactants.len(), 1);
        assert_eq!(equation.reactants[0].species, "S0");
        assert_eq!(equation.products[0].species, "S1");
        assert_eq!(equation.to_string(), "S0 -> S1");
    }

    #[test]
    fn test_stoichiometry_and_modifiers() {
        let equation: ReactionEquation = "2 A + 0.5 B <=> C [E1, E2]"
            .parse()
            .expect("Failed to parse equation");

        assert!(equation.reversible);
        assert_eq!(equation.reactants[0].stoichiometry, 2.0);
        assert_eq!(equation.reactants[1].stoichiometry, 0.5);
        assert_eq!(
            equation.modifiers,
            vec![SpeciesRef::from("E1"), SpeciesRef::from("E2")]
        );
        assert_eq!(
            equation.species().map(|s| s.id()).collect::<Vec<_>>(),
            vec!["A", "B", "C", "E1", "E2"]
        );
        assert_eq!(equation.to_string(), "2 A + 0.5 B <-> C [E1, E2]");
    }

    #[test]
    fn test_source_and_sink() {
        let source: ReactionEquation = "-> S1".parse().expect("Failed to parse source");
        assert!(source.reactants.is_empty());
        assert_eq!(source.to_string(), "-> S1");

        let sink: ReactionEquation = "S1 =>".parse().expect("Failed to parse sink");
        assert!(sink.products.is_empty());
        assert_eq!(sink.to_string(), "S1 ->");
    }

    #[test]
    fn test_invalid_equations() {
        assert_eq!(
            "A + B".parse::<ReactionEquation>(),
            Err(EquationError::MissingArrow("A + B".to_string()))
        );
        assert_eq!(
            "A -> B -> C".parse::<ReactionEquation>(),
            Err(EquationError::MultipleArrows("A -> B -> C".to_string()))
        );
        assert_eq!(
            "->".parse::<ReactionEquation>(),
            Err(EquationError::Empty("->".to_string()))
        );
        assert!(matches!(
            "A + -> B".parse::<ReactionEquation>(),
            Err(EquationError::EmptyTerm { .. })
        ));
        assert!(matches!(
            "2x A -> B".parse::<ReactionEquation>(),
            Err(EquationError::InvalidTerm { .. })
        ));
        assert!(matches!(
            "A -> B [E".parse::<ReactionEquation>(),
            Err(EquationError::UnterminatedModifiers(_))
        ));
    }

    #[test]
    fn test_equation_serializes_as_string() {
        let equation: ReactionEquation = "S0 -> S1".parse().expect("Failed to parse equation");
        let json = serde_json::to_string(&equation).expect("Failed to serialize equation");
        assert_eq!(json, "\"S0 -> S1\"");

        let parsed: ReactionEquation =
            serde_json::from_str("\"A <-> 2 B\"").expect("Failed to deserialize equation");
        assert!(parsed.reversible);
        assert_eq!(parsed.products[0].stoichiometry, 2.0);
    }

    #[test]
    fn test_extract_symbols() {
        let symbols =
            extract_symbols("R_Vmax * S0/(S0 + R_Km)").expect("Failed to parse rate law");
        assert_eq!(symbols, vec!["R_Km", "R_Vmax", "S0"]);

        let symbols = extract_symbols("k * exp(-pi * x)").expect("Failed to parse rate law");
        assert_eq!(symbols, vec!["k", "x"]);

        assert!(extract_symbols("k * (S0").is_err());
    }
}
