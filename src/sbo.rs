//! Systems Biology Ontology terms.

use lazy_static::lazy_static;
use regex::Regex;

pub const PHYSICAL_COMPARTMENT: &str = "SBO:0000290";
pub const SIMPLE_CHEMICAL: &str = "SBO:0000247";
pub const BIOCHEMICAL_REACTION: &str = "SBO:0000176";
pub const MAXIMAL_VELOCITY: &str = "SBO:0000186";
pub const MICHAELIS_CONSTANT: &str = "SBO:0000027";

lazy_static! {
    static ref SBO_PATTERN: Regex = Regex::new(r"^SBO:\d{7}$").expect("SBO pattern is a valid regex");
}

/// Checks the `SBO:nnnnnnn` syntax of an SBO term.
pub fn is_valid_sbo_term(term: &str) -> bool {
    SBO_PATTERN.is_match(term)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sbo_syntax() {
        for term in [
            PHYSICAL_COMPARTMENT,
            SIMPLE_CHEMICAL,
            BIOCHEMICAL_REACTION,
            MAXIMAL_VELOCITY,
            MICHAELIS_CONSTANT,
        ] {
            assert!(is_valid_sbo_term(term));
        }

        assert!(!is_valid_sbo_term("SBO:290"));
        assert!(!is_valid_sbo_term("sbo:0000290"));
        assert!(!is_valid_sbo_term("SBO:00002900"));
    }
}
