//! Unit expression grammar.
//!
//! ```text
//! expression = factor (('*' | '/') factor)*
//! factor     = name ('^' '-'? digits)? | '1'
//! name       = [A-Za-z_][A-Za-z0-9_]*
//! ```
//!
//! Operators are left associative, so `mmole/liter/min` divides by both
//! `liter` and `min`. The literal `1` allows reciprocal units such as `1/s`.
//! Exponents are limited to [`MAX_EXPONENT`] in magnitude.

use std::iter::Peekable;
use std::str::Chars;

use crate::units::error::UnitError;

/// Largest exponent magnitude accepted in a unit expression.
pub const MAX_EXPONENT: i32 = 100;

/// A named unit raised to an integer power.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFactor {
    pub name: String,
    pub exponent: i32,
}

/// Parses a unit expression into its factors.
///
/// # Errors
///
/// Returns `UnitError::InvalidExpression` for empty expressions, dangling
/// operators, malformed exponents and unexpected characters.
pub fn parse_unit_expression(expression: &str) -> Result<Vec<UnitFactor>, UnitError> {
    let invalid = |reason: &str| UnitError::InvalidExpression {
        expression: expression.to_string(),
        reason: reason.to_string(),
    };

    let mut factors = Vec::new();
    let mut chars = expression.chars().peekable();
    let mut sign = 1;
    let mut expect_factor = true;

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if expect_factor {
            if c.is_ascii_alphabetic() || c == '_' {
                let name = take_name(&mut chars);
                let exponent = parse_exponent(&mut chars).ok_or_else(|| invalid("malformed exponent"))?;
                if !(-MAX_EXPONENT..=MAX_EXPONENT).contains(&exponent) {
                    return Err(invalid(&format!(
                        "exponent {exponent} exceeds the limit of {MAX_EXPONENT}"
                    )));
                }
                factors.push(UnitFactor {
                    name,
                    exponent: sign * exponent,
                });
            } else if c == '1' {
                chars.next();
                if chars.peek().is_some_and(|next| next.is_ascii_digit()) {
                    return Err(invalid("numeric factors other than 1 are not supported"));
                }
            } else {
                return Err(invalid(&format!("unexpected character '{c}'")));
            }
            expect_factor = false;
        } else {
            sign = match c {
                '*' => 1,
                '/' => -1,
                _ => return Err(invalid(&format!("expected '*' or '/', found '{c}'"))),
            };
            chars.next();
            expect_factor = true;
        }
    }

    if expect_factor {
        return Err(invalid("expression is empty or ends with an operator"));
    }

    Ok(factors)
}

fn take_name(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphanumeric() || c == '_' {
            name.push(c);
            chars.next();
        } else {
            break;
        }
    }
    name
}

/// Parses an optional `^n` suffix. Returns `None` if a caret is not
/// followed by an integer or the integer does not fit an `i32`.
fn parse_exponent(chars: &mut Peekable<Chars<'_>>) -> Option<i32> {
    if chars.peek() != Some(&'^') {
        return Some(1);
    }
    chars.next();

    let mut digits = String::new();
    if chars.peek() == Some(&'-') {
        digits.push('-');
        chars.next();
    }
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            digits.push(c);
            chars.next();
        } else {
            break;
        }
    }

    digits.parse().ok()
}
