//! Terminal expressions.
//!
//! A primitive consumes exactly one token and converts it. Conversion
//! failures are reported with the token and the primitive's tag; the
//! converter's own error text becomes the `reason`.

use std::fmt::Display;
use std::rc::Rc;

use crate::debug::DebugNode;
use crate::errors::{KrikataError, Result};
use crate::exec::{Executor, ParseResult};
use crate::expr::{Expr, Expression, GrammarNode, IntoExpr};
use crate::grammar::Grammar;
use crate::syntax::Cursor;

type Converter<T> = dyn Fn(&str) -> std::result::Result<T, String>;

pub struct Primitive<T>(Rc<PrimitiveCore<T>>);

struct PrimitiveCore<T> {
    tag: String,
    convert: Box<Converter<T>>,
}

impl<T> Clone for Primitive<T> {
    fn clone(&self) -> Self {
        Primitive(Rc::clone(&self.0))
    }
}

impl<T: 'static> Primitive<T> {
    pub fn new<E, F>(tag: impl Into<String>, convert: F) -> Self
    where
        E: Display,
        F: Fn(&str) -> std::result::Result<T, E> + 'static,
    {
        Primitive(Rc::new(PrimitiveCore {
            tag: tag.into(),
            convert: Box::new(move |raw: &str| convert(raw).map_err(|e| e.to_string())),
        }))
    }

    pub fn tag(&self) -> &str {
        &self.0.tag
    }
}

impl<T> GrammarNode for PrimitiveCore<T> {
    fn tag(&self) -> &str {
        &self.tag
    }

    // Terminals have no rules of their own.
    fn grammar(&self, _grammar: &mut Grammar) {}
}

impl<T: 'static> Expression<T> for PrimitiveCore<T> {
    fn parse(&self, cursor: &mut Cursor) -> Result<ParseResult<T>> {
        let token = cursor.next(&self.tag)?;
        match (self.convert)(token.as_str()) {
            Ok(value) => Ok(ParseResult::new(
                DebugNode::leaf(self.tag.as_str(), token),
                Executor::value(value),
            )),
            Err(reason) => Err(KrikataError::ConversionFailure {
                token: token.value.to_string(),
                position: token.position,
                expected: self.tag.clone(),
                reason,
            }),
        }
    }
}

impl<T: 'static> IntoExpr for Primitive<T> {
    type Output = T;

    fn into_expr(self) -> Expr<T> {
        Expr::new(self.0)
    }
}

impl<T: 'static> IntoExpr for &Primitive<T> {
    type Output = T;

    fn into_expr(self) -> Expr<T> {
        Expr::new(Rc::clone(&self.0))
    }
}

// ============================================================================
// STANDARD PRIMITIVES
// ============================================================================

/// The built-in terminals, constructed explicitly and shared by reference.
#[derive(Clone)]
pub struct Primitives {
    pub int: Primitive<i64>,
    pub number: Primitive<f64>,
    pub string: Primitive<String>,
    pub bool: Primitive<bool>,
}

impl Primitives {
    pub fn standard() -> Self {
        Self {
            int: Primitive::new("int", parse_int),
            number: Primitive::new("number", parse_number),
            string: Primitive::new("string", |raw: &str| {
                Ok::<_, std::convert::Infallible>(raw.to_string())
            }),
            bool: Primitive::new("bool", parse_bool),
        }
    }
}

impl Default for Primitives {
    fn default() -> Self {
        Self::standard()
    }
}

fn parse_number(raw: &str) -> std::result::Result<f64, &'static str> {
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err("invalid number"),
    }
}

// "4" and "4.0" are both integers; "4.5" is not.
fn parse_int(raw: &str) -> std::result::Result<i64, &'static str> {
    if let Ok(n) = raw.parse::<i64>() {
        return Ok(n);
    }
    match parse_number(raw) {
        Ok(n) if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 => Ok(n as i64),
        _ => Err("expected integer"),
    }
}

fn parse_bool(raw: &str) -> std::result::Result<bool, &'static str> {
    match raw {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err("invalid boolean"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one<T: 'static>(prim: &Primitive<T>, raw: &str) -> Result<T> {
        let mut cursor = Cursor::from_args([raw]);
        prim.into_expr().parse(&mut cursor)?.execute().block_on()
    }

    #[test]
    fn numbers_convert() {
        let p = Primitives::standard();
        assert_eq!(parse_one(&p.number, "3.5").unwrap(), 3.5);
        assert_eq!(parse_one(&p.number, "-2").unwrap(), -2.0);
        assert!(parse_one(&p.number, "inf").is_err());
        assert!(parse_one(&p.number, "abc").is_err());
    }

    #[test]
    fn ints_accept_integral_floats() {
        let p = Primitives::standard();
        assert_eq!(parse_one(&p.int, "42").unwrap(), 42);
        assert_eq!(parse_one(&p.int, "4.0").unwrap(), 4);
        assert!(parse_one(&p.int, "4.5").is_err());
    }

    #[test]
    fn bools_are_exact() {
        let p = Primitives::standard();
        assert!(parse_one(&p.bool, "true").unwrap());
        assert!(!parse_one(&p.bool, "false").unwrap());
        assert!(parse_one(&p.bool, "True").is_err());
    }

    #[test]
    fn conversion_failure_carries_context() {
        let p = Primitives::standard();
        match parse_one(&p.number, "seven") {
            Err(KrikataError::ConversionFailure {
                token,
                expected,
                position,
                reason,
            }) => {
                assert_eq!(token, "seven");
                assert_eq!(expected, "number");
                assert_eq!(position, 0);
                assert_eq!(reason, "invalid number");
            }
            other => panic!("expected ConversionFailure, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn primitive_trace_is_a_leaf() {
        let p = Primitives::standard();
        let mut cursor = Cursor::from_args(["hello"]);
        let result = (&p.string).into_expr().parse(&mut cursor).unwrap();
        assert_eq!(result.debug.typed_tokens(), "string:hello");
        assert!(cursor.finished());
    }
}
