//! A prefix calculator.
//!
//! ```text
//! add 1 mul 2 3            => 7
//! sum 1 2 3 -              => 6
//! test eq 1 1 10 20        => 10
//! sum double range 4       => 12
//! ```

use crate::errors::{KrikataError, Result};
use crate::expr::{constant, Dispatch, Func, Funct, Primitives, Repeat, Type};
use crate::language::Language;

/// The calculator's types, exposed so other languages can build on them.
pub struct Calc {
    pub value: Type<f64>,
    pub boolean: Type<bool>,
    pub arr: Type<Vec<f64>>,
}

fn op<R: 'static>(value: &Type<f64>, name: &str, f: fn(f64, f64) -> R) -> Funct<R> {
    Func::new(name).arg(value).arg(value).exec(f)
}

fn count(n: f64) -> Result<usize> {
    if n < 0.0 || n.fract() != 0.0 {
        return Err(KrikataError::handler(format!(
            "expected a non-negative whole number, got {n}"
        )));
    }
    Ok(n as usize)
}

impl Calc {
    pub fn new(prims: &Primitives) -> Result<Self> {
        let value = Type::declare("value");
        let boolean = Type::declare("boolean");
        let arr = Type::declare("arr");

        value.define(
            Dispatch::new()
                .funct(op(&value, "add", |l, r| l + r))
                .funct(op(&value, "sub", |l, r| l - r))
                .funct(op(&value, "mul", |l, r| l * r))
                .funct(
                    Func::new("div")
                        .arg(&value)
                        .arg(&value)
                        .try_exec(|l: f64, r: f64| {
                            if r == 0.0 {
                                Err(KrikataError::handler("division by zero"))
                            } else {
                                Ok(l / r)
                            }
                        }),
                )
                .funct(
                    Func::new("test")
                        .arg(&boolean)
                        .arg(&value)
                        .arg(&value)
                        .exec(|test, t, f| if test { t } else { f }),
                )
                .funct(
                    Func::new("sum")
                        .arg(&arr)
                        .exec(|vals: Vec<f64>| vals.iter().sum()),
                )
                .funct(constant("pi", || 3.14))
                .funct(constant("rand", rand::random::<f64>))
                .default(&prims.number),
        )?;

        boolean.define(
            Dispatch::new()
                .funct(op(&value, "eq", |l, r| l == r))
                .default(&prims.bool),
        )?;

        arr.define(
            Dispatch::new()
                .funct(
                    Func::new("repeat")
                        .arg(&value)
                        .arg(&value)
                        .try_exec(|n, v| Ok(vec![v; count(n)?])),
                )
                .funct(
                    Func::new("range")
                        .arg(&value)
                        .try_exec(|max| Ok((0..count(max)?).map(|i| i as f64).collect())),
                )
                .funct(
                    Func::new("double")
                        .arg(&arr)
                        .exec(|vals: Vec<f64>| vals.into_iter().map(|v| v * 2.0).collect()),
                )
                .default(Repeat::with_exit(&value, "-")),
        )?;

        Ok(Calc {
            value,
            boolean,
            arr,
        })
    }
}

pub fn language() -> Result<Language<f64>> {
    let calc = Calc::new(&Primitives::standard())?;
    Ok(Language::new("calc", &calc.value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(args: &[&str]) -> Result<f64> {
        language()?.parse_args(args)?.execute().block_on()
    }

    #[test]
    fn arithmetic() {
        assert_eq!(eval(&["add", "1", "mul", "2", "3"]).unwrap(), 7.0);
        assert_eq!(eval(&["sub", "10", "4"]).unwrap(), 6.0);
        assert_eq!(eval(&["div", "9", "3"]).unwrap(), 3.0);
    }

    #[test]
    fn division_by_zero_fails_at_execution() {
        let err = eval(&["div", "1", "0"]).unwrap_err();
        assert_eq!(err.name(), "HandlerError");
    }

    #[test]
    fn conditionals() {
        assert_eq!(eval(&["test", "eq", "1", "1", "10", "20"]).unwrap(), 10.0);
        assert_eq!(eval(&["test", "false", "10", "20"]).unwrap(), 20.0);
    }

    #[test]
    fn arrays() {
        assert_eq!(eval(&["sum", "1", "2", "3", "-"]).unwrap(), 6.0);
        assert_eq!(eval(&["sum", "1", "2", "3"]).unwrap(), 6.0);
        assert_eq!(eval(&["sum", "repeat", "3", "2"]).unwrap(), 6.0);
        assert_eq!(eval(&["sum", "double", "range", "4"]).unwrap(), 12.0);
        assert_eq!(eval(&["add", "sum", "1", "2", "-", "4"]).unwrap(), 7.0);
    }

    #[test]
    fn negative_counts_are_rejected() {
        assert!(eval(&["sum", "range", "-1"]).is_err());
    }

    #[test]
    fn rand_is_in_unit_interval() {
        let r = eval(&["rand"]).unwrap();
        assert!((0.0..1.0).contains(&r));
    }
}
