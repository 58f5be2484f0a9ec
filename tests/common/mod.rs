// Shared test languages.

#![allow(dead_code)]

use krikata::prelude::*;

/// `value` with `add`, `mul`, `pi` and a numeric default.
pub fn scenario_language() -> Language<f64> {
    let prims = Primitives::standard();
    let value = Type::declare("value");
    value
        .define(
            Dispatch::new()
                .funct(Func::new("add").arg(&value).arg(&value).exec(|l, r| l + r))
                .funct(Func::new("mul").arg(&value).arg(&value).exec(|l, r| l * r))
                .funct(constant("pi", || 3.14))
                .default(&prims.number),
        )
        .unwrap();
    Language::new("calc", &value)
}

pub fn eval(language: &Language<f64>, args: &[&str]) -> Result<f64> {
    language.parse_args(args)?.execute().block_on()
}
