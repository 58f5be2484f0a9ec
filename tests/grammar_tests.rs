// Grammar derivation over whole languages.

mod common;

use common::scenario_language;
use krikata::demos::{calc, greet};
use krikata::grammar::Sym;
use krikata::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn scenario_grammar_formats_with_aligned_columns() {
    let expected = "\
l.calc:
 | <value> EOI

value:
 | \"add\"    <value> <value>
 | \"mul\"    <value> <value>
 | \"pi\"
 | <number>
";
    assert_eq!(scenario_language().grammar().format(), expected);
}

#[test]
fn grammar_is_idempotent() {
    let lang = calc::language().unwrap();
    let first = lang.grammar();
    let second = lang.grammar();
    assert_eq!(first, second);
    assert_eq!(first.format(), second.format());
}

#[test]
fn one_entry_per_reachable_tag() {
    let lang = calc::language().unwrap();
    let grammar = lang.grammar();
    let tags: Vec<&str> = grammar.rules().iter().map(|r| r.tag.as_str()).collect();
    assert_eq!(tags, vec!["l.calc", "value", "boolean", "arr", "r.value"]);
}

#[test]
fn repeat_entry_lists_both_endings() {
    let grammar = calc::language().unwrap().grammar();
    assert_eq!(
        grammar.get("r.value").unwrap(),
        &[
            vec![Sym::Repeat("value".into()), Sym::Eoi],
            vec![Sym::Repeat("value".into()), Sym::Exact("-".into())],
        ]
    );
}

#[test]
fn mutually_recursive_types_terminate() {
    let even: Type<u32> = Type::declare("even");
    let odd: Type<u32> = Type::declare("odd");
    even.define(
        Dispatch::new()
            .funct(Func::new("s").arg(&odd).exec(|n| n + 1))
            .funct(constant("z", || 0)),
    )
    .unwrap();
    odd.define(
        Dispatch::new()
            .funct(Func::new("s").arg(&even).exec(|n| n + 1))
            .default(Primitive::new("never", |_: &str| Err::<u32, _>("no literal"))),
    )
    .unwrap();

    let lang = Language::new("parity", &even);
    let grammar = lang.grammar();
    assert_eq!(grammar.len(), 3);
    assert_eq!(
        lang.parse_args(["s", "s", "z"]).unwrap().execute().block_on().unwrap(),
        2
    );
    assert!(lang.parse_args(["s", "z"]).is_err());
}

#[test]
fn undefined_type_gets_an_empty_entry() {
    let later: Type<String> = Type::declare("later");
    let lang = Language::new("wip", &later);
    let grammar = lang.grammar();
    assert_eq!(grammar.get("later").unwrap().len(), 0);
    assert_eq!(grammar.format(), "l.wip:\n | <later> EOI\n\nlater:\n");
}

#[test]
fn grammar_serializes_to_json() {
    let grammar = greet::language().grammar();
    let json = serde_json::to_value(&grammar).unwrap();
    assert_eq!(json["rules"][1]["tag"], "greeting");
    assert_eq!(json["rules"][1]["alternatives"][0][0]["kind"], "exact");
    assert_eq!(json["rules"][1]["alternatives"][0][0]["name"], "hi");
}
