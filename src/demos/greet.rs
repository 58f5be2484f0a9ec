use crate::expr::{constant, Dispatch, Func, Primitives, Type};
use crate::language::Language;

pub fn language() -> Language<String> {
    let prims = Primitives::standard();
    let greeting = Type::new(
        "greeting",
        Dispatch::new()
            .funct(constant("hi", || "Hi mysterious person!".to_string()))
            .funct(
                Func::new("hello")
                    .arg(&prims.string)
                    .exec(|name: String| format!("Hello {name}! It is a great day today!")),
            ),
    );
    Language::new("greet", greeting)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greets_by_name() {
        let greet = language();
        let hello = greet.parse_args(["hello", "Ada"]).unwrap();
        assert_eq!(
            hello.execute().block_on().unwrap(),
            "Hello Ada! It is a great day today!"
        );
    }

    #[test]
    fn grammar_has_no_default_alternative() {
        let grammar = language().grammar();
        assert_eq!(grammar.get("greeting").unwrap().len(), 2);
    }
}
