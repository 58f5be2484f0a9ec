//! Keyword rules.
//!
//! A [`Func`] builder collects argument expressions one `arg` call at a
//! time. The argument list is tracked in the builder's type, so binding a
//! handler with `exec`, `try_exec` or `exec_async` requires a closure of
//! exactly the right arity and argument types.
//!
//! ```ignore
//! let add = Func::new("add").arg(&value).arg(&value).exec(|l, r| l + r);
//! let pi = constant("pi", || 3.14);
//! ```
//!
//! Arguments are parsed in declaration order, and at execution time they
//! are evaluated in the same order, each one finishing before the next one
//! starts.

use std::future::Future;
use std::rc::Rc;

use tracing::trace;

use crate::debug::DebugNode;
use crate::errors::{KrikataError, Result};
use crate::exec::{Executor, Outcome, ParseResult};
use crate::expr::{Expr, GrammarNode, IntoExpr, Type};
use crate::grammar::{Alternative, Sym};
use crate::syntax::{Cursor, Token};

// ============================================================================
// ARGUMENT LISTS
// ============================================================================

/// A statically typed argument list, built as a nested pair:
/// `()`, `((), Expr<A>)`, `(((), Expr<A>), Expr<B>)`, ...
pub trait ArgList: 'static {
    type Values: 'static;

    /// Parses every argument in order, pushing each trace onto `debug`.
    fn parse(&self, cursor: &mut Cursor, debug: &mut Vec<DebugNode>)
        -> Result<Executor<Self::Values>>;
}

impl ArgList for () {
    type Values = ();

    fn parse(&self, _cursor: &mut Cursor, _debug: &mut Vec<DebugNode>) -> Result<Executor<()>> {
        Ok(Executor::value(()))
    }
}

impl<P: ArgList, A: 'static> ArgList for (P, Expr<A>) {
    type Values = (P::Values, A);

    fn parse(
        &self,
        cursor: &mut Cursor,
        debug: &mut Vec<DebugNode>,
    ) -> Result<Executor<Self::Values>> {
        let init = self.0.parse(cursor, debug)?;
        let ParseResult {
            debug: node,
            executor: last,
        } = self.1.parse(cursor)?;
        debug.push(node);
        Ok(Executor::new(move || {
            init.run()
                .and_then(move |head| last.run().map(move |value| (head, value)))
        }))
    }
}

// ============================================================================
// FUNCT
// ============================================================================

/// What a [`Funct`] hands back to its dispatcher.
pub struct FunctParse<R> {
    /// The consumed keyword token.
    pub keyword: Token,
    /// One trace per argument, in declaration order.
    pub args: Vec<DebugNode>,
    pub executor: Executor<R>,
}

type FunctParser<R> = dyn Fn(&mut Cursor) -> Result<FunctParse<R>>;

/// A registered rule: keyword, argument expressions and bound handler.
pub struct Funct<R> {
    keyword: Rc<str>,
    args: Vec<Rc<dyn GrammarNode>>,
    parser: Rc<FunctParser<R>>,
}

impl<R> Clone for Funct<R> {
    fn clone(&self) -> Self {
        Self {
            keyword: Rc::clone(&self.keyword),
            args: self.args.clone(),
            parser: Rc::clone(&self.parser),
        }
    }
}

impl<R: 'static> Funct<R> {
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Consumes the keyword, then every argument.
    pub fn parse(&self, cursor: &mut Cursor) -> Result<FunctParse<R>> {
        (self.parser)(cursor)
    }

    /// A single-rule type named after this keyword.
    pub fn into_type(self) -> Type<R> {
        Type::from_funct(self)
    }

    pub(crate) fn args(&self) -> &[Rc<dyn GrammarNode>] {
        &self.args
    }

    /// `"keyword" <arg> <arg> ...`
    pub(crate) fn alternative(&self) -> Alternative {
        let mut alt = Vec::with_capacity(self.args.len() + 1);
        alt.push(Sym::Exact(self.keyword.to_string()));
        alt.extend(self.args.iter().map(|arg| Sym::Type(arg.tag().to_string())));
        alt
    }
}

// ============================================================================
// BUILDER
// ============================================================================

pub struct Func<Args> {
    keyword: String,
    args: Args,
    nodes: Vec<Rc<dyn GrammarNode>>,
}

impl Func<()> {
    pub fn new(keyword: impl Into<String>) -> Self {
        Func {
            keyword: keyword.into(),
            args: (),
            nodes: Vec::new(),
        }
    }
}

impl<Args: ArgList> Func<Args> {
    /// Appends an argument.
    pub fn arg<E: IntoExpr>(self, expr: E) -> Func<(Args, Expr<E::Output>)> {
        let expr = expr.into_expr();
        let mut nodes = self.nodes;
        nodes.push(expr.node());
        Func {
            keyword: self.keyword,
            args: (self.args, expr),
            nodes,
        }
    }

    fn bind<R, H>(self, handler: H) -> Funct<R>
    where
        R: 'static,
        H: Fn(Args::Values) -> Outcome<R> + 'static,
    {
        let keyword: Rc<str> = Rc::from(self.keyword);
        let args = self.args;
        let handler = Rc::new(handler);
        let expected = Rc::clone(&keyword);

        let parser = move |cursor: &mut Cursor| -> Result<FunctParse<R>> {
            let token = cursor.next(&expected)?;
            if token.as_str() != &*expected {
                return Err(KrikataError::KeywordMismatch {
                    expected: expected.to_string(),
                    found: token.value.to_string(),
                    position: token.position,
                });
            }
            trace!(keyword = %expected, pos = token.position, "parsing function arguments");

            let mut debug = Vec::new();
            let values = args.parse(cursor, &mut debug)?;
            let handler = Rc::clone(&handler);
            let executor =
                Executor::new(move || values.run().and_then(move |values| (*handler)(values)));

            Ok(FunctParse {
                keyword: token,
                args: debug,
                executor,
            })
        };

        Funct {
            keyword,
            args: self.nodes,
            parser: Rc::new(parser),
        }
    }
}

/// Handler binding for one arity. `$values` destructures the nested value
/// pair produced by the argument list into the handler's parameters.
macro_rules! bind_arity {
    ($values:tt; $($ty:ident $var:ident),*; $args:ty) => {
        impl<$($ty: 'static),*> Func<$args> {
            /// Binds a synchronous handler.
            pub fn exec<R, F>(self, handler: F) -> Funct<R>
            where
                R: 'static,
                F: Fn($($ty),*) -> R + 'static,
            {
                self.bind(move |$values| Outcome::ready(handler($($var),*)))
            }

            /// Binds a synchronous handler that may fail.
            pub fn try_exec<R, F>(self, handler: F) -> Funct<R>
            where
                R: 'static,
                F: Fn($($ty),*) -> Result<R> + 'static,
            {
                self.bind(move |$values| Outcome::from_result(handler($($var),*)))
            }

            /// Binds an asynchronous handler.
            pub fn exec_async<R, F, Fut>(self, handler: F) -> Funct<R>
            where
                R: 'static,
                F: Fn($($ty),*) -> Fut + 'static,
                Fut: Future<Output = Result<R>> + 'static,
            {
                self.bind(move |$values| Outcome::pending(handler($($var),*)))
            }
        }
    };
}

bind_arity!((); ; ());
bind_arity!(((), a); A a; ((), Expr<A>));
bind_arity!((((), a), b); A a, B b; (((), Expr<A>), Expr<B>));
bind_arity!(
    ((((), a), b), c);
    A a, B b, C c;
    ((((), Expr<A>), Expr<B>), Expr<C>)
);
bind_arity!(
    (((((), a), b), c), d);
    A a, B b, C c, D d;
    (((((), Expr<A>), Expr<B>), Expr<C>), Expr<D>)
);
bind_arity!(
    ((((((), a), b), c), d), e);
    A a, B b, C c, D d, E e;
    ((((((), Expr<A>), Expr<B>), Expr<C>), Expr<D>), Expr<E>)
);

// ============================================================================
// CONSTANTS
// ============================================================================

/// A zero-argument rule.
pub fn constant<R: 'static>(keyword: impl Into<String>, value: impl Fn() -> R + 'static) -> Funct<R> {
    Func::new(keyword).exec(value)
}

/// A zero-argument rule whose value may fail to compute.
pub fn try_constant<R: 'static>(
    keyword: impl Into<String>,
    value: impl Fn() -> Result<R> + 'static,
) -> Funct<R> {
    Func::new(keyword).try_exec(value)
}

/// A zero-argument rule computed asynchronously.
pub fn constant_async<R, F, Fut>(keyword: impl Into<String>, value: F) -> Funct<R>
where
    R: 'static,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<R>> + 'static,
{
    Func::new(keyword).exec_async(value)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::expr::Primitives;

    #[test]
    fn arguments_parse_in_order_and_trace() {
        let p = Primitives::standard();
        let sub = Func::new("sub").arg(&p.number).arg(&p.number).exec(|l, r| l - r);
        let mut cursor = Cursor::from_args(["sub", "10", "4"]);
        let parsed = sub.parse(&mut cursor).unwrap();

        assert_eq!(parsed.keyword.as_str(), "sub");
        let traces: Vec<String> = parsed.args.iter().map(DebugNode::typed_tokens).collect();
        assert_eq!(traces, vec!["number:10", "number:4"]);
        assert_eq!(parsed.executor.run().block_on().unwrap(), 6.0);
    }

    #[test]
    fn keyword_is_rechecked() {
        let pi = constant("pi", || 3.14);
        let mut cursor = Cursor::from_args(["tau"]);
        match pi.parse(&mut cursor) {
            Err(KrikataError::KeywordMismatch { expected, found, .. }) => {
                assert_eq!(expected, "pi");
                assert_eq!(found, "tau");
            }
            _ => panic!("expected KeywordMismatch"),
        }
    }

    #[test]
    fn mixed_argument_types() {
        let p = Primitives::standard();
        let pick = Func::new("test")
            .arg(&p.bool)
            .arg(&p.string)
            .arg(&p.int)
            .exec(|flag, s: String, n| if flag { s.len() as i64 } else { n });
        assert_eq!(pick.arity(), 3);
        let mut cursor = Cursor::from_args(["test", "true", "hello", "9"]);
        let parsed = pick.parse(&mut cursor).unwrap();
        assert_eq!(parsed.executor.run().block_on().unwrap(), 5);
    }

    #[test]
    fn handler_runs_only_on_execute() {
        let calls = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&calls);
        let tick = constant("tick", move || *seen.borrow_mut() += 1);
        let mut cursor = Cursor::from_args(["tick"]);
        let parsed = tick.parse(&mut cursor).unwrap();
        assert_eq!(*calls.borrow(), 0);
        parsed.executor.run().block_on().unwrap();
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn try_exec_failures_surface_at_execution() {
        let p = Primitives::standard();
        let div = Func::new("div")
            .arg(&p.number)
            .arg(&p.number)
            .try_exec(|l: f64, r: f64| {
                if r == 0.0 {
                    Err(KrikataError::handler("division by zero"))
                } else {
                    Ok(l / r)
                }
            });
        let mut cursor = Cursor::from_args(["div", "1", "0"]);
        let parsed = div.parse(&mut cursor).unwrap();
        let err = parsed.executor.run().block_on().unwrap_err();
        assert_eq!(err.to_string(), "division by zero");
    }

    #[test]
    fn async_handlers_defer_to_a_future() {
        let p = Primitives::standard();
        let echo = Func::new("echo")
            .arg(&p.string)
            .exec_async(|s: String| async move { Ok(s.to_uppercase()) });
        let mut cursor = Cursor::from_args(["echo", "hi"]);
        let outcome = echo.parse(&mut cursor).unwrap().executor.run();
        assert!(!outcome.is_ready());
        assert_eq!(outcome.block_on().unwrap(), "HI");
    }

    #[test]
    fn alternative_lists_keyword_then_argument_tags() {
        let p = Primitives::standard();
        let f = Func::new("join").arg(&p.string).arg(&p.int).exec(|s: String, _n: i64| s);
        let alt: Vec<String> = f.alternative().iter().map(Sym::to_string).collect();
        assert_eq!(alt, vec!["\"join\"", "<string>", "<int>"]);
    }
}
