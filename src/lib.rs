//! # Krikata
//!
//! Declare a small command language as a graph of typed expressions and get
//! a grammar, a backtracking parser over pre-split tokens, and a deferred
//! executor from that one declaration.
//!
//! ```ignore
//! use krikata::prelude::*;
//!
//! let prims = Primitives::standard();
//! let value = Type::<f64>::declare("value");
//! value.define(
//!     Dispatch::new()
//!         .funct(Func::new("add").arg(&value).arg(&value).exec(|l, r| l + r))
//!         .funct(constant("pi", || 3.14))
//!         .default(&prims.number),
//! )?;
//!
//! let calc = Language::new("calc", &value);
//! print!("{}", calc.grammar());
//! let seven = calc.parse_args(["add", "1", "mul", "2", "3"])?.execute().block_on()?;
//! ```
//!
//! Parsing is synchronous and never runs handlers. Executing a parse result
//! runs them, and only suspends if a handler is asynchronous.

pub mod cli;
pub mod debug;
pub mod demos;
pub mod errors;
pub mod exec;
pub mod expr;
pub mod grammar;
pub mod language;
pub mod repl;
pub mod syntax;

pub use crate::errors::{ErrorKind, KrikataError, Result};
pub use crate::language::Language;

pub mod prelude {
    pub use crate::debug::DebugNode;
    pub use crate::errors::{KrikataError, Result};
    pub use crate::exec::{Executor, Outcome, ParseResult};
    pub use crate::expr::{
        constant, constant_async, try_constant, Dispatch, Expr, Expression, Func, Funct,
        GrammarNode, IntoExpr, Parallel, Primitive, Primitives, Repeat, Type,
    };
    pub use crate::grammar::Grammar;
    pub use crate::language::Language;
    pub use crate::syntax::{Cursor, Token};
}
