//! # Krikata Expressions
//!
//! A language is a graph of expressions. Every expression has a type tag,
//! contributes rules to the grammar, and parses from a [`Cursor`].
//!
//! ## Module Structure
//!
//! - **`primitive`**: terminals that convert exactly one token
//! - **`funct`**: keyword rules with typed argument lists
//! - **`dispatch`**: named types choosing a rule by keyword, with a default
//! - **`repeat`**: zero-or-more repetition, run in sequence or joined
//!
//! Expressions are cheap handles over reference-counted cores, so the same
//! expression can appear at any number of places in the graph, itself
//! included.

use std::fmt;
use std::rc::Rc;

use crate::errors::Result;
use crate::exec::ParseResult;
use crate::grammar::{Grammar, Sym};
use crate::syntax::Cursor;

pub mod dispatch;
pub mod funct;
pub mod primitive;
pub mod repeat;

pub use dispatch::{Dispatch, Type};
pub use funct::{constant, constant_async, try_constant, ArgList, Func, Funct, FunctParse};
pub use primitive::{Primitive, Primitives};
pub use repeat::{Parallel, Repeat};

// ============================================================================
// CORE TRAITS
// ============================================================================

/// The part of an expression that does not depend on its result type.
///
/// Grammar derivation walks the graph through this trait, because the
/// children of one node generally produce different types.
pub trait GrammarNode {
    /// Identifier used in error messages and as the grammar key.
    fn tag(&self) -> &str;

    /// Adds this node's rules to `grammar`, then visits referenced nodes.
    /// Must return early when the tag is already registered.
    fn grammar(&self, grammar: &mut Grammar);
}

pub trait Expression<R>: GrammarNode {
    fn parse(&self, cursor: &mut Cursor) -> Result<ParseResult<R>>;
}

// ============================================================================
// ERASED HANDLE
// ============================================================================

/// Type-erased handle to any expression producing `R`.
pub struct Expr<R> {
    parser: Rc<dyn Expression<R>>,
    node: Rc<dyn GrammarNode>,
}

impl<R> Clone for Expr<R> {
    fn clone(&self) -> Self {
        Self {
            parser: Rc::clone(&self.parser),
            node: Rc::clone(&self.node),
        }
    }
}

impl<R: 'static> Expr<R> {
    pub fn new<E: Expression<R> + 'static>(expr: Rc<E>) -> Self {
        let node: Rc<dyn GrammarNode> = expr.clone();
        Self { parser: expr, node }
    }

    pub fn tag(&self) -> &str {
        self.node.tag()
    }

    pub fn grammar(&self, grammar: &mut Grammar) {
        self.node.grammar(grammar);
    }

    pub fn parse(&self, cursor: &mut Cursor) -> Result<ParseResult<R>> {
        self.parser.parse(cursor)
    }

    pub fn node(&self) -> Rc<dyn GrammarNode> {
        Rc::clone(&self.node)
    }

    /// The grammar symbol other rules use to refer to this expression.
    pub fn sym(&self) -> Sym {
        Sym::Type(self.tag().to_string())
    }
}

impl<R> fmt::Debug for Expr<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Expr").field(&self.node.tag()).finish()
    }
}

/// Conversion into an [`Expr`], implemented for every expression handle and
/// for references to them.
pub trait IntoExpr {
    type Output: 'static;

    fn into_expr(self) -> Expr<Self::Output>;
}

impl<R: 'static> IntoExpr for Expr<R> {
    type Output = R;

    fn into_expr(self) -> Expr<R> {
        self
    }
}

impl<R: 'static> IntoExpr for &Expr<R> {
    type Output = R;

    fn into_expr(self) -> Expr<R> {
        self.clone()
    }
}
