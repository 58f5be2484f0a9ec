//! Named types: keyword dispatch with an optional default.
//!
//! A [`Type`] looks at the next token without committing to it. If the
//! token is one of its keywords, the matching [`Funct`] parses from there
//! (re-reading the keyword itself). Otherwise the cursor is left where it
//! was and the default expression, if any, gets the input. Matching is
//! exact and case-sensitive.
//!
//! Types are declared and defined in two steps so that a type can refer to
//! itself, or to types declared later:
//!
//! ```ignore
//! let value = Type::<f64>::declare("value");
//! value.define(
//!     Dispatch::new()
//!         .funct(Func::new("add").arg(&value).arg(&value).exec(|l, r| l + r))
//!         .default(&prims.number),
//! )?;
//! ```
//!
//! Once defined, the keyword table is frozen.

use std::rc::Rc;

use once_cell::unsync::OnceCell;
use tracing::{debug, trace, warn};

use crate::debug::DebugNode;
use crate::errors::{KrikataError, Result};
use crate::exec::ParseResult;
use crate::expr::{Expr, Expression, Funct, FunctParse, GrammarNode, IntoExpr};
use crate::grammar::{Alternative, Grammar};
use crate::syntax::{Cursor, Token};

// ============================================================================
// CONSTRUCTION PHASE
// ============================================================================

/// Keyword table under construction.
pub struct Dispatch<R> {
    functs: Vec<Funct<R>>,
    default: Option<Expr<R>>,
}

impl<R: 'static> Dispatch<R> {
    pub fn new() -> Self {
        Self {
            functs: Vec::new(),
            default: None,
        }
    }

    /// Registers a rule. A later rule with the same keyword replaces the
    /// earlier one in place.
    pub fn funct(mut self, funct: Funct<R>) -> Self {
        match self
            .functs
            .iter_mut()
            .find(|f| f.keyword() == funct.keyword())
        {
            Some(slot) => *slot = funct,
            None => self.functs.push(funct),
        }
        self
    }

    pub fn functs(self, functs: impl IntoIterator<Item = Funct<R>>) -> Self {
        functs.into_iter().fold(self, Dispatch::funct)
    }

    /// Expression to parse when no keyword matches.
    pub fn default<E: IntoExpr<Output = R>>(mut self, expr: E) -> Self {
        self.default = Some(expr.into_expr());
        self
    }
}

impl<R: 'static> Default for Dispatch<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// The frozen form of a [`Dispatch`].
struct Table<R> {
    functs: Vec<Funct<R>>,
    keywords: im::HashMap<String, usize>,
    default: Option<Expr<R>>,
}

impl<R: 'static> From<Dispatch<R>> for Table<R> {
    fn from(dispatch: Dispatch<R>) -> Self {
        let keywords = dispatch
            .functs
            .iter()
            .enumerate()
            .map(|(i, f)| (f.keyword().to_string(), i))
            .collect();
        Table {
            functs: dispatch.functs,
            keywords,
            default: dispatch.default,
        }
    }
}

impl<R: 'static> Table<R> {
    fn lookup(&self, keyword: &str) -> Option<&Funct<R>> {
        self.keywords.get(keyword).map(|&i| &self.functs[i])
    }

    fn alternatives(&self) -> Vec<Alternative> {
        let mut alternatives: Vec<Alternative> =
            self.functs.iter().map(Funct::alternative).collect();
        if let Some(default) = &self.default {
            alternatives.push(vec![default.sym()]);
        }
        alternatives
    }
}

// ============================================================================
// TYPE
// ============================================================================

pub struct Type<R>(Rc<TypeCore<R>>);

struct TypeCore<R> {
    tag: String,
    table: OnceCell<Table<R>>,
}

impl<R> Clone for Type<R> {
    fn clone(&self) -> Self {
        Type(Rc::clone(&self.0))
    }
}

impl<R: 'static> Type<R> {
    /// A type with no rules yet; see [`Type::define`].
    pub fn declare(name: impl Into<String>) -> Self {
        Type(Rc::new(TypeCore {
            tag: name.into(),
            table: OnceCell::new(),
        }))
    }

    /// Declares and defines in one step, for types that do not refer to
    /// themselves.
    pub fn new(name: impl Into<String>, dispatch: Dispatch<R>) -> Self {
        Type(Rc::new(TypeCore {
            tag: name.into(),
            table: OnceCell::from(Table::from(dispatch)),
        }))
    }

    /// A type holding one rule, named after its keyword.
    pub fn from_funct(funct: Funct<R>) -> Self {
        let name = funct.keyword().to_string();
        Type::new(name, Dispatch::new().funct(funct))
    }

    /// Freezes the keyword table. Fails if the type is already defined.
    pub fn define(&self, dispatch: Dispatch<R>) -> Result<()> {
        self.0
            .table
            .set(Table::from(dispatch))
            .map_err(|_| KrikataError::AlreadyDefined {
                tag: self.0.tag.clone(),
            })?;
        debug!(tag = %self.0.tag, "type defined");
        Ok(())
    }

    pub fn is_defined(&self) -> bool {
        self.0.table.get().is_some()
    }

    pub fn tag(&self) -> &str {
        &self.0.tag
    }

    /// Registered keywords, in registration order.
    pub fn keywords(&self) -> Vec<&str> {
        self.0
            .table
            .get()
            .map(|table| table.functs.iter().map(Funct::keyword).collect())
            .unwrap_or_default()
    }

    pub fn has_default(&self) -> bool {
        self.0
            .table
            .get()
            .is_some_and(|table| table.default.is_some())
    }
}

impl<R: 'static> GrammarNode for TypeCore<R> {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn grammar(&self, grammar: &mut Grammar) {
        if grammar.contains(&self.tag) {
            return;
        }
        let Some(table) = self.table.get() else {
            warn!(tag = %self.tag, "grammar requested for an undefined type");
            grammar.insert(self.tag.clone(), Vec::new());
            return;
        };

        // Register first: the children below may lead back here.
        grammar.insert(self.tag.clone(), table.alternatives());

        for funct in &table.functs {
            for arg in funct.args() {
                arg.grammar(grammar);
            }
        }
        if let Some(default) = &table.default {
            default.grammar(grammar);
        }
    }
}

impl<R> TypeCore<R> {
    fn dispatch_failure(&self, token: &Token) -> KrikataError {
        KrikataError::DispatchFailure {
            token: token.value.to_string(),
            position: token.position,
            expected: self.tag.clone(),
        }
    }
}

impl<R: 'static> Expression<R> for TypeCore<R> {
    fn parse(&self, cursor: &mut Cursor) -> Result<ParseResult<R>> {
        let table = self.table.get().ok_or_else(|| KrikataError::UndefinedType {
            tag: self.tag.clone(),
        })?;

        let token = cursor.next(&self.tag)?;
        cursor.undo();

        if let Some(funct) = table.lookup(token.as_str()) {
            trace!(tag = %self.tag, keyword = %token, "keyword dispatch");
            let FunctParse {
                keyword,
                args,
                executor,
            } = funct.parse(cursor)?;
            let debug = DebugNode::branch(self.tag.as_str(), args)
                .prepend(self.tag.as_str(), DebugNode::leaf("fn", keyword));
            return Ok(ParseResult::new(debug, executor));
        }

        match &table.default {
            Some(default) => {
                trace!(tag = %self.tag, fallback = default.tag(), "default dispatch");
                default.parse(cursor).map_err(|error| match error {
                    // Neither a keyword nor a literal: the dispatch itself failed.
                    KrikataError::ConversionFailure { position, .. }
                        if position == token.position =>
                    {
                        self.dispatch_failure(&token)
                    }
                    other => other,
                })
            }
            None => Err(self.dispatch_failure(&token)),
        }
    }
}

impl<R: 'static> IntoExpr for Type<R> {
    type Output = R;

    fn into_expr(self) -> Expr<R> {
        Expr::new(self.0)
    }
}

impl<R: 'static> IntoExpr for &Type<R> {
    type Output = R;

    fn into_expr(self) -> Expr<R> {
        Expr::new(Rc::clone(&self.0))
    }
}
