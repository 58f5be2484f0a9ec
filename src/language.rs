//! The root of a command language.
//!
//! A [`Language`] binds a name to a root expression. It is what programs
//! and grammars are requested from: the root must consume the whole input,
//! and the grammar starts from a `l.<name>` entry.

use tracing::{debug, instrument};

use crate::debug::DebugNode;
use crate::errors::{KrikataError, Result};
use crate::exec::ParseResult;
use crate::expr::{Expr, IntoExpr};
use crate::grammar::{Grammar, Sym};
use crate::syntax::Cursor;

pub struct Language<R> {
    name: String,
    root: Expr<R>,
}

impl<R> Clone for Language<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            root: self.root.clone(),
        }
    }
}

impl<R: 'static> Language<R> {
    pub fn new<E: IntoExpr<Output = R>>(name: impl AsRef<str>, root: E) -> Self {
        Self {
            name: format!("l.{}", name.as_ref()),
            root: root.into_expr(),
        }
    }

    /// The language's tag, `l.<name>`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Expr<R> {
        &self.root
    }

    /// Derives the grammar of everything reachable from the root.
    pub fn grammar(&self) -> Grammar {
        let mut grammar = Grammar::new();
        grammar.insert(self.name.clone(), vec![vec![self.root.sym(), Sym::Eoi]]);
        self.root.grammar(&mut grammar);
        debug!(language = %self.name, rules = grammar.len(), "grammar derived");
        grammar
    }

    /// Parses a whole program. Nothing runs until the result is executed.
    pub fn parse(&self, cursor: &mut Cursor) -> Result<ParseResult<R>> {
        let (trace, executor) = self.root.parse(cursor)?.into_parts();
        if !cursor.finished() {
            let token = cursor.next(&self.name)?;
            return Err(KrikataError::TrailingInput {
                token: token.value.to_string(),
                position: token.position,
            });
        }
        Ok(ParseResult::new(
            DebugNode::branch(self.name.as_str(), vec![trace]),
            executor,
        ))
    }

    pub fn parse_args<I, S>(&self, args: I) -> Result<ParseResult<R>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.parse(&mut Cursor::from_args(args))
    }

    /// Parses and executes a program.
    #[instrument(level = "debug", skip_all, fields(language = %self.name))]
    pub async fn run<I, S>(&self, args: I) -> Result<R>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.parse_args(args)?.resolve().await
    }
}
