//! Zero-or-more repetition.
//!
//! [`Repeat`] and [`Parallel`] parse the same way: child after child until
//! the input runs out or the optional exit keyword is consumed. They differ
//! only at execution time. A `Repeat` runs its children one after the other;
//! a `Parallel` starts all of them and waits for every one to finish.

use std::rc::Rc;

use tracing::trace;

use crate::debug::DebugNode;
use crate::errors::Result;
use crate::exec::{self, Executor, ParseResult};
use crate::expr::{Expr, Expression, GrammarNode, IntoExpr};
use crate::grammar::{Grammar, Sym};
use crate::syntax::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Sequential,
    Joined,
}

impl Mode {
    fn prefix(self) -> &'static str {
        match self {
            Mode::Sequential => "r",
            Mode::Joined => "p",
        }
    }
}

struct RepeatCore<R> {
    tag: String,
    child: Expr<R>,
    exit: Option<String>,
    mode: Mode,
}

impl<R: 'static> RepeatCore<R> {
    fn new(mode: Mode, child: Expr<R>, exit: Option<String>) -> Self {
        RepeatCore {
            tag: format!("{}.{}", mode.prefix(), child.tag()),
            child,
            exit,
            mode,
        }
    }

    fn exit_tag(&self) -> String {
        format!("{}.exit", self.tag)
    }
}

impl<R: 'static> GrammarNode for RepeatCore<R> {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn grammar(&self, grammar: &mut Grammar) {
        if grammar.contains(&self.tag) {
            return;
        }
        let child = self.child.tag().to_string();
        let mut alternatives = vec![vec![Sym::Repeat(child.clone()), Sym::Eoi]];
        if let Some(exit) = &self.exit {
            alternatives.push(vec![Sym::Repeat(child), Sym::Exact(exit.clone())]);
        }
        grammar.insert(self.tag.clone(), alternatives);
        self.child.grammar(grammar);
    }
}

impl<R: 'static> Expression<Vec<R>> for RepeatCore<R> {
    fn parse(&self, cursor: &mut Cursor) -> Result<ParseResult<Vec<R>>> {
        let mut debug = Vec::new();
        let mut executors = Vec::new();

        while !cursor.finished() {
            if let Some(exit) = &self.exit {
                let token = cursor.next(&self.tag)?;
                if token.as_str() == exit {
                    debug.push(DebugNode::leaf(self.exit_tag(), token));
                    break;
                }
                cursor.undo();
            }
            let ParseResult {
                debug: node,
                executor,
            } = self.child.parse(cursor)?;
            debug.push(node);
            executors.push(executor);
        }
        trace!(tag = %self.tag, count = executors.len(), "repetition collected");

        let mode = self.mode;
        let executor = Executor::new(move || match mode {
            Mode::Sequential => exec::sequence(executors),
            Mode::Joined => exec::join(executors),
        });
        Ok(ParseResult::new(
            DebugNode::branch(self.tag.as_str(), debug),
            executor,
        ))
    }
}

macro_rules! repetition_handle {
    ($(#[$doc:meta])* $name:ident, $mode:expr) => {
        $(#[$doc])*
        pub struct $name<R>(Rc<RepeatCore<R>>);

        impl<R> Clone for $name<R> {
            fn clone(&self) -> Self {
                $name(Rc::clone(&self.0))
            }
        }

        impl<R: 'static> $name<R> {
            /// Repeats until the input ends.
            pub fn new<E: IntoExpr<Output = R>>(child: E) -> Self {
                $name(Rc::new(RepeatCore::new($mode, child.into_expr(), None)))
            }

            /// Repeats until the input ends or `exit` is read.
            pub fn with_exit<E: IntoExpr<Output = R>>(child: E, exit: impl Into<String>) -> Self {
                $name(Rc::new(RepeatCore::new(
                    $mode,
                    child.into_expr(),
                    Some(exit.into()),
                )))
            }

            pub fn tag(&self) -> &str {
                &self.0.tag
            }

            pub fn exit(&self) -> Option<&str> {
                self.0.exit.as_deref()
            }
        }

        impl<R: 'static> IntoExpr for $name<R> {
            type Output = Vec<R>;

            fn into_expr(self) -> Expr<Vec<R>> {
                Expr::new(self.0)
            }
        }

        impl<R: 'static> IntoExpr for &$name<R> {
            type Output = Vec<R>;

            fn into_expr(self) -> Expr<Vec<R>> {
                Expr::new(Rc::clone(&self.0))
            }
        }
    };
}

repetition_handle!(
    /// Runs the collected children in order, each one finishing before the
    /// next starts.
    Repeat,
    Mode::Sequential
);

repetition_handle!(
    /// Starts every collected child, then waits for all of them. Fails with
    /// the first error observed; the remaining children still run to
    /// completion.
    Parallel,
    Mode::Joined
);
