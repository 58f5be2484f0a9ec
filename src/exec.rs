//! Deferred execution.
//!
//! Parsing never runs user code; it produces an [`Executor`] per parsed
//! expression. Running an executor yields an [`Outcome`], which is either a
//! value that is already available or a future that still has to be polled.
//! Combinators treat both cases the same way and only box a future once a
//! handler actually suspends, so a fully synchronous language never touches
//! an async runtime.

use std::future::{Future, IntoFuture};

use futures::future::{self, FutureExt, LocalBoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::debug;

use crate::debug::DebugNode;
use crate::errors::{KrikataError, Result};

// ============================================================================
// OUTCOME
// ============================================================================

pub enum Outcome<R> {
    Ready(Result<R>),
    Pending(LocalBoxFuture<'static, Result<R>>),
}

impl<R: 'static> Outcome<R> {
    pub fn ready(value: R) -> Self {
        Outcome::Ready(Ok(value))
    }

    pub fn fail(error: KrikataError) -> Self {
        Outcome::Ready(Err(error))
    }

    pub fn from_result(result: Result<R>) -> Self {
        Outcome::Ready(result)
    }

    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<R>> + 'static,
    {
        Outcome::Pending(future.boxed_local())
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Outcome::Ready(_))
    }

    pub fn map<U: 'static>(self, f: impl FnOnce(R) -> U + 'static) -> Outcome<U> {
        match self {
            Outcome::Ready(result) => Outcome::Ready(result.map(f)),
            Outcome::Pending(fut) => Outcome::pending(async move { fut.await.map(f) }),
        }
    }

    /// Runs `f` once this outcome has a value.
    ///
    /// Stays synchronous while both sides are ready.
    pub fn and_then<U: 'static>(self, f: impl FnOnce(R) -> Outcome<U> + 'static) -> Outcome<U> {
        match self {
            Outcome::Ready(Ok(value)) => f(value),
            Outcome::Ready(Err(error)) => Outcome::fail(error),
            Outcome::Pending(fut) => Outcome::pending(async move {
                let value = fut.await?;
                f(value).await
            }),
        }
    }

    /// Awaits the value.
    pub async fn resolve(self) -> Result<R> {
        self.await
    }

    /// Drives the outcome to completion on the current thread.
    ///
    /// Handlers that rely on a `tokio` reactor (timers, `tokio::fs`) must be
    /// awaited inside a runtime instead.
    pub fn block_on(self) -> Result<R> {
        match self {
            Outcome::Ready(result) => result,
            Outcome::Pending(fut) => futures::executor::block_on(fut),
        }
    }
}

impl<R: 'static> IntoFuture for Outcome<R> {
    type Output = Result<R>;
    type IntoFuture = LocalBoxFuture<'static, Result<R>>;

    fn into_future(self) -> Self::IntoFuture {
        match self {
            Outcome::Ready(result) => future::ready(result).boxed_local(),
            Outcome::Pending(fut) => fut,
        }
    }
}

// ============================================================================
// EXECUTOR & PARSE RESULT
// ============================================================================

/// A one-shot, zero-argument deferred computation.
pub struct Executor<R>(Box<dyn FnOnce() -> Outcome<R>>);

impl<R: 'static> Executor<R> {
    pub fn new(f: impl FnOnce() -> Outcome<R> + 'static) -> Self {
        Executor(Box::new(f))
    }

    /// An executor that yields an already known value.
    pub fn value(value: R) -> Self {
        Executor::new(move || Outcome::ready(value))
    }

    pub fn run(self) -> Outcome<R> {
        (self.0)()
    }
}

/// What a successful parse produces: the trace and the deferred program.
pub struct ParseResult<R> {
    pub debug: DebugNode,
    pub executor: Executor<R>,
}

impl<R: 'static> ParseResult<R> {
    pub fn new(debug: DebugNode, executor: Executor<R>) -> Self {
        Self { debug, executor }
    }

    /// Starts execution. Has no effect on the cursor the result came from.
    pub fn execute(self) -> Outcome<R> {
        self.executor.run()
    }

    /// Executes and awaits the result.
    pub async fn resolve(self) -> Result<R> {
        self.execute().await
    }

    pub fn into_parts(self) -> (DebugNode, Executor<R>) {
        (self.debug, self.executor)
    }
}

// ============================================================================
// COMBINING EXECUTORS
// ============================================================================

/// Runs executors one after another, each starting only after the previous
/// one has produced its value. Stops at the first failure.
pub fn sequence<T: 'static>(executors: Vec<Executor<T>>) -> Outcome<Vec<T>> {
    let mut values = Vec::with_capacity(executors.len());
    let mut rest = executors.into_iter();
    while let Some(executor) = rest.next() {
        match executor.run() {
            Outcome::Ready(Ok(value)) => values.push(value),
            Outcome::Ready(Err(error)) => return Outcome::fail(error),
            Outcome::Pending(fut) => {
                debug!(done = values.len(), "sequence suspended");
                return Outcome::pending(async move {
                    values.push(fut.await?);
                    for executor in rest {
                        values.push(executor.run().await?);
                    }
                    Ok(values)
                });
            }
        }
    }
    Outcome::ready(values)
}

/// Starts every executor, then waits for all of them.
///
/// The result keeps the input order. If any child fails, the join still
/// waits for the remaining children and then reports the first failure it
/// observed.
pub fn join<T: 'static>(executors: Vec<Executor<T>>) -> Outcome<Vec<T>> {
    let count = executors.len();
    let mut slots: Vec<Option<T>> = (0..count).map(|_| None).collect();
    let mut first_error: Option<KrikataError> = None;
    let mut pending = FuturesUnordered::new();

    for (index, executor) in executors.into_iter().enumerate() {
        match executor.run() {
            Outcome::Ready(Ok(value)) => slots[index] = Some(value),
            Outcome::Ready(Err(error)) => {
                first_error.get_or_insert(error);
            }
            Outcome::Pending(fut) => pending.push(async move { (index, fut.await) }),
        }
    }

    if pending.is_empty() {
        return Outcome::from_result(collect_slots(slots, first_error));
    }

    debug!(count, suspended = pending.len(), "join waiting on children");
    Outcome::pending(async move {
        while let Some((index, result)) = pending.next().await {
            match result {
                Ok(value) => slots[index] = Some(value),
                Err(error) => {
                    first_error.get_or_insert(error);
                }
            }
        }
        collect_slots(slots, first_error)
    })
}

fn collect_slots<T>(slots: Vec<Option<T>>, error: Option<KrikataError>) -> Result<Vec<T>> {
    match error {
        Some(error) => Err(error),
        None => Ok(slots.into_iter().flatten().collect()),
    }
}
