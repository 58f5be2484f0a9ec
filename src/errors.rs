//! Krikata Error Handling
//!
//! A single error type covers every failure the engine can report: the four
//! parse failures, definition mistakes made while building a language, and
//! failures raised by handlers at execution time. Parse failures carry the
//! index of the offending token so that front ends can point at it.

use std::fmt;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

pub type Result<T, E = KrikataError> = std::result::Result<T, E>;

// ============================================================================
// ERROR TYPE
// ============================================================================

#[derive(Debug, Error, Diagnostic)]
pub enum KrikataError {
    #[error("Expected <{expected}> but the input ended at index {position}.")]
    #[diagnostic(
        code(krikata::parse::exhausted),
        help("the program stops before every argument was supplied")
    )]
    ParserExhausted { expected: String, position: usize },

    #[error("Could not read \"{token}\" at index {position} as <{expected}>: {reason}.")]
    #[diagnostic(code(krikata::parse::conversion))]
    ConversionFailure {
        token: String,
        position: usize,
        expected: String,
        reason: String,
    },

    #[error("Unexpected token \"{token}\" at index {position} for type <{expected}>.")]
    #[diagnostic(
        code(krikata::parse::dispatch),
        help("run with --grammar to list the accepted keywords")
    )]
    DispatchFailure {
        token: String,
        position: usize,
        expected: String,
    },

    #[error("Unexpected token \"{token}\" at index {position}: input remains after the program.")]
    #[diagnostic(code(krikata::parse::trailing))]
    TrailingInput { token: String, position: usize },

    #[error("Expected keyword \"{expected}\" but got \"{found}\" at index {position}.")]
    #[diagnostic(code(krikata::parse::keyword))]
    KeywordMismatch {
        expected: String,
        found: String,
        position: usize,
    },

    #[error("Type <{tag}> was used before it was defined.")]
    #[diagnostic(code(krikata::define::undefined))]
    UndefinedType { tag: String },

    #[error("Type <{tag}> is already defined.")]
    #[diagnostic(code(krikata::define::duplicate))]
    AlreadyDefined { tag: String },

    #[error("{message}")]
    #[diagnostic(code(krikata::exec::handler))]
    Handler { message: String },

    #[error(transparent)]
    #[diagnostic(code(krikata::exec::io))]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`KrikataError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The token list does not match the language.
    Parse,
    /// The language itself was declared incorrectly.
    Definition,
    /// A handler failed while the parsed program ran.
    Execution,
}

impl KrikataError {
    /// Error raised from inside a handler.
    pub fn handler(message: impl fmt::Display) -> Self {
        KrikataError::Handler {
            message: message.to_string(),
        }
    }

    /// The error's kind name, as printed by the command-line front end.
    pub fn name(&self) -> &'static str {
        match self {
            KrikataError::ParserExhausted { .. } => "ParserExhausted",
            KrikataError::ConversionFailure { .. } => "ConversionFailure",
            KrikataError::DispatchFailure { .. } => "DispatchFailure",
            KrikataError::TrailingInput { .. } => "TrailingInput",
            KrikataError::KeywordMismatch { .. } => "KeywordMismatch",
            KrikataError::UndefinedType { .. } => "UndefinedType",
            KrikataError::AlreadyDefined { .. } => "AlreadyDefined",
            KrikataError::Handler { .. } => "HandlerError",
            KrikataError::Io(_) => "IoError",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            KrikataError::ParserExhausted { .. }
            | KrikataError::ConversionFailure { .. }
            | KrikataError::DispatchFailure { .. }
            | KrikataError::TrailingInput { .. }
            | KrikataError::KeywordMismatch { .. } => ErrorKind::Parse,
            // Parsing through an undefined type is a mistake in the language, not the input.
            KrikataError::UndefinedType { .. } | KrikataError::AlreadyDefined { .. } => {
                ErrorKind::Definition
            }
            KrikataError::Handler { .. } | KrikataError::Io(_) => ErrorKind::Execution,
        }
    }

    /// Index of the token the error points at, when there is one.
    pub fn position(&self) -> Option<usize> {
        match self {
            KrikataError::ParserExhausted { position, .. }
            | KrikataError::ConversionFailure { position, .. }
            | KrikataError::DispatchFailure { position, .. }
            | KrikataError::TrailingInput { position, .. }
            | KrikataError::KeywordMismatch { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// `<ErrorKind>: <message>`, the one-line rendering used by front ends.
    pub fn summary(&self) -> String {
        format!("{}: {}", self.name(), self)
    }
}

// ============================================================================
// SOURCE CONTEXT - rich reports over the joined program text
// ============================================================================

/// The program re-joined into one line, with the byte span of every token.
///
/// Tokens never had source text of their own, so this is the closest thing
/// to a source file that a miette report can point into.
#[derive(Debug, Clone)]
pub struct ProgramSource {
    name: String,
    text: String,
    spans: Vec<SourceSpan>,
}

impl ProgramSource {
    pub fn new<S: AsRef<str>>(name: impl Into<String>, args: &[S]) -> Self {
        let mut text = String::new();
        let mut spans = Vec::with_capacity(args.len());
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                text.push(' ');
            }
            let start = text.len();
            text.push_str(arg.as_ref());
            spans.push(SourceSpan::from(start..text.len()));
        }
        Self {
            name: name.into(),
            text,
            spans,
        }
    }

    /// Span for a token index; one past the end points just after the text.
    fn span_at(&self, position: usize) -> SourceSpan {
        self.spans
            .get(position)
            .copied()
            .unwrap_or_else(|| SourceSpan::from(self.text.len()..self.text.len()))
    }

    /// Wraps an error into a report labelled at the offending token.
    pub fn locate(&self, error: KrikataError) -> LocatedError {
        let span = error.position().map(|p| self.span_at(p));
        LocatedError {
            source_code: NamedSource::new(self.name.clone(), self.text.clone()),
            span,
            error,
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
#[error("{error}")]
pub struct LocatedError {
    #[diagnostic_source]
    pub error: KrikataError,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("here")]
    span: Option<SourceSpan>,
}

/// Prints an error with full miette diagnostics to stderr.
pub fn print_report(error: LocatedError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}
