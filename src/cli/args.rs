//! Command-line arguments shared by every binary built on a [`Language`].
//!
//! [`Language`]: crate::language::Language

use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(version, about = "Run a program written in a krikata command language.")]
pub struct CliArgs {
    /// Print the language's grammar and exit.
    #[arg(long)]
    pub grammar: bool,

    /// Print the parse trace before the result.
    #[arg(long)]
    pub trace: bool,

    /// How to print the parse trace.
    #[arg(long, value_enum, default_value_t = TraceFormat::Text)]
    pub trace_format: TraceFormat,

    /// Report errors with the program text and a pointer at the failing token.
    #[arg(long)]
    pub diagnostics: bool,

    /// Read programs line by line from stdin instead.
    #[arg(long)]
    pub repl: bool,

    /// The program, one token per argument.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub program: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TraceFormat {
    /// Plain token tree, then the type-tagged tree.
    Text,
    /// The trace as a JSON document.
    Json,
}
