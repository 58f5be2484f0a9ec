//! Krikata REPL (Read-Eval-Print Loop)
//!
//! Reads one program per line from stdin, splits it on whitespace and runs
//! it against a [`Language`], printing the trace and the result. Errors are
//! reported and the loop keeps going.

use std::fmt::Display;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::cli::output::Printer;
use crate::errors::Result;
use crate::language::Language;
use crate::syntax::split_line;

/// What one evaluated line produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub tokens: String,
    pub typed: String,
    pub value: String,
}

/// Parses and runs a single line.
pub async fn eval_line<R: Display + 'static>(
    language: &Language<R>,
    line: &str,
) -> Result<Evaluation> {
    let parsed = language.parse_args(split_line(line))?;
    let tokens = parsed.debug.show_tokens();
    let typed = parsed.debug.typed_tokens();
    let value = parsed.resolve().await?.to_string();
    Ok(Evaluation {
        tokens,
        typed,
        value,
    })
}

/// REPL command results
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Continue,
    Quit,
}

/// Main REPL entry point. Returns when stdin closes or on `:quit`.
pub async fn run_repl<R: Display + 'static>(
    language: &Language<R>,
    printer: &mut Printer,
) -> Result<()> {
    printer.line(&format!("{} REPL", language.name()))?;
    printer.line("Type :help for help, :quit to exit")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        printer.prompt("> ")?;
        let Some(line) = lines.next_line().await? else {
            printer.line("")?;
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with(':') {
            match handle_repl_command(line, language, printer)? {
                ReplCommand::Continue => continue,
                ReplCommand::Quit => break,
            }
        }

        match eval_line(language, line).await {
            Ok(evaluation) => {
                printer.line(&evaluation.tokens)?;
                printer.line(&evaluation.typed)?;
                printer.result(&evaluation.value)?;
            }
            Err(error) => {
                debug!(line, "line failed");
                printer.error(&error)?;
            }
        }
    }
    Ok(())
}

/// Handle special REPL commands that start with ':'
fn handle_repl_command<R: 'static>(
    command: &str,
    language: &Language<R>,
    printer: &mut Printer,
) -> Result<ReplCommand> {
    match command {
        ":help" | ":h" => {
            printer.line("  :help, :h      Show this help")?;
            printer.line("  :grammar, :g   Print the grammar")?;
            printer.line("  :quit, :q      Exit the REPL")?;
            printer.line("Anything else is run as a program.")?;
        }
        ":grammar" | ":g" => printer.grammar(&language.grammar())?,
        ":quit" | ":q" => return Ok(ReplCommand::Quit),
        _ => printer.line(&format!(
            "Unknown command: {command}. Type :help for available commands."
        ))?,
    }
    Ok(ReplCommand::Continue)
}
