//! The Krikata command-line front end.
//!
//! Every binary is the same program around a different [`Language`]: the
//! process arguments are the program, `--grammar` prints the grammar
//! instead, and `--repl` reads programs from stdin.

use std::fmt::Display;
use std::process::ExitCode;
use std::sync::Once;

use tracing::debug;

use crate::errors::{print_report, ProgramSource, Result};
use crate::language::Language;
use crate::repl;

pub mod args;
pub mod output;

pub use args::{CliArgs, TraceFormat};
pub use output::Printer;

static TRACING_INIT: Once = Once::new();

/// Installs a stderr `fmt` subscriber when `KRIKATA_LOG` or `RUST_LOG` is
/// set. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = match std::env::var("KRIKATA_LOG") {
            Ok(directives) => EnvFilter::new(directives),
            Err(_) if std::env::var("RUST_LOG").is_ok() => EnvFilter::from_default_env(),
            Err(_) => return,
        };
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter)
            .try_init();
    });
}

/// Runs the command line against `language` and maps the outcome to an
/// exit code. Errors are printed, never panicked on.
pub async fn run<R: Display + 'static>(language: &Language<R>, args: CliArgs) -> ExitCode {
    init_tracing();
    let mut printer = Printer::new();

    let outcome = if args.repl {
        repl::run_repl(language, &mut printer).await
    } else {
        run_program(language, &args, &mut printer).await
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            debug!(kind = ?error.kind(), "program failed");
            if args.diagnostics {
                print_report(ProgramSource::new("program", &args.program).locate(error));
            } else if printer.error(&error).is_err() {
                eprintln!("{}", error.summary());
            }
            ExitCode::FAILURE
        }
    }
}

async fn run_program<R: Display + 'static>(
    language: &Language<R>,
    args: &CliArgs,
    printer: &mut Printer,
) -> Result<()> {
    if args.grammar {
        printer.grammar(&language.grammar())?;
        return Ok(());
    }

    printer.echo(&args.program)?;
    let parsed = language.parse_args(&args.program)?;
    if args.trace {
        printer.trace(&parsed.debug, args.trace_format)?;
    }
    let value = parsed.resolve().await?;
    printer.result(&value)?;
    Ok(())
}
