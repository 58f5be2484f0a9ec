//! Handles all user-facing output for the CLI and the REPL.
//!
//! Results go to stdout, errors to stderr. Colour is only used when the
//! stream is a terminal.

use std::fmt::Display;
use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::cli::args::TraceFormat;
use crate::debug::DebugNode;
use crate::errors::KrikataError;
use crate::grammar::Grammar;

fn color_choice(stream: atty::Stream) -> ColorChoice {
    if atty::is(stream) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

pub struct Printer {
    stdout: StandardStream,
    stderr: StandardStream,
}

impl Printer {
    pub fn new() -> Self {
        Self {
            stdout: StandardStream::stdout(color_choice(atty::Stream::Stdout)),
            stderr: StandardStream::stderr(color_choice(atty::Stream::Stderr)),
        }
    }

    /// `> add 1 2`, echoing the program about to run.
    pub fn echo(&mut self, program: &[String]) -> io::Result<()> {
        self.stdout
            .set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_dimmed(true))?;
        write!(self.stdout, "> {}", program.join(" "))?;
        self.stdout.reset()?;
        writeln!(self.stdout)
    }

    pub fn result(&mut self, value: &dyn Display) -> io::Result<()> {
        self.stdout
            .set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        write!(self.stdout, "{value}")?;
        self.stdout.reset()?;
        writeln!(self.stdout)
    }

    pub fn trace(&mut self, debug: &DebugNode, format: TraceFormat) -> io::Result<()> {
        match format {
            TraceFormat::Text => {
                writeln!(self.stdout, "{}", debug.show_tokens())?;
                writeln!(self.stdout, "{}", debug.typed_tokens())
            }
            TraceFormat::Json => {
                let json = serde_json::to_string_pretty(debug)?;
                writeln!(self.stdout, "{json}")
            }
        }
    }

    pub fn grammar(&mut self, grammar: &Grammar) -> io::Result<()> {
        write!(self.stdout, "{grammar}")?;
        self.stdout.flush()
    }

    /// Plain text, no colour.
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.stdout, "{text}")
    }

    pub fn prompt(&mut self, prompt: &str) -> io::Result<()> {
        write!(self.stdout, "{prompt}")?;
        self.stdout.flush()
    }

    /// `<ErrorKind>: <message>` on stderr.
    pub fn error(&mut self, error: &KrikataError) -> io::Result<()> {
        self.stderr
            .set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(self.stderr, "{}", error.name())?;
        self.stderr.reset()?;
        writeln!(self.stderr, ": {error}")
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}
