//! Input side of the engine.
//!
//! Krikata performs no lexing: a program arrives as an ordered list of
//! strings that were already split (by the shell, by whitespace, or by the
//! embedding program). This module turns that list into [`Token`]s and hands
//! out a rewindable [`Cursor`] over them.

pub mod cursor;
pub mod token;

pub use cursor::Cursor;
pub use token::Token;

/// Splits a line of text on whitespace, dropping empty pieces.
///
/// This is the only "lexing" the crate offers and it exists for line-based
/// front ends such as the REPL.
pub fn split_line(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_line_drops_repeated_whitespace() {
        assert_eq!(split_line("  add 1\t 2  "), vec!["add", "1", "2"]);
        assert!(split_line("   ").is_empty());
    }
}
