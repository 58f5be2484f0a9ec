//! Rewindable cursor over pre-split tokens.
//!
//! The cursor supports exactly one step of undo: `undo()` is the inverse of
//! the most recent `next()`, which is all the dispatcher and the repeat
//! combinators need for their one-token lookahead.

use tracing::trace;

use crate::errors::KrikataError;
use crate::syntax::Token;

#[derive(Debug, Clone)]
pub struct Cursor {
    tokens: Vec<Token>,
    index: usize,
}

impl Cursor {
    /// Builds a cursor from any list of words.
    ///
    /// ```ignore
    /// let cursor = Cursor::from_args(["add", "1", "2"]);
    /// ```
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = args
            .into_iter()
            .enumerate()
            .map(|(position, value)| Token::new(value.as_ref(), position))
            .collect();
        Self { tokens, index: 0 }
    }

    /// Builds a cursor from the process arguments, skipping the program name.
    pub fn from_env() -> Self {
        Self::from_args(std::env::args().skip(1))
    }

    /// True once every token has been consumed.
    pub fn finished(&self) -> bool {
        self.index == self.tokens.len()
    }

    /// True if there is a next token.
    pub fn peek(&self) -> bool {
        self.index < self.tokens.len()
    }

    /// Steps back over the most recently consumed token.
    pub fn undo(&mut self) -> &mut Self {
        debug_assert!(self.index > 0, "undo without a preceding next");
        self.index = self.index.saturating_sub(1);
        trace!(pos = self.index, "cursor undo");
        self
    }

    /// Consumes the next token.
    ///
    /// `expected` names what the caller was trying to read and ends up in
    /// the [`KrikataError::ParserExhausted`] error when input ran out.
    pub fn next(&mut self, expected: &str) -> Result<Token, KrikataError> {
        match self.tokens.get(self.index) {
            Some(token) => {
                let token = token.clone();
                self.index += 1;
                trace!(pos = token.position, value = %token.value, expected, "cursor next");
                Ok(token)
            }
            None => Err(KrikataError::ParserExhausted {
                expected: expected.to_string(),
                position: self.index,
            }),
        }
    }

    /// Index of the last consumed token, if any.
    pub fn last_index(&self) -> Option<usize> {
        self.index.checked_sub(1)
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_walks_tokens_in_order() {
        let mut cursor = Cursor::from_args(["a", "b"]);
        assert_eq!(cursor.next("x").unwrap().as_str(), "a");
        assert_eq!(cursor.next("x").unwrap().as_str(), "b");
        assert!(cursor.finished());
        assert!(!cursor.peek());
    }

    #[test]
    fn undo_restores_peek_and_finished() {
        let mut cursor = Cursor::from_args(["a", "b", "c"]);
        for _ in 0..3 {
            let before = (cursor.peek(), cursor.finished(), cursor.position());
            let token = cursor.next("x").unwrap();
            cursor.undo();
            assert_eq!(before, (cursor.peek(), cursor.finished(), cursor.position()));
            // step forward for the next round
            assert_eq!(cursor.next("x").unwrap(), token);
        }
        assert!(cursor.finished());
    }

    #[test]
    fn exhausted_cursor_names_the_expected_tag() {
        let mut cursor = Cursor::from_args(Vec::<String>::new());
        match cursor.next("value") {
            Err(KrikataError::ParserExhausted { expected, position }) => {
                assert_eq!(expected, "value");
                assert_eq!(position, 0);
            }
            other => panic!("expected ParserExhausted, got {other:?}"),
        }
    }

    #[test]
    fn tokens_carry_their_positions() {
        let mut cursor = Cursor::from_args(["x", "y"]);
        cursor.next("t").unwrap();
        let y = cursor.next("t").unwrap();
        assert_eq!(y.position, 1);
        assert_eq!(cursor.last_index(), Some(1));
    }
}
