use std::fmt;
use std::rc::Rc;

use serde::Serialize;

/// One pre-split input word together with its index in the argument list.
///
/// The text is reference counted so that handing a token out of the cursor,
/// or recording it in a trace, never copies the string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub value: Rc<str>,
    pub position: usize,
}

impl Token {
    pub fn new(value: impl Into<Rc<str>>, position: usize) -> Self {
        Self {
            value: value.into(),
            position,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Renders the token with its position, for error messages.
    pub fn at(&self) -> String {
        format!("\"{}\" at index {}", self.value, self.position)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
