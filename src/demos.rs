//! Ready-made languages.
//!
//! These double as usage examples and as the languages behind the bundled
//! binaries.

pub mod calc;
pub mod greet;
pub mod sleep;
pub mod toolbox;
