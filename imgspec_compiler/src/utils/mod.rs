//! Shared primitive types used by the lexer, the clause splitter and diagnostics.

pub mod span;

pub use span::{format_error, Position, Span};
