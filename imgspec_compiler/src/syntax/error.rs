//! Clause splitting errors with global logging code mapping

use crate::config::compile_time::lexical::MAX_CLAUSE_LENGTH;
use crate::logging::{codes, Code};
use crate::utils::{Position, Span};

pub type SplitResult<T> = Result<T, SplitError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SplitError {
    #[error("Clause too long: {length} bytes (max {MAX_CLAUSE_LENGTH})")]
    ClauseTooLong { length: usize },

    #[error("Missing parameter name before ':' at {position}")]
    EmptyKey { position: Position },

    #[error("Unterminated quoted value starting at {position}")]
    UnterminatedQuote { position: Position },

    #[error("Unexpected text '{text}' after quoted value at {position}")]
    UnexpectedAfterQuote { text: String, position: Position },
}

impl SplitError {
    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::ClauseTooLong { .. } => codes::syntax::CLAUSE_TOO_LONG,
            Self::EmptyKey { .. } => codes::syntax::EMPTY_KEY,
            Self::UnterminatedQuote { .. } => codes::syntax::UNTERMINATED_QUOTE,
            Self::UnexpectedAfterQuote { .. } => codes::syntax::UNEXPECTED_AFTER_QUOTE,
        }
    }

    /// Span within the clause text, when the error has a location
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::ClauseTooLong { .. } => None,
            Self::EmptyKey { position } | Self::UnterminatedQuote { position } => {
                Some(Span::point(*position))
            }
            Self::UnexpectedAfterQuote { text, position } => Some(Span::covering(*position, text)),
        }
    }
}
