//! Clause compilation errors with global logging code mapping

use crate::lexical::LexerError;
use crate::logging::{codes, Code};
use crate::spec::ErrorRateError;
use crate::syntax::SplitError;
use crate::utils::Span;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error("Unknown image check parameter '{key}'")]
    UnknownParameter { key: String },

    #[error("Unknown image filter '{name}'")]
    UnknownFilter { name: String },

    #[error("Parameter '{field}' must be a non-negative integer, got '{value}'")]
    InvalidInteger { field: String, value: String },

    #[error("No images defined: at least one 'file' parameter is required")]
    NoImagesDefined,

    #[error(transparent)]
    Lexer(#[from] LexerError),

    #[error(transparent)]
    ErrorRate(#[from] ErrorRateError),

    #[error(transparent)]
    Split(#[from] SplitError),

    #[error("Too many {what} in one clause (max {limit})")]
    LimitExceeded { what: &'static str, limit: usize },
}

impl CompileError {
    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::UnknownParameter { .. } => codes::clause::UNKNOWN_PARAMETER,
            Self::UnknownFilter { .. } => codes::clause::UNKNOWN_FILTER,
            Self::InvalidInteger { .. } => codes::clause::INVALID_INTEGER,
            Self::NoImagesDefined => codes::clause::NO_IMAGES_DEFINED,
            Self::Lexer(e) => e.error_code(),
            Self::ErrorRate(e) => e.error_code(),
            Self::Split(e) => e.error_code(),
            Self::LimitExceeded { .. } => codes::clause::LIMIT_EXCEEDED,
        }
    }

    /// Span within the text that failed, when one is known.
    ///
    /// Lexer spans are relative to the parameter value; splitter spans are
    /// relative to the whole clause.
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lexer(e) => Some(e.span()),
            Self::Split(e) => e.span(),
            _ => None,
        }
    }
}
