//! Character cursor over a single clause value
//!
//! Reads whitespace-separated word and number tokens, tracking the column of
//! every token so failures point at the offending text.

use crate::config::compile_time::lexical::MAX_TOKEN_LENGTH;
use crate::logging::{codes, Code};
use crate::utils::{Position, Span};

/// Lexical errors raised while reading tokens from clause values
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexerError {
    #[error("Expected a word at {position} but reached end of input")]
    MissingWord { position: Position },

    #[error("Expected a number at {position} but reached end of input")]
    MissingNumber { position: Position },

    #[error("Invalid number format: '{text}' at {position}")]
    InvalidNumber { text: String, position: Position },

    #[error("Token too long: {length} characters (max {MAX_TOKEN_LENGTH}) at {position}")]
    TokenTooLong { length: usize, position: Position },

    #[error("Unexpected trailing content: '{text}' at {position}")]
    TrailingContent { text: String, position: Position },
}

impl LexerError {
    pub fn error_code(&self) -> Code {
        match self {
            LexerError::MissingWord { .. } | LexerError::MissingNumber { .. } => {
                codes::lexical::UNEXPECTED_END_OF_INPUT
            }
            LexerError::InvalidNumber { .. } => codes::lexical::INVALID_NUMBER,
            LexerError::TokenTooLong { .. } => codes::lexical::TOKEN_TOO_LONG,
            LexerError::TrailingContent { .. } => codes::lexical::TRAILING_CONTENT,
        }
    }

    /// Span of the offending text within the value that was being read
    pub fn span(&self) -> Span {
        match self {
            LexerError::MissingWord { position } | LexerError::MissingNumber { position } => {
                Span::point(*position)
            }
            LexerError::InvalidNumber { text, position }
            | LexerError::TrailingContent { text, position } => Span::covering(*position, text),
            LexerError::TokenTooLong { length, position } => Span::new(
                *position,
                Position::new(position.offset, position.column + *length as u32),
            ),
        }
    }
}

/// Cursor over clause value text
#[derive(Debug, Clone)]
pub struct CharReader<'a> {
    source: &'a str,
    position: Position,
}

impl<'a> CharReader<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: Position::start(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Unconsumed text, including any leading whitespace
    pub fn remaining(&self) -> &'a str {
        &self.source[self.position.offset..]
    }

    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    pub fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.position = self.position.advance(ch);
        }
    }

    /// Whether anything other than whitespace is left
    pub fn has_more(&self) -> bool {
        self.remaining().chars().any(|ch| !ch.is_whitespace())
    }

    /// Read a word: a maximal run of non-whitespace characters
    pub fn expect_word(&mut self) -> Result<String, LexerError> {
        match self.read_token()? {
            Some((_, word)) => Ok(word.to_string()),
            None => Err(LexerError::MissingWord {
                position: self.position,
            }),
        }
    }

    /// Read a decimal number: optional sign, digits, optional fraction
    pub fn expect_number(&mut self) -> Result<f64, LexerError> {
        let (start, text) = match self.read_token()? {
            Some(token) => token,
            None => {
                return Err(LexerError::MissingNumber {
                    position: self.position,
                })
            }
        };

        if !is_decimal_literal(text) {
            return Err(LexerError::InvalidNumber {
                text: text.to_string(),
                position: start,
            });
        }

        text.parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| LexerError::InvalidNumber {
                text: text.to_string(),
                position: start,
            })
    }

    /// Require that only whitespace remains
    pub fn expect_end(&mut self) -> Result<(), LexerError> {
        self.skip_whitespace();
        if self.has_more() {
            return Err(LexerError::TrailingContent {
                text: self.remaining().trim_end().to_string(),
                position: self.position,
            });
        }
        Ok(())
    }

    fn read_token(&mut self) -> Result<Option<(Position, &'a str)>, LexerError> {
        self.skip_whitespace();
        let start = self.position;
        let rest = self.remaining();

        let mut length = 0;
        for ch in rest.chars() {
            if ch.is_whitespace() {
                break;
            }
            self.position = self.position.advance(ch);
            length += 1;
        }

        if length == 0 {
            return Ok(None);
        }

        // SECURITY: Bound token size before it is copied anywhere
        if length > MAX_TOKEN_LENGTH {
            return Err(LexerError::TokenTooLong {
                length,
                position: start,
            });
        }

        Ok(Some((start, &self.source[start.offset..self.position.offset])))
    }
}

/// `[+-]? (digits ('.' digits*)? | '.' digits)`
fn is_decimal_literal(text: &str) -> bool {
    let unsigned = text
        .strip_prefix('-')
        .or_else(|| text.strip_prefix('+'))
        .unwrap_or(text);

    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };

    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !digits(whole) || !fraction.map_or(true, digits) {
        return false;
    }

    !whole.is_empty() || fraction.map_or(false, |f| !f.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_word_then_number() {
        let mut reader = CharReader::new("  blur   3.9 ");
        assert_eq!(reader.expect_word().unwrap(), "blur");
        assert_eq!(reader.expect_number().unwrap(), 3.9);
        assert!(!reader.has_more());
        assert!(reader.expect_end().is_ok());
    }

    #[test]
    fn test_number_forms() {
        let mut reader = CharReader::new("-3.9 +2 7. .5 0");
        assert_eq!(reader.expect_number().unwrap(), -3.9);
        assert_eq!(reader.expect_number().unwrap(), 2.0);
        assert_eq!(reader.expect_number().unwrap(), 7.0);
        assert_eq!(reader.expect_number().unwrap(), 0.5);
        assert_eq!(reader.expect_number().unwrap(), 0.0);
    }

    #[test]
    fn test_invalid_numbers_report_position() {
        for text in ["abc", "1e5", "inf", "NaN", "-", ".", "1.2.3", "12px"] {
            let source = format!("x {}", text);
            let mut reader = CharReader::new(&source);
            reader.expect_word().unwrap();
            let error = reader.expect_number().unwrap_err();
            assert_matches!(
                &error,
                LexerError::InvalidNumber { text: t, position } if t == text && position.column == 3,
                "input {:?}",
                text
            );
            assert_eq!(error.error_code(), codes::lexical::INVALID_NUMBER);
        }
    }

    #[test]
    fn test_missing_tokens() {
        let mut reader = CharReader::new("   ");
        assert_matches!(reader.expect_word(), Err(LexerError::MissingWord { .. }));

        let mut reader = CharReader::new("contrast");
        reader.expect_word().unwrap();
        assert_matches!(
            reader.expect_number(),
            Err(LexerError::MissingNumber { position }) if position.column == 9
        );
    }

    #[test]
    fn test_trailing_content() {
        let mut reader = CharReader::new("1 2 extra stuff  ");
        reader.expect_number().unwrap();
        reader.expect_number().unwrap();
        let error = reader.expect_end().unwrap_err();
        assert_matches!(
            &error,
            LexerError::TrailingContent { text, position } if text == "extra stuff" && position.column == 5
        );
        assert_eq!(error.span().start.column, 5);
        assert_eq!(error.span().end.column, 16);
    }

    #[test]
    fn test_token_too_long() {
        let long = "9".repeat(MAX_TOKEN_LENGTH + 1);
        let mut reader = CharReader::new(&long);
        assert_matches!(
            reader.expect_number(),
            Err(LexerError::TokenTooLong { length, .. }) if length == MAX_TOKEN_LENGTH + 1
        );
    }

    #[test]
    fn test_unicode_columns() {
        let mut reader = CharReader::new("é  ü");
        assert_eq!(reader.expect_word().unwrap(), "é");
        reader.skip_whitespace();
        assert_eq!(reader.position().column, 4);
        assert_eq!(reader.peek(), Some('ü'));
    }
}
