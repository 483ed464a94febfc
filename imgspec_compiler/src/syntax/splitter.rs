//! Splits clause text into ordered key/value parameters
//!
//! `file: a.png, stretch, filter: blur 2` becomes three parameters, the
//! middle one a flag with an empty value. Keys may repeat; order is kept.

use super::error::{SplitError, SplitResult};
use crate::config::compile_time::lexical::MAX_CLAUSE_LENGTH;
use crate::utils::Position;
use serde::{Deserialize, Serialize};

/// One `key: value` pair of a clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub key: String,
    pub value: String,
    /// Where the key starts in the clause text
    pub position: Position,
}

impl Parameter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            position: Position::start(),
        }
    }

    /// A valueless parameter such as `stretch`
    pub fn flag(key: impl Into<String>) -> Self {
        Self::new(key, "")
    }
}

/// Split a clause into its parameters
pub fn split_parameters(text: &str) -> SplitResult<Vec<Parameter>> {
    // SECURITY: Bound input before walking it
    if text.len() > MAX_CLAUSE_LENGTH {
        return Err(SplitError::ClauseTooLong { length: text.len() });
    }

    let mut splitter = Splitter::new(text);
    let mut parameters = Vec::new();
    while let Some(parameter) = splitter.next_parameter()? {
        parameters.push(parameter);
    }
    Ok(parameters)
}

struct Splitter<'a> {
    source: &'a str,
    position: Position,
}

impl<'a> Splitter<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            position: Position::start(),
        }
    }

    fn remaining(&self) -> &'a str {
        &self.source[self.position.offset..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position = self.position.advance(ch);
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.bump();
        }
    }

    /// Consume up to (not including) the first char matching `stop`
    fn take_until(&mut self, stop: impl Fn(char) -> bool) -> &'a str {
        let start = self.position.offset;
        while let Some(ch) = self.peek() {
            if stop(ch) {
                break;
            }
            self.bump();
        }
        &self.source[start..self.position.offset]
    }

    fn next_parameter(&mut self) -> SplitResult<Option<Parameter>> {
        // Empty segments (`a, , b` or a trailing comma) carry nothing
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Ok(None),
                Some(',') => {
                    self.bump();
                }
                Some(_) => break,
            }
        }

        let key_position = self.position;
        let key = self.take_until(|ch| ch == ':' || ch == ',').trim_end();
        if key.is_empty() {
            return Err(SplitError::EmptyKey {
                position: key_position,
            });
        }

        let value = if self.peek() == Some(':') {
            self.bump();
            self.read_value()?
        } else {
            String::new()
        };

        if self.peek() == Some(',') {
            self.bump();
        }

        Ok(Some(Parameter {
            key: key.to_string(),
            value,
            position: key_position,
        }))
    }

    fn read_value(&mut self) -> SplitResult<String> {
        self.skip_whitespace();

        if self.peek() != Some('"') {
            return Ok(self.take_until(|ch| ch == ',').trim_end().to_string());
        }

        let quote_position = self.position;
        self.bump();
        let value = self.read_quoted(quote_position)?;

        self.skip_whitespace();
        match self.peek() {
            None | Some(',') => Ok(value),
            Some(_) => {
                let position = self.position;
                let text = self.take_until(|ch| ch == ',').trim_end();
                Err(SplitError::UnexpectedAfterQuote {
                    text: text.to_string(),
                    position,
                })
            }
        }
    }

    fn read_quoted(&mut self, quote_position: Position) -> SplitResult<String> {
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(value),
                Some('\\') => match self.bump() {
                    Some(escaped @ ('"' | '\\')) => value.push(escaped),
                    Some(other) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => break,
                },
                Some(ch) => value.push(ch),
                None => break,
            }
        }
        Err(SplitError::UnterminatedQuote {
            position: quote_position,
        })
    }
}
