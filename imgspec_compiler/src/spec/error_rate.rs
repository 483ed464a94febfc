//! Error rate threshold of an image comparison
//!
//! Written as `<number>%` (share of differing pixels) or `<number>px`
//! (absolute count of differing pixels).

use crate::logging::{codes, Code};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorRateError {
    #[error("Error rate is empty")]
    Empty,

    #[error("Error rate '{text}' must end with '%' or 'px'")]
    MissingUnit { text: String },

    #[error("Error rate '{text}' is not a non-negative decimal number")]
    InvalidValue { text: String },
}

impl ErrorRateError {
    pub fn error_code(&self) -> Code {
        codes::clause::INVALID_ERROR_RATE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorRateUnit {
    Percent,
    Pixels,
}

impl ErrorRateUnit {
    pub fn suffix(&self) -> &'static str {
        match self {
            ErrorRateUnit::Percent => "%",
            ErrorRateUnit::Pixels => "px",
        }
    }
}

/// Maximum tolerated difference between the compared images
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ErrorRate {
    pub value: f64,
    pub unit: ErrorRateUnit,
}

impl ErrorRate {
    pub fn percent(value: f64) -> Self {
        Self {
            value,
            unit: ErrorRateUnit::Percent,
        }
    }

    pub fn pixels(value: f64) -> Self {
        Self {
            value,
            unit: ErrorRateUnit::Pixels,
        }
    }
}

impl FromStr for ErrorRate {
    type Err = ErrorRateError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ErrorRateError::Empty);
        }

        let (number, unit) = if let Some(number) = trimmed.strip_suffix("px") {
            (number, ErrorRateUnit::Pixels)
        } else if let Some(number) = trimmed.strip_suffix('%') {
            (number, ErrorRateUnit::Percent)
        } else {
            return Err(ErrorRateError::MissingUnit {
                text: trimmed.to_string(),
            });
        };

        let number = number.trim_end();
        if !is_unsigned_decimal(number) {
            return Err(ErrorRateError::InvalidValue {
                text: trimmed.to_string(),
            });
        }

        let value = number
            .parse::<f64>()
            .map_err(|_| ErrorRateError::InvalidValue {
                text: trimmed.to_string(),
            })?;

        Ok(Self { value, unit })
    }
}

/// `digits` or `digits.digits`
fn is_unsigned_decimal(text: &str) -> bool {
    let mut parts = text.splitn(2, '.');
    let whole = parts.next().unwrap_or("");
    let fraction = parts.next();

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    all_digits(whole) && fraction.map_or(true, all_digits)
}

impl fmt::Display for ErrorRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

impl TryFrom<String> for ErrorRate {
    type Error = ErrorRateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ErrorRate> for String {
    fn from(rate: ErrorRate) -> Self {
        rate.to_string()
    }
}
