//! Lexical primitives for clause values
//!
//! Filter expressions and geometry values are short whitespace-separated token
//! sequences. [`CharReader`] reads them one token at a time; the helpers here
//! cover the fixed-arity shapes the compiler needs.

pub mod reader;

pub use reader::{CharReader, LexerError};

/// Read exactly `N` numbers from `text` and require nothing else follows
pub fn expect_numbers<const N: usize>(text: &str) -> Result<[f64; N], LexerError> {
    let mut reader = CharReader::new(text);
    let mut numbers = [0.0; N];
    for slot in numbers.iter_mut() {
        *slot = reader.expect_number()?;
    }
    reader.expect_end()?;
    Ok(numbers)
}

/// Truncate toward zero, saturating at the `i32` range
pub fn truncate_to_i32(value: f64) -> i32 {
    // `as` truncates toward zero and saturates for finite floats
    value.trunc() as i32
}
