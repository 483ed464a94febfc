//! Non-negative integer parameters such as `tolerance` and `analyze-offset`

use super::error::{CompileError, CompileResult};

/// Parse an all-digit value no larger than `i32::MAX`. Signs and whitespace
/// are rejected.
pub fn parse_integer_parameter(name: &str, value: &str) -> CompileResult<u32> {
    let invalid = || CompileError::InvalidInteger {
        field: name.to_string(),
        value: value.to_string(),
    };

    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    value
        .parse::<i32>()
        .ok()
        .and_then(|parsed| u32::try_from(parsed).ok())
        .ok_or_else(invalid)
}
