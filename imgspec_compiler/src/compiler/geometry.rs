//! `area` rectangles: four numbers, positional

use super::error::CompileResult;
use crate::lexical::{expect_numbers, truncate_to_i32};
use crate::spec::Rect;

/// Parse `x y width height`, truncating each number toward zero
pub fn parse_rect(text: &str) -> CompileResult<Rect> {
    let numbers = expect_numbers::<4>(text)?;
    Ok(Rect::from(numbers.map(truncate_to_i32)))
}
