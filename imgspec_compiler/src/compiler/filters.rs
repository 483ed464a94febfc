//! Filter expressions: `<name> <number>`

use super::error::{CompileError, CompileResult};
use crate::lexical::{truncate_to_i32, CharReader};
use crate::spec::FilterOp;

const FILTER_TABLE: &[(&str, fn(i32) -> FilterOp)] = &[
    ("contrast", FilterOp::Contrast),
    ("blur", FilterOp::Blur),
    ("denoise", FilterOp::Denoise),
    ("saturation", FilterOp::Saturation),
    ("quantinize", FilterOp::Quantinize),
];

/// Parse one filter expression such as `blur 3.9` into `Blur(3)`.
///
/// The name is matched case-sensitively. The number is truncated toward zero.
/// Nothing may follow the number; an unknown name is reported first.
pub fn parse_image_filter(text: &str) -> CompileResult<FilterOp> {
    let mut reader = CharReader::new(text);
    let name = reader.expect_word()?;
    let value = reader.expect_number()?;

    let constructor = FILTER_TABLE
        .iter()
        .find(|(filter_name, _)| *filter_name == name)
        .map(|(_, constructor)| constructor)
        .ok_or(CompileError::UnknownFilter { name })?;
    reader.expect_end()?;

    Ok(constructor(truncate_to_i32(value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::LexerError;
    use assert_matches::assert_matches;

    #[test]
    fn test_every_filter_name() {
        assert_eq!(parse_image_filter("contrast 20").unwrap(), FilterOp::Contrast(20));
        assert_eq!(parse_image_filter("blur 2").unwrap(), FilterOp::Blur(2));
        assert_eq!(parse_image_filter("denoise 1").unwrap(), FilterOp::Denoise(1));
        assert_eq!(
            parse_image_filter("saturation -40").unwrap(),
            FilterOp::Saturation(-40)
        );
        assert_eq!(
            parse_image_filter("quantinize 8").unwrap(),
            FilterOp::Quantinize(8)
        );
    }

    #[test]
    fn test_truncates_toward_zero() {
        assert_eq!(parse_image_filter("blur 3.9").unwrap(), FilterOp::Blur(3));
        assert_eq!(parse_image_filter("blur -3.9").unwrap(), FilterOp::Blur(-3));
        assert_eq!(parse_image_filter("  blur\t.5 ").unwrap(), FilterOp::Blur(0));
    }

    #[test]
    fn test_unknown_filter() {
        assert_matches!(
            parse_image_filter("sharpen 2"),
            Err(CompileError::UnknownFilter { name }) if name == "sharpen"
        );
        assert_matches!(
            parse_image_filter("Blur 2"),
            Err(CompileError::UnknownFilter { name }) if name == "Blur"
        );
        assert_matches!(
            parse_image_filter("sharpen 2 extra"),
            Err(CompileError::UnknownFilter { name }) if name == "sharpen"
        );
    }

    #[test]
    fn test_lexer_errors_propagate() {
        assert_matches!(
            parse_image_filter(""),
            Err(CompileError::Lexer(LexerError::MissingWord { .. }))
        );
        assert_matches!(
            parse_image_filter("blur"),
            Err(CompileError::Lexer(LexerError::MissingNumber { .. }))
        );
        assert_matches!(
            parse_image_filter("blur x"),
            Err(CompileError::Lexer(LexerError::InvalidNumber { text, .. })) if text == "x"
        );
        assert_matches!(
            parse_image_filter("blur 2 extra"),
            Err(CompileError::Lexer(LexerError::TrailingContent { text, .. })) if text == "extra"
        );
    }
}
