/// Parse failures for the property language
///
/// Every failure carries the byte offset at which it was detected, so
/// callers can point configuration authors at the exact spot in their
/// input. All of these are ordinary values returned to the caller;
/// malformed input never panics.
use std::fmt;

use thiserror::Error;

/// A failed parse of a property or document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A token mismatch at an expectation point. Once the grammar has
    /// committed to a production (for example, after the type keyword of
    /// an assignment) the next tokens are required, and a mismatch is
    /// reported here rather than by trying another alternative.
    #[error("expected {expected} at offset {position}")]
    UnexpectedToken { position: usize, expected: String },

    /// The grammar matched a prefix of the input, but text remains.
    #[error("input remains after a complete parse at offset {position}: {trailing:?}")]
    IncompleteParse { position: usize, trailing: String },

    /// A literal was well formed but outside its representable bounds.
    #[error("{kind} at offset {position}")]
    LiteralOutOfRange { position: usize, kind: LiteralRange },

    /// Property sets nested deeper than the parser supports.
    #[error("property sets nested deeper than {max} levels at offset {position}")]
    NestingTooDeep { position: usize, max: usize },
}

impl ParseError {
    /// Byte offset in the source at which the failure was detected.
    pub fn position(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { position, .. } => *position,
            ParseError::IncompleteParse { position, .. } => *position,
            ParseError::LiteralOutOfRange { position, .. } => *position,
            ParseError::NestingTooDeep { position, .. } => *position,
        }
    }
}

/// Which bound a `LiteralOutOfRange` error violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralRange {
    /// Binary bitset literal longer than 64 bits.
    BitsetWidth,
    /// Hexadecimal bitset literal longer than 16 digits.
    BitsetHexDigits,
    /// Integer literal outside the 64-bit signed range.
    Int,
}

impl LiteralRange {
    /// Recover the range kind from its rendered message.
    ///
    /// The grammar raises range failures through the combinator layer as
    /// message strings rendered from this type; matching them back here
    /// keeps the two representations in a single module.
    pub(crate) fn from_message(message: &str) -> Option<Self> {
        [Self::BitsetWidth, Self::BitsetHexDigits, Self::Int]
            .into_iter()
            .find(|kind| kind.to_string() == message)
    }
}

impl fmt::Display for LiteralRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LiteralRange::BitsetWidth => "bitset literal wider than 64 bits",
            LiteralRange::BitsetHexDigits => "bitset hex literal longer than 16 digits",
            LiteralRange::Int => "integer literal outside the 64-bit range",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_accessor() {
        let err = ParseError::UnexpectedToken {
            position: 7,
            expected: "identifier".to_string(),
        };
        assert_eq!(err.position(), 7);

        let err = ParseError::NestingTooDeep {
            position: 42,
            max: 256,
        };
        assert_eq!(err.position(), 42);
    }

    #[test]
    fn test_range_messages_round_trip() {
        for kind in [
            LiteralRange::BitsetWidth,
            LiteralRange::BitsetHexDigits,
            LiteralRange::Int,
        ] {
            assert_eq!(LiteralRange::from_message(&kind.to_string()), Some(kind));
        }
        assert_eq!(LiteralRange::from_message("something else"), None);
    }
}
