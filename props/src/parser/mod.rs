/// Parser for the property language
///
/// Uses logos for lexing and chumsky for parsing. The entry points here
/// tokenize with byte spans, guard against pathological nesting, run the
/// grammar, and translate combinator errors into the crate's error
/// taxonomy. Each call builds its own parser, so concurrent parses of
/// separate documents never share state.
use crate::error::{LiteralRange, ParseError};
use crate::model::{Document, Property};
use chumsky::error::{Rich, RichPattern, RichReason};
use chumsky::input::{Input, Stream};
use chumsky::prelude::SimpleSpan;
use chumsky::span::Span;
use chumsky::Parser;
use logos::Logos;
use tracing::debug;

pub mod grammar;
pub mod lexer;

use lexer::Token;

/// Maximum depth of nested property sets.
///
/// The grammar itself places no bound on nesting, so one is imposed here
/// to keep adversarial input from exhausting the call stack: brace depth
/// is scanned over the token stream before the recursive grammar runs.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parse a complete property document.
///
/// The whole input must be consumed: trailing text after a well-formed
/// document is an [`ParseError::IncompleteParse`].
pub fn parse_document(source: &str) -> Result<Document, ParseError> {
    let tokens = tokenize(source);
    debug!(tokens = tokens.len(), "parsing property document");
    check_nesting(&tokens)?;
    let result = grammar::document_parser()
        .parse(token_stream(source, tokens))
        .into_result()
        .map_err(|errors| into_parse_error(source, errors));
    if let Err(error) = &result {
        debug!(%error, "document parse failed");
    }
    result
}

/// Parse exactly one property spanning the whole input.
pub fn parse_property(source: &str) -> Result<Property, ParseError> {
    let tokens = tokenize(source);
    debug!(tokens = tokens.len(), "parsing single property");
    check_nesting(&tokens)?;
    grammar::single_property_parser()
        .parse(token_stream(source, tokens))
        .into_result()
        .map_err(|errors| into_parse_error(source, errors))
}

/// Lex the source, keeping byte spans. Unrecognized input becomes a
/// `Token::Error` carrying the offending text, so the parser reports it
/// at its position with the surrounding grammar's expectations.
fn tokenize(source: &str) -> Vec<(Token, SimpleSpan)> {
    Token::lexer(source)
        .spanned()
        .map(|(result, span)| match result {
            Ok(token) => (token, SimpleSpan::from(span)),
            Err(()) => (
                Token::Error(source[span.clone()].to_string()),
                SimpleSpan::from(span),
            ),
        })
        .collect()
}

type TokenStream = chumsky::input::MappedInput<
    Token,
    SimpleSpan,
    Stream<std::vec::IntoIter<(Token, SimpleSpan)>>,
    fn((Token, SimpleSpan)) -> (Token, SimpleSpan),
>;

fn token_stream(source: &str, tokens: Vec<(Token, SimpleSpan)>) -> TokenStream {
    let end_of_input = SimpleSpan::new((), source.len()..source.len());
    Stream::from_iter(tokens).map(end_of_input, |token| token)
}

fn check_nesting(tokens: &[(Token, SimpleSpan)]) -> Result<(), ParseError> {
    let mut depth = 0usize;
    for (token, span) in tokens {
        match token {
            Token::LBrace => {
                depth += 1;
                if depth > MAX_NESTING_DEPTH {
                    return Err(ParseError::NestingTooDeep {
                        position: span.start,
                        max: MAX_NESTING_DEPTH,
                    });
                }
            }
            Token::RBrace => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// Translate chumsky's errors into the crate taxonomy. Only the first
/// error is reported; without recovery the grammar stops at one failure.
fn into_parse_error(source: &str, errors: Vec<Rich<'_, Token>>) -> ParseError {
    match errors.into_iter().next() {
        Some(error) => convert_rich(source, error),
        None => ParseError::UnexpectedToken {
            position: source.len(),
            expected: "a property document".to_string(),
        },
    }
}

fn convert_rich(source: &str, error: Rich<'_, Token>) -> ParseError {
    let position = error.span().start;
    match error.reason() {
        RichReason::Custom(message) => match LiteralRange::from_message(message) {
            Some(kind) => ParseError::LiteralOutOfRange { position, kind },
            None => ParseError::UnexpectedToken {
                position,
                expected: message.clone(),
            },
        },
        RichReason::ExpectedFound { expected, .. } => {
            // An expected end-of-input means a well-formed prefix was
            // parsed and text remains; everything else is a mismatch at
            // an expectation point.
            let at_end = expected
                .iter()
                .any(|pattern| matches!(pattern, RichPattern::EndOfInput));
            if at_end {
                let trailing = source
                    .get(position..)
                    .unwrap_or_default()
                    .trim_end()
                    .to_string();
                ParseError::IncompleteParse { position, trailing }
            } else {
                let rendered: Vec<String> =
                    expected.iter().map(|pattern| pattern.to_string()).collect();
                let expected = if rendered.is_empty() {
                    "a different token".to_string()
                } else {
                    rendered.join(" or ")
                };
                ParseError::UnexpectedToken { position, expected }
            }
        }
    }
}
