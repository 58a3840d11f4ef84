/// Grammar definitions using chumsky parser combinators
///
/// The value grammar is type-directed: an assignment first matches one of
/// the type keywords against a table of (keyword, value sub-parser) rows,
/// then runs exactly that row's sub-parser after the `=`. Matching the
/// keyword commits the row - a malformed value for that type is a hard
/// error, never a fallback into another row.
use super::lexer::Token;
use crate::error::LiteralRange;
use crate::model::{Bitset, Document, Property, PropertyValue};
use chumsky::input::ValueInput;
use chumsky::prelude::*;

/// Error plumbing shared by every rule in the grammar.
pub type Extra<'a> = extra::Err<Rich<'a, Token>>;

/// Parse a property key: one leading letter, then letters, digits, or
/// underscores. The lexer guarantees the shape; this just selects it.
fn identifier<'a, I>() -> impl Parser<'a, I, String, Extra<'a>> + Clone
where
    I: Input<'a, Token = Token, Span = SimpleSpan> + ValueInput<'a>,
{
    select! {
        Token::Ident(name) => name,
    }
    .labelled("identifier")
}

/// Parse a quoted string. Quotes are stripped by the lexer; there is no
/// escape processing, so embedded quotes are unsupported.
fn quoted_string<'a, I>() -> impl Parser<'a, I, String, Extra<'a>> + Clone
where
    I: Input<'a, Token = Token, Span = SimpleSpan> + ValueInput<'a>,
{
    select! {
        Token::Str(text) => text,
    }
    .labelled("quoted string")
}

/// Match one specific type keyword. Keywords are ordinary identifiers, so
/// `int : int = 1` stays a legal property.
fn type_keyword<'a, I>(keyword: &'static str) -> impl Parser<'a, I, (), Extra<'a>> + Clone
where
    I: Input<'a, Token = Token, Span = SimpleSpan> + ValueInput<'a>,
{
    select! {
        Token::Ident(name) if name == keyword => (),
    }
    .labelled(keyword)
}

/// Parse a strict integer. Only a plain digit run qualifies: `1.23` is a
/// single real-number token to the lexer, so it can never be accepted
/// here as `1` with `.23` left dangling.
fn int_literal<'a, I>() -> impl Parser<'a, I, i64, Extra<'a>> + Clone
where
    I: Input<'a, Token = Token, Span = SimpleSpan> + ValueInput<'a>,
{
    select! {
        Token::Digits(raw) => raw,
    }
    .try_map_with(|raw: String, extra| {
        raw.parse::<i64>()
            .map_err(|_| Rich::custom(extra.span(), LiteralRange::Int.to_string()))
    })
    .labelled("integer literal")
}

/// Parse a real literal. Integers are valid reals, so both numeric token
/// shapes are accepted.
fn real_literal<'a, I>() -> impl Parser<'a, I, f64, Extra<'a>> + Clone
where
    I: Input<'a, Token = Token, Span = SimpleSpan> + ValueInput<'a>,
{
    choice((
        select! {
            Token::Decimal(value) => value,
        },
        select! {
            Token::Digits(raw) => raw,
        }
        .try_map_with(|raw: String, extra| {
            raw.parse::<f64>()
                .map_err(|_| Rich::custom(extra.span(), "malformed real literal".to_string()))
        }),
    ))
    .labelled("real literal")
}

/// Parse a bitset literal: 1-64 binary characters, or `0x` with 1-16 hex
/// digits. Width is derived from the literal length. The literal is a
/// single token, so whitespace can never occur inside it.
fn bitset_literal<'a, I>() -> impl Parser<'a, I, Bitset, Extra<'a>> + Clone
where
    I: Input<'a, Token = Token, Span = SimpleSpan> + ValueInput<'a>,
{
    let binary = select! {
        Token::Digits(raw) => raw,
    }
    .filter(|raw: &String| raw.bytes().all(|byte| matches!(byte, b'0' | b'1')))
    .try_map_with(|raw: String, extra| {
        Bitset::from_binary(&raw)
            .ok_or_else(|| Rich::custom(extra.span(), LiteralRange::BitsetWidth.to_string()))
    });

    let hex = select! {
        Token::HexDigits(digits) => digits,
    }
    .try_map_with(|digits: String, extra| {
        Bitset::from_hex(&digits)
            .ok_or_else(|| Rich::custom(extra.span(), LiteralRange::BitsetHexDigits.to_string()))
    });

    choice((binary, hex)).labelled("bitset literal")
}

/// Wrap a scalar literal parser into the scalar-or-array value rule:
/// either one literal, or `[` literal `,` literal ... `]` with at least
/// one element.
fn scalar_or_array<'a, I, T>(
    element: impl Parser<'a, I, T, Extra<'a>> + Clone,
    scalar: fn(T) -> PropertyValue,
    array: fn(Vec<T>) -> PropertyValue,
) -> impl Parser<'a, I, PropertyValue, Extra<'a>> + Clone
where
    I: Input<'a, Token = Token, Span = SimpleSpan> + ValueInput<'a>,
{
    choice((
        element.clone().map(scalar),
        element
            .separated_by(just(Token::Comma))
            .at_least(1)
            .collect::<Vec<_>>()
            .delimited_by(just(Token::LBracket), just(Token::RBracket))
            .map(array),
    ))
}

fn int_value<'a, I>() -> impl Parser<'a, I, PropertyValue, Extra<'a>> + Clone
where
    I: Input<'a, Token = Token, Span = SimpleSpan> + ValueInput<'a>,
{
    scalar_or_array(int_literal(), PropertyValue::Int, PropertyValue::IntArray)
}

fn real_value<'a, I>() -> impl Parser<'a, I, PropertyValue, Extra<'a>> + Clone
where
    I: Input<'a, Token = Token, Span = SimpleSpan> + ValueInput<'a>,
{
    scalar_or_array(real_literal(), PropertyValue::Real, PropertyValue::RealArray)
}

fn string_value<'a, I>() -> impl Parser<'a, I, PropertyValue, Extra<'a>> + Clone
where
    I: Input<'a, Token = Token, Span = SimpleSpan> + ValueInput<'a>,
{
    scalar_or_array(
        quoted_string(),
        PropertyValue::String,
        PropertyValue::StringArray,
    )
}

/// Booleans have no array form.
fn bool_value<'a, I>() -> impl Parser<'a, I, PropertyValue, Extra<'a>> + Clone
where
    I: Input<'a, Token = Token, Span = SimpleSpan> + ValueInput<'a>,
{
    select! {
        Token::Bool(value) => PropertyValue::Bool(value),
    }
    .labelled("boolean literal")
}

/// Bitsets have no array form.
fn bitset_value<'a, I>() -> impl Parser<'a, I, PropertyValue, Extra<'a>> + Clone
where
    I: Input<'a, Token = Token, Span = SimpleSpan> + ValueInput<'a>,
{
    bitset_literal().map(PropertyValue::Bitset)
}

/// A property set: `{` property `,` property ... `}` with at least one
/// property. Recurses into the property rule.
fn set_value<'a, I>(
    property: impl Parser<'a, I, Property, Extra<'a>> + Clone + 'a,
) -> impl Parser<'a, I, PropertyValue, Extra<'a>> + Clone
where
    I: Input<'a, Token = Token, Span = SimpleSpan> + ValueInput<'a>,
{
    property
        .separated_by(just(Token::Comma))
        .at_least(1)
        .collect::<Vec<_>>()
        .delimited_by(just(Token::LBrace), just(Token::RBrace))
        .map(PropertyValue::Set)
        .labelled("property set")
}

/// The typed assignment: a type keyword, `=`, then the value syntax for
/// exactly that type. The table below is the keyword-to-sub-parser
/// dispatch; it is built once per parser instance.
fn typed_assignment<'a, I>(
    property: impl Parser<'a, I, Property, Extra<'a>> + Clone + 'a,
) -> impl Parser<'a, I, PropertyValue, Extra<'a>> + Clone
where
    I: Input<'a, Token = Token, Span = SimpleSpan> + ValueInput<'a>,
{
    let table = [
        ("int", int_value().boxed()),
        ("real", real_value().boxed()),
        ("bool", bool_value().boxed()),
        ("string", string_value().boxed()),
        ("bitset", bitset_value().boxed()),
        ("pset", set_value(property).boxed()),
    ];

    choice(table.map(|(keyword, value)| {
        type_keyword(keyword)
            .ignore_then(just(Token::Eq))
            .ignore_then(value)
            .boxed()
    }))
    .labelled("typed assignment")
}

/// Parse a single property:
/// optional `@description "text"`, identifier, `:`, typed assignment.
pub fn property_parser<'a, I>() -> impl Parser<'a, I, Property, Extra<'a>> + Clone
where
    I: Input<'a, Token = Token, Span = SimpleSpan> + ValueInput<'a>,
{
    recursive(|property| {
        let description = just(Token::Description)
            .ignore_then(quoted_string())
            .or_not();

        description
            .then(identifier())
            .then_ignore(just(Token::Colon))
            .then(typed_assignment(property))
            .map(|((description, key), value)| {
                let property = Property::new(key, value);
                match description {
                    Some(text) => property.with_description(text),
                    None => property,
                }
            })
    })
}

/// Parse a complete document: zero or more properties, then end of input.
pub fn document_parser<'a, I>() -> impl Parser<'a, I, Document, Extra<'a>>
where
    I: Input<'a, Token = Token, Span = SimpleSpan> + ValueInput<'a>,
{
    property_parser()
        .repeated()
        .collect()
        .then_ignore(end())
        .map(Document::new)
}

/// Parse exactly one property spanning the whole input.
pub fn single_property_parser<'a, I>() -> impl Parser<'a, I, Property, Extra<'a>>
where
    I: Input<'a, Token = Token, Span = SimpleSpan> + ValueInput<'a>,
{
    property_parser().then_ignore(end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use logos::Logos;

    fn lex(source: &str) -> Vec<Token> {
        Token::lexer(source).filter_map(|token| token.ok()).collect()
    }

    #[test]
    fn test_parse_int_scalar() {
        let tokens = lex("foo : int = 42");
        let result = property_parser().parse(&tokens[..]).into_result();
        let property = result.unwrap();
        assert_eq!(property.key(), "foo");
        assert_eq!(property.value, PropertyValue::Int(42));
    }

    #[test]
    fn test_parse_int_array() {
        let tokens = lex("foo : int = [1, 2, 3]");
        let result = property_parser().parse(&tokens[..]).into_result();
        assert_eq!(
            result.unwrap().value,
            PropertyValue::IntArray(vec![1, 2, 3])
        );
    }

    #[test]
    fn test_parse_int_rejects_real_literal() {
        let tokens = lex("foo : int = 1.23");
        let result = property_parser().parse(&tokens[..]).into_result();
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_int_rejects_empty_array() {
        let tokens = lex("foo : int = []");
        let result = property_parser().parse(&tokens[..]).into_result();
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_real_scalar() {
        let tokens = lex("foo : real = 3.14");
        let result = property_parser().parse(&tokens[..]).into_result();
        assert_eq!(result.unwrap().value, PropertyValue::Real(3.14));
    }

    #[test]
    fn test_parse_real_accepts_integer_shape() {
        let tokens = lex("foo : real = 42");
        let result = property_parser().parse(&tokens[..]).into_result();
        assert_eq!(result.unwrap().value, PropertyValue::Real(42.0));
    }

    #[test]
    fn test_parse_real_array() {
        let tokens = lex("foo : real = [3.14, 4.13]");
        let result = property_parser().parse(&tokens[..]).into_result();
        assert_eq!(
            result.unwrap().value,
            PropertyValue::RealArray(vec![3.14, 4.13])
        );
    }

    #[test]
    fn test_parse_bool() {
        let tokens = lex("foo : bool = true");
        let result = property_parser().parse(&tokens[..]).into_result();
        assert_eq!(result.unwrap().value, PropertyValue::Bool(true));
    }

    #[test]
    fn test_parse_string_scalar() {
        let tokens = lex(r#"foo : string = "bar""#);
        let result = property_parser().parse(&tokens[..]).into_result();
        assert_eq!(
            result.unwrap().value,
            PropertyValue::String("bar".to_string())
        );
    }

    #[test]
    fn test_parse_string_array() {
        let tokens = lex(r#"foo : string = ["a", "b"]"#);
        let result = property_parser().parse(&tokens[..]).into_result();
        assert_eq!(
            result.unwrap().value,
            PropertyValue::StringArray(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_parse_bitset_binary() {
        let tokens = lex("foo : bitset = 101");
        let result = property_parser().parse(&tokens[..]).into_result();
        let expected = Bitset::from_binary("101").unwrap();
        assert_eq!(result.unwrap().value, PropertyValue::Bitset(expected));
    }

    #[test]
    fn test_parse_bitset_keeps_leading_zeros() {
        let tokens = lex("foo : bitset = 0101");
        let result = property_parser().parse(&tokens[..]).into_result();
        match result.unwrap().value {
            PropertyValue::Bitset(bitset) => {
                assert_eq!(bitset.width(), 4);
                assert_eq!(bitset.bits(), 5);
            }
            other => panic!("expected bitset, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_bitset_hex() {
        let tokens = lex("foo : bitset = 0xFF");
        let result = property_parser().parse(&tokens[..]).into_result();
        match result.unwrap().value {
            PropertyValue::Bitset(bitset) => {
                assert_eq!(bitset.width(), 8);
                assert_eq!(bitset.bits(), 255);
            }
            other => panic!("expected bitset, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_bitset_rejects_other_digits() {
        let tokens = lex("foo : bitset = 123");
        let result = property_parser().parse(&tokens[..]).into_result();
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_bitset_width_bounds() {
        let tokens = lex(&format!("foo : bitset = {}", "1".repeat(64)));
        assert!(property_parser().parse(&tokens[..]).into_result().is_ok());

        let tokens = lex(&format!("foo : bitset = {}", "1".repeat(65)));
        assert!(property_parser().parse(&tokens[..]).into_result().is_err());

        let tokens = lex(&format!("foo : bitset = 0x{}", "F".repeat(16)));
        assert!(property_parser().parse(&tokens[..]).into_result().is_ok());

        let tokens = lex(&format!("foo : bitset = 0x{}", "F".repeat(17)));
        assert!(property_parser().parse(&tokens[..]).into_result().is_err());
    }

    #[test]
    fn test_parse_nested_set() {
        let tokens = lex("a : pset = { b : int = 1, c : pset = { d : bool = true } }");
        let result = property_parser().parse(&tokens[..]).into_result();
        let property = result.unwrap();
        match property.value {
            PropertyValue::Set(children) => {
                assert_eq!(children.len(), 2);
                assert_eq!(children[0].key(), "b");
                assert_eq!(children[0].value, PropertyValue::Int(1));
                match &children[1].value {
                    PropertyValue::Set(grandchildren) => {
                        assert_eq!(grandchildren.len(), 1);
                        assert_eq!(grandchildren[0].value, PropertyValue::Bool(true));
                    }
                    other => panic!("expected nested set, got {:?}", other),
                }
            }
            other => panic!("expected set, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_set_rejected() {
        let tokens = lex("a : pset = { }");
        let result = property_parser().parse(&tokens[..]).into_result();
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_description() {
        let tokens = lex(r#"@description "a note" foo : int = 1"#);
        let result = property_parser().parse(&tokens[..]).into_result();
        let property = result.unwrap();
        assert_eq!(property.description.as_deref(), Some("a note"));
        assert_eq!(property.value, PropertyValue::Int(1));
    }

    #[test]
    fn test_parse_type_keyword_as_key() {
        let tokens = lex("int : int = 3");
        let result = property_parser().parse(&tokens[..]).into_result();
        let property = result.unwrap();
        assert_eq!(property.key(), "int");
        assert_eq!(property.value, PropertyValue::Int(3));
    }

    #[test]
    fn test_parse_unknown_type_keyword() {
        let tokens = lex("foo : float = 1");
        let result = property_parser().parse(&tokens[..]).into_result();
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_document() {
        let tokens = lex("a : int = 1 b : bool = false");
        let result = document_parser().parse(&tokens[..]).into_result();
        let document = result.unwrap();
        assert_eq!(document.len(), 2);
        assert_eq!(document.properties()[0].key(), "a");
        assert_eq!(document.properties()[1].key(), "b");
    }

    #[test]
    fn test_parse_empty_document() {
        let tokens = lex("");
        let result = document_parser().parse(&tokens[..]).into_result();
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn test_parse_document_rejects_trailing_tokens() {
        let tokens = lex("a : int = 1 ]");
        let result = document_parser().parse(&tokens[..]).into_result();
        assert!(result.is_err());
    }
}
