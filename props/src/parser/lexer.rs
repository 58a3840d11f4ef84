/// Lexer for the property language using logos
///
/// Converts source text into tokens. Whitespace and `#` comments are
/// skipped between tokens; they can never occur inside a token, which is
/// what makes identifiers, quoted strings, and bitset literals single
/// unbroken units.

use std::fmt;

use logos::Logos;

/// Numeric literals are deliberately split by shape, not by type: a plain
/// digit run stays raw text because the declared property type decides
/// whether it is an integer, a real, or a binary bit pattern (and bit
/// widths depend on leading zeros). A number with a fraction or exponent
/// can only ever be a real, so it is converted on the spot.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    // Directives
    #[token("@description")]
    Description,

    // Literals
    #[token("true", |_| true)]
    #[token("false", |_| false)]
    Bool(bool),

    #[regex(r"[+-]?[0-9]+", |lex| lex.slice().to_string())]
    Digits(String),

    #[regex(r"[+-]?[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse().ok())]
    #[regex(r"[+-]?[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse().ok())]
    #[regex(r"[+-]?\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse().ok())]
    Decimal(f64),

    #[regex(r"0x[0-9a-fA-F]+", |lex| lex.slice()[2..].to_string())]
    HexDigits(String),

    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    Str(String),

    // Identifiers (type keywords are ordinary identifiers; the grammar
    // gives them meaning only in type position)
    #[regex(r"[a-zA-Z][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    // Delimiters
    #[token(":")]
    Colon,

    #[token("=")]
    Eq,

    #[token(",")]
    Comma,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    /// Never produced by a lexer rule; the tokenizer maps unrecognized
    /// input to this so the parser can report a positioned error.
    Error(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Description => f.write_str("'@description'"),
            Token::Bool(value) => write!(f, "'{}'", value),
            Token::Digits(raw) => write!(f, "number '{}'", raw),
            Token::Decimal(value) => write!(f, "number '{}'", value),
            Token::HexDigits(digits) => write!(f, "'0x{}'", digits),
            Token::Str(text) => write!(f, "string {:?}", text),
            Token::Ident(name) => write!(f, "'{}'", name),
            Token::Colon => f.write_str("':'"),
            Token::Eq => f.write_str("'='"),
            Token::Comma => f.write_str("','"),
            Token::LBracket => f.write_str("'['"),
            Token::RBracket => f.write_str("']'"),
            Token::LBrace => f.write_str("'{'"),
            Token::RBrace => f.write_str("'}'"),
            Token::Error(text) => write!(f, "unrecognized text '{}'", text),
        }
    }
}
