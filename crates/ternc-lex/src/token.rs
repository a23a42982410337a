//! Token model.

use std::fmt;

use ternc_util::{Location, Storage, Symbol};

/// A lexed token with its source location.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub loc: Location,
    pub kind: TokenKind,
}

/// The closed set of token kinds.
///
/// Keywords and punctuation are fieldless; names carry the interned
/// identifier text and literals carry a storage tag plus payload. The string
/// given by [`TokenKind::as_str`] is what syntax diagnostics enumerate in
/// their expected-token lists.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Keywords
    Bool,
    Char,
    Const,
    Def,
    Enum,
    Export,
    F32,
    F64,
    Fn,
    I8,
    I16,
    I32,
    I64,
    Int,
    Let,
    Nullable,
    Rune,
    Size,
    Str,
    Struct,
    Type,
    U8,
    U16,
    U32,
    U64,
    Uint,
    Uintptr,
    Union,
    Use,
    Void,
    // Attributes
    AttrFini,
    AttrInit,
    AttrNoreturn,
    AttrSymbol,
    AttrTest,
    // Punctuation
    Colon,
    Comma,
    DoubleColon,
    Ellipsis,
    Equal,
    LBrace,
    LBracket,
    LParen,
    RBrace,
    RBracket,
    RParen,
    Semicolon,
    Star,
    // Content-carrying
    Name(Symbol),
    Literal(Literal),
    Eof,
}

impl TokenKind {
    /// Recognizes keywords, including the literal keywords `true`, `false`
    /// and `null`. Identifiers are names minus this set.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        let kind = match text {
            "bool" => TokenKind::Bool,
            "char" => TokenKind::Char,
            "const" => TokenKind::Const,
            "def" => TokenKind::Def,
            "enum" => TokenKind::Enum,
            "export" => TokenKind::Export,
            "f32" => TokenKind::F32,
            "f64" => TokenKind::F64,
            "fn" => TokenKind::Fn,
            "i8" => TokenKind::I8,
            "i16" => TokenKind::I16,
            "i32" => TokenKind::I32,
            "i64" => TokenKind::I64,
            "int" => TokenKind::Int,
            "let" => TokenKind::Let,
            "nullable" => TokenKind::Nullable,
            "rune" => TokenKind::Rune,
            "size" => TokenKind::Size,
            "str" => TokenKind::Str,
            "struct" => TokenKind::Struct,
            "type" => TokenKind::Type,
            "u8" => TokenKind::U8,
            "u16" => TokenKind::U16,
            "u32" => TokenKind::U32,
            "u64" => TokenKind::U64,
            "uint" => TokenKind::Uint,
            "uintptr" => TokenKind::Uintptr,
            "union" => TokenKind::Union,
            "use" => TokenKind::Use,
            "void" => TokenKind::Void,
            "true" => TokenKind::Literal(Literal::bool(true)),
            "false" => TokenKind::Literal(Literal::bool(false)),
            "null" => TokenKind::Literal(Literal::null()),
            _ => return None,
        };
        Some(kind)
    }

    /// The fixed spelling of this kind, as cited in diagnostics. Names and
    /// literals have no fixed spelling and render as their category.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Bool => "bool",
            TokenKind::Char => "char",
            TokenKind::Const => "const",
            TokenKind::Def => "def",
            TokenKind::Enum => "enum",
            TokenKind::Export => "export",
            TokenKind::F32 => "f32",
            TokenKind::F64 => "f64",
            TokenKind::Fn => "fn",
            TokenKind::I8 => "i8",
            TokenKind::I16 => "i16",
            TokenKind::I32 => "i32",
            TokenKind::I64 => "i64",
            TokenKind::Int => "int",
            TokenKind::Let => "let",
            TokenKind::Nullable => "nullable",
            TokenKind::Rune => "rune",
            TokenKind::Size => "size",
            TokenKind::Str => "str",
            TokenKind::Struct => "struct",
            TokenKind::Type => "type",
            TokenKind::U8 => "u8",
            TokenKind::U16 => "u16",
            TokenKind::U32 => "u32",
            TokenKind::U64 => "u64",
            TokenKind::Uint => "uint",
            TokenKind::Uintptr => "uintptr",
            TokenKind::Union => "union",
            TokenKind::Use => "use",
            TokenKind::Void => "void",
            TokenKind::AttrFini => "@fini",
            TokenKind::AttrInit => "@init",
            TokenKind::AttrNoreturn => "@noreturn",
            TokenKind::AttrSymbol => "@symbol",
            TokenKind::AttrTest => "@test",
            TokenKind::Colon => ":",
            TokenKind::Comma => ",",
            TokenKind::DoubleColon => "::",
            TokenKind::Ellipsis => "...",
            TokenKind::Equal => "=",
            TokenKind::LBrace => "{",
            TokenKind::LBracket => "[",
            TokenKind::LParen => "(",
            TokenKind::RBrace => "}",
            TokenKind::RBracket => "]",
            TokenKind::RParen => ")",
            TokenKind::Semicolon => ";",
            TokenKind::Star => "*",
            TokenKind::Name(_) => "name",
            TokenKind::Literal(_) => "literal",
            TokenKind::Eof => "end of file",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Name(name) => f.write_str(name.as_str()),
            TokenKind::Literal(lit) => write!(f, "{}", lit),
            other => f.write_str(other.as_str()),
        }
    }
}

/// A literal value with its storage tag.
#[derive(Clone, Debug, PartialEq)]
pub struct Literal {
    pub storage: Storage,
    pub value: LitValue,
}

/// Literal payloads.
#[derive(Clone, Debug, PartialEq)]
pub enum LitValue {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Rune(char),
    Bytes(Vec<u8>),
}

impl Literal {
    pub fn bool(value: bool) -> Self {
        Literal {
            storage: Storage::Bool,
            value: LitValue::Unsigned(value as u64),
        }
    }

    pub fn null() -> Self {
        Literal {
            storage: Storage::Null,
            value: LitValue::Unsigned(0),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            LitValue::Signed(v) => write!(f, "{}", v),
            LitValue::Unsigned(v) => match self.storage {
                Storage::Bool => f.write_str(if *v != 0 { "true" } else { "false" }),
                Storage::Null => f.write_str("null"),
                _ => write!(f, "{}", v),
            },
            LitValue::Float(v) => write!(f, "{}", v),
            LitValue::Rune(c) => write!(f, "'{}'", c.escape_default()),
            LitValue::Bytes(bytes) => {
                write!(f, "\"{}\"", String::from_utf8_lossy(bytes).escape_default())
            }
        }
    }
}
