//! Literal lexing: numbers, strings, and runes.

use ternc_util::{Diagnostic, Location, Storage};

use crate::token::{LitValue, Literal, TokenKind};
use crate::Lexer;

/// A decoded escape sequence. `\xXX` yields a raw byte; `\u`/`\U` yield a
/// code point, encoded as UTF-8 code units in strings and used directly in
/// runes.
enum Escape {
    Byte(u8),
    Point(char),
}

impl<'src> Lexer<'src> {
    /// Lexes a numeric literal.
    ///
    /// Supports decimal, `0x` hex, `0o` octal and `0b` binary integers with
    /// an optional storage suffix, and decimal floats (requiring a `.` or an
    /// exponent). Unsuffixed integers are `int`; unsuffixed floats are `f64`.
    pub(crate) fn lex_number(&mut self, loc: &Location) -> Result<TokenKind, Diagnostic> {
        let mut base = 10;
        if self.cursor.current_char() == '0' {
            match self.cursor.peek_char(1) {
                'x' | 'X' => base = 16,
                'o' | 'O' => base = 8,
                'b' | 'B' => base = 2,
                _ => {}
            }
            if base != 10 {
                self.cursor.advance();
                self.cursor.advance();
            }
        }

        let start = self.cursor.position();
        while self.cursor.current_char().is_digit(base) {
            self.cursor.advance();
        }
        if self.cursor.position() == start {
            return Err(Diagnostic::lexical(loc.clone(), "malformed numeric literal"));
        }

        let is_float = base == 10
            && ((self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit())
                || self.cursor.current_char() == 'e'
                || self.cursor.current_char() == 'E');
        if is_float {
            return self.lex_float(loc, start);
        }

        let digits = self.cursor.slice_from(start);
        let value = u64::from_str_radix(digits, base)
            .map_err(|_| Diagnostic::lexical(loc.clone(), "integer literal overflow"))?;

        let suffix = self.lex_suffix();
        match suffix {
            "" => {
                if value > i64::MAX as u64 {
                    return Err(Diagnostic::lexical(loc.clone(), "integer literal overflow"));
                }
                Ok(integer(Storage::Int, value))
            }
            "f32" | "f64" => {
                let storage = if suffix == "f32" { Storage::F32 } else { Storage::F64 };
                if base != 10 {
                    return Err(Diagnostic::lexical(
                        loc.clone(),
                        format!("invalid suffix '{}' on integer literal", suffix),
                    ));
                }
                Ok(TokenKind::Literal(Literal {
                    storage,
                    value: LitValue::Float(value as f64),
                }))
            }
            _ => {
                let storage = storage_for_suffix(suffix).ok_or_else(|| {
                    Diagnostic::lexical(
                        loc.clone(),
                        format!("invalid suffix '{}' on numeric literal", suffix),
                    )
                })?;
                if value > storage_max(storage) {
                    return Err(Diagnostic::lexical(loc.clone(), "integer literal overflow"));
                }
                Ok(integer(storage, value))
            }
        }
    }

    fn lex_float(&mut self, loc: &Location, start: usize) -> Result<TokenKind, Diagnostic> {
        if self.cursor.current_char() == '.' {
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }
        if matches!(self.cursor.current_char(), 'e' | 'E') {
            self.cursor.advance();
            if matches!(self.cursor.current_char(), '+' | '-') {
                self.cursor.advance();
            }
            if !self.cursor.current_char().is_ascii_digit() {
                return Err(Diagnostic::lexical(loc.clone(), "malformed float literal"));
            }
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        let digits = self.cursor.slice_from(start);
        let value: f64 = digits
            .parse()
            .map_err(|_| Diagnostic::lexical(loc.clone(), "malformed float literal"))?;

        let storage = match self.lex_suffix() {
            "" | "f64" => Storage::F64,
            "f32" => Storage::F32,
            suffix => {
                return Err(Diagnostic::lexical(
                    loc.clone(),
                    format!("invalid suffix '{}' on float literal", suffix),
                ))
            }
        };
        Ok(TokenKind::Literal(Literal {
            storage,
            value: LitValue::Float(value),
        }))
    }

    /// Consumes a trailing storage suffix, if any.
    fn lex_suffix(&mut self) -> &'src str {
        if self.cursor.current_char().is_ascii_alphabetic() {
            self.lex_word()
        } else {
            ""
        }
    }

    /// Lexes a string literal into its UTF-8 (or escaped raw) byte sequence.
    pub(crate) fn lex_string(&mut self, loc: &Location) -> Result<TokenKind, Diagnostic> {
        self.cursor.advance(); // opening quote
        let mut bytes = Vec::new();
        loop {
            if self.cursor.is_at_end() {
                return Err(Diagnostic::lexical(loc.clone(), "unterminated string literal"));
            }
            match self.cursor.current_char() {
                '"' => {
                    self.cursor.advance();
                    break;
                }
                '\\' => match self.lex_escape(loc)? {
                    Escape::Byte(b) => bytes.push(b),
                    Escape::Point(c) => {
                        let mut buf = [0u8; 4];
                        bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                    }
                },
                c => {
                    let mut buf = [0u8; 4];
                    bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                    self.cursor.advance();
                }
            }
        }
        Ok(TokenKind::Literal(Literal {
            storage: Storage::String,
            value: LitValue::Bytes(bytes),
        }))
    }

    /// Lexes a rune literal to a single code point.
    pub(crate) fn lex_rune(&mut self, loc: &Location) -> Result<TokenKind, Diagnostic> {
        self.cursor.advance(); // opening quote
        let c = match self.cursor.current_char() {
            '\0' if self.cursor.is_at_end() => {
                return Err(Diagnostic::lexical(loc.clone(), "unterminated rune literal"))
            }
            '\'' => return Err(Diagnostic::lexical(loc.clone(), "empty rune literal")),
            '\\' => match self.lex_escape(loc)? {
                Escape::Byte(b) => b as char,
                Escape::Point(c) => c,
            },
            c => {
                self.cursor.advance();
                c
            }
        };
        if !self.cursor.match_char('\'') {
            return Err(Diagnostic::lexical(loc.clone(), "unterminated rune literal"));
        }
        Ok(TokenKind::Literal(Literal {
            storage: Storage::Rune,
            value: LitValue::Rune(c),
        }))
    }

    /// Decodes one escape sequence, cursor on the backslash.
    fn lex_escape(&mut self, loc: &Location) -> Result<Escape, Diagnostic> {
        self.cursor.advance(); // backslash
        let c = self.cursor.current_char();
        self.cursor.advance();
        let esc = match c {
            '0' => Escape::Byte(0x00),
            'a' => Escape::Byte(0x07),
            'b' => Escape::Byte(0x08),
            'f' => Escape::Byte(0x0c),
            'n' => Escape::Byte(b'\n'),
            'r' => Escape::Byte(b'\r'),
            't' => Escape::Byte(b'\t'),
            'v' => Escape::Byte(0x0b),
            '\\' => Escape::Byte(b'\\'),
            '\'' => Escape::Byte(b'\''),
            '"' => Escape::Byte(b'"'),
            'x' => Escape::Byte(self.lex_hex(loc, 2)? as u8),
            'u' => Escape::Point(self.lex_unicode(loc, 4)?),
            'U' => Escape::Point(self.lex_unicode(loc, 8)?),
            _ => {
                return Err(Diagnostic::lexical(
                    loc.clone(),
                    format!("invalid escape sequence '\\{}'", c),
                ))
            }
        };
        Ok(esc)
    }

    fn lex_hex(&mut self, loc: &Location, digits: u32) -> Result<u32, Diagnostic> {
        let mut value = 0u32;
        for _ in 0..digits {
            let d = self
                .cursor
                .current_char()
                .to_digit(16)
                .ok_or_else(|| Diagnostic::lexical(loc.clone(), "invalid escape sequence"))?;
            value = value * 16 + d;
            self.cursor.advance();
        }
        Ok(value)
    }

    fn lex_unicode(&mut self, loc: &Location, digits: u32) -> Result<char, Diagnostic> {
        let value = self.lex_hex(loc, digits)?;
        char::from_u32(value)
            .ok_or_else(|| Diagnostic::lexical(loc.clone(), "invalid unicode escape"))
    }
}

fn integer(storage: Storage, value: u64) -> TokenKind {
    let value = if storage.is_signed() {
        LitValue::Signed(value as i64)
    } else {
        LitValue::Unsigned(value)
    };
    TokenKind::Literal(Literal { storage, value })
}

fn storage_for_suffix(suffix: &str) -> Option<Storage> {
    let storage = match suffix {
        "i8" => Storage::I8,
        "i16" => Storage::I16,
        "i32" => Storage::I32,
        "i64" => Storage::I64,
        "i" => Storage::Int,
        "u8" => Storage::U8,
        "u16" => Storage::U16,
        "u32" => Storage::U32,
        "u64" => Storage::U64,
        "u" => Storage::Uint,
        "z" => Storage::Size,
        _ => return None,
    };
    Some(storage)
}

/// Largest magnitude a literal of this storage may carry; literals are
/// unsigned in the source, negation is an expression.
fn storage_max(storage: Storage) -> u64 {
    match storage {
        Storage::I8 => i8::MAX as u64,
        Storage::I16 => i16::MAX as u64,
        Storage::I32 | Storage::Int => i32::MAX as u64,
        Storage::I64 => i64::MAX as u64,
        Storage::U8 => u8::MAX as u64,
        Storage::U16 => u16::MAX as u64,
        Storage::U32 | Storage::Uint => u32::MAX as u64,
        Storage::U64 | Storage::Size | Storage::Uintptr => u64::MAX,
        _ => unreachable!("not an integer storage"),
    }
}
