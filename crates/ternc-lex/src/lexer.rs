//! The lexer proper: dispatch, names, punctuation, and the unlex buffer.

use std::sync::Arc;

use ternc_util::{Diagnostic, Location, Symbol};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// A lexer over one source file.
///
/// # Example
///
/// ```
/// use ternc_lex::{Lexer, TokenKind};
///
/// let mut lexer = Lexer::new("let x;", "main.tn");
/// assert_eq!(lexer.lex().unwrap().kind, TokenKind::Let);
/// let tok = lexer.lex().unwrap();
/// lexer.unlex(tok.clone());
/// assert_eq!(lexer.lex().unwrap(), tok);
/// ```
pub struct Lexer<'src> {
    pub(crate) cursor: Cursor<'src>,
    path: Arc<str>,
    unlexed: Option<Token>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, path: &str) -> Self {
        Lexer {
            cursor: Cursor::new(source),
            path: Arc::from(path),
            unlexed: None,
        }
    }

    /// The location the next token would start at.
    pub(crate) fn location(&self) -> Location {
        Location::new(Arc::clone(&self.path), self.cursor.line(), self.cursor.column())
    }

    /// Produces the next token.
    pub fn lex(&mut self) -> Result<Token, Diagnostic> {
        if let Some(tok) = self.unlexed.take() {
            return Ok(tok);
        }

        self.skip_trivia();
        let loc = self.location();

        if self.cursor.is_at_end() {
            return Ok(Token {
                loc,
                kind: TokenKind::Eof,
            });
        }

        let kind = match self.cursor.current_char() {
            c if c.is_ascii_alphabetic() || c == '_' => self.lex_name(),
            c if c.is_ascii_digit() => self.lex_number(&loc)?,
            '"' => self.lex_string(&loc)?,
            '\'' => self.lex_rune(&loc)?,
            '@' => self.lex_attribute(&loc)?,
            _ => self.lex_punctuation(&loc)?,
        };

        Ok(Token { loc, kind })
    }

    /// Pushes one token back for the parser's single token of lookahead.
    ///
    /// # Panics
    ///
    /// Panics if a token is already buffered; productions needing more
    /// lookahead must not exist in this grammar.
    pub fn unlex(&mut self, tok: Token) {
        assert!(
            self.unlexed.is_none(),
            "unlex called twice without an intervening lex"
        );
        self.unlexed = Some(tok);
    }

    /// Skips whitespace and `//` line comments.
    fn skip_trivia(&mut self) {
        loop {
            while !self.cursor.is_at_end() && self.cursor.current_char().is_whitespace() {
                self.cursor.advance();
            }
            if self.cursor.current_char() == '/' && self.cursor.peek_char(1) == '/' {
                while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                    self.cursor.advance();
                }
                continue;
            }
            break;
        }
    }

    fn lex_name(&mut self) -> TokenKind {
        let word = self.lex_word();
        TokenKind::keyword(word).unwrap_or_else(|| TokenKind::Name(Symbol::intern(word)))
    }

    /// Consumes `[A-Za-z0-9_]*` from the current position.
    pub(crate) fn lex_word(&mut self) -> &'src str {
        let start = self.cursor.position();
        while self.cursor.current_char().is_ascii_alphanumeric()
            || self.cursor.current_char() == '_'
        {
            self.cursor.advance();
        }
        self.cursor.slice_from(start)
    }

    fn lex_attribute(&mut self, loc: &Location) -> Result<TokenKind, Diagnostic> {
        self.cursor.advance(); // '@'
        let word = self.lex_word();
        match word {
            "fini" => Ok(TokenKind::AttrFini),
            "init" => Ok(TokenKind::AttrInit),
            "noreturn" => Ok(TokenKind::AttrNoreturn),
            "symbol" => Ok(TokenKind::AttrSymbol),
            "test" => Ok(TokenKind::AttrTest),
            _ => Err(Diagnostic::lexical(
                loc.clone(),
                format!("unknown attribute '@{}'", word),
            )),
        }
    }

    fn lex_punctuation(&mut self, loc: &Location) -> Result<TokenKind, Diagnostic> {
        let c = self.cursor.current_char();
        self.cursor.advance();
        let kind = match c {
            ':' => {
                if self.cursor.match_char(':') {
                    TokenKind::DoubleColon
                } else {
                    TokenKind::Colon
                }
            }
            '.' => {
                if self.cursor.match_char('.') && self.cursor.match_char('.') {
                    TokenKind::Ellipsis
                } else {
                    return Err(Diagnostic::lexical(
                        loc.clone(),
                        format!("unexpected character '{}'", c),
                    ));
                }
            }
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '=' => TokenKind::Equal,
            '*' => TokenKind::Star,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            _ => {
                return Err(Diagnostic::lexical(
                    loc.clone(),
                    format!("unexpected character '{}'", c),
                ))
            }
        };
        Ok(kind)
    }
}
