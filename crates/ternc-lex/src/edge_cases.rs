//! Edge case tests for ternc-lex.

use ternc_util::Symbol;

use crate::{Lexer, LitValue, Literal, Token, TokenKind};

fn lex_all(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source, "edge.tn");
    let mut tokens = Vec::new();
    loop {
        let tok = lexer.lex().expect("lexical error");
        let done = tok.kind == TokenKind::Eof;
        tokens.push(tok);
        if done {
            break;
        }
    }
    tokens
}

#[test]
fn empty_source_is_just_eof() {
    let tokens = lex_all("");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
    assert_eq!((tokens[0].loc.line, tokens[0].loc.column), (1, 1));
}

#[test]
fn single_char_identifier() {
    let tokens = lex_all("x");
    assert_eq!(tokens[0].kind, TokenKind::Name(Symbol::intern("x")));
}

#[test]
fn long_identifier() {
    let name = "a".repeat(4096);
    let tokens = lex_all(&name);
    assert_eq!(tokens[0].kind, TokenKind::Name(Symbol::intern(&name)));
}

#[test]
fn keyword_prefixed_identifiers_are_names() {
    // "lettuce" starts with "let" but is a name
    let tokens = lex_all("lettuce used constant");
    assert_eq!(tokens[0].kind, TokenKind::Name(Symbol::intern("lettuce")));
    assert_eq!(tokens[1].kind, TokenKind::Name(Symbol::intern("used")));
    assert_eq!(tokens[2].kind, TokenKind::Name(Symbol::intern("constant")));
}

#[test]
fn underscore_starts_identifier() {
    let tokens = lex_all("_private _0");
    assert_eq!(tokens[0].kind, TokenKind::Name(Symbol::intern("_private")));
    assert_eq!(tokens[1].kind, TokenKind::Name(Symbol::intern("_0")));
}

#[test]
fn adjacent_punctuation_splits_greedily() {
    let tokens = lex_all("(*:::");
    assert_eq!(tokens[0].kind, TokenKind::LParen);
    assert_eq!(tokens[1].kind, TokenKind::Star);
    assert_eq!(tokens[2].kind, TokenKind::DoubleColon);
    assert_eq!(tokens[3].kind, TokenKind::Colon);
}

#[test]
fn comment_to_end_of_file_without_newline() {
    let tokens = lex_all("fn // trailing comment");
    assert_eq!(tokens[0].kind, TokenKind::Fn);
    assert_eq!(tokens[1].kind, TokenKind::Eof);
}

#[test]
fn zero_literals() {
    let tokens = lex_all("0 0u8");
    assert_eq!(
        tokens[0].kind,
        TokenKind::Literal(Literal {
            storage: ternc_util::Storage::Int,
            value: LitValue::Signed(0),
        })
    );
    assert_eq!(
        tokens[1].kind,
        TokenKind::Literal(Literal {
            storage: ternc_util::Storage::U8,
            value: LitValue::Unsigned(0),
        })
    );
}

#[test]
fn max_boundary_literals_fit() {
    let tokens = lex_all("255u8 127i8 9223372036854775807");
    assert!(matches!(tokens[0].kind, TokenKind::Literal(_)));
    assert!(matches!(tokens[1].kind, TokenKind::Literal(_)));
    assert!(matches!(
        tokens[2].kind,
        TokenKind::Literal(Literal {
            value: LitValue::Signed(i64::MAX),
            ..
        })
    ));
}

#[test]
fn crlf_counts_one_line() {
    let tokens = lex_all("let\r\nconst");
    assert_eq!(tokens[1].kind, TokenKind::Const);
    assert_eq!((tokens[1].loc.line, tokens[1].loc.column), (2, 1));
}
