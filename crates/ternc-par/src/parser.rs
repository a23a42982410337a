//! The recursive-descent parser.

use tracing::{trace, trace_span};

use ternc_lex::{Lexer, Token, TokenKind};
use ternc_util::{Diagnostic, Ident, Location, Storage, Symbol, Variadism};

use crate::ast::{
    Decl, DeclKind, Expr, ExprKind, FnDecl, FnFlags, FnParam, FnType, GlobalBinding, GlobalMode,
    Import, Subunit, Type, TypeAlias, TypeRepr,
};

/// Parses one translation subunit: imports, then declarations, then end of
/// file.
pub fn parse(lexer: Lexer<'_>) -> Result<Subunit, Diagnostic> {
    let mut par = Parser { lex: lexer };
    let imports = par.parse_imports()?;
    let decls = par.parse_decls()?;
    par.want(TokenKind::Eof)?;
    Ok(Subunit { imports, decls })
}

struct Parser<'src> {
    lex: Lexer<'src>,
}

/// How a token kind is cited in expected-token lists: fixed spellings are
/// quoted, categories are bare.
fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Name(_) => "name".to_string(),
        TokenKind::Literal(_) => "literal".to_string(),
        TokenKind::Eof => "end of file".to_string(),
        fixed => format!("'{}'", fixed.as_str()),
    }
}

fn unexpected(tok: &Token, expected: &[&str]) -> Diagnostic {
    Diagnostic::syntax(tok.loc.clone(), &tok.kind, expected)
}

impl<'src> Parser<'src> {
    fn lex(&mut self) -> Result<Token, Diagnostic> {
        self.lex.lex()
    }

    fn unlex(&mut self, tok: Token) {
        self.lex.unlex(tok);
    }

    /// Consumes the next token, requiring the given kind.
    fn want(&mut self, kind: TokenKind) -> Result<Token, Diagnostic> {
        let tok = self.lex()?;
        if tok.kind == kind {
            Ok(tok)
        } else {
            Err(unexpected(&tok, &[describe(&kind).as_str()]))
        }
    }

    fn want_name(&mut self) -> Result<(Symbol, Location), Diagnostic> {
        let tok = self.lex()?;
        match tok.kind {
            TokenKind::Name(name) => Ok((name, tok.loc)),
            _ => Err(unexpected(&tok, &["name"])),
        }
    }

    /// `name ('::' name)*`; the leftmost name becomes the outermost parent.
    fn parse_identifier(&mut self) -> Result<(Ident, Location), Diagnostic> {
        let _span = trace_span!("identifier").entered();
        let (name, loc) = self.want_name()?;
        let mut ident = Ident {
            parent: None,
            name,
        };
        loop {
            let tok = self.lex()?;
            if tok.kind != TokenKind::DoubleColon {
                self.unlex(tok);
                break;
            }
            let (name, _) = self.want_name()?;
            ident = Ident {
                parent: Some(Box::new(ident)),
                name,
            };
        }
        trace!("{}", ident);
        Ok((ident, loc))
    }

    fn parse_imports(&mut self) -> Result<Vec<Import>, Diagnostic> {
        let _span = trace_span!("imports").entered();
        let mut imports = Vec::new();
        loop {
            let tok = self.lex()?;
            if tok.kind != TokenKind::Use {
                self.unlex(tok);
                break;
            }
            imports.push(self.parse_import()?);
        }
        for import in &imports {
            trace!("use {}", import.ident);
        }
        Ok(imports)
    }

    fn parse_import(&mut self) -> Result<Import, Diagnostic> {
        let _span = trace_span!("import").entered();
        let (ident, _) = self.parse_identifier()?;
        let tok = self.lex()?;
        match tok.kind {
            TokenKind::Semicolon => Ok(Import { ident }),
            TokenKind::Equal => Err(Diagnostic::not_implemented(tok.loc, "import aliases")),
            TokenKind::LBrace => Err(Diagnostic::not_implemented(tok.loc, "import member lists")),
            _ => Err(unexpected(&tok, &["'='", "'{'", "';'"])),
        }
    }

    fn parse_decls(&mut self) -> Result<Vec<Decl>, Diagnostic> {
        let _span = trace_span!("decls").entered();
        let mut decls = Vec::new();
        loop {
            let tok = self.lex()?;
            if tok.kind == TokenKind::Eof {
                self.unlex(tok);
                break;
            }
            let exported = tok.kind == TokenKind::Export;
            if exported {
                trace!("export");
            } else {
                self.unlex(tok);
            }
            let kind = self.parse_decl()?;
            decls.push(Decl { exported, kind });
            self.want(TokenKind::Semicolon)?;
        }
        Ok(decls)
    }

    fn parse_decl(&mut self) -> Result<DeclKind, Diagnostic> {
        let tok = self.lex()?;
        match tok.kind {
            TokenKind::Let => Ok(DeclKind::Global {
                mode: GlobalMode::Let,
                bindings: self.parse_global_bindings(Some(GlobalMode::Let))?,
            }),
            TokenKind::Const => Ok(DeclKind::Global {
                mode: GlobalMode::Const,
                bindings: self.parse_global_bindings(Some(GlobalMode::Const))?,
            }),
            TokenKind::Def => Ok(DeclKind::Const {
                bindings: self.parse_global_bindings(None)?,
            }),
            TokenKind::Type => Ok(DeclKind::TypeAlias {
                aliases: self.parse_type_aliases()?,
            }),
            _ => {
                self.unlex(tok);
                Ok(DeclKind::Func(self.parse_fn_decl()?))
            }
        }
    }

    /// One `let`/`const`/`def` declaration group. `mode` is `None` for
    /// `def`, which takes no `@symbol` attribute.
    fn parse_global_bindings(
        &mut self,
        mode: Option<GlobalMode>,
    ) -> Result<Vec<GlobalBinding>, Diagnostic> {
        let _span = trace_span!("global").entered();
        let mut bindings = Vec::new();
        loop {
            let mut symbol = None;
            if mode.is_some() {
                let tok = self.lex()?;
                if tok.kind == TokenKind::AttrSymbol {
                    symbol = Some(self.parse_attr_symbol(&tok.loc)?);
                } else {
                    self.unlex(tok);
                }
            }
            let (ident, loc) = self.parse_identifier()?;
            self.want(TokenKind::Colon)?;
            let mut ty = self.parse_type()?;
            if mode == Some(GlobalMode::Const) {
                ty.constant = true;
            }
            self.want(TokenKind::Equal)?;
            let init = self.parse_simple_expression()?;
            trace!("{}: [type] = [expr]", ident);
            bindings.push(GlobalBinding {
                loc,
                symbol,
                ident,
                ty,
                init,
            });

            let tok = self.lex()?;
            if tok.kind != TokenKind::Comma {
                self.unlex(tok);
                break;
            }
            let next = self.lex()?;
            match next.kind {
                TokenKind::Name(_) | TokenKind::AttrSymbol => self.unlex(next),
                _ => {
                    // Trailing comma; the terminator is not ours to consume.
                    self.unlex(next);
                    break;
                }
            }
        }
        Ok(bindings)
    }

    /// One `type` declaration group.
    fn parse_type_aliases(&mut self) -> Result<Vec<TypeAlias>, Diagnostic> {
        let _span = trace_span!("typedef").entered();
        let mut aliases = Vec::new();
        loop {
            let (ident, loc) = self.parse_identifier()?;
            self.want(TokenKind::Equal)?;
            let ty = self.parse_type()?;
            trace!("type {} = [type]", ident);
            aliases.push(TypeAlias { loc, ident, ty });

            let tok = self.lex()?;
            if tok.kind != TokenKind::Comma {
                self.unlex(tok);
                break;
            }
            let next = self.lex()?;
            match next.kind {
                TokenKind::Name(_) => self.unlex(next),
                _ => {
                    self.unlex(next);
                    break;
                }
            }
        }
        Ok(aliases)
    }

    fn parse_fn_decl(&mut self) -> Result<FnDecl, Diagnostic> {
        let _span = trace_span!("fn").entered();
        let mut flags = FnFlags::default();
        let mut symbol = None;
        let mut noreturn = false;
        loop {
            let tok = self.lex()?;
            match tok.kind {
                TokenKind::AttrFini => flags.fini = true,
                TokenKind::AttrInit => flags.init = true,
                TokenKind::AttrTest => flags.test = true,
                TokenKind::AttrNoreturn => noreturn = true,
                TokenKind::AttrSymbol => symbol = Some(self.parse_attr_symbol(&tok.loc)?),
                _ => {
                    self.unlex(tok);
                    break;
                }
            }
        }
        self.want(TokenKind::Fn)?;
        let (ident, loc) = self.parse_identifier()?;
        let prototype = self.parse_prototype(noreturn)?;
        self.want(TokenKind::Equal)?;
        let body = self.parse_complex_expression()?;
        trace!("fn {} [prototype] = [expr]", ident);
        Ok(FnDecl {
            loc,
            flags,
            symbol,
            ident,
            prototype,
            body,
        })
    }

    /// `@symbol("...")` following the `@symbol` token itself. The string
    /// must match `[A-Za-z_.$][A-Za-z0-9_.$]*`.
    fn parse_attr_symbol(&mut self, attr_loc: &Location) -> Result<String, Diagnostic> {
        self.want(TokenKind::LParen)?;
        let tok = self.lex()?;
        let bytes = match tok.kind {
            TokenKind::Literal(ternc_lex::Literal {
                storage: Storage::String,
                value: ternc_lex::LitValue::Bytes(bytes),
            }) => bytes,
            kind => {
                return Err(Diagnostic::syntax_msg(
                    tok.loc,
                    "expected string literal",
                    kind,
                ))
            }
        };
        for (i, &b) in bytes.iter().enumerate() {
            let valid = b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'$');
            let valid = valid && (i != 0 || !b.is_ascii_digit());
            if !valid {
                return Err(Diagnostic::syntax_msg(
                    attr_loc.clone(),
                    "invalid symbol",
                    String::from_utf8_lossy(&bytes),
                ));
            }
        }
        self.want(TokenKind::RParen)?;
        // ASCII-validated above.
        Ok(String::from_utf8(bytes).unwrap())
    }

    /// `'(' parameter-list? ')' type`.
    fn parse_prototype(&mut self, noreturn: bool) -> Result<FnType, Diagnostic> {
        let _span = trace_span!("prototype").entered();
        self.want(TokenKind::LParen)?;
        let mut params = Vec::new();
        let mut variadism = Variadism::None;
        let tok = self.lex()?;
        if tok.kind != TokenKind::RParen {
            self.unlex(tok);
            variadism = self.parse_parameter_list(&mut params)?;
            self.want(TokenKind::RParen)?;
        }
        let result = self.parse_type()?;
        trace!("[{} parameters] [type]", params.len());
        Ok(FnType {
            result: Box::new(result),
            params,
            variadism,
            noreturn,
        })
    }

    /// `name ':' type (',' name ':' type)*` with an optional trailing `...`
    /// (C-style) or `, ...` (Tern-style) variadic marker.
    fn parse_parameter_list(
        &mut self,
        params: &mut Vec<FnParam>,
    ) -> Result<Variadism, Diagnostic> {
        let _span = trace_span!("parameter-list").entered();
        loop {
            let (name, _) = self.want_name()?;
            self.want(TokenKind::Colon)?;
            let ty = self.parse_type()?;
            trace!("{}: [type]", name);
            params.push(FnParam { name, ty });

            let tok = self.lex()?;
            match tok.kind {
                TokenKind::Comma => {
                    let next = self.lex()?;
                    if next.kind == TokenKind::Ellipsis {
                        self.eat_trailing_comma()?;
                        return Ok(Variadism::Tern);
                    }
                    self.unlex(next);
                }
                TokenKind::Ellipsis => {
                    self.eat_trailing_comma()?;
                    return Ok(Variadism::C);
                }
                _ => {
                    self.unlex(tok);
                    return Ok(Variadism::None);
                }
            }
        }
    }

    fn eat_trailing_comma(&mut self) -> Result<(), Diagnostic> {
        let tok = self.lex()?;
        if tok.kind != TokenKind::Comma {
            self.unlex(tok);
        }
        Ok(())
    }

    /// The type grammar. An optional leading `const` marks the resulting
    /// type constant; the next token selects the variant.
    fn parse_type(&mut self) -> Result<Type, Diagnostic> {
        let _span = trace_span!("type").entered();
        let mut constant = false;
        let tok = self.lex()?;
        let tok = if tok.kind == TokenKind::Const {
            constant = true;
            self.lex()?
        } else {
            tok
        };

        let repr = match tok.kind {
            TokenKind::I8 => TypeRepr::Primitive(Storage::I8),
            TokenKind::I16 => TypeRepr::Primitive(Storage::I16),
            TokenKind::I32 => TypeRepr::Primitive(Storage::I32),
            TokenKind::I64 => TypeRepr::Primitive(Storage::I64),
            TokenKind::U8 => TypeRepr::Primitive(Storage::U8),
            TokenKind::U16 => TypeRepr::Primitive(Storage::U16),
            TokenKind::U32 => TypeRepr::Primitive(Storage::U32),
            TokenKind::U64 => TypeRepr::Primitive(Storage::U64),
            TokenKind::Int => TypeRepr::Primitive(Storage::Int),
            TokenKind::Uint => TypeRepr::Primitive(Storage::Uint),
            TokenKind::Size => TypeRepr::Primitive(Storage::Size),
            TokenKind::Uintptr => TypeRepr::Primitive(Storage::Uintptr),
            TokenKind::Char => TypeRepr::Primitive(Storage::Char),
            TokenKind::Rune => TypeRepr::Primitive(Storage::Rune),
            TokenKind::Str => TypeRepr::Primitive(Storage::String),
            TokenKind::F32 => TypeRepr::Primitive(Storage::F32),
            TokenKind::F64 => TypeRepr::Primitive(Storage::F64),
            TokenKind::Bool => TypeRepr::Primitive(Storage::Bool),
            TokenKind::Void => TypeRepr::Primitive(Storage::Void),
            TokenKind::Nullable => {
                trace!("nullable");
                self.want(TokenKind::Star)?;
                TypeRepr::Pointer {
                    nullable: true,
                    referent: Box::new(self.parse_type()?),
                }
            }
            TokenKind::Star => TypeRepr::Pointer {
                nullable: false,
                referent: Box::new(self.parse_type()?),
            },
            TokenKind::AttrNoreturn => {
                self.want(TokenKind::Fn)?;
                TypeRepr::Function(self.parse_prototype(true)?)
            }
            TokenKind::Fn => TypeRepr::Function(self.parse_prototype(false)?),
            TokenKind::Enum => {
                return Err(Diagnostic::not_implemented(tok.loc, "enum types"));
            }
            TokenKind::Struct | TokenKind::Union => {
                return Err(Diagnostic::not_implemented(
                    tok.loc,
                    "struct and union types",
                ));
            }
            TokenKind::LParen => {
                return Err(Diagnostic::not_implemented(tok.loc, "tagged union types"));
            }
            TokenKind::LBracket => {
                return Err(Diagnostic::not_implemented(
                    tok.loc,
                    "slice and array types",
                ));
            }
            _ => {
                self.unlex(tok);
                let (ident, _) = self.parse_identifier()?;
                TypeRepr::Alias(ident)
            }
        };

        let ty = Type { constant, repr };
        trace!(
            "{}{}",
            if ty.constant { "const " } else { "" },
            ty.storage()
        );
        Ok(ty)
    }

    /// A literal constant; richer expressions belong to the check pass.
    fn parse_simple_expression(&mut self) -> Result<Expr, Diagnostic> {
        let _span = trace_span!("simple-expression").entered();
        let tok = self.lex()?;
        match tok.kind {
            TokenKind::Literal(lit) => {
                trace!("constant {}", lit);
                Ok(Expr {
                    loc: tok.loc,
                    kind: ExprKind::Constant(lit),
                })
            }
            _ => Err(unexpected(&tok, &["literal"])),
        }
    }

    fn parse_complex_expression(&mut self) -> Result<Expr, Diagnostic> {
        let _span = trace_span!("complex-expression").entered();
        self.parse_simple_expression()
    }
}
