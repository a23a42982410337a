//! ternc-gen - Declaration checking and IR lowering.
//!
//! The pass sitting between the parser and the emitter. For each
//! declaration it interns the declared type, types the initializer, applies
//! the assignability predicate, records the binding in the unit scope, and
//! lowers the result into the IR program:
//!
//! - `let`/`const` globals become data definitions;
//! - functions become function definitions (`@start` label plus `ret`);
//! - `def` constants and type aliases produce no IR.
//!
//! Definitions land in the program in declaration order, which the emitter
//! preserves. The first rejected declaration aborts the pass.

pub mod scope;

use indexmap::IndexMap;
use tracing::trace_span;

use ternc_ir::{
    DataDef, DataItem, Def, DefKind, FuncParam, Function, Instr, IrType, Program, Statement, Value,
};
use ternc_lex::{LitValue, Literal};
use ternc_par::ast;
use ternc_types::{TypeFlags, TypeId, TypeStore};
use ternc_util::{Diagnostic, Ident, Location, Storage, Symbol};

use crate::scope::Scope;

/// Checks a subunit and lowers it to an IR program.
pub fn gen(unit: &ast::Subunit, store: &mut TypeStore) -> Result<Program, Diagnostic> {
    let _span = trace_span!("gen").entered();
    let mut ctx = Gen {
        store,
        scope: Scope::root(),
        aliases: IndexMap::new(),
        program: Program::new(),
    };
    for decl in &unit.decls {
        ctx.gen_decl(decl)?;
    }
    Ok(ctx.program)
}

struct Gen<'a> {
    store: &'a mut TypeStore,
    scope: Scope,
    /// Unit-level type aliases in declaration order.
    aliases: IndexMap<Ident, TypeId>,
    program: Program,
}

impl Gen<'_> {
    fn gen_decl(&mut self, decl: &ast::Decl) -> Result<(), Diagnostic> {
        match &decl.kind {
            ast::DeclKind::Global { bindings, .. } => {
                for binding in bindings {
                    self.gen_global(binding, decl.exported, true)?;
                }
            }
            ast::DeclKind::Const { bindings } => {
                for binding in bindings {
                    self.gen_global(binding, decl.exported, false)?;
                }
            }
            ast::DeclKind::TypeAlias { aliases } => {
                for alias in aliases {
                    self.gen_type_alias(alias)?;
                }
            }
            ast::DeclKind::Func(func) => self.gen_func(func, decl.exported)?,
        }
        Ok(())
    }

    /// A `let`/`const` global (lowered to data) or a `def` constant
    /// (scope-only).
    fn gen_global(
        &mut self,
        binding: &ast::GlobalBinding,
        exported: bool,
        runtime: bool,
    ) -> Result<(), Diagnostic> {
        let _span = trace_span!("global").entered();
        let ty = self.resolve_type(&binding.ty, &binding.loc)?;
        let init_ty = self.expr_type(&binding.init)?;
        if !self.store.is_assignable(ty, init_ty) {
            return Err(Diagnostic::error(
                binding.init.loc.clone(),
                "initializer is not assignable to declared type",
            ));
        }
        self.declare(&binding.ident, &binding.loc, ty)?;

        if !runtime {
            return Ok(());
        }

        let ir_ty = data_qtype(self.store, ty);
        let ast::ExprKind::Constant(lit) = &binding.init.kind;
        let items = vec![DataItem::Value(lower_const(lit, ir_ty))];
        let name = self.mangle(&binding.ident, binding.symbol.as_deref());
        self.program.push(Def {
            name,
            exported,
            kind: DefKind::Data(DataDef {
                section: None,
                secflags: None,
                items,
            }),
        });
        Ok(())
    }

    fn gen_type_alias(&mut self, alias: &ast::TypeAlias) -> Result<(), Diagnostic> {
        let _span = trace_span!("typedef").entered();
        let ty = self.resolve_type(&alias.ty, &alias.loc)?;
        if self.aliases.insert(alias.ident.clone(), ty).is_some() {
            return Err(Diagnostic::error(
                alias.loc.clone(),
                format!("duplicate declaration of '{}'", alias.ident),
            ));
        }
        Ok(())
    }

    fn gen_func(&mut self, decl: &ast::FnDecl, exported: bool) -> Result<(), Diagnostic> {
        let _span = trace_span!("fn").entered();
        let fn_atype = ast::Type {
            constant: false,
            repr: ast::TypeRepr::Function(decl.prototype.clone()),
        };
        let fn_ty = self.store.lookup_atype(&fn_atype);
        self.declare(&decl.ident, &decl.loc, fn_ty)?;

        let result = self.store.lookup_atype(&decl.prototype.result);
        let body_ty = self.expr_type(&decl.body)?;
        let void_result = self.store.get(result).storage == Storage::Void;
        if !void_result && !self.store.is_assignable(result, body_ty) {
            return Err(Diagnostic::error(
                decl.body.loc.clone(),
                "function body is not assignable to result type",
            ));
        }

        let returns = if void_result {
            IrType::Void
        } else {
            abi_qtype(self.store, result)
        };
        let mut func = Function::new(returns);
        for param in &decl.prototype.params {
            let param_ty = self.store.lookup_atype(&param.ty);
            func.params.push(FuncParam {
                name: param.name,
                ty: abi_qtype(self.store, param_ty),
            });
        }

        func.push(Statement::Label(Symbol::intern("start")));
        let ast::ExprKind::Constant(lit) = &decl.body.kind;
        let ret_args = if void_result {
            Vec::new()
        } else {
            vec![lower_const(lit, returns)]
        };
        func.push(Statement::Instruction {
            instr: Instr::Ret,
            out: None,
            args: ret_args,
        });

        let name = self.mangle(&decl.ident, decl.symbol.as_deref());
        self.program.push(Def {
            name,
            exported,
            kind: DefKind::Func(func),
        });
        Ok(())
    }

    /// Interns a syntactic type, resolving unit-level aliases by name.
    fn resolve_type(&mut self, ty: &ast::Type, loc: &Location) -> Result<TypeId, Diagnostic> {
        if let ast::TypeRepr::Alias(ident) = &ty.repr {
            let Some(&id) = self.aliases.get(ident) else {
                return Err(Diagnostic::error(
                    loc.clone(),
                    format!("unknown type '{}'", ident),
                ));
            };
            let flags = if ty.constant {
                self.store.get(id).flags.with(TypeFlags::CONST)
            } else {
                return Ok(id);
            };
            return Ok(self.store.lookup_with_flags(id, flags));
        }
        Ok(self.store.lookup_atype(ty))
    }

    /// The type of an initializer expression: the builtin singleton for the
    /// literal's storage tag.
    fn expr_type(&mut self, expr: &ast::Expr) -> Result<TypeId, Diagnostic> {
        let ast::ExprKind::Constant(lit) = &expr.kind;
        if lit.storage == Storage::String {
            return Err(Diagnostic::not_implemented(
                expr.loc.clone(),
                "string initializers",
            ));
        }
        Ok(self.store.lookup_atype(&ast::Type::primitive(lit.storage)))
    }

    /// Rejects duplicate unit-level names, then binds the identifier.
    fn declare(&mut self, ident: &Ident, loc: &Location, ty: TypeId) -> Result<(), Diagnostic> {
        if self.scope.declared_here(ident) {
            return Err(Diagnostic::error(
                loc.clone(),
                format!("duplicate declaration of '{}'", ident),
            ));
        }
        self.scope.insert(ident.clone(), ty);
        Ok(())
    }

    /// The IR symbol for a declaration: the `@symbol` override when given,
    /// else the identifier components joined with `.`.
    fn mangle(&self, ident: &Ident, symbol: Option<&str>) -> Symbol {
        match symbol {
            Some(symbol) => Symbol::intern(symbol),
            None => Symbol::intern(&ident.join(".")),
        }
    }
}

/// The IR type of a scalar as stored in data items.
fn data_qtype(store: &TypeStore, id: TypeId) -> IrType {
    let ty = store.get(id);
    match ty.storage {
        Storage::Bool | Storage::Char | Storage::I8 | Storage::U8 => IrType::Byte,
        Storage::I16 | Storage::U16 => IrType::Half,
        Storage::I32 | Storage::U32 | Storage::Int | Storage::Uint | Storage::Rune => IrType::Word,
        Storage::I64
        | Storage::U64
        | Storage::Size
        | Storage::Uintptr
        | Storage::Pointer
        | Storage::Null
        | Storage::Function => IrType::Long,
        Storage::F32 => IrType::Single,
        Storage::F64 => IrType::Double,
        Storage::Void => IrType::Void,
        storage => panic!("cannot lower {} type", storage),
    }
}

/// The IR type of a scalar in ABI positions; sub-word integers widen to
/// word.
fn abi_qtype(store: &TypeStore, id: TypeId) -> IrType {
    match data_qtype(store, id) {
        IrType::Byte | IrType::Half => IrType::Word,
        ty => ty,
    }
}

/// Lowers a checked literal to a constant of the given IR type.
fn lower_const(lit: &Literal, ty: IrType) -> Value {
    match ty {
        IrType::Byte | IrType::Half | IrType::Word => Value::const_word(ty, const_bits(lit) as u32),
        IrType::Long => Value::const_long(const_bits(lit)),
        IrType::Single => Value::const_single(const_float(lit) as f32),
        IrType::Double => Value::const_double(const_float(lit)),
        _ => panic!("constant with non-scalar IR type"),
    }
}

fn const_bits(lit: &Literal) -> u64 {
    match &lit.value {
        LitValue::Signed(v) => *v as u64,
        LitValue::Unsigned(v) => *v,
        LitValue::Rune(c) => *c as u64,
        LitValue::Float(_) | LitValue::Bytes(_) => {
            panic!("non-integer constant in integer position")
        }
    }
}

fn const_float(lit: &Literal) -> f64 {
    match &lit.value {
        LitValue::Float(v) => *v,
        _ => panic!("non-float constant in float position"),
    }
}

#[cfg(test)]
mod tests {
    use ternc_lex::Lexer;

    use super::*;

    fn lower(source: &str) -> Result<String, Diagnostic> {
        let unit = ternc_par::parse(Lexer::new(source, "gen.tn"))?;
        let mut store = TypeStore::new();
        let program = gen(&unit, &mut store)?;
        let mut buf = Vec::new();
        ternc_ir::emit(&program, &mut buf).unwrap();
        Ok(String::from_utf8(buf).unwrap())
    }

    fn lower_ok(source: &str) -> String {
        lower(source).expect("check/lower error")
    }

    #[test]
    fn exported_void_main() {
        assert_eq!(
            lower_ok("export fn main() void = 0;"),
            "export function section \".text.main\" \"ax\" $main() {\n\
             @start\n\
             \tret\n\
             }\n\n"
        );
    }

    #[test]
    fn function_with_params_and_result() {
        assert_eq!(
            lower_ok("fn add(a: int, b: i8) int = 0;"),
            "function section \".text.add\" \"ax\" w $add(w %a, w %b) {\n\
             @start\n\
             \tret 0\n\
             }\n\n"
        );
    }

    #[test]
    fn global_with_symbol_override() {
        assert_eq!(
            lower_ok("let @symbol(\"foo_bar\") x: int = 42;"),
            "data section \".data.foo_bar\" $foo_bar = { w 42 }\n\n"
        );
    }

    #[test]
    fn namespaced_idents_mangle_with_dots() {
        assert_eq!(
            lower_ok("let a::b::c: u64 = 1;"),
            "data section \".data.a.b.c\" $a.b.c = { l 1 }\n\n"
        );
    }

    #[test]
    fn null_global_classifies_as_bss() {
        assert_eq!(
            lower_ok("let p: nullable *int = null;"),
            "data section \".bss.p\" $p = { l 0 }\n\n"
        );
    }

    #[test]
    fn null_into_plain_pointer_is_rejected() {
        let err = lower("let p: *int = null;").unwrap_err();
        assert!(err.to_string().contains("not assignable"));
    }

    #[test]
    fn mixed_nullability_group() {
        // x rejects null; the check stops at the first bad binding
        let err = lower("let x: *int = null, y: nullable *int = null;").unwrap_err();
        assert!(err.to_string().contains("not assignable"));
        assert_eq!((err.loc.line, err.loc.column), (1, 15));
    }

    #[test]
    fn def_constants_emit_nothing() {
        assert_eq!(lower_ok("def LIMIT: int = 64;"), "");
    }

    #[test]
    fn type_aliases_resolve_and_emit_nothing() {
        assert_eq!(
            lower_ok("type cell = nullable *u8; let c: cell = null;"),
            "data section \".bss.c\" $c = { l 0 }\n\n"
        );
    }

    #[test]
    fn alias_groups_share_one_interned_type() {
        let unit = ternc_par::parse(Lexer::new(
            "type a = *const int, b = *const int;",
            "gen.tn",
        ))
        .unwrap();
        let mut store = TypeStore::new();
        let ast::DeclKind::TypeAlias { aliases } = &unit.decls[0].kind else {
            panic!("expected type aliases");
        };
        let first = store.lookup_atype(&aliases[0].ty);
        let second = store.lookup_atype(&aliases[1].ty);
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_alias_is_rejected() {
        let err = lower("let x: missing = 0;").unwrap_err();
        assert!(err.to_string().contains("unknown type 'missing'"));
    }

    #[test]
    fn duplicate_declarations_are_rejected() {
        let err = lower("let x: int = 1; let x: int = 2;").unwrap_err();
        assert!(err.to_string().contains("duplicate declaration of 'x'"));
    }

    #[test]
    fn integer_widening_initializers() {
        assert_eq!(
            lower_ok("let w: i64 = 12i8;"),
            "data section \".data.w\" $w = { l 12 }\n\n"
        );
        let err = lower("let n: i8 = 300;").unwrap_err();
        assert!(err.to_string().contains("not assignable"));
    }

    #[test]
    fn float_globals() {
        assert_eq!(
            lower_ok("let f: f32 = 1.5; let d: f64 = 2.0;"),
            "data section \".data.f\" $f = { s s_1.500000 }\n\n\
             data section \".data.d\" $d = { d d_2.000000 }\n\n"
        );
    }

    #[test]
    fn small_integers_use_narrow_data_types() {
        assert_eq!(
            lower_ok("let b: u8 = 7u8; let h: u16 = 9u16;"),
            "data section \".data.b\" $b = { b 7 }\n\n\
             data section \".data.h\" $h = { h 9 }\n\n"
        );
    }

    #[test]
    fn declaration_order_is_program_order() {
        let text = lower_ok("let a: int = 1; fn f() void = 0; let z: int = 2;");
        let a = text.find("$a").unwrap();
        let f = text.find("$f").unwrap();
        let z = text.find("$z").unwrap();
        assert!(a < f && f < z);
    }

    #[test]
    fn const_globals_still_emit_data() {
        assert_eq!(
            lower_ok("const k: u32 = 5u32;"),
            "data section \".data.k\" $k = { w 5 }\n\n"
        );
    }

    #[test]
    fn emission_is_deterministic_end_to_end() {
        let src = "export fn main() void = 0; let x: int = 3; def K: int = 1;";
        assert_eq!(lower_ok(src), lower_ok(src));
    }
}
