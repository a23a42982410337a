//! The abstract syntax tree.
//!
//! One [`Subunit`] per translation input: its imports followed by its
//! declarations, in source order. Every sequence that was order-significant
//! in the grammar (parameter lists, declaration groups, the declarations
//! themselves) is an ordered `Vec`.

use ternc_lex::Literal;
use ternc_util::{Ident, Location, Storage, Symbol, Variadism};

/// One translation input.
#[derive(Clone, Debug, PartialEq)]
pub struct Subunit {
    pub imports: Vec<Import>,
    pub decls: Vec<Decl>,
}

/// A `use` import.
#[derive(Clone, Debug, PartialEq)]
pub struct Import {
    pub ident: Ident,
}

/// A top-level declaration. `exported` comes from the `export` prefix and
/// applies to the whole declaration group.
#[derive(Clone, Debug, PartialEq)]
pub struct Decl {
    pub exported: bool,
    pub kind: DeclKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeclKind {
    /// `let` / `const` globals with typed initializers.
    Global {
        mode: GlobalMode,
        bindings: Vec<GlobalBinding>,
    },
    /// `def` compile-time constants.
    Const { bindings: Vec<GlobalBinding> },
    /// `type name = T` aliases.
    TypeAlias { aliases: Vec<TypeAlias> },
    /// Everything else: a function declaration.
    Func(FnDecl),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlobalMode {
    Let,
    Const,
}

/// One binding of a `let`/`const`/`def` group. The optional `@symbol`
/// attribute binds to the individual binding, not the group.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalBinding {
    pub loc: Location,
    pub symbol: Option<String>,
    pub ident: Ident,
    pub ty: Type,
    pub init: Expr,
}

/// One alias of a `type` declaration group.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeAlias {
    pub loc: Location,
    pub ident: Ident,
    pub ty: Type,
}

/// A function declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct FnDecl {
    pub loc: Location,
    pub flags: FnFlags,
    pub symbol: Option<String>,
    pub ident: Ident,
    pub prototype: FnType,
    pub body: Expr,
}

/// `@init` / `@fini` / `@test` markers on a function declaration.
/// `@noreturn` is part of the function type instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FnFlags {
    pub init: bool,
    pub fini: bool,
    pub test: bool,
}

/// A syntactic type. Types are trees; sharing only appears after interning.
#[derive(Clone, Debug, PartialEq)]
pub struct Type {
    pub constant: bool,
    pub repr: TypeRepr,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TypeRepr {
    /// A keyword-introduced storage: `int`, `bool`, `void`, `str`, ...
    Primitive(Storage),
    Pointer {
        nullable: bool,
        referent: Box<Type>,
    },
    Function(FnType),
    /// Reserved: arrays parse to "not implemented" today, but the variant
    /// participates in interning for the store's sake.
    Array {
        length: Option<Box<Expr>>,
        element: Box<Type>,
        expandable: bool,
    },
    Alias(Ident),
    // Reserved variants, rejected at parse time.
    Struct,
    Union,
    TaggedUnion,
    Enum,
    Slice,
}

impl Type {
    pub fn primitive(storage: Storage) -> Self {
        Type {
            constant: false,
            repr: TypeRepr::Primitive(storage),
        }
    }

    /// The storage tag discriminating this type.
    pub fn storage(&self) -> Storage {
        match &self.repr {
            TypeRepr::Primitive(storage) => *storage,
            TypeRepr::Pointer { .. } => Storage::Pointer,
            TypeRepr::Function(_) => Storage::Function,
            TypeRepr::Array { .. } => Storage::Array,
            TypeRepr::Alias(_) => Storage::Alias,
            TypeRepr::Struct => Storage::Struct,
            TypeRepr::Union => Storage::Union,
            TypeRepr::TaggedUnion => Storage::TaggedUnion,
            TypeRepr::Enum => Storage::Enum,
            TypeRepr::Slice => Storage::Slice,
        }
    }
}

/// A function type: `fn(params) R`, possibly variadic, possibly `@noreturn`.
#[derive(Clone, Debug, PartialEq)]
pub struct FnType {
    pub result: Box<Type>,
    pub params: Vec<FnParam>,
    pub variadism: Variadism,
    pub noreturn: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FnParam {
    pub name: Symbol,
    pub ty: Type,
}

/// An expression. Only literal constants exist at this stage; richer forms
/// belong to the check pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub loc: Location,
    pub kind: ExprKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Constant(Literal),
}
