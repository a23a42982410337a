//! Type storage tags.
//!
//! [`Storage`] is the discriminant identifying which variant of the type sum
//! a given type is. It is shared between the token stream (literal storage
//! tags), the AST, and the interned type graph, so it lives here rather than
//! in any one phase crate.

use std::fmt;

/// The storage class of a type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Storage {
    // Scalar types
    Bool,
    Char,
    F32,
    F64,
    I8,
    I16,
    I32,
    I64,
    Int,
    Null,
    Rune,
    Size,
    U8,
    U16,
    U32,
    U64,
    Uint,
    Uintptr,
    Void,
    // Aggregate types
    Alias,
    Array,
    Enum,
    Function,
    Pointer,
    Slice,
    String,
    Struct,
    TaggedUnion,
    Union,
}

impl Storage {
    /// True for the primitive storages that have resident builtin singletons
    /// in the type store.
    pub fn is_primitive(self) -> bool {
        !matches!(
            self,
            Storage::Alias
                | Storage::Array
                | Storage::Enum
                | Storage::Function
                | Storage::Pointer
                | Storage::Slice
                | Storage::String
                | Storage::Struct
                | Storage::TaggedUnion
                | Storage::Union
        )
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Storage::I8
                | Storage::I16
                | Storage::I32
                | Storage::I64
                | Storage::Int
                | Storage::Size
                | Storage::U8
                | Storage::U16
                | Storage::U32
                | Storage::U64
                | Storage::Uint
                | Storage::Uintptr
        )
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            Storage::I8 | Storage::I16 | Storage::I32 | Storage::I64 | Storage::Int
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, Storage::F32 | Storage::F64)
    }
}

impl fmt::Display for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Storage::Bool => "bool",
            Storage::Char => "char",
            Storage::F32 => "f32",
            Storage::F64 => "f64",
            Storage::I8 => "i8",
            Storage::I16 => "i16",
            Storage::I32 => "i32",
            Storage::I64 => "i64",
            Storage::Int => "int",
            Storage::Null => "null",
            Storage::Rune => "rune",
            Storage::Size => "size",
            Storage::U8 => "u8",
            Storage::U16 => "u16",
            Storage::U32 => "u32",
            Storage::U64 => "u64",
            Storage::Uint => "uint",
            Storage::Uintptr => "uintptr",
            Storage::Void => "void",
            Storage::Alias => "alias",
            Storage::Array => "array",
            Storage::Enum => "enum",
            Storage::Function => "function",
            Storage::Pointer => "pointer",
            Storage::Slice => "slice",
            Storage::String => "str",
            Storage::Struct => "struct",
            Storage::TaggedUnion => "tagged union",
            Storage::Union => "union",
        };
        f.write_str(name)
    }
}

/// Trailing-parameter conventions for function types. The two variadic
/// spellings (`...` directly after the last parameter, or `, ...`) are
/// distinct at the type level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Variadism {
    #[default]
    None,
    /// `fn(x: int...)` - C-style trailing arguments.
    C,
    /// `fn(x: int, ...)` - Tern-style trailing arguments.
    Tern,
}
