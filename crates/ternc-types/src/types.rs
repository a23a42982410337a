//! Interned type records.

use ternc_util::{Idx, Storage, Variadism};

/// Handle to an interned type.
///
/// Two interned types are equal iff they are the same record, so comparing
/// handles is the type-equality test. The ids below index the resident
/// builtin singletons, pre-interned at store construction in exactly this
/// order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl Idx for TypeId {
    fn from_usize(idx: usize) -> Self {
        TypeId(idx as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl TypeId {
    pub const BOOL: TypeId = TypeId(0);
    pub const CHAR: TypeId = TypeId(1);
    pub const F32: TypeId = TypeId(2);
    pub const F64: TypeId = TypeId(3);
    pub const I8: TypeId = TypeId(4);
    pub const I16: TypeId = TypeId(5);
    pub const I32: TypeId = TypeId(6);
    pub const I64: TypeId = TypeId(7);
    pub const INT: TypeId = TypeId(8);
    pub const NULL: TypeId = TypeId(9);
    pub const RUNE: TypeId = TypeId(10);
    pub const SIZE: TypeId = TypeId(11);
    pub const U8: TypeId = TypeId(12);
    pub const U16: TypeId = TypeId(13);
    pub const U32: TypeId = TypeId(14);
    pub const U64: TypeId = TypeId(15);
    pub const UINT: TypeId = TypeId(16);
    pub const UINTPTR: TypeId = TypeId(17);
    pub const VOID: TypeId = TypeId(18);
    // const-qualified singletons; `const void` and `const null` collapse
    // onto the unqualified ids.
    pub const CONST_BOOL: TypeId = TypeId(19);
    pub const CONST_CHAR: TypeId = TypeId(20);
    pub const CONST_F32: TypeId = TypeId(21);
    pub const CONST_F64: TypeId = TypeId(22);
    pub const CONST_I8: TypeId = TypeId(23);
    pub const CONST_I16: TypeId = TypeId(24);
    pub const CONST_I32: TypeId = TypeId(25);
    pub const CONST_I64: TypeId = TypeId(26);
    pub const CONST_INT: TypeId = TypeId(27);
    pub const CONST_RUNE: TypeId = TypeId(28);
    pub const CONST_SIZE: TypeId = TypeId(29);
    pub const CONST_U8: TypeId = TypeId(30);
    pub const CONST_U16: TypeId = TypeId(31);
    pub const CONST_U32: TypeId = TypeId(32);
    pub const CONST_U64: TypeId = TypeId(33);
    pub const CONST_UINT: TypeId = TypeId(34);
    pub const CONST_UINTPTR: TypeId = TypeId(35);

    /// Number of resident builtin records.
    pub(crate) const BUILTIN_COUNT: usize = 36;
}

/// Type qualifier flags. Only `const` exists today.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TypeFlags(u8);

impl TypeFlags {
    pub const NONE: TypeFlags = TypeFlags(0);
    pub const CONST: TypeFlags = TypeFlags(1);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: TypeFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn with(self, other: TypeFlags) -> TypeFlags {
        TypeFlags(self.0 | other.0)
    }

    pub fn without(self, other: TypeFlags) -> TypeFlags {
        TypeFlags(self.0 & !other.0)
    }
}

/// A canonical type record.
///
/// `size`/`align` are in bytes; `None` marks types of unknown extent
/// (function types, arrays of unspecified length). Sub-references in the
/// payload are themselves interned, so structural equality of records
/// reduces to id comparisons.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Type {
    pub storage: Storage,
    pub flags: TypeFlags,
    pub size: Option<u64>,
    pub align: Option<u64>,
    pub repr: TypeRepr,
}

impl Type {
    pub fn is_const(&self) -> bool {
        self.flags.contains(TypeFlags::CONST)
    }

    pub fn as_pointer(&self) -> Option<&PointerType> {
        match &self.repr {
            TypeRepr::Pointer(ptr) => Some(ptr),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayType> {
        match &self.repr {
            TypeRepr::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_func(&self) -> Option<&FuncType> {
        match &self.repr {
            TypeRepr::Function(func) => Some(func),
            _ => None,
        }
    }
}

/// Variant payload of a type record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRepr {
    /// Primitive storages carry no payload.
    Builtin,
    Pointer(PointerType),
    Array(ArrayType),
    Function(FuncType),
    /// Reserved slot during two-phase insertion: the record is registered
    /// under its structural hash before its payload lands, so interning a
    /// self-referential type can find the enclosing record. Equality checks
    /// compare identity before payload and never match this.
    Unfilled,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointerType {
    pub referent: TypeId,
    pub nullable: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayType {
    pub element: TypeId,
    pub length: Option<u64>,
    pub expandable: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FuncType {
    pub result: TypeId,
    pub params: Vec<TypeId>,
    pub variadism: Variadism,
    pub noreturn: bool,
}
