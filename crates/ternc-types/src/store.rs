//! The hash-consing type store.
//!
//! The store maps structural shape to interned record. The structural hash
//! combines the storage tag, the flags and the variant payload recursively
//! with a DJB2 mix; collisions fall back to a structural equality walk over
//! the bucket chain. Because payloads reference interned sub-types, that
//! walk compares ids, never whole sub-trees.
//!
//! Insertion is two-phase: the record is pushed and registered under its
//! hash before the payload is considered final, so interning a
//! self-referential type can resolve the enclosing record mid-fill. Equality
//! compares identity first and treats an unfilled payload as equal to
//! nothing.

use rustc_hash::FxHashMap;

use ternc_par::ast;
use ternc_util::{IndexVec, Storage};

use crate::eval::{ConstEval, ConstValue, LiteralEval};
use crate::types::{ArrayType, FuncType, PointerType, Type, TypeFlags, TypeId, TypeRepr};

const DJB2_INIT: u64 = 5381;

fn djb2(hash: u64, x: u64) -> u64 {
    hash.wrapping_mul(33).wrapping_add(x)
}

/// (storage, size, align) of the resident builtins, in [`TypeId`] order.
const BUILTINS: &[(Storage, u64, u64)] = &[
    (Storage::Bool, 1, 1),
    (Storage::Char, 1, 1),
    (Storage::F32, 4, 4),
    (Storage::F64, 8, 8),
    (Storage::I8, 1, 1),
    (Storage::I16, 2, 2),
    (Storage::I32, 4, 4),
    (Storage::I64, 8, 8),
    (Storage::Int, 4, 4),
    (Storage::Null, 8, 8),
    (Storage::Rune, 4, 4),
    (Storage::Size, 8, 8),
    (Storage::U8, 1, 1),
    (Storage::U16, 2, 2),
    (Storage::U32, 4, 4),
    (Storage::U64, 8, 8),
    (Storage::Uint, 4, 4),
    (Storage::Uintptr, 8, 8),
    (Storage::Void, 0, 0),
];

/// The resident singleton for a primitive storage, if the storage has one.
/// `const void` and `const null` are the same types as their unqualified
/// forms.
fn builtin_for(storage: Storage, is_const: bool) -> Option<TypeId> {
    let (plain, constant) = match storage {
        Storage::Bool => (TypeId::BOOL, TypeId::CONST_BOOL),
        Storage::Char => (TypeId::CHAR, TypeId::CONST_CHAR),
        Storage::F32 => (TypeId::F32, TypeId::CONST_F32),
        Storage::F64 => (TypeId::F64, TypeId::CONST_F64),
        Storage::I8 => (TypeId::I8, TypeId::CONST_I8),
        Storage::I16 => (TypeId::I16, TypeId::CONST_I16),
        Storage::I32 => (TypeId::I32, TypeId::CONST_I32),
        Storage::I64 => (TypeId::I64, TypeId::CONST_I64),
        Storage::Int => (TypeId::INT, TypeId::CONST_INT),
        Storage::Rune => (TypeId::RUNE, TypeId::CONST_RUNE),
        Storage::Size => (TypeId::SIZE, TypeId::CONST_SIZE),
        Storage::U8 => (TypeId::U8, TypeId::CONST_U8),
        Storage::U16 => (TypeId::U16, TypeId::CONST_U16),
        Storage::U32 => (TypeId::U32, TypeId::CONST_U32),
        Storage::U64 => (TypeId::U64, TypeId::CONST_U64),
        Storage::Uint => (TypeId::UINT, TypeId::CONST_UINT),
        Storage::Uintptr => (TypeId::UINTPTR, TypeId::CONST_UINTPTR),
        Storage::Void => return Some(TypeId::VOID),
        Storage::Null => return Some(TypeId::NULL),
        _ => return None,
    };
    Some(if is_const { constant } else { plain })
}

/// Owns every interned type. Interned ids are valid for the lifetime of the
/// store; the store is single-threaded and callers serialize access.
pub struct TypeStore {
    types: IndexVec<TypeId, Type>,
    buckets: FxHashMap<u64, Vec<TypeId>>,
    eval: Box<dyn ConstEval>,
}

impl TypeStore {
    pub fn new() -> Self {
        Self::with_eval(Box::new(LiteralEval))
    }

    /// Creates a store resolving array lengths through the given evaluator.
    pub fn with_eval(eval: Box<dyn ConstEval>) -> Self {
        let mut types = IndexVec::new();
        for &(storage, size, align) in BUILTINS {
            types.push(Type {
                storage,
                flags: TypeFlags::NONE,
                size: Some(size),
                align: Some(align),
                repr: TypeRepr::Builtin,
            });
        }
        for &(storage, size, align) in BUILTINS {
            if matches!(storage, Storage::Null | Storage::Void) {
                continue;
            }
            types.push(Type {
                storage,
                flags: TypeFlags::CONST,
                size: Some(size),
                align: Some(align),
                repr: TypeRepr::Builtin,
            });
        }
        debug_assert_eq!(types.len(), TypeId::BUILTIN_COUNT);

        TypeStore {
            types,
            buckets: FxHashMap::default(),
            eval,
        }
    }

    /// The record behind an id. The reference is tied to the store's borrow;
    /// ids themselves stay valid for the store's lifetime.
    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id]
    }

    /// Interns the canonical type for a syntactic type. Structurally equal
    /// inputs yield the same id.
    pub fn lookup_atype(&mut self, atype: &ast::Type) -> TypeId {
        let flags = if atype.constant {
            TypeFlags::CONST
        } else {
            TypeFlags::NONE
        };
        match &atype.repr {
            ast::TypeRepr::Primitive(storage) => builtin_for(*storage, atype.constant)
                .unwrap_or_else(|| panic!("{} types are not implemented", storage)),
            ast::TypeRepr::Pointer { nullable, referent } => {
                let referent = self.lookup_atype(referent);
                self.intern_pointer(referent, *nullable, flags)
            }
            ast::TypeRepr::Function(func) => {
                let result = self.lookup_atype(&func.result);
                let params: Vec<TypeId> =
                    func.params.iter().map(|p| self.lookup_atype(&p.ty)).collect();
                self.lookup_type(Type {
                    storage: Storage::Function,
                    flags,
                    size: None,
                    align: None,
                    repr: TypeRepr::Function(FuncType {
                        result,
                        params,
                        variadism: func.variadism,
                        noreturn: func.noreturn,
                    }),
                })
            }
            ast::TypeRepr::Array {
                length,
                element,
                expandable,
            } => {
                let element = self.lookup_atype(element);
                let length = length.as_ref().map(|expr| self.eval_array_len(expr));
                self.intern_array(element, length, *expandable, flags)
            }
            ast::TypeRepr::Alias(ident) => {
                panic!("cannot intern unresolved type alias '{}'", ident)
            }
            _ => panic!("{} types are not implemented", atype.storage()),
        }
    }

    /// The canonical type with the same shape as `id` but the given flags.
    /// In particular the `const`/non-`const` pair are distinct interned
    /// types, mutually reachable through this.
    pub fn lookup_with_flags(&mut self, id: TypeId, flags: TypeFlags) -> TypeId {
        let ty = &self.types[id];
        if ty.flags == flags {
            return id;
        }
        let mut proto = ty.clone();
        proto.flags = flags;
        self.lookup_type(proto)
    }

    /// The canonical pointer to `referent`.
    pub fn lookup_pointer(&mut self, referent: TypeId, nullable: bool) -> TypeId {
        self.intern_pointer(referent, nullable, TypeFlags::NONE)
    }

    /// The canonical array of `element`; `length: None` is an array of
    /// unspecified length and undefined size.
    pub fn lookup_array(
        &mut self,
        element: TypeId,
        length: Option<u64>,
        expandable: bool,
    ) -> TypeId {
        self.intern_array(element, length, expandable, TypeFlags::NONE)
    }

    fn intern_pointer(&mut self, referent: TypeId, nullable: bool, flags: TypeFlags) -> TypeId {
        self.lookup_type(Type {
            storage: Storage::Pointer,
            flags,
            // XXX: ARCH
            size: Some(8),
            align: Some(8),
            repr: TypeRepr::Pointer(PointerType { referent, nullable }),
        })
    }

    fn intern_array(
        &mut self,
        element: TypeId,
        length: Option<u64>,
        expandable: bool,
        flags: TypeFlags,
    ) -> TypeId {
        let elem = &self.types[element];
        let elem_size = elem
            .size
            .expect("array element type must have a defined size");
        let align = elem.align;
        self.lookup_type(Type {
            storage: Storage::Array,
            flags,
            size: length.map(|len| elem_size * len),
            align,
            repr: TypeRepr::Array(ArrayType {
                element,
                length,
                expandable,
            }),
        })
    }

    /// Resolves an array length through the constant evaluator. A
    /// non-integer or non-positive length is a precondition violation the
    /// check pass should have diagnosed.
    fn eval_array_len(&mut self, expr: &ast::Expr) -> u64 {
        let value = self
            .eval
            .eval(expr)
            .expect("array length must be a constant expression");
        match value {
            ConstValue::Unsigned(v) => v,
            ConstValue::Signed(v) => {
                assert!(v > 0, "array length must be positive");
                v as u64
            }
            ConstValue::Float(_) => panic!("array length must be an integer"),
        }
    }

    /// Interns a fully-built record, returning the canonical id for its
    /// shape.
    fn lookup_type(&mut self, proto: Type) -> TypeId {
        if let Some(builtin) = builtin_for(proto.storage, proto.flags.contains(TypeFlags::CONST)) {
            return builtin;
        }

        let hash = self.hash_type(&proto);
        if let Some(bucket) = self.buckets.get(&hash) {
            for &id in bucket {
                if self.type_eq(id, &proto) {
                    return id;
                }
            }
        }

        // Register before filling the payload so inner lookups can find
        // this record while it is being completed.
        let placeholder = Type {
            storage: proto.storage,
            flags: proto.flags,
            size: proto.size,
            align: proto.align,
            repr: TypeRepr::Unfilled,
        };
        let id = self.types.push(placeholder);
        self.buckets.entry(hash).or_default().push(id);
        self.types[id].repr = proto.repr;
        id
    }

    /// Structural equality between an interned record and a prototype.
    /// Sub-references are interned on both sides, so payload comparison is
    /// id comparison; an unfilled payload matches nothing.
    fn type_eq(&self, id: TypeId, proto: &Type) -> bool {
        let ty = &self.types[id];
        if ty.repr == TypeRepr::Unfilled {
            return false;
        }
        ty.storage == proto.storage && ty.flags == proto.flags && ty.repr == proto.repr
    }

    fn hash_type(&self, ty: &Type) -> u64 {
        let mut hash = djb2(DJB2_INIT, ty.storage as u64);
        hash = djb2(hash, ty.flags.bits() as u64);
        match &ty.repr {
            TypeRepr::Builtin | TypeRepr::Unfilled => {}
            TypeRepr::Pointer(ptr) => {
                hash = djb2(hash, ptr.nullable as u64);
                hash = djb2(hash, self.hash_id(ptr.referent));
            }
            TypeRepr::Array(array) => {
                hash = djb2(hash, self.hash_id(array.element));
                hash = djb2(hash, array.length.unwrap_or(u64::MAX));
                hash = djb2(hash, array.expandable as u64);
            }
            TypeRepr::Function(func) => {
                hash = djb2(hash, self.hash_id(func.result));
                hash = djb2(hash, func.variadism as u64);
                hash = djb2(hash, func.noreturn as u64);
                for &param in &func.params {
                    hash = djb2(hash, self.hash_id(param));
                }
            }
        }
        hash
    }

    fn hash_id(&self, id: TypeId) -> u64 {
        self.hash_type(&self.types[id])
    }

    /// The canonical type with `const` stripped.
    fn strip_const(&mut self, id: TypeId) -> TypeId {
        let flags = self.types[id].flags;
        if flags.contains(TypeFlags::CONST) {
            self.lookup_with_flags(id, flags.without(TypeFlags::CONST))
        } else {
            id
        }
    }

    /// Whether a value of type `from` may initialize or be assigned to a
    /// location of type `to`.
    pub fn is_assignable(&mut self, to: TypeId, from: TypeId) -> bool {
        // const and non-const types are mutually assignable
        let to = self.strip_const(to);
        let from = self.strip_const(from);

        if to == from {
            return true;
        }

        let to_ty = &self.types[to];
        let from_ty = &self.types[from];
        let int_size = |ty: &Type| ty.size.expect("integer types have a defined size");

        match to_ty.storage {
            Storage::I8 | Storage::I16 | Storage::I32 | Storage::I64 | Storage::Int => {
                from_ty.storage.is_integer()
                    && from_ty.storage.is_signed()
                    && int_size(to_ty) >= int_size(from_ty)
            }
            Storage::Size
            | Storage::U8
            | Storage::U16
            | Storage::U32
            | Storage::U64
            | Storage::Uint => {
                from_ty.storage.is_integer()
                    && !from_ty.storage.is_signed()
                    && int_size(to_ty) >= int_size(from_ty)
            }
            Storage::Uintptr => {
                (from_ty.storage.is_integer()
                    && !from_ty.storage.is_signed()
                    && int_size(to_ty) >= int_size(from_ty))
                    || from_ty.storage == Storage::Pointer
            }
            Storage::F32 | Storage::F64 => from_ty.storage.is_float(),
            Storage::Pointer => {
                let to_ptr = to_ty.as_pointer().expect("pointer type without payload");
                match from_ty.storage {
                    Storage::Uintptr => true,
                    Storage::Null => to_ptr.nullable,
                    Storage::Pointer => {
                        let from_ptr =
                            from_ty.as_pointer().expect("pointer type without payload");
                        to_ptr.referent == from_ptr.referent
                            && (!from_ptr.nullable || to_ptr.nullable)
                    }
                    _ => false,
                }
            }
            Storage::Alias | Storage::Enum | Storage::TaggedUnion => {
                panic!("assignability of {} types is not implemented", to_ty.storage)
            }
            // Only assignable from themselves, which `to == from` covered.
            _ => false,
        }
    }
}

impl Default for TypeStore {
    fn default() -> Self {
        Self::new()
    }
}
