//! Property tests for the hash-consing contract.

use proptest::prelude::*;

use ternc_par::ast;
use ternc_types::{TypeFlags, TypeStore};
use ternc_util::{Storage, Symbol, Variadism};

fn primitive_storage() -> impl Strategy<Value = Storage> {
    prop_oneof![
        Just(Storage::Bool),
        Just(Storage::Char),
        Just(Storage::F32),
        Just(Storage::F64),
        Just(Storage::I8),
        Just(Storage::I16),
        Just(Storage::I32),
        Just(Storage::I64),
        Just(Storage::Int),
        Just(Storage::Null),
        Just(Storage::Rune),
        Just(Storage::Size),
        Just(Storage::U8),
        Just(Storage::U16),
        Just(Storage::U32),
        Just(Storage::U64),
        Just(Storage::Uint),
        Just(Storage::Uintptr),
        Just(Storage::Void),
    ]
}

fn variadism() -> impl Strategy<Value = Variadism> {
    prop_oneof![
        Just(Variadism::None),
        Just(Variadism::C),
        Just(Variadism::Tern),
    ]
}

/// Arbitrary syntactic types covering every shape the store interns.
fn atype() -> impl Strategy<Value = ast::Type> {
    let leaf = (primitive_storage(), any::<bool>()).prop_map(|(storage, constant)| ast::Type {
        constant,
        repr: ast::TypeRepr::Primitive(storage),
    });

    leaf.prop_recursive(4, 24, 4, |inner| {
        prop_oneof![
            // pointers
            (any::<bool>(), any::<bool>(), inner.clone()).prop_map(
                |(constant, nullable, referent)| ast::Type {
                    constant,
                    repr: ast::TypeRepr::Pointer {
                        nullable,
                        referent: Box::new(referent),
                    },
                }
            ),
            // functions
            (
                any::<bool>(),
                inner.clone(),
                prop::collection::vec(inner, 0..4),
                variadism(),
                any::<bool>(),
            )
                .prop_map(|(constant, result, params, variadism, noreturn)| {
                    ast::Type {
                        constant,
                        repr: ast::TypeRepr::Function(ast::FnType {
                            result: Box::new(result),
                            params: params
                                .into_iter()
                                .map(|ty| ast::FnParam {
                                    name: Symbol::intern("p"),
                                    ty,
                                })
                                .collect(),
                            variadism,
                            noreturn,
                        }),
                    }
                }),
        ]
    })
}

proptest! {
    /// Structurally equal syntactic types intern to the same record.
    #[test]
    fn interning_is_canonical(ty in atype()) {
        let mut store = TypeStore::new();
        let copy = ty.clone();
        let first = store.lookup_atype(&ty);
        let second = store.lookup_atype(&copy);
        prop_assert_eq!(first, second);
    }

    /// Interned sub-structure is itself interned: re-interning the referent
    /// of a pointer finds the existing record.
    #[test]
    fn substructure_is_interned(referent in atype()) {
        let mut store = TypeStore::new();
        let ptr = ast::Type {
            constant: false,
            repr: ast::TypeRepr::Pointer {
                nullable: false,
                referent: Box::new(referent.clone()),
            },
        };
        let ptr_id = store.lookup_atype(&ptr);
        let referent_id = store.lookup_atype(&referent);
        let payload = store.get(ptr_id).as_pointer().unwrap();
        prop_assert_eq!(payload.referent, referent_id);
    }

    /// lookup_with_flags(lookup_with_flags(t, f), t.flags) == t.
    #[test]
    fn flags_round_trip(ty in atype(), make_const in any::<bool>()) {
        let mut store = TypeStore::new();
        let id = store.lookup_atype(&ty);
        let original = store.get(id).flags;
        let flags = if make_const { TypeFlags::CONST } else { TypeFlags::NONE };
        let flipped = store.lookup_with_flags(id, flags);
        let back = store.lookup_with_flags(flipped, original);
        prop_assert_eq!(back, id);
    }

    /// Stripping const in either order of two lookups is stable.
    #[test]
    fn const_pair_is_mutually_assignable(ty in atype()) {
        let mut store = TypeStore::new();
        let id = store.lookup_atype(&ty);
        let constant = store.lookup_with_flags(id, TypeFlags::CONST);
        prop_assert!(store.is_assignable(id, constant));
        prop_assert!(store.is_assignable(constant, id));
    }
}
