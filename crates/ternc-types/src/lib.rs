//! ternc-types - The interned type graph.
//!
//! Every type the compiler reasons about is hash-consed into a [`TypeStore`]:
//! structurally equal types are interned at most once, so type equality is
//! identity ([`TypeId`] equality) and every structural comparison after
//! interning is O(1). The store owns every non-builtin type for its own
//! lifetime; primitive types and their `const` forms are resident singletons
//! with fixed ids.
//!
//! The check pass consumes three things from here: the lookup functions
//! (`lookup_atype`, `lookup_with_flags`, `lookup_pointer`, `lookup_array`),
//! the assignability predicate, and the [`ConstEval`] interface through
//! which the store resolves array lengths.

mod eval;
mod store;
mod types;

pub use eval::{ConstEval, ConstValue, LiteralEval};
pub use store::TypeStore;
pub use types::{ArrayType, FuncType, PointerType, Type, TypeFlags, TypeId, TypeRepr};
