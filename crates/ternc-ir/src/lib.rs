//! ternc-ir - The intermediate representation and its textual emitter.
//!
//! An in-memory graph of IR definitions (aggregate type layouts, functions,
//! data) and a serializer producing the exact textual surface the downstream
//! backend accepts. The program is an ordered list; the emitter writes one
//! definition at a time in program order, and given the same program always
//! produces byte-identical output.
//!
//! The emitter does not validate. Every precondition (constants are scalar,
//! function bodies begin with a label, a call's first argument is the
//! callee) is an invariant of the model, enforced where the model is built;
//! violating one panics.

mod emit;
mod ir;

pub use emit::emit;
pub use ir::{
    Constant, ConstRepr, DataDef, DataItem, Def, DefKind, Field, FuncParam, Function, Instr,
    IrType, Layout, Program, Statement, TypeDef, Value,
};
