//! ternc-util - Foundation types shared by every compiler phase.
//!
//! This crate holds the pieces the rest of the compiler is built on:
//!
//! - [`Symbol`]: interned immutable strings with O(1) equality
//! - [`Ident`]: dotted identifiers (`a::b::c`) built from symbols
//! - [`Location`]: 1-based source positions (`path:line:column`)
//! - [`Diagnostic`]: the single error currency of the front-end
//! - [`IndexVec`]/[`Idx`]: vectors addressed by typed indices
//! - [`Storage`]/[`Variadism`]: type-system tags shared between the token
//!   stream, the AST, and the interned type graph

mod diagnostic;
mod ident;
mod index_vec;
mod location;
mod storage;
mod symbol;

pub use diagnostic::{Diagnostic, Level};
pub use ident::Ident;
pub use index_vec::{Idx, IndexVec};
pub use location::Location;
pub use storage::{Storage, Variadism};
pub use symbol::Symbol;
