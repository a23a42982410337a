//! ternc-par - Syntactic analysis.
//!
//! A recursive-descent parser over the token stream, left-to-right with a
//! single token of lookahead through the lexer's unlex buffer. The grammar
//! is LL(1) at every decision point: each production decides on the token it
//! is looking at, and `(` is disambiguated purely by which production was
//! active when it was seen.
//!
//! The output is one [`ast::Subunit`] per input. The first token outside the
//! active production's follow set is fatal; the diagnostic enumerates
//! exactly the alternatives that production could have accepted.

pub mod ast;
mod parser;

pub use parser::parse;
