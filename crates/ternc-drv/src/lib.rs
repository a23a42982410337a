//! ternc-drv - Compiler driver.
//!
//! Orchestrates the pipeline over one translation input:
//!
//! ```text
//! source text -> lex -> parse -> check/lower -> emit -> IR text
//! ```
//!
//! The driver owns all I/O; the phase crates only see source text and an
//! output stream. The first diagnostic from any phase aborts the
//! compilation, and the binary exits non-zero after printing it.

use std::io::Write;

use anyhow::Context;

use ternc_lex::Lexer;
use ternc_types::TypeStore;

/// Compiles one source file to IR text on `out`.
pub fn compile<W: Write>(path: &str, source: &str, out: &mut W) -> anyhow::Result<()> {
    let lexer = Lexer::new(source, path);
    let unit = ternc_par::parse(lexer)?;
    let mut store = TypeStore::new();
    let program = ternc_gen::gen(&unit, &mut store)?;
    ternc_ir::emit(&program, out).context("failed to write output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_produces_ir() {
        let mut buf = Vec::new();
        compile("t.tn", "export fn main() void = 0;", &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("export function section \".text.main\""));
    }

    #[test]
    fn diagnostics_surface_as_errors() {
        let mut buf = Vec::new();
        let err = compile("t.tn", "let x = 1;", &mut buf).unwrap_err();
        assert!(err.to_string().starts_with("Syntax error:"));
    }
}
