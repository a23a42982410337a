//! Compiler diagnostics.
//!
//! The front-end has no recoverable error path: the first diagnostic aborts
//! the compilation. Library crates surface errors as `Result<T, Diagnostic>`
//! and the driver prints the diagnostic and exits non-zero. Violated internal
//! invariants are not diagnostics; they panic, because they indicate a
//! compiler bug rather than bad user input.

use std::fmt;

use thiserror::Error;

use crate::Location;

/// Diagnostic severity and origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// Malformed token.
    Lexical,
    /// Token outside the active production's follow set.
    Syntax,
    /// Anything the check pass rejects (bad initializer, duplicate name...).
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Lexical => f.write_str("Lexical error"),
            Level::Syntax => f.write_str("Syntax error"),
            Level::Error => f.write_str("Error"),
        }
    }
}

/// A fatal compiler diagnostic citing a source location.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{level}: {message}")]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub loc: Location,
}

impl Diagnostic {
    /// A malformed-token diagnostic: `Lexical error: <msg> at <loc>`.
    pub fn lexical(loc: Location, msg: impl fmt::Display) -> Self {
        Diagnostic {
            level: Level::Lexical,
            message: format!("{} at {}", msg, loc),
            loc,
        }
    }

    /// An unexpected-token diagnostic enumerating exactly the alternatives
    /// the active production would have accepted:
    /// `Syntax error: unexpected 'x' at <loc>, expected ';', 'let'`.
    pub fn syntax(loc: Location, found: impl fmt::Display, expected: &[&str]) -> Self {
        let mut message = format!("unexpected '{}' at {}", found, loc);
        if !expected.is_empty() {
            message.push_str(", expected ");
            for (i, alt) in expected.iter().enumerate() {
                if i > 0 {
                    message.push_str(", ");
                }
                message.push_str(alt);
            }
        }
        Diagnostic {
            level: Level::Syntax,
            message,
            loc,
        }
    }

    /// A syntax diagnostic with a free-form message citing the offending
    /// token: `Syntax error: <msg> at <loc> ('<found>')`.
    pub fn syntax_msg(loc: Location, msg: impl fmt::Display, found: impl fmt::Display) -> Self {
        Diagnostic {
            level: Level::Syntax,
            message: format!("{} at {} ('{}')", msg, loc, found),
            loc,
        }
    }

    /// A rejection for grammar that is reserved but not yet implemented.
    pub fn not_implemented(loc: Location, what: impl fmt::Display) -> Self {
        Diagnostic {
            level: Level::Syntax,
            message: format!("{} are not implemented at {}", what, loc),
            loc,
        }
    }

    /// A check-pass diagnostic: `Error: <msg> at <loc>`.
    pub fn error(loc: Location, msg: impl fmt::Display) -> Self {
        Diagnostic {
            level: Level::Error,
            message: format!("{} at {}", msg, loc),
            loc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> Location {
        Location::new("in.tn".into(), 2, 7)
    }

    #[test]
    fn syntax_enumerates_alternatives() {
        let diag = Diagnostic::syntax(loc(), "fn", &["';'", "','"]);
        assert_eq!(
            diag.to_string(),
            "Syntax error: unexpected 'fn' at in.tn:2:7, expected ';', ','"
        );
    }

    #[test]
    fn lexical_cites_location() {
        let diag = Diagnostic::lexical(loc(), "unterminated string literal");
        assert_eq!(
            diag.to_string(),
            "Lexical error: unterminated string literal at in.tn:2:7"
        );
    }
}
