//! Dotted identifiers.

use std::fmt;

use crate::Symbol;

/// A possibly-namespaced identifier such as `io::print`.
///
/// The parent link points at the enclosing namespace component, owned
/// exclusively by this identifier; the leftmost source component is the
/// outermost parent. Equality and hashing are structural, which is exactly
/// dotted-path equality because the name components are interned.
///
/// # Example
///
/// ```
/// use ternc_util::Ident;
///
/// let id = Ident::with_parent(Ident::new("io"), "print");
/// assert_eq!(id.to_string(), "io::print");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ident {
    pub parent: Option<Box<Ident>>,
    pub name: Symbol,
}

impl Ident {
    /// Creates an identifier with no namespace.
    pub fn new(name: &str) -> Self {
        Ident {
            parent: None,
            name: Symbol::intern(name),
        }
    }

    /// Creates an identifier nested under `parent`.
    pub fn with_parent(parent: Ident, name: &str) -> Self {
        Ident {
            parent: Some(Box::new(parent)),
            name: Symbol::intern(name),
        }
    }

    /// Flattens the components, outermost first.
    pub fn components(&self) -> Vec<Symbol> {
        let mut out = match &self.parent {
            Some(parent) => parent.components(),
            None => Vec::new(),
        };
        out.push(self.name);
        out
    }

    /// Joins the components with an arbitrary separator, outermost first.
    /// IR symbol mangling uses `"."`; diagnostics use `"::"`.
    pub fn join(&self, sep: &str) -> String {
        let parts: Vec<&str> = self.components().iter().map(|s| s.as_str()).collect();
        parts.join(sep)
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = &self.parent {
            write!(f, "{}::", parent)?;
        }
        f.write_str(self.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_with_double_colon() {
        let id = Ident::with_parent(Ident::with_parent(Ident::new("a"), "b"), "c");
        assert_eq!(id.to_string(), "a::b::c");
    }

    #[test]
    fn equality_is_path_equality() {
        let x = Ident::with_parent(Ident::new("os"), "exit");
        let y = Ident::with_parent(Ident::new("os"), "exit");
        let z = Ident::new("exit");
        assert_eq!(x, y);
        assert_ne!(x, z);
    }

    #[test]
    fn join_for_mangling() {
        let id = Ident::with_parent(Ident::new("os"), "exit");
        assert_eq!(id.join("."), "os.exit");
    }
}
