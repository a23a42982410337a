//! Lexical scopes.
//!
//! The interface the check pass works against: a stack of scopes, each an
//! ordered list of (identifier, type) objects. Lookup walks innermost-first;
//! insertion is always into the innermost scope. Identifiers are immutable
//! once inserted.

use tracing::trace;

use ternc_types::TypeId;
use ternc_util::Ident;

/// One object bound in a scope.
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    pub ident: Ident,
    pub ty: TypeId,
}

/// A lexical scope with an optional parent.
#[derive(Debug, Default)]
pub struct Scope {
    parent: Option<Box<Scope>>,
    objects: Vec<Object>,
}

impl Scope {
    /// The outermost (unit-level) scope.
    pub fn root() -> Scope {
        Scope::default()
    }

    /// Enters a nested scope; the receiver becomes its parent.
    pub fn push(self) -> Scope {
        trace!("enter scope");
        Scope {
            parent: Some(Box::new(self)),
            objects: Vec::new(),
        }
    }

    /// Leaves this scope, dropping its objects and returning the parent.
    ///
    /// # Panics
    ///
    /// Panics when called on the root scope.
    pub fn pop(self) -> Scope {
        trace!("leave scope");
        *self.parent.expect("cannot pop the root scope")
    }

    /// Binds an identifier in this scope.
    pub fn insert(&mut self, ident: Ident, ty: TypeId) {
        self.objects.push(Object { ident, ty });
    }

    /// Resolves an identifier, innermost scope first.
    pub fn lookup(&self, ident: &Ident) -> Option<TypeId> {
        self.objects
            .iter()
            .rev()
            .find(|obj| &obj.ident == ident)
            .map(|obj| obj.ty)
            .or_else(|| self.parent.as_ref().and_then(|p| p.lookup(ident)))
    }

    /// Whether the identifier is bound in this scope itself, ignoring
    /// parents. Used for duplicate-declaration checks.
    pub fn declared_here(&self, ident: &Ident) -> bool {
        self.objects.iter().any(|obj| &obj.ident == ident)
    }
}
