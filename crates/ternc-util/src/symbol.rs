//! String interning.
//!
//! A [`Symbol`] is a 4-byte handle into a process-wide string table. Interning
//! the same string twice yields the same handle, so symbol comparison is an
//! integer comparison and symbols can be copied freely between phases without
//! cloning the underlying text.

use std::fmt;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

static TABLE: Lazy<RwLock<StringTable>> = Lazy::new(|| RwLock::new(StringTable::new()));

/// An interned string.
///
/// # Example
///
/// ```
/// use ternc_util::Symbol;
///
/// let a = Symbol::intern("main");
/// let b = Symbol::intern("main");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "main");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    index: u32,
}

impl Symbol {
    /// Interns a string, returning its symbol.
    ///
    /// Thread-safe; concurrent callers interning the same string observe the
    /// same symbol.
    pub fn intern(string: &str) -> Self {
        if let Some(&index) = TABLE.read().unwrap().index.get(string) {
            return Symbol { index };
        }

        let mut table = TABLE.write().unwrap();
        // Lost the race between the read and write locks?
        if let Some(&index) = table.index.get(string) {
            return Symbol { index };
        }

        let entry: &'static str = Box::leak(string.to_owned().into_boxed_str());
        let index = u32::try_from(table.strings.len()).expect("symbol table overflow");
        table.strings.push(entry);
        table.index.insert(entry, index);
        Symbol { index }
    }

    /// Returns the interned text.
    ///
    /// Interned strings are never freed, so the returned slice is `'static`.
    pub fn as_str(self) -> &'static str {
        TABLE.read().unwrap().strings[self.index as usize]
    }

    /// Returns the raw table index.
    pub fn as_u32(self) -> u32 {
        self.index
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backing store for interned strings. Strings are leaked on first intern;
/// the total is bounded by the set of distinct identifiers and literals in
/// the compiled sources.
struct StringTable {
    index: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

impl StringTable {
    fn new() -> Self {
        StringTable {
            index: FxHashMap::default(),
            strings: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_deduplicates() {
        let a = Symbol::intern("start");
        let b = Symbol::intern("start");
        let c = Symbol::intern("end");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn as_str_round_trips() {
        let name = "a_rather_long_identifier_name";
        assert_eq!(Symbol::intern(name).as_str(), name);
    }

    #[test]
    fn empty_string_interns() {
        assert_eq!(Symbol::intern("").as_str(), "");
    }
}
