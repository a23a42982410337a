//! Source locations.

use std::fmt;
use std::sync::Arc;

/// A position in a source file, 1-based in both line and column.
///
/// Columns count code points, not bytes. The path is shared between every
/// token of a file, so cloning a location is two integer copies and a
/// refcount bump.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub path: Arc<str>,
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(path: Arc<str>, line: u32, column: u32) -> Self {
        Location { path, line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_path_line_column() {
        let loc = Location::new("main.tn".into(), 3, 14);
        assert_eq!(loc.to_string(), "main.tn:3:14");
    }
}
