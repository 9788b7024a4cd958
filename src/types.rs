//! Core types used throughout the project.

use std::fmt;

/// A range in a translation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceRange {
    /// Inclusive.
    pub start: SourcePosition,
    /// Exclusive.
    pub end: SourcePosition,
}

/// A position in a translation file (0-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourcePosition {
    /// Line, from 0.
    pub line: u32,
    /// Column in bytes.
    pub character: u32,
}

impl From<tree_sitter::Point> for SourcePosition {
    #[allow(clippy::cast_possible_truncation)]
    fn from(point: tree_sitter::Point) -> Self {
        Self { line: point.row as u32, character: point.column as u32 }
    }
}

/// Displayed 1-indexed, the way editors and `serde_json` report positions.
impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.character + 1)
    }
}

impl SourceRange {
    /// Range covered by a tree-sitter node.
    #[must_use]
    pub fn from_node(node: &tree_sitter::Node<'_>) -> Self {
        Self { start: node.start_position().into(), end: node.end_position().into() }
    }
}
