//! Source locations for tokens, AST nodes and diagnostics.

use std::fmt;

/// A region of ArLang source, identified by where it starts.
///
/// Lines and columns are 1-indexed and columns count bytes. A span with
/// line 0 is the "unknown location" used by errors that are not tied to
/// any source text (emitter lifecycle misuse, container limits).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, byte-based).
    pub col: u32,
    /// Length in bytes.
    pub len: u32,
}

impl Span {
    #[inline]
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self { line, col, len }
    }

    /// A zero-length span at a position.
    #[inline]
    pub fn point(line: u32, col: u32) -> Self {
        Self { line, col, len: 0 }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether this span points at real source text.
    #[inline]
    pub fn is_known(&self) -> bool {
        self.line != 0
    }

    /// Extend this span so it also covers `other`.
    ///
    /// Spans on different lines keep the start of `self` and sum the lengths,
    /// which is enough for caret rendering of the first line.
    pub fn merge(self, other: Span) -> Span {
        if self.line != other.line {
            return Span {
                line: self.line,
                col: self.col,
                len: self.len + other.len,
            };
        }

        let start = self.col.min(other.col);
        let end = (self.col + self.len).max(other.col + other.len);
        Span {
            line: self.line,
            col: start,
            len: end - start,
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
