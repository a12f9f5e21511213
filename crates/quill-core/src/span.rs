//! Positions of forms in the source text.

use std::fmt;

/// Where a form starts and how many bytes it covers.
///
/// Spans come from the reader and are only carried through to diagnostics.
/// [`Span::UNKNOWN`] (all zeros, also the default) marks errors that have no
/// position, such as contract violations.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// 1-based line.
    pub line: u32,
    /// 1-based byte column.
    pub col: u32,
    /// Covered bytes.
    pub len: u32,
}

impl Span {
    /// No known position.
    pub const UNKNOWN: Span = Span {
        line: 0,
        col: 0,
        len: 0,
    };

    #[inline]
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self { line, col, len }
    }

    /// A zero-width position.
    #[inline]
    pub fn point(line: u32, col: u32) -> Self {
        Self::new(line, col, 0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether this span points into the source.
    #[inline]
    pub fn is_known(&self) -> bool {
        self.line != 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "{}:{}", self.line, self.col)
        } else {
            f.write_str("?")
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_are_empty() {
        assert!(Span::point(2, 7).is_empty());
        assert_eq!(Span::new(2, 7, 4).len(), 4);
    }

    #[test]
    fn formats_as_line_and_column() {
        assert_eq!(Span::new(3, 15, 5).to_string(), "3:15");
        assert_eq!(format!("{:?}", Span::point(1, 1)), "1:1");
    }

    #[test]
    fn default_is_unknown() {
        assert_eq!(Span::default(), Span::UNKNOWN);
        assert!(!Span::UNKNOWN.is_known());
        assert_eq!(Span::UNKNOWN.to_string(), "?");
    }
}
