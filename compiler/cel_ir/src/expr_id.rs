//! Expression node identifiers.

use std::fmt;

/// Identity of one node in an expression tree.
///
/// Ids are assigned by the parser and are unique within one tree. The
/// checker keys its type and reference maps by them.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[repr(transparent)]
pub struct ExprId(i64);

impl ExprId {
    /// Create an id from its raw value.
    #[inline]
    pub const fn new(raw: i64) -> Self {
        ExprId(raw)
    }

    /// Get the raw value.
    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
