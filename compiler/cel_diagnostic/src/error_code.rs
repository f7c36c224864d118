//! Error codes for checker diagnostics.
//!
//! - E2xxx: problems found while checking an expression
//! - E21xx: problems found while declaring into an environment

use std::fmt;

/// Error codes for all checker diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Expression errors (E2xxx)
    /// Identifier, function or type name not found
    E2001,
    /// Field not defined on the message type
    E2002,
    /// Field selection on a type without fields
    E2003,
    /// No overload accepts the argument types
    E2004,
    /// More than one overload accepts the argument types
    E2005,
    /// Type mismatch
    E2006,
    /// Name used as a type does not denote a type
    E2007,
    /// Struct literal names a type that is not a message
    E2008,
    /// Comprehension range is not a list, map or dyn
    E2009,
    /// Malformed optional field selection
    E2010,
    /// Field initializer has the wrong type
    E2011,

    // Declaration errors (E21xx)
    /// Identifier redeclared with a different type
    E2101,
    /// Overload signature indistinguishable from an existing one
    E2102,
    /// Overload signature collides with a reserved macro
    E2103,
}

impl ErrorCode {
    /// The code as written in diagnostics, e.g. `"E2004"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            ErrorCode::E2101 => "E2101",
            ErrorCode::E2102 => "E2102",
            ErrorCode::E2103 => "E2103",
        }
    }

    /// One-line summary of what the code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E2001 => "undeclared reference",
            ErrorCode::E2002 => "undefined field",
            ErrorCode::E2003 => "type does not support field selection",
            ErrorCode::E2004 => "no matching overload",
            ErrorCode::E2005 => "ambiguous overload",
            ErrorCode::E2006 => "type mismatch",
            ErrorCode::E2007 => "not a type",
            ErrorCode::E2008 => "not a message type",
            ErrorCode::E2009 => "invalid comprehension range",
            ErrorCode::E2010 => "invalid optional field selection",
            ErrorCode::E2011 => "field type mismatch",
            ErrorCode::E2101 => "overlapping identifier",
            ErrorCode::E2102 => "overlapping overload",
            ErrorCode::E2103 => "overlapping macro",
        }
    }

    /// Whether the code is raised while building an environment rather
    /// than while checking an expression.
    pub fn is_declaration_error(&self) -> bool {
        matches!(self, ErrorCode::E2101 | ErrorCode::E2102 | ErrorCode::E2103)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests;
