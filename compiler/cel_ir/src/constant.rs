//! Literal values.

use std::fmt;

/// A literal value appearing in the source, or the value attached to a
/// constant declaration (enum values, named constants).
#[derive(Clone, PartialEq, Debug)]
pub enum Constant {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Null => write!(f, "null"),
            Constant::Bool(b) => write!(f, "{b}"),
            Constant::Int(i) => write!(f, "{i}"),
            Constant::Uint(u) => write!(f, "{u}u"),
            Constant::Double(d) => write!(f, "{d:?}"),
            Constant::String(s) => write!(f, "{s:?}"),
            Constant::Bytes(b) => {
                write!(f, "b\"")?;
                for byte in b {
                    write!(f, "\\x{byte:02x}")?;
                }
                write!(f, "\"")
            }
        }
    }
}
