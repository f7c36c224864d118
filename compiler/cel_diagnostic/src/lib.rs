//! Diagnostics for the checker.
//!
//! A [`Diagnostic`] is a plain record: an [`ErrorCode`] for searchability, a
//! [`Severity`], a human-readable message with type names already
//! formatted in, and where the problem is (expression id and, when the
//! source positions are known, line and column). Checking never stops at
//! the first diagnostic; callers receive the whole ordered list.

mod diagnostic;
pub mod emitter;
mod error_code;

pub use diagnostic::{Diagnostic, Severity};
pub use cel_ir::Position;
pub use error_code::ErrorCode;
