//! Expression tree consumed by the checker.
//!
//! The tree is produced by a parser that lives outside this workspace. It is
//! immutable: passes that rewrite nodes return a new tree instead of mutating
//! this one, so one parsed expression may be checked against several
//! environments at once.
//!
//! - [`ExprId`]: stable node identity, the key of every side table
//! - [`Expr`] / [`ExprKind`]: the closed set of node kinds
//! - [`SourceInfo`]: node id to line/column, for diagnostics only
//! - [`ExprFactory`]: id-allocating constructors for tests and embedders

mod constant;
mod expr;
mod expr_id;
mod factory;
mod source;

pub use constant::Constant;
pub use expr::{Comprehension, Expr, ExprKind, FieldEntry, MapEntry};
pub use expr_id::ExprId;
pub use factory::{ExprFactory, ACCUMULATOR_VAR};
pub use source::{LineOffsetTable, Position, SourceInfo};
