//! Type model for the CEL checker.
//!
//! - [`Type`]: the closed set of checker types, with the textual syntax used
//!   in diagnostics (`list(int)`, `map(string, dyn)`, `optional_type(T)`)
//! - [`is_assignable`] / [`most_general`]: unification-with-assignment over
//!   an explicit [`Substitution`]
//! - [`InferenceContext`]: fresh type variables plus the committed
//!   substitution of one check
//! - [`TypeProvider`]: the schema capability resolving message names
//!
//! Types are plain boxed trees. Struct equality is by name only; field sets
//! live behind the provider and are looked up lazily.

mod assign;
mod context;
mod flags;
mod parse;
mod provider;
mod traverse;
mod ty;

pub use assign::{
    is_assignable, is_assignable_all, is_equal_or_less_specific, most_general, Substitution,
};
pub use context::{instantiate, InferenceContext};
pub use flags::TypeFlags;
pub use parse::ParseTypeError;
pub use provider::{EmptyProvider, SchemaRegistry, StructDescriptor, TypeProvider};
pub use traverse::{TypeFolder, TypeVisitor};
pub use ty::{Kind, Type, ANY_TYPE_NAME, DURATION_TYPE_NAME, TIMESTAMP_TYPE_NAME};
