//! The checker's type representation.

use smallvec::{smallvec, SmallVec};
use std::fmt;

use crate::traverse::TypeVisitor;
use crate::TypeFlags;

/// Struct name treated as a wildcard, like `dyn`.
pub const ANY_TYPE_NAME: &str = "google.protobuf.Any";
pub const DURATION_TYPE_NAME: &str = "google.protobuf.Duration";
pub const TIMESTAMP_TYPE_NAME: &str = "google.protobuf.Timestamp";

/// A checker type.
///
/// Parametric variants (`List`, `Map`, `Optional`, `Opaque`, `TypeOf`) carry
/// their parameters inline; assignability and substitution recurse into
/// them uniformly through [`Type::params`].
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Type {
    Dyn,
    /// Placeholder produced after a diagnostic. Assignable to and from
    /// everything so one error does not cascade.
    Error,
    Null,
    Bool,
    Int,
    Uint,
    Double,
    String,
    Bytes,
    Duration,
    Timestamp,
    List(Box<Type>),
    Map(Box<Type>, Box<Type>),
    /// Message type, identified by its fully qualified name.
    Struct(String),
    Optional(Box<Type>),
    /// Named abstract type with type parameters, e.g. `vector(int)`.
    Opaque { name: String, params: Vec<Type> },
    /// Type variable, bound through a substitution.
    TypeParam(String),
    /// The type of a type denotation: `int` as a value has `type(int)`.
    TypeOf(Box<Type>),
}

/// Variant tag of a [`Type`], ignoring names and parameters.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Kind {
    Dyn,
    Error,
    Null,
    Bool,
    Int,
    Uint,
    Double,
    String,
    Bytes,
    Duration,
    Timestamp,
    List,
    Map,
    Struct,
    Optional,
    Opaque,
    TypeParam,
    Type,
}

impl Type {
    pub fn list(elem: Type) -> Self {
        Type::List(Box::new(elem))
    }

    pub fn map(key: Type, value: Type) -> Self {
        Type::Map(Box::new(key), Box::new(value))
    }

    pub fn optional(inner: Type) -> Self {
        Type::Optional(Box::new(inner))
    }

    pub fn type_of(inner: Type) -> Self {
        Type::TypeOf(Box::new(inner))
    }

    pub fn message(name: impl Into<String>) -> Self {
        Type::Struct(name.into())
    }

    pub fn param(name: impl Into<String>) -> Self {
        Type::TypeParam(name.into())
    }

    pub fn opaque(name: impl Into<String>, params: Vec<Type>) -> Self {
        Type::Opaque {
            name: name.into(),
            params,
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Type::Dyn => Kind::Dyn,
            Type::Error => Kind::Error,
            Type::Null => Kind::Null,
            Type::Bool => Kind::Bool,
            Type::Int => Kind::Int,
            Type::Uint => Kind::Uint,
            Type::Double => Kind::Double,
            Type::String => Kind::String,
            Type::Bytes => Kind::Bytes,
            Type::Duration => Kind::Duration,
            Type::Timestamp => Kind::Timestamp,
            Type::List(_) => Kind::List,
            Type::Map(..) => Kind::Map,
            Type::Struct(_) => Kind::Struct,
            Type::Optional(_) => Kind::Optional,
            Type::Opaque { .. } => Kind::Opaque,
            Type::TypeParam(_) => Kind::TypeParam,
            Type::TypeOf(_) => Kind::Type,
        }
    }

    /// Name of a parametric or named type: `list`, `map`, `optional_type`,
    /// `type`, the opaque or struct name, or the type parameter name.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Type::List(_) => Some("list"),
            Type::Map(..) => Some("map"),
            Type::Optional(_) => Some("optional_type"),
            Type::TypeOf(_) => Some("type"),
            Type::Opaque { name, .. } | Type::Struct(name) | Type::TypeParam(name) => Some(name),
            _ => None,
        }
    }

    /// Parameter types, in declaration order.
    pub fn params(&self) -> SmallVec<[&Type; 2]> {
        match self {
            Type::List(elem) | Type::Optional(elem) | Type::TypeOf(elem) => smallvec![&**elem],
            Type::Map(key, value) => smallvec![&**key, &**value],
            Type::Opaque { params, .. } => params.iter().collect(),
            _ => SmallVec::new(),
        }
    }

    pub fn is_dyn(&self) -> bool {
        matches!(self, Type::Dyn)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }

    pub fn is_type_param(&self) -> bool {
        matches!(self, Type::TypeParam(_))
    }

    /// `dyn`, `!error!` or `google.protobuf.Any`: assignable to and from anything.
    pub fn is_wildcard(&self) -> bool {
        match self {
            Type::Dyn | Type::Error => true,
            Type::Struct(name) => name == ANY_TYPE_NAME,
            _ => false,
        }
    }

    /// Kinds that accept `null`, mirroring nullable message fields.
    pub fn is_nullable(&self) -> bool {
        matches!(
            self,
            Type::Null
                | Type::Struct(_)
                | Type::Opaque { .. }
                | Type::Optional(_)
                | Type::Duration
                | Type::Timestamp
        )
    }

    pub fn flags(&self) -> TypeFlags {
        let mut collector = FlagCollector(TypeFlags::empty());
        collector.visit(self);
        collector.0
    }

    pub fn has_type_params(&self) -> bool {
        self.flags().contains(TypeFlags::HAS_TYPE_PARAM)
    }

    /// Names of the type parameters occurring in `self`, in first-seen order.
    pub fn type_param_names(&self) -> Vec<String> {
        let mut collector = ParamCollector(Vec::new());
        collector.visit(self);
        collector.0
    }
}

struct FlagCollector(TypeFlags);

impl TypeVisitor for FlagCollector {
    fn visit(&mut self, ty: &Type) {
        match ty {
            Type::Dyn => self.0 |= TypeFlags::HAS_DYN,
            Type::Error => self.0 |= TypeFlags::HAS_ERROR,
            Type::TypeParam(_) => self.0 |= TypeFlags::HAS_TYPE_PARAM,
            _ => {}
        }
        self.walk(ty);
    }
}

struct ParamCollector(Vec<String>);

impl TypeVisitor for ParamCollector {
    fn visit_type_param(&mut self, name: &str) {
        if !self.0.iter().any(|seen| seen == name) {
            self.0.push(name.to_owned());
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Dyn => write!(f, "dyn"),
            Type::Error => write!(f, "!error!"),
            Type::Null => write!(f, "null_type"),
            Type::Bool => write!(f, "bool"),
            Type::Int => write!(f, "int"),
            Type::Uint => write!(f, "uint"),
            Type::Double => write!(f, "double"),
            Type::String => write!(f, "string"),
            Type::Bytes => write!(f, "bytes"),
            Type::Duration => write!(f, "{DURATION_TYPE_NAME}"),
            Type::Timestamp => write!(f, "{TIMESTAMP_TYPE_NAME}"),
            Type::List(elem) => write!(f, "list({elem})"),
            Type::Map(key, value) => write!(f, "map({key}, {value})"),
            Type::Struct(name) | Type::TypeParam(name) => write!(f, "{name}"),
            Type::Optional(inner) => write!(f, "optional_type({inner})"),
            Type::TypeOf(inner) => write!(f, "type({inner})"),
            // Always parenthesized, so `token()` stays apart from a message
            // named `token`.
            Type::Opaque { name, params } => {
                write!(f, "{name}(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ")")
            }
        }
    }
}
