//! Identifier and function declarations.

use std::fmt;

use cel_diagnostic::{Diagnostic, ErrorCode};
use cel_ir::Constant;
use cel_types::{is_assignable, Substitution, Type};
use thiserror::Error;

/// A variable, constant or type denotation.
#[derive(Clone, Debug, PartialEq)]
pub struct IdentDecl {
    pub name: String,
    pub ty: Type,
    /// Compile-time value, e.g. an enum constant.
    pub value: Option<Constant>,
    pub doc: Option<String>,
}

impl IdentDecl {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        IdentDecl {
            name: name.into(),
            ty,
            value: None,
            doc: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: Constant) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// One signature of a function.
///
/// For instance overloads the receiver type is `params[0]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverloadDecl {
    pub id: String,
    pub is_instance: bool,
    pub params: Vec<Type>,
    pub result: Type,
    /// Free type parameters, in first-seen order over params then result.
    pub type_params: Vec<String>,
}

impl OverloadDecl {
    /// `f(params) -> result`.
    pub fn global(id: impl Into<String>, params: Vec<Type>, result: Type) -> Self {
        Self::build(id.into(), false, params, result)
    }

    /// `params[0].f(params[1..]) -> result`.
    pub fn instance(id: impl Into<String>, params: Vec<Type>, result: Type) -> Self {
        Self::build(id.into(), true, params, result)
    }

    fn build(id: String, is_instance: bool, params: Vec<Type>, result: Type) -> Self {
        let mut type_params: Vec<String> = Vec::new();
        for ty in params.iter().chain(std::iter::once(&result)) {
            for name in ty.type_param_names() {
                if !type_params.contains(&name) {
                    type_params.push(name);
                }
            }
        }
        OverloadDecl {
            id,
            is_instance,
            params,
            result,
            type_params,
        }
    }

    /// Arguments written inside the parentheses at a call site.
    pub fn arg_count(&self) -> usize {
        if self.is_instance {
            self.params.len().saturating_sub(1)
        } else {
            self.params.len()
        }
    }

    /// Parameter types with every type parameter replaced by `dyn`.
    pub fn erased_params(&self) -> Vec<Type> {
        let none = Substitution::new();
        self.params.iter().map(|p| none.finalize(p)).collect()
    }

    /// Same call shape and the same erased parameter list.
    pub fn erased_signature_eq(&self, other: &OverloadDecl) -> bool {
        self.is_instance == other.is_instance && self.erased_params() == other.erased_params()
    }

    /// Whether a call could not tell the two overloads apart: same call
    /// shape and every erased parameter assignable one way or the other.
    pub fn signature_overlaps(&self, other: &OverloadDecl) -> bool {
        if self.is_instance != other.is_instance || self.params.len() != other.params.len() {
            return false;
        }
        let none = Substitution::new();
        self.erased_params()
            .iter()
            .zip(other.erased_params().iter())
            .all(|(a, b)| is_assignable(&none, a, b).is_some() || is_assignable(&none, b, a).is_some())
    }

    /// `(int, int) -> int`, or `string.(string) -> bool` for instance overloads.
    pub fn signature(&self) -> String {
        format!("{} -> {}", format_call_shape(self.is_instance, &self.params), self.result)
    }
}

/// `(a, b)` for global calls, `a.(b)` when the first type is the receiver.
pub(crate) fn format_call_shape(is_instance: bool, types: &[Type]) -> String {
    let (receiver, args) = match types.split_first() {
        Some((first, rest)) if is_instance => (Some(first), rest),
        _ => (None, types),
    };
    let args = args
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    match receiver {
        Some(receiver) => format!("{receiver}.({args})"),
        None => format!("({args})"),
    }
}

/// A named set of overloads, kept in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    pub overloads: Vec<OverloadDecl>,
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>) -> Self {
        FunctionDecl {
            name: name.into(),
            overloads: Vec::new(),
        }
    }

    #[must_use]
    pub fn overload(mut self, overload: OverloadDecl) -> Self {
        self.overloads.push(overload);
        self
    }

    pub fn find_overload(&self, id: &str) -> Option<&OverloadDecl> {
        self.overloads.iter().find(|o| o.id == id)
    }
}

impl fmt::Display for FunctionDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for overload in &self.overloads {
            write!(f, "\n  {}: {}", overload.id, overload.signature())?;
        }
        Ok(())
    }
}

/// A declaration rejected by an environment.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DeclError {
    #[error("overlapping identifier for name '{name}'")]
    OverlappingIdent { name: String },

    #[error(
        "overlapping overload for name '{function}' (type '{signature}' with overloadId: \
         '{id}' cannot be distinguished from '{existing_signature}' with overloadId: \
         '{existing_id}')"
    )]
    OverlappingOverload {
        function: String,
        id: String,
        signature: String,
        existing_id: String,
        existing_signature: String,
    },

    #[error("overlapping macro for name '{name}' with {arg_count} args")]
    OverlappingMacro { name: String, arg_count: usize },
}

impl DeclError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DeclError::OverlappingIdent { .. } => ErrorCode::E2101,
            DeclError::OverlappingOverload { .. } => ErrorCode::E2102,
            DeclError::OverlappingMacro { .. } => ErrorCode::E2103,
        }
    }

    #[cold]
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code()).with_message(self.to_string())
    }
}

#[cfg(test)]
mod tests;
