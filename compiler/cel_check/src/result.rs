//! Checked output.

use cel_diagnostic::{emitter, Diagnostic};
use cel_ir::{Constant, Expr, ExprId, SourceInfo};
use cel_types::Type;
use rustc_hash::FxHashMap;

/// What a node resolved to.
#[derive(Clone, Debug, PartialEq)]
pub struct Reference {
    /// Fully qualified identifier or function name. Empty for calls, whose
    /// overloads identify the function.
    pub name: String,
    /// Matching overload ids, in declaration order. Empty for identifiers.
    pub overload_ids: Vec<String>,
    /// Compile-time value of constant identifiers.
    pub value: Option<Constant>,
}

impl Reference {
    pub fn ident(name: impl Into<String>, value: Option<Constant>) -> Self {
        Reference {
            name: name.into(),
            overload_ids: Vec::new(),
            value,
        }
    }

    pub fn function(overload_id: impl Into<String>) -> Self {
        Reference {
            name: String::new(),
            overload_ids: vec![overload_id.into()],
            value: None,
        }
    }

    pub(crate) fn add_overload(&mut self, overload_id: impl Into<String>) {
        self.overload_ids.push(overload_id.into());
    }
}

/// Whether the type and reference maps can be trusted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AstState {
    /// No diagnostics were raised.
    Checked,
    /// At least one diagnostic was raised; the maps are best-effort.
    ParsedOnly,
}

/// A tree decorated with types and references.
#[derive(Clone, Debug)]
pub struct CheckedAst {
    /// The tree with identifiers and calls rewritten to resolved names.
    pub expr: Expr,
    pub type_map: FxHashMap<ExprId, Type>,
    pub reference_map: FxHashMap<ExprId, Reference>,
    pub state: AstState,
}

impl CheckedAst {
    pub fn is_checked(&self) -> bool {
        self.state == AstState::Checked
    }

    pub fn type_of(&self, id: ExprId) -> Option<&Type> {
        self.type_map.get(&id)
    }

    pub fn reference(&self, id: ExprId) -> Option<&Reference> {
        self.reference_map.get(&id)
    }

    /// Type of the root expression.
    pub fn result_type(&self) -> Option<&Type> {
        self.type_of(self.expr.id)
    }
}

/// Outcome of one [`crate::typecheck`] call.
#[derive(Clone, Debug)]
pub struct CheckResult {
    pub ast: CheckedAst,
    /// Declaration errors of the environment first, then expression errors
    /// in the order found.
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Diagnostics as text with source snippets.
    pub fn render(&self, source: &SourceInfo) -> String {
        emitter::render(&self.diagnostics, source)
    }
}
