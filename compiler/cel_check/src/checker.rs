//! Expression checking.
//!
//! One [`ExprChecker`] per [`typecheck`] call. It walks the tree once,
//! post-order, recording a type for every node and a reference for every
//! name and call, and rebuilds the tree with resolved names written out in
//! full. Problems in the input become diagnostics plus an `Error` or `dyn`
//! placeholder; the walk always runs to completion.
//!
//! # Architecture
//!
//! Dispatch is on [`ExprKind`], with each category in its own module:
//!
//! - `identifiers`: identifiers, qualified names, field selection
//! - `calls`: calls and overload resolution
//! - `collections`: list and map literals
//! - `structs`: message construction
//! - `comprehension`: folds and their scopes
//!
//! Type variables are bound through one [`InferenceContext`]; recorded
//! types are finalized only once the whole tree has been visited, so later
//! nodes can still pin variables introduced by earlier ones.

mod calls;
mod collections;
mod comprehension;
mod identifiers;
mod structs;

use cel_diagnostic::{Diagnostic, ErrorCode};
use cel_ir::{Constant, Expr, ExprId, ExprKind, SourceInfo};
use cel_stack::ensure_sufficient_stack;
use cel_types::{InferenceContext, Type};
use rustc_hash::FxHashMap;

use crate::{AstState, CheckResult, CheckedAst, Container, Env, Reference};

/// Type-check `expr` against `env`, resolving names in `container`.
///
/// `env` is cloned, so local scopes opened by comprehensions never leak
/// back. The result carries the declaration errors of `env` followed by
/// the diagnostics of this check.
#[tracing::instrument(level = "debug", skip_all, fields(container = container.name()))]
pub fn typecheck(
    env: &Env,
    container: &Container,
    expr: &Expr,
    source: &SourceInfo,
) -> CheckResult {
    let mut checker = ExprChecker::new(env.clone(), container, source);
    let checked = checker.check(expr);
    checker.finish(checked, env.declaration_errors())
}

/// Per-check state.
pub(crate) struct ExprChecker<'a> {
    env: Env,
    container: &'a Container,
    source: &'a SourceInfo,
    ctx: InferenceContext,
    types: FxHashMap<ExprId, Type>,
    references: FxHashMap<ExprId, Reference>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ExprChecker<'a> {
    fn new(env: Env, container: &'a Container, source: &'a SourceInfo) -> Self {
        ExprChecker {
            env,
            container,
            source,
            ctx: InferenceContext::new(),
            types: FxHashMap::default(),
            references: FxHashMap::default(),
            diagnostics: Vec::new(),
        }
    }

    fn finish(self, expr: Expr, declaration_errors: &[Diagnostic]) -> CheckResult {
        let ExprChecker {
            ctx,
            types,
            references,
            diagnostics,
            ..
        } = self;

        let state = if diagnostics.is_empty() {
            AstState::Checked
        } else {
            AstState::ParsedOnly
        };
        let type_map = types
            .into_iter()
            .map(|(id, ty)| (id, ctx.finalize(&ty)))
            .collect();

        let mut all = Vec::with_capacity(declaration_errors.len() + diagnostics.len());
        all.extend_from_slice(declaration_errors);
        all.extend(diagnostics);
        tracing::debug!(diagnostics = all.len(), ?state, "check finished");

        CheckResult {
            ast: CheckedAst {
                expr,
                type_map,
                reference_map: references,
                state,
            },
            diagnostics: all,
        }
    }

    /// Check one node and its children, returning the rebuilt node.
    #[tracing::instrument(level = "trace", skip_all, fields(id = %expr.id))]
    fn check(&mut self, expr: &Expr) -> Expr {
        ensure_sufficient_stack(|| self.check_inner(expr))
    }

    fn check_inner(&mut self, expr: &Expr) -> Expr {
        let id = expr.id;
        match &expr.kind {
            ExprKind::Unspecified => panic!("expression {id} has no kind"),

            ExprKind::Const(value) => {
                self.set_type(id, constant_type(value));
                expr.clone()
            }

            ExprKind::Ident(name) => self.check_ident(expr, name),
            ExprKind::Select {
                operand,
                field,
                test_only,
            } => self.check_select(expr, operand, field, *test_only),

            ExprKind::Call {
                target,
                function,
                args,
            } => self.check_call(id, target.as_deref(), function, args),

            ExprKind::List {
                elements,
                optional_indices,
            } => self.check_list(id, elements, optional_indices),
            ExprKind::Map { entries } => self.check_map(id, entries),

            ExprKind::Struct {
                message_name,
                fields,
            } => self.check_struct(id, message_name, fields),

            ExprKind::Comprehension(comprehension) => {
                self.check_comprehension(id, comprehension)
            }
        }
    }

    // ========================================
    // Side tables
    // ========================================

    /// Record the type of `id`.
    ///
    /// # Panics
    ///
    /// Panics if a different type was already recorded for `id`.
    fn set_type(&mut self, id: ExprId, ty: Type) {
        if let Some(existing) = self.types.get(&id) {
            assert!(
                *existing == ty,
                "conflicting types for expression {id}: '{existing}' and '{ty}'"
            );
            return;
        }
        self.types.insert(id, ty);
    }

    /// The recorded type of `id`, or `Error` if none was recorded.
    fn get_type(&self, id: ExprId) -> Type {
        self.types.get(&id).cloned().unwrap_or(Type::Error)
    }

    fn set_reference(&mut self, id: ExprId, reference: Reference) {
        self.references.insert(id, reference);
    }

    // ========================================
    // Diagnostics
    // ========================================

    fn error_at(&self, code: ErrorCode, id: ExprId, message: String) -> Diagnostic {
        Diagnostic::error(code)
            .with_message(message)
            .at(id, self.source.position(id))
    }

    fn report(&mut self, code: ErrorCode, id: ExprId, message: String) {
        let diagnostic = self.error_at(code, id, message);
        self.push(diagnostic);
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        tracing::trace!(code = %diagnostic.code, "{}", diagnostic.message);
        self.diagnostics.push(diagnostic);
    }

    fn report_undeclared(&mut self, id: ExprId, name: &str) {
        let message = format!(
            "undeclared reference to '{name}' (in container '{}')",
            self.container.name()
        );
        self.report(ErrorCode::E2001, id, message);
    }

    fn report_type_mismatch(&mut self, id: ExprId, expected: &Type, found: &Type) {
        let message = format!(
            "expected type '{}' but found '{}'",
            self.display(expected),
            self.display(found)
        );
        self.report(ErrorCode::E2006, id, message);
    }

    /// A type as shown to users: bound variables substituted, free ones
    /// shown as `dyn`.
    fn display(&self, ty: &Type) -> String {
        self.ctx.finalize(ty).to_string()
    }

    /// Check that `id` has a type assignable to `expected`.
    fn assert_type(&mut self, id: ExprId, expected: &Type) {
        let actual = self.get_type(id);
        if !self.ctx.is_assignable(&actual, expected) {
            self.report_type_mismatch(id, expected, &actual);
        }
    }

    /// Unwrap `optional_type(T)` to `T` for a `?`-marked element, entry or
    /// field. A value that is neither optional nor a wildcard is reported.
    fn unwrap_optional_value(&mut self, id: ExprId, ty: Type) -> Type {
        match self.ctx.specialize(&ty) {
            Type::Optional(inner) => *inner,
            other => {
                if !other.is_wildcard() {
                    self.report_type_mismatch(id, &Type::optional(other.clone()), &other);
                }
                other
            }
        }
    }
}

/// The fixed type of a literal.
fn constant_type(value: &Constant) -> Type {
    match value {
        Constant::Null => Type::Null,
        Constant::Bool(_) => Type::Bool,
        Constant::Int(_) => Type::Int,
        Constant::Uint(_) => Type::Uint,
        Constant::Double(_) => Type::Double,
        Constant::String(_) => Type::String,
        Constant::Bytes(_) => Type::Bytes,
    }
}
