//! Calls and overload resolution.
//!
//! A call takes one of three shapes:
//!
//! 1. `f(args)`: a global function, resolved through the container.
//! 2. `a.b.f(args)` where `a.b.f` names a namespaced function: treated as
//!    shape 1 on the full name. With namespaced declarations the target is
//!    dropped from the rebuilt node; otherwise the node is kept as written.
//! 3. `target.f(args)`: a receiver call; the receiver is the first
//!    parameter of instance overloads.
//!
//! Every overload of the matching shape is tried in declaration order
//! against the current substitution. All matches go into the reference;
//! the first match decides the result type. A call with an operand of type
//! `!error!` is not resolved and is itself `!error!`.

use cel_diagnostic::ErrorCode;
use cel_ir::{Constant, Expr, ExprId, ExprKind};
use cel_types::{instantiate, Type};

use super::ExprChecker;
use crate::decl::format_call_shape;
use crate::{FunctionDecl, Reference};

/// Function name the parser uses for `operand.?field`.
const OPTIONAL_SELECT: &str = "_?._";

/// Overload id recorded for `operand.?field`.
const OPTIONAL_SELECT_OVERLOAD: &str = "select_optional_field";

impl ExprChecker<'_> {
    pub(super) fn check_call(
        &mut self,
        id: ExprId,
        target: Option<&Expr>,
        function: &str,
        args: &[Expr],
    ) -> Expr {
        // `_?._` is special only while the optional library is declared.
        if function == OPTIONAL_SELECT
            && target.is_none()
            && self.env.lookup_function(self.container, OPTIONAL_SELECT).is_some()
        {
            return self.check_optional_select(id, args);
        }

        let args: Vec<Expr> = args.iter().map(|arg| self.check(arg)).collect();
        let namespaced = self.env.options().namespaced_declarations;

        let Some(target) = target else {
            let Some(decl) = self.env.lookup_function(self.container, function) else {
                self.report_undeclared(id, function);
                self.set_type(id, Type::Error);
                return call(id, None, function.to_owned(), args);
            };
            self.resolve_overload(id, &decl, None, &args);
            let name = if namespaced { decl.name } else { function.to_owned() };
            return call(id, None, name, args);
        };

        if let Some(prefix) = target.qualified_name() {
            let qualified = format!("{prefix}.{function}");
            if let Some(decl) = self.env.lookup_function(self.container, &qualified) {
                tracing::trace!(function = %decl.name, "receiver names a namespace");
                self.resolve_overload(id, &decl, None, &args);
                if namespaced {
                    return call(id, None, decl.name, args);
                }
                return call(id, Some(target.clone()), function.to_owned(), args);
            }
        }

        let target = self.check(target);
        match self.env.lookup_function(self.container, function) {
            Some(decl) => self.resolve_overload(id, &decl, Some(target.id), &args),
            None => {
                self.report_undeclared(id, function);
                self.set_type(id, Type::Error);
            }
        }
        call(id, Some(target), function.to_owned(), args)
    }

    /// `operand.?field`, parsed as `_?._(operand, "field")`.
    fn check_optional_select(&mut self, id: ExprId, args: &[Expr]) -> Expr {
        let field = match args {
            [_, field] => match &field.kind {
                ExprKind::Const(Constant::String(name)) => Some(name.as_str()),
                _ => None,
            },
            _ => None,
        };
        let (Some(field), [operand, field_expr]) = (field, args) else {
            let at = args.get(1).map_or(id, |arg| arg.id);
            self.report(
                ErrorCode::E2010,
                at,
                "unsupported optional field selection".to_owned(),
            );
            self.set_type(id, Type::Error);
            return call(id, None, OPTIONAL_SELECT.to_owned(), args.to_vec());
        };

        let operand = self.check(operand);
        let ty = self.select_field(id, operand.id, field, true);
        let ty = self.ctx.specialize(&ty);
        self.set_type(id, ty);
        self.set_reference(id, Reference::function(OPTIONAL_SELECT_OVERLOAD));
        call(
            id,
            None,
            OPTIONAL_SELECT.to_owned(),
            vec![operand, field_expr.clone()],
        )
    }

    /// Pick the overloads of `decl` that accept the argument types and
    /// record the result type and reference of `id`.
    fn resolve_overload(
        &mut self,
        id: ExprId,
        decl: &FunctionDecl,
        target: Option<ExprId>,
        args: &[Expr],
    ) {
        let is_instance = target.is_some();
        let arg_types: Vec<Type> = target
            .into_iter()
            .chain(args.iter().map(|arg| arg.id))
            .map(|arg| self.get_type(arg))
            .collect();

        // An operand that already failed has been reported; don't pick an
        // overload on its behalf.
        if arg_types.iter().any(Type::is_error) {
            tracing::trace!(function = %decl.name, "error operand, resolution skipped");
            self.set_type(id, Type::Error);
            return;
        }

        let mut result: Option<(Type, &str)> = None;
        let mut reference: Option<Reference> = None;
        for overload in &decl.overloads {
            if overload.is_instance != is_instance {
                continue;
            }
            let fresh = self.ctx.fresh_vars(&overload.type_params);
            let params: Vec<Type> = overload
                .params
                .iter()
                .map(|param| instantiate(&fresh, param))
                .collect();
            if !self.ctx.is_assignable_all(&arg_types, &params) {
                tracing::trace!(function = %decl.name, overload = %overload.id, "overload rejected");
                continue;
            }
            tracing::trace!(function = %decl.name, overload = %overload.id, "overload matched");

            match &mut reference {
                Some(reference) => reference.add_overload(overload.id.as_str()),
                None => reference = Some(Reference::function(overload.id.as_str())),
            }

            let overload_result = self.ctx.specialize(&instantiate(&fresh, &overload.result));
            match &mut result {
                None => result = Some((overload_result, overload.id.as_str())),
                Some((first, first_id)) => {
                    if first.is_dyn() || overload_result.is_dyn() || *first == overload_result {
                        continue;
                    }
                    tracing::debug!(
                        function = %decl.name,
                        first = %first_id,
                        second = %overload.id,
                        "ambiguous overload result, widening to dyn"
                    );
                    if self.env.options().compile_time_overload_resolution {
                        let message = format!(
                            "found more than one matching overload for '{}' applied to '{}': \
                             '{first_id}' and '{}'",
                            decl.name,
                            self.call_shape(is_instance, &arg_types),
                            overload.id
                        );
                        self.report(ErrorCode::E2005, id, message);
                    }
                    *first = Type::Dyn;
                }
            }
        }

        let Some((result, _)) = result else {
            self.report_no_matching_overload(id, decl, is_instance, &arg_types);
            self.set_type(id, Type::Error);
            return;
        };
        self.set_type(id, result);
        if let Some(reference) = reference {
            self.set_reference(id, reference);
        }
    }

    fn report_no_matching_overload(
        &mut self,
        id: ExprId,
        decl: &FunctionDecl,
        is_instance: bool,
        arg_types: &[Type],
    ) {
        let message = format!(
            "found no matching overload for '{}' applied to '{}'",
            decl.name,
            self.call_shape(is_instance, arg_types)
        );
        let diagnostic = decl
            .overloads
            .iter()
            .fold(self.error_at(ErrorCode::E2004, id, message), |d, o| {
                d.with_note(format!("candidate: {}: {}", o.id, o.signature()))
            });
        self.push(diagnostic);
    }

    fn call_shape(&self, is_instance: bool, arg_types: &[Type]) -> String {
        let finalized: Vec<Type> = arg_types.iter().map(|t| self.ctx.finalize(t)).collect();
        format_call_shape(is_instance, &finalized)
    }
}

fn call(id: ExprId, target: Option<Expr>, function: String, args: Vec<Expr>) -> Expr {
    Expr::new(
        id,
        ExprKind::Call {
            target: target.map(Box::new),
            function,
            args,
        },
    )
}
