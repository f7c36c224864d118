//! Identifiers, qualified names and field selection.

use cel_diagnostic::ErrorCode;
use cel_ir::{Expr, ExprId, ExprKind};
use cel_types::Type;

use super::ExprChecker;
use crate::{IdentDecl, Reference};

impl ExprChecker<'_> {
    pub(super) fn check_ident(&mut self, expr: &Expr, name: &str) -> Expr {
        match self.env.lookup_ident(self.container, name) {
            Some(decl) => self.resolved_ident(expr, decl),
            None => {
                self.report_undeclared(expr.id, name);
                self.set_type(expr.id, Type::Error);
                self.set_reference(expr.id, Reference::ident("*error*", None));
                expr.clone()
            }
        }
    }

    /// Record `decl` as what `expr` names. With namespaced declarations the
    /// node becomes a plain identifier spelling the resolved name.
    fn resolved_ident(&mut self, expr: &Expr, decl: IdentDecl) -> Expr {
        let IdentDecl {
            name, ty, value, ..
        } = decl;
        tracing::trace!(%name, %ty, "identifier resolved");
        self.set_type(expr.id, ty);
        self.set_reference(expr.id, Reference::ident(name.clone(), value));
        if self.env.options().namespaced_declarations {
            Expr::new(expr.id, ExprKind::Ident(name))
        } else {
            expr.clone()
        }
    }

    pub(super) fn check_select(
        &mut self,
        expr: &Expr,
        operand: &Expr,
        field: &str,
        test_only: bool,
    ) -> Expr {
        // `a.b.c` may name a declaration outright.
        if !test_only {
            if let Some(qualified) = expr.qualified_name() {
                if let Some(decl) = self.env.lookup_ident(self.container, &qualified) {
                    return self.resolved_ident(expr, decl);
                }
            }
        }

        let operand = self.check(operand);
        let result = self.select_field(expr.id, operand.id, field, false);
        let ty = if test_only { Type::Bool } else { result };
        let ty = self.ctx.specialize(&ty);
        self.set_type(expr.id, ty);
        Expr::new(
            expr.id,
            ExprKind::Select {
                operand: Box::new(operand),
                field: field.to_owned(),
                test_only,
            },
        )
    }

    /// Type of `field` selected from the already checked `operand`.
    ///
    /// An optional operand is unwrapped first, and then the result is
    /// wrapped again; `optional` forces the wrapping for `_?._`.
    pub(super) fn select_field(
        &mut self,
        id: ExprId,
        operand: ExprId,
        field: &str,
        optional: bool,
    ) -> Type {
        let operand_ty = self.ctx.specialize(&self.get_type(operand));
        let (target, was_optional) = match operand_ty {
            Type::Optional(inner) => (*inner, true),
            other => (other, false),
        };

        let result = match &target {
            _ if target.is_wildcard() => Type::Dyn,
            Type::Map(_, value) => (**value).clone(),
            Type::Struct(message) => self.field_type(id, message, field),
            Type::TypeParam(_) => {
                // Pin the variable so no other use can bind it to a
                // type without this field.
                self.ctx.is_assignable(&Type::Dyn, &target);
                Type::Dyn
            }
            other => {
                let message = format!(
                    "type '{}' does not support field selection",
                    self.display(other)
                );
                self.report(ErrorCode::E2003, id, message);
                Type::Dyn
            }
        };

        if was_optional || optional {
            Type::optional(result)
        } else {
            result
        }
    }

    /// Declared type of `field` on `message`, falling back to extension
    /// fields. Reports and answers `Error` when neither exists.
    pub(super) fn field_type(&mut self, id: ExprId, message: &str, field: &str) -> Type {
        let found = self.env.provider().find_type(message).and_then(|descriptor| {
            descriptor
                .field(field)
                .or_else(|| descriptor.extension_field(field))
                .cloned()
        });
        match found {
            Some(ty) => ty,
            None => {
                self.report(ErrorCode::E2002, id, format!("undefined field '{field}'"));
                Type::Error
            }
        }
    }
}
