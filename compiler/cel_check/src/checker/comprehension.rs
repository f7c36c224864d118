//! Comprehensions (folds).
//!
//! Two scopes are opened: the accumulator's, visible to the loop and the
//! result, and inside it the iteration variables', visible to the loop
//! condition and step only. The result is checked after the inner scope is
//! closed, so it cannot see the last iteration's values.

use cel_diagnostic::ErrorCode;
use cel_ir::{Comprehension, Expr, ExprId, ExprKind};
use cel_types::Type;

use super::ExprChecker;

impl ExprChecker<'_> {
    pub(super) fn check_comprehension(&mut self, id: ExprId, comp: &Comprehension) -> Expr {
        let iter_range = self.check(&comp.iter_range);
        let accu_init = self.check(&comp.accu_init);
        let range_ty = self.ctx.specialize(&self.get_type(iter_range.id));
        let accu_ty = self.get_type(accu_init.id);

        self.env.enter_scope();
        self.env.declare_local(&comp.accu_var, accu_ty.clone());

        let two_vars = comp.iter_var2.is_some();
        let (var_ty, var2_ty) = match &range_ty {
            Type::List(elem) if two_vars => (Type::Int, (**elem).clone()),
            Type::List(elem) => ((**elem).clone(), Type::Dyn),
            Type::Map(key, value) => ((**key).clone(), (**value).clone()),
            _ if range_ty.is_wildcard() || range_ty.is_type_param() => {
                // Pin a free range to `dyn` as field selection does.
                self.ctx.is_assignable(&Type::Dyn, &range_ty);
                (Type::Dyn, Type::Dyn)
            }
            other => {
                let message = format!(
                    "expression of type '{}' cannot be range of a comprehension \
                     (must be list, map, or dynamic)",
                    self.display(other)
                );
                self.report(ErrorCode::E2009, iter_range.id, message);
                (Type::Error, Type::Error)
            }
        };

        self.env.enter_scope();
        self.env.declare_local(&comp.iter_var, var_ty);
        if let Some(iter_var2) = &comp.iter_var2 {
            self.env.declare_local(iter_var2, var2_ty);
        }
        let loop_condition = self.check(&comp.loop_condition);
        self.assert_type(loop_condition.id, &Type::Bool);
        let loop_step = self.check(&comp.loop_step);
        self.assert_type(loop_step.id, &accu_ty);
        self.env.exit_scope();

        let result = self.check(&comp.result);
        self.env.exit_scope();

        let ty = self.ctx.specialize(&self.get_type(result.id));
        self.set_type(id, ty);
        Expr::new(
            id,
            ExprKind::Comprehension(Box::new(Comprehension {
                iter_var: comp.iter_var.clone(),
                iter_var2: comp.iter_var2.clone(),
                iter_range,
                accu_var: comp.accu_var.clone(),
                accu_init,
                loop_condition,
                loop_step,
                result,
            })),
        )
    }
}
