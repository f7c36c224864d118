//! List and map literals.

use cel_ir::{Expr, ExprId, ExprKind, MapEntry};
use cel_types::{most_general, Type};

use super::ExprChecker;

impl ExprChecker<'_> {
    pub(super) fn check_list(
        &mut self,
        id: ExprId,
        elements: &[Expr],
        optional_indices: &[usize],
    ) -> Expr {
        let mut elem_ty: Option<Type> = None;
        let mut checked = Vec::with_capacity(elements.len());
        for (i, element) in elements.iter().enumerate() {
            let element = self.check(element);
            let mut ty = self.get_type(element.id);
            if optional_indices.contains(&i) {
                ty = self.unwrap_optional_value(element.id, ty);
            }
            elem_ty = Some(self.join_types(element.id, elem_ty, ty));
            checked.push(element);
        }

        let elem_ty = match elem_ty {
            Some(ty) => ty,
            None => self.ctx.new_type_var("var"),
        };
        self.set_type(id, Type::list(elem_ty));
        Expr::new(
            id,
            ExprKind::List {
                elements: checked,
                optional_indices: optional_indices.to_vec(),
            },
        )
    }

    pub(super) fn check_map(&mut self, id: ExprId, entries: &[MapEntry]) -> Expr {
        let mut key_ty: Option<Type> = None;
        let mut value_ty: Option<Type> = None;
        let mut checked = Vec::with_capacity(entries.len());
        for entry in entries {
            let key = self.check(&entry.key);
            let ty = self.get_type(key.id);
            key_ty = Some(self.join_types(key.id, key_ty, ty));

            let value = self.check(&entry.value);
            let mut ty = self.get_type(value.id);
            if entry.optional {
                ty = self.unwrap_optional_value(value.id, ty);
            }
            value_ty = Some(self.join_types(value.id, value_ty, ty));

            checked.push(MapEntry {
                id: entry.id,
                key,
                value,
                optional: entry.optional,
            });
        }

        let (key_ty, value_ty) = match (key_ty, value_ty) {
            (Some(key), Some(value)) => (key, value),
            _ => (self.ctx.new_type_var("key"), self.ctx.new_type_var("value")),
        };
        self.set_type(id, Type::map(key_ty, value_ty));
        Expr::new(id, ExprKind::Map { entries: checked })
    }

    /// Fold `current` into the element type seen so far.
    ///
    /// Assignable types join to the more general one. Otherwise literals
    /// widen to `dyn`, or, with homogeneous literals, the mismatch is
    /// reported at `id` and the earlier type kept.
    fn join_types(&mut self, id: ExprId, previous: Option<Type>, current: Type) -> Type {
        let Some(previous) = previous else {
            return current;
        };
        if self.ctx.is_assignable(&previous, &current) {
            return most_general(&previous, &current);
        }
        if !self.env.options().homogeneous_aggregate_literals {
            return Type::Dyn;
        }
        self.report_type_mismatch(id, &previous, &current);
        previous
    }
}
