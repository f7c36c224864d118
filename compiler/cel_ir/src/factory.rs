//! Id-allocating node constructors.
//!
//! Parsers and tests build trees through [`ExprFactory`] so every node gets a
//! fresh id. The macro helpers expand `all`/`exists`/`map`/`filter` the same
//! way the parser does.

use crate::{Comprehension, Constant, Expr, ExprId, ExprKind, FieldEntry, MapEntry};

/// Accumulator name used by macro expansions.
pub const ACCUMULATOR_VAR: &str = "@result";

/// Hands out sequential [`ExprId`]s starting at 1.
#[derive(Debug)]
pub struct ExprFactory {
    next: i64,
}

impl Default for ExprFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ExprFactory {
    pub fn new() -> Self {
        ExprFactory { next: 1 }
    }

    /// Allocate the next id.
    pub fn next_id(&mut self) -> ExprId {
        let id = ExprId::new(self.next);
        self.next += 1;
        id
    }

    fn node(&mut self, kind: ExprKind) -> Expr {
        let id = self.next_id();
        Expr::new(id, kind)
    }

    // ========================================
    // Leaves
    // ========================================

    pub fn constant(&mut self, value: Constant) -> Expr {
        self.node(ExprKind::Const(value))
    }

    pub fn null(&mut self) -> Expr {
        self.constant(Constant::Null)
    }

    pub fn bool(&mut self, value: bool) -> Expr {
        self.constant(Constant::Bool(value))
    }

    pub fn int(&mut self, value: i64) -> Expr {
        self.constant(Constant::Int(value))
    }

    pub fn uint(&mut self, value: u64) -> Expr {
        self.constant(Constant::Uint(value))
    }

    pub fn double(&mut self, value: f64) -> Expr {
        self.constant(Constant::Double(value))
    }

    pub fn string(&mut self, value: impl Into<String>) -> Expr {
        self.constant(Constant::String(value.into()))
    }

    pub fn bytes(&mut self, value: impl Into<Vec<u8>>) -> Expr {
        self.constant(Constant::Bytes(value.into()))
    }

    pub fn ident(&mut self, name: impl Into<String>) -> Expr {
        self.node(ExprKind::Ident(name.into()))
    }

    /// A node with no kind, for exercising contract checks.
    pub fn unspecified(&mut self) -> Expr {
        self.node(ExprKind::Unspecified)
    }

    // ========================================
    // Selection and calls
    // ========================================

    pub fn select(&mut self, operand: Expr, field: impl Into<String>) -> Expr {
        self.node(ExprKind::Select {
            operand: Box::new(operand),
            field: field.into(),
            test_only: false,
        })
    }

    /// `has(operand.field)`.
    pub fn presence_test(&mut self, operand: Expr, field: impl Into<String>) -> Expr {
        self.node(ExprKind::Select {
            operand: Box::new(operand),
            field: field.into(),
            test_only: true,
        })
    }

    /// Build a select chain from a dotted name: `a.b.c`.
    pub fn qualified(&mut self, dotted: &str) -> Expr {
        let mut parts = dotted.split('.');
        let first = parts.next().unwrap_or_default();
        let mut expr = self.ident(first);
        for part in parts {
            expr = self.select(expr, part);
        }
        expr
    }

    pub fn call(&mut self, function: impl Into<String>, args: Vec<Expr>) -> Expr {
        self.node(ExprKind::Call {
            target: None,
            function: function.into(),
            args,
        })
    }

    pub fn member_call(
        &mut self,
        target: Expr,
        function: impl Into<String>,
        args: Vec<Expr>,
    ) -> Expr {
        self.node(ExprKind::Call {
            target: Some(Box::new(target)),
            function: function.into(),
            args,
        })
    }

    /// Binary operator call, e.g. `binary("_+_", lhs, rhs)`.
    pub fn binary(&mut self, operator: &str, lhs: Expr, rhs: Expr) -> Expr {
        self.call(operator, vec![lhs, rhs])
    }

    /// `operand.?field`.
    pub fn optional_select(&mut self, operand: Expr, field: impl Into<String>) -> Expr {
        let field = self.string(field);
        self.call("_?._", vec![operand, field])
    }

    // ========================================
    // Aggregates
    // ========================================

    pub fn list(&mut self, elements: Vec<Expr>) -> Expr {
        self.list_with_optionals(elements, Vec::new())
    }

    pub fn list_with_optionals(&mut self, elements: Vec<Expr>, optional_indices: Vec<usize>) -> Expr {
        self.node(ExprKind::List {
            elements,
            optional_indices,
        })
    }

    pub fn field(&mut self, field: impl Into<String>, value: Expr) -> FieldEntry {
        FieldEntry {
            id: self.next_id(),
            field: field.into(),
            value,
            optional: false,
        }
    }

    pub fn optional_field(&mut self, field: impl Into<String>, value: Expr) -> FieldEntry {
        FieldEntry {
            optional: true,
            ..self.field(field, value)
        }
    }

    pub fn message(&mut self, message_name: impl Into<String>, fields: Vec<FieldEntry>) -> Expr {
        self.node(ExprKind::Struct {
            message_name: message_name.into(),
            fields,
        })
    }

    pub fn entry(&mut self, key: Expr, value: Expr) -> MapEntry {
        MapEntry {
            id: self.next_id(),
            key,
            value,
            optional: false,
        }
    }

    pub fn optional_entry(&mut self, key: Expr, value: Expr) -> MapEntry {
        MapEntry {
            optional: true,
            ..self.entry(key, value)
        }
    }

    pub fn map(&mut self, entries: Vec<MapEntry>) -> Expr {
        self.node(ExprKind::Map { entries })
    }

    pub fn comprehension(&mut self, comprehension: Comprehension) -> Expr {
        self.node(ExprKind::Comprehension(Box::new(comprehension)))
    }

    // ========================================
    // Macro expansions
    // ========================================

    /// `range.exists(var, predicate)`.
    pub fn exists(&mut self, range: Expr, var: &str, predicate: Expr) -> Expr {
        let accu_init = self.bool(false);
        let accu = self.ident(ACCUMULATOR_VAR);
        let not_accu = self.call("!_", vec![accu]);
        let loop_condition = self.call("@not_strictly_false", vec![not_accu]);
        let accu = self.ident(ACCUMULATOR_VAR);
        let loop_step = self.binary("_||_", accu, predicate);
        let result = self.ident(ACCUMULATOR_VAR);
        self.fold(var, None, range, accu_init, loop_condition, loop_step, result)
    }

    /// `range.all(var, predicate)`.
    pub fn all(&mut self, range: Expr, var: &str, predicate: Expr) -> Expr {
        let accu_init = self.bool(true);
        let accu = self.ident(ACCUMULATOR_VAR);
        let loop_condition = self.call("@not_strictly_false", vec![accu]);
        let accu = self.ident(ACCUMULATOR_VAR);
        let loop_step = self.binary("_&&_", accu, predicate);
        let result = self.ident(ACCUMULATOR_VAR);
        self.fold(var, None, range, accu_init, loop_condition, loop_step, result)
    }

    /// `range.map(var, transform)`.
    pub fn map_macro(&mut self, range: Expr, var: &str, transform: Expr) -> Expr {
        let accu_init = self.list(Vec::new());
        let loop_condition = self.bool(true);
        let accu = self.ident(ACCUMULATOR_VAR);
        let single = self.list(vec![transform]);
        let loop_step = self.binary("_+_", accu, single);
        let result = self.ident(ACCUMULATOR_VAR);
        self.fold(var, None, range, accu_init, loop_condition, loop_step, result)
    }

    /// `range.filter(var, predicate)`.
    pub fn filter(&mut self, range: Expr, var: &str, predicate: Expr) -> Expr {
        let accu_init = self.list(Vec::new());
        let loop_condition = self.bool(true);
        let accu = self.ident(ACCUMULATOR_VAR);
        let element = self.ident(var);
        let single = self.list(vec![element]);
        let appended = self.binary("_+_", accu, single);
        let accu = self.ident(ACCUMULATOR_VAR);
        let loop_step = self.call("_?_:_", vec![predicate, appended, accu]);
        let result = self.ident(ACCUMULATOR_VAR);
        self.fold(var, None, range, accu_init, loop_condition, loop_step, result)
    }

    /// General comprehension with the accumulator named [`ACCUMULATOR_VAR`].
    #[allow(clippy::too_many_arguments)]
    pub fn fold(
        &mut self,
        iter_var: &str,
        iter_var2: Option<&str>,
        iter_range: Expr,
        accu_init: Expr,
        loop_condition: Expr,
        loop_step: Expr,
        result: Expr,
    ) -> Expr {
        self.comprehension(Comprehension {
            iter_var: iter_var.to_owned(),
            iter_var2: iter_var2.map(str::to_owned),
            iter_range,
            accu_var: ACCUMULATOR_VAR.to_owned(),
            accu_init,
            loop_condition,
            loop_step,
            result,
        })
    }
}

#[cfg(test)]
mod tests;
