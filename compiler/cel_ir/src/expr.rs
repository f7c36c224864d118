//! Expression tree nodes.

use crate::{Constant, ExprId};

/// One node of the expression tree.
#[derive(Clone, PartialEq, Debug)]
pub struct Expr {
    pub id: ExprId,
    pub kind: ExprKind,
}

/// The closed set of expression kinds.
///
/// Operators are calls to functions with reserved names (`_+_`, `_[_]`,
/// `!_`, ...); macros such as `all` or `exists` have already been expanded
/// into [`ExprKind::Comprehension`] by the parser.
#[derive(Clone, PartialEq, Debug)]
pub enum ExprKind {
    /// A node whose kind was never set. Checking one is a caller bug.
    Unspecified,

    /// Literal value.
    Const(Constant),

    /// Possibly-qualified identifier (`x`, `a.b.c` once rewritten).
    Ident(String),

    /// Field selection `operand.field`, or the presence test
    /// `has(operand.field)` when `test_only` is set.
    Select {
        operand: Box<Expr>,
        field: String,
        test_only: bool,
    },

    /// Global call `f(args)` or receiver call `target.f(args)`.
    Call {
        target: Option<Box<Expr>>,
        function: String,
        args: Vec<Expr>,
    },

    /// List literal. Elements whose index appears in `optional_indices`
    /// were written `?e` and contribute only when present.
    List {
        elements: Vec<Expr>,
        optional_indices: Vec<usize>,
    },

    /// Message construction `pkg.Msg{field: value, ...}`.
    Struct {
        message_name: String,
        fields: Vec<FieldEntry>,
    },

    /// Map literal `{key: value, ...}`.
    Map { entries: Vec<MapEntry> },

    /// Fold over a list or map with an accumulator.
    Comprehension(Box<Comprehension>),
}

/// A `field: value` initializer inside a struct literal.
#[derive(Clone, PartialEq, Debug)]
pub struct FieldEntry {
    pub id: ExprId,
    pub field: String,
    pub value: Expr,
    /// Written `?field: value`; the value must be optional.
    pub optional: bool,
}

/// A `key: value` entry inside a map literal.
#[derive(Clone, PartialEq, Debug)]
pub struct MapEntry {
    pub id: ExprId,
    pub key: Expr,
    pub value: Expr,
    /// Written `?key: value`; the value must be optional.
    pub optional: bool,
}

/// Comprehension (fold) node.
///
/// ```text
/// accu = accu_init
/// for iter_var[, iter_var2] in iter_range:
///     if !loop_condition: break
///     accu = loop_step
/// return result
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct Comprehension {
    pub iter_var: String,
    /// Second iteration variable of two-variable comprehensions. When set,
    /// a list range binds `(index, element)` and a map range `(key, value)`.
    pub iter_var2: Option<String>,
    pub iter_range: Expr,
    pub accu_var: String,
    pub accu_init: Expr,
    pub loop_condition: Expr,
    pub loop_step: Expr,
    pub result: Expr,
}

impl Expr {
    pub fn new(id: ExprId, kind: ExprKind) -> Self {
        Expr { id, kind }
    }

    /// Interpret an identifier/select chain as a dotted name.
    ///
    /// `a.b.c` yields `Some("a.b.c")`. Anything else in the chain (calls,
    /// literals, presence tests) yields `None`.
    pub fn qualified_name(&self) -> Option<String> {
        match &self.kind {
            ExprKind::Ident(name) => Some(name.clone()),
            ExprKind::Select {
                operand,
                field,
                test_only: false,
            } => {
                let mut prefix = operand.qualified_name()?;
                prefix.push('.');
                prefix.push_str(field);
                Some(prefix)
            }
            _ => None,
        }
    }

    /// Count the nodes of this tree, entries included.
    pub fn node_count(&self) -> usize {
        1 + match &self.kind {
            ExprKind::Unspecified | ExprKind::Const(_) | ExprKind::Ident(_) => 0,
            ExprKind::Select { operand, .. } => operand.node_count(),
            ExprKind::Call { target, args, .. } => {
                target.as_ref().map_or(0, |t| t.node_count())
                    + args.iter().map(Expr::node_count).sum::<usize>()
            }
            ExprKind::List { elements, .. } => elements.iter().map(Expr::node_count).sum(),
            ExprKind::Struct { fields, .. } => {
                fields.iter().map(|f| 1 + f.value.node_count()).sum()
            }
            ExprKind::Map { entries } => entries
                .iter()
                .map(|e| 1 + e.key.node_count() + e.value.node_count())
                .sum(),
            ExprKind::Comprehension(c) => {
                c.iter_range.node_count()
                    + c.accu_init.node_count()
                    + c.loop_condition.node_count()
                    + c.loop_step.node_count()
                    + c.result.node_count()
            }
        }
    }
}
