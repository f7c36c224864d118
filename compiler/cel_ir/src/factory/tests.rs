use super::*;

#[test]
fn ids_are_sequential() {
    let mut f = ExprFactory::new();
    assert_eq!(f.int(1).id, ExprId::new(1));
    assert_eq!(f.int(2).id, ExprId::new(2));
    assert_eq!(f.next_id(), ExprId::new(3));
}

#[test]
fn children_get_ids_before_parents() {
    let mut f = ExprFactory::new();
    let lhs = f.ident("x");
    let rhs = f.int(1);
    let call = f.binary("_+_", lhs, rhs);
    assert_eq!(call.id, ExprId::new(3));
}

#[test]
fn exists_expands_to_bool_fold() {
    let mut f = ExprFactory::new();
    let range = f.ident("xs");
    let pred = f.bool(true);
    let expr = f.exists(range, "x", pred);
    let ExprKind::Comprehension(c) = expr.kind else {
        panic!("expected comprehension");
    };
    assert_eq!(c.iter_var, "x");
    assert_eq!(c.accu_var, ACCUMULATOR_VAR);
    assert_eq!(c.accu_init.kind, ExprKind::Const(Constant::Bool(false)));
    assert!(c.iter_var2.is_none());
}

#[test]
fn optional_field_sets_flag() {
    let mut f = ExprFactory::new();
    let value = f.ident("v");
    let entry = f.optional_field("name", value);
    assert!(entry.optional);
    assert_eq!(entry.field, "name");
}

#[test]
fn optional_select_is_a_call() {
    let mut f = ExprFactory::new();
    let operand = f.ident("msg");
    let expr = f.optional_select(operand, "field");
    let ExprKind::Call { function, args, target } = expr.kind else {
        panic!("expected call");
    };
    assert_eq!(function, "_?._");
    assert!(target.is_none());
    assert_eq!(args[1].kind, ExprKind::Const(Constant::String("field".into())));
}
