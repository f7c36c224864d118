use super::*;
use pretty_assertions::assert_eq;

#[test]
fn ident_builder() {
    let decl = IdentDecl::new("pkg.RED", Type::Int)
        .with_value(Constant::Int(0))
        .with_doc("first color");
    assert_eq!(decl.name, "pkg.RED");
    assert_eq!(decl.value, Some(Constant::Int(0)));
    assert_eq!(decl.doc.as_deref(), Some("first color"));
}

#[test]
fn overload_collects_type_params_in_order() {
    let o = OverloadDecl::global(
        "index_map",
        vec![Type::map(Type::param("K"), Type::param("V")), Type::param("K")],
        Type::param("V"),
    );
    assert_eq!(o.type_params, vec!["K".to_owned(), "V".to_owned()]);
    let o = OverloadDecl::global("optional_none", vec![], Type::optional(Type::param("T")));
    assert_eq!(o.type_params, vec!["T".to_owned()]);
}

#[test]
fn instance_arg_count_excludes_receiver() {
    let o = OverloadDecl::instance(
        "contains_string",
        vec![Type::String, Type::String],
        Type::Bool,
    );
    assert_eq!(o.arg_count(), 1);
    assert_eq!(o.signature(), "string.(string) -> bool");
    let g = OverloadDecl::global("add_int64", vec![Type::Int, Type::Int], Type::Int);
    assert_eq!(g.arg_count(), 2);
    assert_eq!(g.signature(), "(int, int) -> int");
}

#[test]
fn erasure_replaces_type_params_with_dyn() {
    let o = OverloadDecl::global("size_list", vec![Type::list(Type::param("A"))], Type::Int);
    assert_eq!(o.erased_params(), vec![Type::list(Type::Dyn)]);
}

#[test]
fn overlap_detection() {
    let int_f = OverloadDecl::global("f_int", vec![Type::Int], Type::Bool);
    let str_f = OverloadDecl::global("f_string", vec![Type::String], Type::Bool);
    let dyn_f = OverloadDecl::global("f_dyn", vec![Type::param("T")], Type::Bool);
    let member_f = OverloadDecl::instance("int_f", vec![Type::Int], Type::Bool);

    assert!(!int_f.signature_overlaps(&str_f));
    assert!(int_f.signature_overlaps(&dyn_f));
    assert!(!int_f.signature_overlaps(&member_f));
    assert!(int_f.erased_signature_eq(&OverloadDecl::global("other", vec![Type::Int], Type::Int)));
}

#[test]
fn function_builder_keeps_order() {
    let f = FunctionDecl::new("f")
        .overload(OverloadDecl::global("f_int", vec![Type::Int], Type::Bool))
        .overload(OverloadDecl::global("f_string", vec![Type::String], Type::Bool));
    let ids: Vec<&str> = f.overloads.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["f_int", "f_string"]);
    assert!(f.find_overload("f_string").is_some());
    assert_eq!(
        f.to_string(),
        "f\n  f_int: (int) -> bool\n  f_string: (string) -> bool"
    );
}

#[test]
fn decl_errors_render_and_map_to_codes() {
    let err = DeclError::OverlappingIdent { name: "x".to_owned() };
    assert_eq!(err.to_string(), "overlapping identifier for name 'x'");
    assert_eq!(err.code(), ErrorCode::E2101);

    let err = DeclError::OverlappingMacro {
        name: "has".to_owned(),
        arg_count: 1,
    };
    assert_eq!(err.to_string(), "overlapping macro for name 'has' with 1 args");
    let diag = err.to_diagnostic();
    assert_eq!(diag.code, ErrorCode::E2103);
    assert_eq!(diag.expr_id, None);

    let err = DeclError::OverlappingOverload {
        function: "f".to_owned(),
        id: "f_dyn".to_owned(),
        signature: "(T) -> bool".to_owned(),
        existing_id: "f_int".to_owned(),
        existing_signature: "(int) -> bool".to_owned(),
    };
    assert_eq!(
        err.to_string(),
        "overlapping overload for name 'f' (type '(T) -> bool' with overloadId: 'f_dyn' \
         cannot be distinguished from '(int) -> bool' with overloadId: 'f_int')"
    );
}
