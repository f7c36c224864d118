use super::*;
use cel_diagnostic::ErrorCode;
use cel_types::{EmptyProvider, SchemaRegistry, StructDescriptor};
use pretty_assertions::assert_eq;

fn empty_env() -> Env {
    Env::new(Arc::new(EmptyProvider), CheckerOptions::default())
}

fn registry_env() -> Env {
    let mut reg = SchemaRegistry::new();
    reg.register(StructDescriptor::new("a.b.Msg").with_field("f", Type::Int))
        .register_enum("a.b.Color", &[("RED", 0), ("BLUE", 2)]);
    Env::new(Arc::new(reg), CheckerOptions::default())
}

fn root() -> Container {
    Container::root()
}

fn int_fn(name: &str, id: &str) -> FunctionDecl {
    FunctionDecl::new(name).overload(OverloadDecl::global(id, vec![Type::Int], Type::Int))
}

// ========================================
// Scopes
// ========================================

#[test]
fn inner_scope_shadows_outer() {
    let mut env = empty_env();
    env.add_ident(IdentDecl::new("x", Type::Int));
    env.enter_scope();
    env.add_ident(IdentDecl::new("x", Type::String));
    assert_eq!(env.lookup_ident(&root(), "x").map(|d| d.ty), Some(Type::String));
    env.exit_scope();
    assert_eq!(env.lookup_ident(&root(), "x").map(|d| d.ty), Some(Type::Int));
}

#[test]
fn inner_declaration_is_invisible_after_exit() {
    let mut env = empty_env();
    env.enter_scope();
    env.add_ident(IdentDecl::new("y", Type::Bool));
    assert!(env.lookup_ident(&root(), "y").is_some());
    env.exit_scope();
    assert!(env.lookup_ident(&root(), "y").is_none());
    assert_eq!(env.scope_depth(), 1);
}

#[test]
#[should_panic(expected = "cannot exit the root scope")]
fn exiting_root_scope_panics() {
    let mut env = empty_env();
    env.exit_scope();
}

#[test]
fn clones_do_not_share_local_scopes() {
    let mut env = empty_env();
    env.add_ident(IdentDecl::new("x", Type::Int));
    let mut clone = env.clone();
    clone.enter_scope();
    clone.add_ident(IdentDecl::new("local", Type::Int));
    clone.add_ident(IdentDecl::new("x", Type::Bool));
    assert!(env.lookup_ident(&root(), "local").is_none());
    assert_eq!(env.lookup_ident(&root(), "x").map(|d| d.ty), Some(Type::Int));
}

// ========================================
// Declaration errors
// ========================================

#[test]
fn redeclaring_ident_with_same_type_is_a_no_op() {
    let mut env = empty_env();
    env.add_ident(IdentDecl::new("x", Type::Int));
    env.add_ident(IdentDecl::new("x", Type::Int));
    assert!(env.declaration_errors().is_empty());
}

#[test]
fn redeclaring_ident_with_other_type_keeps_first() {
    let mut env = empty_env();
    env.add_ident(IdentDecl::new("x", Type::Int));
    env.add_ident(IdentDecl::new("x", Type::String));
    assert_eq!(env.declaration_errors().len(), 1);
    assert_eq!(env.declaration_errors()[0].code, ErrorCode::E2101);
    assert_eq!(
        env.declaration_errors()[0].message,
        "overlapping identifier for name 'x'"
    );
    assert_eq!(env.lookup_ident(&root(), "x").map(|d| d.ty), Some(Type::Int));
}

#[test]
fn overlapping_overload_is_rejected() {
    let mut env = empty_env();
    env.add_function(int_fn("f", "f_int"));
    let errors = env.try_add_function(
        FunctionDecl::new("f").overload(OverloadDecl::global(
            "f_any",
            vec![Type::param("T")],
            Type::Int,
        )),
    );
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code(), ErrorCode::E2102);
    let f = env.lookup_function(&root(), "f");
    assert_eq!(f.map(|f| f.overloads.len()), Some(1));
}

#[test]
fn identical_overload_is_a_no_op() {
    let mut env = empty_env();
    env.add_function(int_fn("f", "f_int"));
    env.add_function(int_fn("f", "f_int"));
    assert!(env.declaration_errors().is_empty());
    assert_eq!(env.lookup_function(&root(), "f").map(|f| f.overloads.len()), Some(1));
}

#[test]
fn distinct_overloads_merge_in_order() {
    let mut env = empty_env();
    env.add_function(int_fn("f", "f_int"));
    env.add_function(
        FunctionDecl::new("f").overload(OverloadDecl::global("f_string", vec![Type::String], Type::Int)),
    );
    let ids: Vec<String> = env
        .lookup_function(&root(), "f")
        .map(|f| f.overloads.into_iter().map(|o| o.id).collect())
        .unwrap_or_default();
    assert_eq!(ids, vec!["f_int".to_owned(), "f_string".to_owned()]);
}

#[test]
fn macro_collision_is_rejected() {
    let mut env = empty_env();
    env.add_function(
        FunctionDecl::new("has").overload(OverloadDecl::global("has_dyn", vec![Type::Dyn], Type::Bool)),
    );
    env.add_function(FunctionDecl::new("map").overload(OverloadDecl::instance(
        "list_map",
        vec![Type::list(Type::Dyn), Type::Dyn, Type::Dyn],
        Type::Dyn,
    )));
    let messages: Vec<&str> = env
        .declaration_errors()
        .iter()
        .map(|d| d.message.as_str())
        .collect();
    assert_eq!(
        messages,
        vec![
            "overlapping macro for name 'has' with 1 args",
            "overlapping macro for name 'map' with 2 args",
        ]
    );
    assert!(env.lookup_function(&root(), "has").is_none());
}

#[test]
fn receiver_and_global_shapes_do_not_collide_with_each_other() {
    let mut env = empty_env();
    env.add_function(
        FunctionDecl::new("size")
            .overload(OverloadDecl::global("size_string", vec![Type::String], Type::Int))
            .overload(OverloadDecl::instance("string_size", vec![Type::String], Type::Int)),
    );
    assert!(env.declaration_errors().is_empty());
}

// ========================================
// Merged function view
// ========================================

#[test]
fn inner_scope_overload_wins_for_shared_signature() {
    let mut env = empty_env();
    env.add_function(
        FunctionDecl::new("f")
            .overload(OverloadDecl::global("outer_int", vec![Type::Int], Type::Int))
            .overload(OverloadDecl::global("outer_string", vec![Type::String], Type::Int)),
    );
    env.enter_scope();
    env.add_function(
        FunctionDecl::new("f").overload(OverloadDecl::global("inner_int", vec![Type::Int], Type::Bool)),
    );
    let ids: Vec<String> = env
        .lookup_function(&root(), "f")
        .map(|f| f.overloads.into_iter().map(|o| o.id).collect())
        .unwrap_or_default();
    assert_eq!(ids, vec!["inner_int".to_owned(), "outer_string".to_owned()]);
    assert!(env.declaration_errors().is_empty());
}

// ========================================
// Qualified names and the provider
// ========================================

#[test]
fn container_candidates_resolve_most_specific_first() {
    let mut env = empty_env();
    env.add_ident(IdentDecl::new("a.b.x", Type::Int));
    env.add_ident(IdentDecl::new("a.x", Type::String));
    let container = Container::new("a.b.c");
    assert_eq!(
        env.lookup_ident(&container, "x").map(|d| d.name),
        Some("a.b.x".to_owned())
    );
    assert_eq!(
        env.lookup_ident(&container, ".a.x").map(|d| d.ty),
        Some(Type::String)
    );
    assert!(env.lookup_ident(&container, ".x").is_none());
}

#[test]
fn provider_types_resolve_as_type_denotations() {
    let env = registry_env();
    let decl = env.lookup_ident(&Container::new("a.b"), "Msg");
    assert_eq!(
        decl,
        Some(IdentDecl::new("a.b.Msg", Type::type_of(Type::message("a.b.Msg"))))
    );
}

#[test]
fn provider_enum_values_resolve_as_int_constants() {
    let env = registry_env();
    let decl = env.lookup_ident(&root(), "a.b.Color.BLUE");
    assert_eq!(
        decl,
        Some(IdentDecl::new("a.b.Color.BLUE", Type::Int).with_value(Constant::Int(2)))
    );
}

#[test]
fn provider_hits_are_cached_and_shared_by_clones() {
    let env = registry_env();
    let clone = env.clone();
    assert!(clone.find_ident("a.b.Msg").is_some());
    assert_eq!(env.provider_cache.read().len(), 1);
    assert!(env.find_ident("a.b.Msg").is_some());
    assert_eq!(env.provider_cache.read().len(), 1);
}

#[test]
fn scope_declaration_beats_provider() {
    let mut env = registry_env();
    env.add_ident(IdentDecl::new("a.b.Msg", Type::Int));
    assert_eq!(env.find_ident("a.b.Msg").map(|d| d.ty), Some(Type::Int));
}

#[test]
fn standard_env_declares_without_errors() {
    let env = Env::standard(Arc::new(EmptyProvider), CheckerOptions::default());
    assert!(
        env.declaration_errors().is_empty(),
        "{:?}",
        env.declaration_errors()
    );
    assert!(env.lookup_function(&root(), "_+_").is_some());
    assert_eq!(
        env.lookup_ident(&root(), "int").map(|d| d.ty),
        Some(Type::type_of(Type::Int))
    );
}

#[test]
fn with_declarations_builder() {
    let env = empty_env().with_declarations(
        [IdentDecl::new("x", Type::Int)],
        [int_fn("g", "g_int")],
    );
    assert!(env.lookup_ident(&root(), "x").is_some());
    assert!(env.lookup_function(&root(), "g").is_some());
}
