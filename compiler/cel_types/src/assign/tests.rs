use super::*;
use pretty_assertions::assert_eq;

fn t(s: &str) -> Type {
    match s.parse() {
        Ok(ty) => ty,
        Err(err) => panic!("bad type {s:?}: {err}"),
    }
}

fn assignable_fresh(from: &str, to: &str) -> bool {
    is_assignable(&Substitution::new(), &t(from), &t(to)).is_some()
}

// ========================================
// Ground types
// ========================================

#[test]
fn numeric_types_are_distinct() {
    assert!(!assignable_fresh("int", "uint"));
    assert!(!assignable_fresh("uint", "double"));
    assert!(!assignable_fresh("double", "int"));
    assert!(assignable_fresh("int", "int"));
}

#[test]
fn wildcards_accept_everything() {
    for other in ["int", "list(string)", "a.B", "null_type", "type(int)"] {
        assert!(assignable_fresh("dyn", other));
        assert!(assignable_fresh(other, "dyn"));
        assert!(assignable_fresh("!error!", other));
        assert!(assignable_fresh(other, "google.protobuf.Any"));
    }
}

#[test]
fn null_goes_to_nullable_kinds_only() {
    for nullable in [
        "a.B",
        "google.protobuf.Duration",
        "google.protobuf.Timestamp",
        "vector(int)",
        "optional_type(int)",
    ] {
        assert!(assignable_fresh("null_type", nullable), "{nullable}");
        assert!(assignable_fresh(nullable, "null_type"), "{nullable}");
    }
    for other in ["int", "string", "bool", "list(int)", "map(int, int)"] {
        assert!(!assignable_fresh("null_type", other), "{other}");
        assert!(!assignable_fresh(other, "null_type"), "{other}");
    }
}

#[test]
fn type_values_are_mutually_assignable() {
    assert!(assignable_fresh("type(int)", "type(string)"));
    assert!(!assignable_fresh("type(int)", "int"));
}

#[test]
fn structs_compare_by_name() {
    assert!(assignable_fresh("a.B", "a.B"));
    assert!(!assignable_fresh("a.B", "a.C"));
}

#[test]
fn parametric_types_compare_names_and_params() {
    assert!(assignable_fresh("list(int)", "list(dyn)"));
    assert!(assignable_fresh("map(string, list(int))", "map(string, dyn)"));
    assert!(!assignable_fresh("list(int)", "list(string)"));
    assert!(!assignable_fresh("vector(int)", "matrix(int)"));
    assert!(!assignable_fresh("pair(int, int)", "pair(int)"));
    assert!(!assignable_fresh("list(int)", "optional_type(int)"));
}

// ========================================
// Type parameters
// ========================================

#[test]
fn binds_unbound_target_parameter() {
    let sub = is_assignable(&Substitution::new(), &Type::Int, &Type::param("T"));
    let sub = sub.unwrap_or_default();
    assert_eq!(sub.get("T"), Some(&Type::Int));
}

#[test]
fn binds_source_parameter_symmetrically() {
    let sub = is_assignable(&Substitution::new(), &t("list(T)"), &t("list(string)"));
    assert_eq!(sub.and_then(|s| s.get("T").cloned()), Some(Type::String));
}

#[test]
fn bound_parameter_rejects_incompatible_type() {
    let sub = is_assignable(&Substitution::new(), &Type::Int, &Type::param("T"));
    let Some(sub) = sub else {
        panic!("first binding failed");
    };
    assert!(is_assignable(&sub, &Type::Double, &Type::param("T")).is_none());
    assert!(is_assignable(&sub, &Type::Int, &Type::param("T")).is_some());
}

#[test]
fn bound_parameter_widens_to_dyn() {
    let Some(sub) = is_assignable(&Substitution::new(), &Type::Int, &Type::param("T")) else {
        panic!("first binding failed");
    };
    let Some(sub) = is_assignable(&sub, &Type::Dyn, &Type::param("T")) else {
        panic!("widening failed");
    };
    assert_eq!(sub.get("T"), Some(&Type::Dyn));
}

#[test]
fn same_parameter_on_both_sides_binds_nothing() {
    let sub = is_assignable(&Substitution::new(), &t("list(T)"), &t("list(T)"));
    assert_eq!(sub.map(|s| s.len()), Some(0));
}

#[test]
fn failure_leaves_input_untouched() {
    let sub = Substitution::new();
    let from = [Type::Int, Type::String];
    let to = [Type::param("T"), Type::Int];
    assert!(is_assignable_all(&sub, &from, &to).is_none());
    assert!(sub.is_empty());
}

#[test]
fn pairwise_lists_share_bindings() {
    let sub = is_assignable_all(
        &Substitution::new(),
        &[Type::Int, Type::Int],
        &[Type::param("T"), Type::param("T")],
    );
    assert!(sub.is_some());
    let sub = is_assignable_all(
        &Substitution::new(),
        &[Type::Int, Type::String],
        &[Type::param("T"), Type::param("T")],
    );
    assert!(sub.is_none());
    assert!(is_assignable_all(&Substitution::new(), &[Type::Int], &[]).is_none());
}

#[test]
fn occurs_check_rejects_self_reference() {
    assert!(!assignable_fresh("list(T)", "T"));
    assert!(!assignable_fresh("T", "map(string, T)"));
}

#[test]
fn occurs_check_follows_bindings() {
    let Some(sub) = is_assignable(&Substitution::new(), &t("list(P)"), &Type::param("Q")) else {
        panic!("binding Q failed");
    };
    assert!(is_assignable(&sub, &Type::param("Q"), &Type::param("P")).is_none());
    assert!(is_assignable(&sub, &Type::param("P"), &Type::param("Q")).is_none());
}

#[test]
fn specialize_and_finalize() {
    let Some(sub) = is_assignable(&Substitution::new(), &t("list(int)"), &Type::param("A")) else {
        panic!("binding failed");
    };
    let ty = t("map(A, B)");
    assert_eq!(sub.specialize(&ty), t("map(list(int), B)"));
    assert_eq!(sub.finalize(&ty), t("map(list(int), dyn)"));
}

// ========================================
// Most general
// ========================================

#[test]
fn most_general_prefers_wildcards_and_params() {
    assert_eq!(most_general(&Type::Int, &Type::Dyn), Type::Dyn);
    assert_eq!(most_general(&Type::Dyn, &Type::Int), Type::Dyn);
    assert_eq!(most_general(&Type::param("T"), &Type::Int), Type::param("T"));
    assert_eq!(most_general(&t("list(int)"), &t("list(dyn)")), t("list(dyn)"));
    assert_eq!(most_general(&t("map(int, dyn)"), &t("map(int, int)")), t("map(int, dyn)"));
    assert_eq!(most_general(&Type::Int, &Type::Int), Type::Int);
}

#[test]
fn less_specific_requires_same_shape() {
    assert!(!is_equal_or_less_specific(&Type::Int, &Type::Uint));
    assert!(!is_equal_or_less_specific(&t("vector(int)"), &t("matrix(int)")));
    assert!(is_equal_or_less_specific(&t("type(int)"), &t("type(string)")));
}

// ========================================
// Properties
// ========================================

mod properties {
    use super::super::*;
    use proptest::prelude::*;

    fn ground_leaf() -> impl Strategy<Value = Type> {
        prop_oneof![
            Just(Type::Dyn),
            Just(Type::Error),
            Just(Type::Null),
            Just(Type::Bool),
            Just(Type::Int),
            Just(Type::Uint),
            Just(Type::Double),
            Just(Type::String),
            Just(Type::Bytes),
            Just(Type::Duration),
            Just(Type::Timestamp),
            "[a-c]\\.[A-C]".prop_map(Type::Struct),
        ]
    }

    fn any_leaf() -> impl Strategy<Value = Type> {
        prop_oneof![4 => ground_leaf(), 1 => "[P-S]".prop_map(Type::TypeParam)]
    }

    fn nested(leaf: impl Strategy<Value = Type> + 'static) -> impl Strategy<Value = Type> {
        leaf.prop_recursive(4, 24, 3, |inner| {
            prop_oneof![
                inner.clone().prop_map(Type::list),
                (inner.clone(), inner.clone()).prop_map(|(k, v)| Type::map(k, v)),
                inner.clone().prop_map(Type::optional),
                inner.clone().prop_map(Type::type_of),
                prop::collection::vec(inner, 0..3).prop_map(|ps| Type::opaque("vec", ps)),
            ]
        })
    }

    fn any_type() -> impl Strategy<Value = Type> {
        nested(any_leaf())
    }

    fn ground_type() -> impl Strategy<Value = Type> {
        nested(ground_leaf())
    }

    /// Replace the nodes selected by `mask` (pre-order) with `dyn`.
    fn generalize(ty: &Type, mask: &mut impl Iterator<Item = bool>) -> Type {
        if mask.next().unwrap_or(false) {
            return Type::Dyn;
        }
        match ty {
            Type::List(e) => Type::list(generalize(e, mask)),
            Type::Map(k, v) => {
                let k = generalize(k, mask);
                Type::map(k, generalize(v, mask))
            }
            Type::Optional(e) => Type::optional(generalize(e, mask)),
            Type::TypeOf(e) => Type::type_of(generalize(e, mask)),
            Type::Opaque { name, params } => Type::opaque(
                name.clone(),
                params.iter().map(|p| generalize(p, mask)).collect(),
            ),
            _ => ty.clone(),
        }
    }

    proptest! {
        #[test]
        fn reflexive(ty in any_type()) {
            prop_assert!(is_assignable(&Substitution::new(), &ty, &ty).is_some());
        }

        #[test]
        fn dyn_is_wildcard(ty in any_type()) {
            prop_assert!(is_assignable(&Substitution::new(), &Type::Dyn, &ty).is_some());
            prop_assert!(is_assignable(&Substitution::new(), &ty, &Type::Dyn).is_some());
        }

        #[test]
        fn most_general_is_less_specific_than_both(
            ty in ground_type(),
            mask in prop::collection::vec(prop::bool::weighted(0.2), 0..32),
        ) {
            let general = generalize(&ty, &mut mask.into_iter());
            prop_assert!(is_assignable(&Substitution::new(), &ty, &general).is_some());
            for (a, b) in [(&ty, &general), (&general, &ty)] {
                let mg = most_general(a, b);
                prop_assert!(is_equal_or_less_specific(&mg, a), "{mg} vs {a}");
                prop_assert!(is_equal_or_less_specific(&mg, b), "{mg} vs {b}");
            }
        }

        #[test]
        fn occurs_check_never_binds_self(inner in any_type(), shape in 0u8..4) {
            let p = Type::param("P");
            let containing = match shape {
                0 => Type::list(p.clone()),
                1 => Type::map(inner, p.clone()),
                2 => Type::optional(Type::map(p.clone(), inner)),
                _ => Type::opaque("vec", vec![inner, Type::list(p.clone())]),
            };
            prop_assert!(is_assignable(&Substitution::new(), &containing, &p).is_none());
            prop_assert!(is_assignable(&Substitution::new(), &p, &containing).is_none());
        }

        #[test]
        fn finalize_leaves_no_type_params(
            pairs in prop::collection::vec((any_type(), any_type()), 0..6),
            probe in any_type(),
        ) {
            let mut sub = Substitution::new();
            for (from, to) in &pairs {
                if let Some(next) = is_assignable(&sub, from, to) {
                    sub = next;
                }
            }
            let finalized = sub.finalize(&sub.specialize(&probe));
            prop_assert!(!finalized.has_type_params(), "{finalized}");
        }

        #[test]
        fn deterministic(from in any_type(), to in any_type()) {
            let first = is_assignable(&Substitution::new(), &from, &to);
            let second = is_assignable(&Substitution::new(), &from, &to);
            prop_assert_eq!(first, second);
        }
    }
}
