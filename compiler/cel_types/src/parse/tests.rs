#![allow(clippy::unwrap_used)]

use super::*;
use pretty_assertions::assert_eq;

fn parse(s: &str) -> Type {
    s.parse().unwrap()
}

#[test]
fn primitives() {
    assert_eq!(parse("int"), Type::Int);
    assert_eq!(parse("uint"), Type::Uint);
    assert_eq!(parse("double"), Type::Double);
    assert_eq!(parse("bool"), Type::Bool);
    assert_eq!(parse("string"), Type::String);
    assert_eq!(parse("bytes"), Type::Bytes);
    assert_eq!(parse("null_type"), Type::Null);
    assert_eq!(parse("dyn"), Type::Dyn);
    assert_eq!(parse("!error!"), Type::Error);
    assert_eq!(parse("google.protobuf.Duration"), Type::Duration);
    assert_eq!(parse("google.protobuf.Timestamp"), Type::Timestamp);
}

#[test]
fn parametric() {
    assert_eq!(parse("list(T)"), Type::list(Type::param("T")));
    assert_eq!(
        parse("map(string, list(int))"),
        Type::map(Type::String, Type::list(Type::Int))
    );
    assert_eq!(parse("optional_type(V)"), Type::optional(Type::param("V")));
    assert_eq!(parse("type(int)"), Type::type_of(Type::Int));
    assert_eq!(parse("type"), Type::type_of(Type::Dyn));
}

#[test]
fn named_types() {
    assert_eq!(parse("google.expr.proto3.TestAllTypes"), Type::message("google.expr.proto3.TestAllTypes"));
    assert_eq!(parse("Msg"), Type::message("Msg"));
    assert_eq!(parse("vector(int)"), Type::opaque("vector", vec![Type::Int]));
    assert_eq!(parse("token()"), Type::opaque("token", vec![]));
}

#[test]
fn whitespace_is_ignored() {
    assert_eq!(parse("  map( K ,V )  "), Type::map(Type::param("K"), Type::param("V")));
}

#[test]
fn display_round_trips() {
    for text in [
        "int",
        "list(map(string, dyn))",
        "optional_type(list(T))",
        "type(type(dyn))",
        "pair(int, google.protobuf.Timestamp)",
        "map(!error!, null_type)",
        "a.b.Msg",
        "token()",
        "list(token())",
        "map(_key1_0, _A2)",
    ] {
        assert_eq!(parse(text).to_string(), text);
    }
}

#[test]
fn inference_variables_parse_as_params() {
    assert_eq!(parse("_var0"), Type::param("_var0"));
    assert_eq!(parse("list(_A3)"), Type::list(Type::param("_A3")));
    assert_eq!(parse("_pkg.Msg"), Type::message("_pkg.Msg"));
    assert_ne!(parse("token()"), parse("token"));
}

#[test]
fn errors() {
    assert_eq!("".parse::<Type>(), Err(ParseTypeError::Empty));
    assert_eq!(
        "list".parse::<Type>(),
        Err(ParseTypeError::Arity {
            name: "list".to_owned(),
            expected: 1,
            found: 0
        })
    );
    assert_eq!(
        "map(int)".parse::<Type>(),
        Err(ParseTypeError::Arity {
            name: "map".to_owned(),
            expected: 2,
            found: 1
        })
    );
    assert_eq!(
        "list(int".parse::<Type>(),
        Err(ParseTypeError::UnexpectedEnd {
            expected: "',' or ')'"
        })
    );
    assert_eq!(
        "int)".parse::<Type>(),
        Err(ParseTypeError::UnexpectedChar { found: ')', offset: 3 })
    );
    assert_eq!(
        "list(1)".parse::<Type>(),
        Err(ParseTypeError::UnexpectedChar { found: '1', offset: 5 })
    );
}
