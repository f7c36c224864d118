use super::*;

#[test]
fn display_matches_as_str() {
    assert_eq!(ErrorCode::E2004.to_string(), "E2004");
    assert_eq!(ErrorCode::E2103.to_string(), ErrorCode::E2103.as_str());
}

#[test]
fn declaration_codes() {
    assert!(ErrorCode::E2101.is_declaration_error());
    assert!(ErrorCode::E2102.is_declaration_error());
    assert!(!ErrorCode::E2001.is_declaration_error());
}

#[test]
fn descriptions_are_distinct() {
    let codes = [
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E2007,
        ErrorCode::E2008,
        ErrorCode::E2009,
        ErrorCode::E2010,
        ErrorCode::E2011,
        ErrorCode::E2101,
        ErrorCode::E2102,
        ErrorCode::E2103,
    ];
    let mut seen = std::collections::HashSet::new();
    for code in codes {
        assert!(seen.insert(code.description()), "duplicate for {code}");
    }
}
