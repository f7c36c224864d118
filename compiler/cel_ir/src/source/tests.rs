#![allow(clippy::unwrap_used)]

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn line_table_single_line() {
    let table = LineOffsetTable::build("x + 1");
    assert_eq!(table.line_of(0), 1);
    assert_eq!(table.position(Some("x + 1"), 4), Position { line: 1, column: 5 });
}

#[test]
fn line_table_multi_line() {
    let text = "a &&\nb ||\n  c";
    let table = LineOffsetTable::build(text);
    assert_eq!(table.line_of(0), 1);
    assert_eq!(table.line_of(5), 2);
    assert_eq!(table.position(Some(text), 12), Position { line: 3, column: 3 });
}

#[test]
fn columns_count_characters() {
    let text = "'héllo' + x";
    let table = LineOffsetTable::build(text);
    let offset = u32::try_from(text.find('x').unwrap()).unwrap();
    assert_eq!(table.position(Some(text), offset).column, 11);
}

#[test]
fn source_info_positions() {
    let info = SourceInfo::new("<input>", "y + 1")
        .with_offset(ExprId::new(1), 0)
        .with_offset(ExprId::new(3), 4);
    assert_eq!(info.position(ExprId::new(1)), Some(Position { line: 1, column: 1 }));
    assert_eq!(info.position(ExprId::new(3)), Some(Position { line: 1, column: 5 }));
    assert_eq!(info.position(ExprId::new(2)), None);
}

#[test]
fn line_text_strips_newline() {
    let info = SourceInfo::new("<input>", "first\nsecond");
    assert_eq!(info.line_text(1), Some("first"));
    assert_eq!(info.line_text(2), Some("second"));
    assert_eq!(info.line_text(3), None);
}

#[test]
fn detached_source_has_no_text() {
    let info = SourceInfo::detached("expr.cel").with_offset(ExprId::new(7), 3);
    assert_eq!(info.description(), "expr.cel");
    assert_eq!(info.text(), None);
    assert_eq!(info.position(ExprId::new(7)), Some(Position { line: 1, column: 4 }));
}
