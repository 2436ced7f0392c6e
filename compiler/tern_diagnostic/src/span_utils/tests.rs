use super::*;

#[test]
fn test_line_lookup() {
    let source = "a\nbc\n\ndef";
    let table = LineOffsetTable::build(source);
    assert_eq!(table.line_count(), 4);
    assert_eq!(table.line_from_offset(0), 1);
    assert_eq!(table.line_from_offset(2), 2);
    assert_eq!(table.line_from_offset(4), 2);
    assert_eq!(table.line_from_offset(5), 3);
    assert_eq!(table.line_from_offset(8), 4);
}

#[test]
fn test_columns_count_chars() {
    let source = "val π = 3";
    let table = LineOffsetTable::build(source);
    // 'π' is two bytes; '=' sits at byte 7, char column 7.
    assert_eq!(table.offset_to_line_col(source, 7), (1, 7));
}

#[test]
fn test_line_text() {
    let source = "first\r\nsecond\nthird";
    let table = LineOffsetTable::build(source);
    assert_eq!(table.line_text(source, 1), Some("first"));
    assert_eq!(table.line_text(source, 2), Some("second"));
    assert_eq!(table.line_text(source, 3), Some("third"));
    assert_eq!(table.line_text(source, 4), None);
    assert_eq!(table.line_text(source, 0), None);
}

#[test]
fn test_offset_past_end_clamps() {
    let source = "ab";
    let table = LineOffsetTable::build(source);
    assert_eq!(table.offset_to_line_col(source, 10), (1, 3));
}
