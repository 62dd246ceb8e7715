use super::*;

#[test]
fn location_of_first_byte() {
    let source = Source::new("shader.wgsl", "fn main() {}\n");
    assert_eq!(source.location(0), Location { line: 1, column: 1 });
}

#[test]
fn location_on_later_lines() {
    let source = Source::new("shader.wgsl", "var a : f32;\nvar b : i32;\n  b = 1;\n");
    // `b` of `var b`
    assert_eq!(source.location(17), Location { line: 2, column: 5 });
    // first non-space of line 3
    assert_eq!(source.location(28), Location { line: 3, column: 3 });
    assert_eq!(source.line_count(), 4);
}

#[test]
fn location_at_line_start_is_column_one() {
    let source = Source::new("a", "x\ny\n");
    assert_eq!(source.location(2), Location { line: 2, column: 1 });
}

#[test]
fn snippet_returns_covered_text() {
    let source = Source::new("a", "let lhs = rhs;");
    assert_eq!(source.snippet(Span::new(4, 7)), Some("lhs"));
    assert_eq!(source.snippet(Span::new(4, 99)), None);
}

#[test]
fn location_display() {
    assert_eq!(Location { line: 3, column: 9 }.to_string(), "3:9");
}
