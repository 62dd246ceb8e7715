use lumen_ir::Span;
use pretty_assertions::assert_eq;

use super::*;
use crate::ErrorCode;

#[test]
fn render_with_source_location() {
    let source = Source::new("shader.wgsl", "fn main() {\n    foo = 1;\n}\n");
    let diag = Diagnostic::error(ErrorCode::E1001)
        .with_message("unknown identifier `foo`")
        .with_span(Span::new(16, 19))
        .with_note("identifiers must be declared before use");

    assert_eq!(
        render(&diag, Some(&source)),
        "shader.wgsl:2:5 error[E1001]: unknown identifier `foo`\n  = note: identifiers must be declared before use\n"
    );
}

#[test]
fn render_without_source() {
    let diag = Diagnostic::warning(ErrorCode::E1013).with_message("code is unreachable");
    assert_eq!(render(&diag, None), "warning[E1013]: code is unreachable\n");
}

#[test]
fn render_list_keeps_order() {
    let source = Source::new("a.wgsl", "x\ny\n");
    let mut list = DiagnosticList::new();
    list.push(
        Diagnostic::error(ErrorCode::E1001)
            .with_message("first")
            .with_span(Span::new(2, 3)),
    );
    list.push(
        Diagnostic::note(ErrorCode::E1012)
            .with_message("second")
            .with_span(Span::new(0, 1)),
    );
    assert_eq!(
        render_list(&list, Some(&source)),
        "a.wgsl:2:1 error[E1001]: first\na.wgsl:1:1 note[E1012]: second\n"
    );
}
