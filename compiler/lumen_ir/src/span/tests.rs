use super::*;

#[test]
fn span_basic() {
    let span = Span::new(10, 20);
    assert_eq!(span.len(), 10);
    assert!(!span.is_empty());
    assert_eq!(span.to_range(), 10..20);
    assert!(Span::new(42, 42).is_empty());
}

#[test]
fn span_debug_display() {
    let span = Span::new(100, 200);
    assert_eq!(format!("{span:?}"), "100..200");
    assert_eq!(format!("{span}"), "100..200");
    assert_eq!(Span::default(), Span::DUMMY);
}
