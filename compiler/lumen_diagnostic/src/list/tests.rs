use super::*;
use crate::ErrorCode;

#[test]
fn empty_list_has_no_errors() {
    let list = DiagnosticList::new();
    assert!(list.is_empty());
    assert!(!list.contains_errors());
    assert!(list.has_errors().is_none());
}

#[test]
fn warnings_do_not_count_as_errors() {
    let mut list = DiagnosticList::new();
    list.push(Diagnostic::warning(ErrorCode::E1013).with_message("unreachable"));
    list.push(Diagnostic::note(ErrorCode::E1012).with_message("fyi"));

    assert_eq!(list.len(), 2);
    assert_eq!(list.warning_count(), 1);
    assert!(!list.contains_errors());
}

#[test]
fn error_count_is_monotonic() {
    let mut list = DiagnosticList::new();
    let _ = list.emit_error(Diagnostic::warning(ErrorCode::E1001));
    assert!(list.contains_errors());
    list.push(Diagnostic::warning(ErrorCode::E1013));
    assert!(list.contains_errors());
    assert_eq!(list.error_count(), 1);
    assert_eq!(list.errors().count(), 1);
}

#[test]
fn insertion_order_is_preserved() {
    let mut list = DiagnosticList::new();
    list.push(Diagnostic::error(ErrorCode::E1001).with_message("first"));
    list.push(Diagnostic::warning(ErrorCode::E1013).with_message("second"));

    let mut other = DiagnosticList::new();
    other.push(Diagnostic::error(ErrorCode::E2001).with_message("third"));
    list.extend(other);

    let messages: Vec<&str> = list.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, ["first", "second", "third"]);
    assert_eq!(list.error_count(), 2);
}
