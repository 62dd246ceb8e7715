use std::panic::{catch_unwind, AssertUnwindSafe};

use super::*;

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else {
        String::new()
    }
}

#[test]
fn display_format() {
    let ice = InternalCompilerError::new("pool.rs", 42, "bad width");
    assert_eq!(ice.to_string(), "pool.rs:42 internal compiler error: bad width");
}

#[test]
fn raise_reports_then_panics() {
    let reporter = CollectingReporter::new();
    let handler = IceHandler::with_reporter(reporter.clone());

    let result = catch_unwind(AssertUnwindSafe(|| {
        crate::ice!(handler, "unexpected {}", "node");
    }));

    let payload = result.expect_err("ice! must panic");
    assert!(panic_message(payload.as_ref()).contains("internal compiler error"));
    let messages = reporter.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("internal compiler error: unexpected node"));
    assert!(messages[0].contains("ice/tests.rs") || messages[0].contains("ice\\tests.rs"));
}

#[test]
fn raise_without_reporter_still_panics() {
    let handler = IceHandler::new();
    let result = catch_unwind(AssertUnwindSafe(|| {
        crate::ice!(handler, "boom");
    }));
    assert!(result.is_err());
}

#[test]
fn ice_assert_passes_when_condition_holds() {
    let reporter = CollectingReporter::new();
    let handler = IceHandler::with_reporter(reporter.clone());
    crate::ice_assert!(handler, 1 + 1 == 2, "math is broken");
    assert!(reporter.is_empty());
}

#[test]
fn set_reporter_replaces_without_chaining() {
    let first = CollectingReporter::new();
    let second = CollectingReporter::new();
    let mut handler = IceHandler::with_reporter(first.clone());
    handler.set_reporter(second.clone());

    let _ = catch_unwind(AssertUnwindSafe(|| {
        crate::ice!(handler, "once");
    }));

    assert!(first.is_empty());
    assert_eq!(second.len(), 1);
}

#[test]
fn clear_reporter_removes_it() {
    let reporter = CollectingReporter::new();
    let mut handler = IceHandler::with_reporter(reporter.clone());
    handler.clear_reporter();
    assert!(!handler.has_reporter());

    let _ = catch_unwind(AssertUnwindSafe(|| {
        crate::ice!(handler, "unobserved");
    }));
    assert!(reporter.is_empty());
}

#[test]
fn closures_are_reporters() {
    let seen = Arc::new(Mutex::new(None::<u32>));
    let sink = Arc::clone(&seen);
    let handler = IceHandler::with_reporter(Arc::new(move |e: &InternalCompilerError| {
        *sink.lock() = Some(e.line);
    }));

    let _ = catch_unwind(AssertUnwindSafe(|| {
        crate::ice!(handler, "closure");
    }));
    assert!(seen.lock().is_some());
}
