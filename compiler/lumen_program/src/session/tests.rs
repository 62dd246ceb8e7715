use lumen_diagnostic::CollectingReporter;

use super::*;

#[test]
fn default_session_has_no_reporter() {
    let session = Session::new();
    assert!(!session.ice().has_reporter());
    assert_eq!(session.rule_defaults(), RuleSeverities::default());
}

#[test]
fn builder_methods() {
    let reporter = CollectingReporter::new();
    let session = Session::new()
        .with_ice_reporter(reporter)
        .with_rule_severity(DiagnosticRule::UnreachableCode, RuleSeverity::Error);

    assert!(session.ice().has_reporter());
    assert_eq!(
        session.rule_defaults().get(DiagnosticRule::UnreachableCode),
        RuleSeverity::Error
    );
    // Clones share configuration.
    assert!(session.clone().ice().has_reporter());
}
