//! Compiler session.
//!
//! A `Session` holds the configuration shared by every program built from
//! it. It is passed to [`ProgramBuilder::new`](crate::ProgramBuilder::new)
//! so that components never reach for global state.

use std::sync::Arc;

use lumen_diagnostic::{DiagnosticRule, IceHandler, IceReporter, RuleSeverities, RuleSeverity};

/// Shared compiler configuration.
///
/// Cheap to clone; clones share the ICE reporter.
///
/// # Testing
///
/// ```text
/// let reporter = CollectingReporter::new();
/// let session = Session::new().with_ice_reporter(reporter.clone());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Session {
    ice: IceHandler,
    rule_defaults: RuleSeverities,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe internal compiler errors raised under this session.
    #[must_use]
    pub fn with_ice_reporter(mut self, reporter: Arc<dyn IceReporter>) -> Self {
        self.ice.set_reporter(reporter);
        self
    }

    /// Change the starting severity of a diagnostic rule.
    ///
    /// Source-level `diagnostic(...)` directives still override it.
    #[must_use]
    pub fn with_rule_severity(mut self, rule: DiagnosticRule, severity: RuleSeverity) -> Self {
        self.rule_defaults.set(rule, severity);
        self
    }

    pub fn ice(&self) -> &IceHandler {
        &self.ice
    }

    pub fn rule_defaults(&self) -> RuleSeverities {
        self.rule_defaults
    }
}

#[cfg(test)]
mod tests;
