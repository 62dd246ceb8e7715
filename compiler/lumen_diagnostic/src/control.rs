//! Diagnostic rules and the controls that adjust them.
//!
//! A `diagnostic(<severity>, <rule>)` directive or attribute changes how a
//! rule-governed diagnostic is reported inside its scope.

use std::fmt;

use lumen_ir::{Span, Symbol};

use crate::{IceHandler, Severity};

/// Severity a diagnostic control assigns to a rule.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum RuleSeverity {
    Error,
    Warning,
    Info,
    Off,
}

impl RuleSeverity {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "error" => Some(RuleSeverity::Error),
            "warning" => Some(RuleSeverity::Warning),
            "info" => Some(RuleSeverity::Info),
            "off" => Some(RuleSeverity::Off),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            RuleSeverity::Error => "error",
            RuleSeverity::Warning => "warning",
            RuleSeverity::Info => "info",
            RuleSeverity::Off => "off",
        }
    }

    /// Diagnostic severity to report with, or `None` when silenced.
    pub const fn to_severity(self) -> Option<Severity> {
        match self {
            RuleSeverity::Error => Some(Severity::Error),
            RuleSeverity::Warning => Some(Severity::Warning),
            RuleSeverity::Info => Some(Severity::Note),
            RuleSeverity::Off => None,
        }
    }
}

impl fmt::Display for RuleSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rules that diagnostic controls can target.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DiagnosticRule {
    DerivativeUniformity,
    UnreachableCode,
}

impl DiagnosticRule {
    pub const ALL: [DiagnosticRule; 2] = [
        DiagnosticRule::DerivativeUniformity,
        DiagnosticRule::UnreachableCode,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "derivative_uniformity" => Some(DiagnosticRule::DerivativeUniformity),
            "unreachable_code" => Some(DiagnosticRule::UnreachableCode),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            DiagnosticRule::DerivativeUniformity => "derivative_uniformity",
            DiagnosticRule::UnreachableCode => "unreachable_code",
        }
    }

    pub const fn default_severity(self) -> RuleSeverity {
        match self {
            DiagnosticRule::DerivativeUniformity => RuleSeverity::Error,
            DiagnosticRule::UnreachableCode => RuleSeverity::Warning,
        }
    }
}

impl fmt::Display for DiagnosticRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effective severity of every rule at some point in the program.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct RuleSeverities {
    derivative_uniformity: RuleSeverity,
    unreachable_code: RuleSeverity,
}

impl Default for RuleSeverities {
    fn default() -> Self {
        RuleSeverities {
            derivative_uniformity: DiagnosticRule::DerivativeUniformity.default_severity(),
            unreachable_code: DiagnosticRule::UnreachableCode.default_severity(),
        }
    }
}

impl RuleSeverities {
    pub fn get(&self, rule: DiagnosticRule) -> RuleSeverity {
        match rule {
            DiagnosticRule::DerivativeUniformity => self.derivative_uniformity,
            DiagnosticRule::UnreachableCode => self.unreachable_code,
        }
    }

    pub fn set(&mut self, rule: DiagnosticRule, severity: RuleSeverity) {
        match rule {
            DiagnosticRule::DerivativeUniformity => self.derivative_uniformity = severity,
            DiagnosticRule::UnreachableCode => self.unreachable_code = severity,
        }
    }

    /// Copy with one rule overridden.
    #[must_use]
    pub fn with(mut self, rule: DiagnosticRule, severity: RuleSeverity) -> Self {
        self.set(rule, severity);
        self
    }
}

/// One `diagnostic(severity, rule)` control.
///
/// The rule is kept as a symbol. Whether it names a known rule is a question
/// for semantic analysis, which warns about unknown names.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct DiagnosticControl {
    pub severity: RuleSeverity,
    pub rule_name: Symbol,
    pub span: Span,
}

impl DiagnosticControl {
    /// Create a control.
    ///
    /// A null rule name is an internal compiler error: the parser never
    /// produces a control without a rule.
    pub fn new(ice: &IceHandler, severity: RuleSeverity, rule_name: Symbol, span: Span) -> Self {
        crate::ice_assert!(
            ice,
            rule_name.is_valid(),
            "diagnostic control must name a rule"
        );
        DiagnosticControl {
            severity,
            rule_name,
            span,
        }
    }
}
