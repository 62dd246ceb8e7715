//! Append-only diagnostic lists.

use crate::{Diagnostic, ErrorGuaranteed, Severity};

/// Ordered, append-only collection of diagnostics.
///
/// Programs and printers each own one. The error count only ever grows, so
/// `contains_errors` is monotonic.
#[derive(Clone, Default, Debug, Eq, PartialEq)]
pub struct DiagnosticList {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
}

impl DiagnosticList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic of any severity.
    pub fn push(&mut self, diag: Diagnostic) {
        if diag.is_error() {
            self.error_count += 1;
        }
        tracing::trace!(code = %diag.code, severity = %diag.severity, "diagnostic recorded");
        self.diagnostics.push(diag);
    }

    /// Record an error and get proof that it was recorded.
    ///
    /// The diagnostic's severity is forced to `Error`.
    pub fn emit_error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        self.push(diag.with_severity(Severity::Error));
        ErrorGuaranteed::new()
    }

    /// Append every diagnostic of `other`, in order.
    pub fn extend(&mut self, other: DiagnosticList) {
        for diag in other.diagnostics {
            self.push(diag);
        }
    }

    pub fn contains_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Proof that errors were recorded, if any were.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_warning()).count()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Iterate only the error-severity entries.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }
}

impl<'a> IntoIterator for &'a DiagnosticList {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

#[cfg(test)]
mod tests;
