//! Proof that an error was recorded.

use std::fmt;

/// Zero-sized proof that at least one error diagnostic was recorded.
///
/// Only [`DiagnosticList::emit_error`](crate::DiagnosticList::emit_error)
/// and [`ErrorGuaranteed::from_error_count`] hand these out.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ErrorGuaranteed(());

impl ErrorGuaranteed {
    pub(crate) const fn new() -> Self {
        ErrorGuaranteed(())
    }

    /// Proof for a non-zero error count.
    pub fn from_error_count(count: usize) -> Option<Self> {
        (count > 0).then(Self::new)
    }
}

impl fmt::Display for ErrorGuaranteed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error(s) emitted")
    }
}

impl std::error::Error for ErrorGuaranteed {}
