//! Internal compiler errors.
//!
//! An ICE signals that the compiler itself is broken: an exhaustive dispatch
//! fell through, a required argument was null, a construction precondition
//! did not hold. ICEs are never recoverable. Raising one calls the session's
//! reporter (if any) synchronously, logs the error, then panics.
//!
//! The reporter lives in an [`IceHandler`] that the compiler session hands
//! to every component that can raise, so tests install a capturing reporter
//! on their own session without touching process-wide state.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// A violated internal invariant.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct InternalCompilerError {
    pub file: &'static str,
    pub line: u32,
    pub message: String,
}

impl InternalCompilerError {
    pub fn new(file: &'static str, line: u32, message: impl Into<String>) -> Self {
        InternalCompilerError {
            file,
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for InternalCompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} internal compiler error: {}",
            self.file, self.line, self.message
        )
    }
}

impl std::error::Error for InternalCompilerError {}

/// Observer invoked before an ICE unwinds.
pub trait IceReporter: Send + Sync {
    fn report(&self, error: &InternalCompilerError);
}

impl<F> IceReporter for F
where
    F: Fn(&InternalCompilerError) + Send + Sync,
{
    fn report(&self, error: &InternalCompilerError) {
        self(error);
    }
}

/// Raises ICEs, optionally notifying one reporter first.
///
/// Cloning shares the reporter. The default handler has no reporter.
#[derive(Clone, Default)]
pub struct IceHandler {
    reporter: Option<Arc<dyn IceReporter>>,
}

impl IceHandler {
    /// A handler with no reporter.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reporter(reporter: Arc<dyn IceReporter>) -> Self {
        IceHandler {
            reporter: Some(reporter),
        }
    }

    /// Install `reporter`, replacing any previous one.
    pub fn set_reporter(&mut self, reporter: Arc<dyn IceReporter>) {
        self.reporter = Some(reporter);
    }

    pub fn clear_reporter(&mut self) {
        self.reporter = None;
    }

    pub fn has_reporter(&self) -> bool {
        self.reporter.is_some()
    }

    /// Report `error` and abort the current operation.
    ///
    /// # Panics
    /// Always. The panic payload is the formatted error.
    #[cold]
    #[inline(never)]
    #[track_caller]
    pub fn raise(&self, error: InternalCompilerError) -> ! {
        if let Some(reporter) = &self.reporter {
            reporter.report(&error);
        }
        tracing::error!(file = error.file, line = error.line, "{}", error.message);
        panic!("{error}")
    }
}

impl fmt::Debug for IceHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IceHandler")
            .field("has_reporter", &self.has_reporter())
            .finish()
    }
}

/// Reporter that keeps every ICE it sees. Meant for tests.
#[derive(Default, Debug)]
pub struct CollectingReporter {
    errors: Mutex<Vec<InternalCompilerError>>,
}

impl CollectingReporter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Formatted messages, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.errors.lock().iter().map(ToString::to_string).collect()
    }

    pub fn errors(&self) -> Vec<InternalCompilerError> {
        self.errors.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.errors.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.lock().is_empty()
    }
}

impl IceReporter for CollectingReporter {
    fn report(&self, error: &InternalCompilerError) {
        self.errors.lock().push(error.clone());
    }
}

/// Raise an internal compiler error through an [`IceHandler`].
///
/// ```text
/// ice!(handler, "unknown type id {}", id.raw());
/// ```
#[macro_export]
macro_rules! ice {
    ($handler:expr, $($arg:tt)+) => {
        $handler.raise($crate::InternalCompilerError::new(
            file!(),
            line!(),
            format!($($arg)+),
        ))
    };
}

/// Raise an internal compiler error unless `cond` holds.
#[macro_export]
macro_rules! ice_assert {
    ($handler:expr, $cond:expr, $($arg:tt)+) => {
        if !$cond {
            $crate::ice!($handler, $($arg)+);
        }
    };
}

#[cfg(test)]
mod tests;
