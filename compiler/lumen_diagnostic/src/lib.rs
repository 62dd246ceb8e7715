//! Diagnostic system for the Lumen shader compiler.
//!
//! Two failure channels live here:
//!
//! - **Diagnostics**: recoverable, source-attributed messages with a
//!   severity and an error code. Analysis keeps going after one is recorded,
//!   so a single pass reports as many problems as it can find.
//! - **Internal compiler errors**: violated internal invariants. These are
//!   fatal. An [`IceHandler`] carried by the compiler session lets a test
//!   harness observe the message before the panic unwinds.
//!
//! # Error Guarantees
//!
//! The `ErrorGuaranteed` type is type-level proof that at least one error
//! was recorded. Emission functions return `Result<_, ErrorGuaranteed>` so
//! that a failure can never be silent.
//!
//! ```text
//! let guarantee = list.emit_error(diagnostic);
//! fn emit_stmt(..) -> Result<(), ErrorGuaranteed> { ... }
//! ```

mod control;
mod diagnostic;
mod error_code;
mod guarantee;
mod ice;
mod list;
pub mod render;

pub use control::{DiagnosticControl, DiagnosticRule, RuleSeverities, RuleSeverity};
pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use ice::{CollectingReporter, IceHandler, IceReporter, InternalCompilerError};
pub use list::DiagnosticList;
