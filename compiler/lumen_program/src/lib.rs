//! Programs for the Lumen shader compiler.
//!
//! A [`Program`] is one generation's symbols, types, AST and diagnostics,
//! resolved and read-only. It is produced by a [`ProgramBuilder`]: an
//! external parser (or a test) builds the AST through the builder, then
//! `build()` runs semantic analysis.
//!
//! # Phases
//!
//! ```text
//! ProgramBuilder ──build()──> resolver ──> Program ──> backends
//!        ^                                   │
//!        └──────── CloneContext <────────────┘
//! ```
//!
//! Transforms never mutate a program. They clone it into a fresh builder
//! through a [`CloneContext`], rewriting on the way.

mod builder;
mod clone;
mod program;
mod resolver;
mod sem;
mod session;
pub mod transform;

#[cfg(test)]
mod test_helpers;

use std::sync::Once;

pub use builder::{FunctionSig, ProgramBuilder};
pub use clone::CloneContext;
pub use program::Program;
pub use resolver::BuiltinFn;
pub use sem::{CallTarget, EntryPoint, MemberAccess, Sem};
pub use session::Session;

static TRACING_INIT: Once = Once::new();

/// Install a tracing subscriber for compiler diagnostics.
///
/// Does nothing unless `RUST_LOG` is set. With `LUMEN_LOG_TREE` also set,
/// spans are printed as an indented tree instead of flat lines. Safe to
/// call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        // Another subscriber may already be installed by the host.
        if std::env::var("LUMEN_LOG_TREE").is_ok() {
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true),
                )
                .try_init();
        } else {
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(true).with_level(true))
                .try_init();
        }
    });
}
