//! Plain-text rendering.
//!
//! One line per diagnostic, followed by its notes:
//!
//! ```text
//! shader.wgsl:3:5 error[E1001]: unknown identifier `foo`
//!   = note: identifiers must be declared before use
//! ```

use std::fmt::Write;

use lumen_ir::Source;

use crate::{Diagnostic, DiagnosticList};

/// Render one diagnostic. Without a source the location is omitted.
pub fn render(diag: &Diagnostic, source: Option<&Source>) -> String {
    let mut out = String::new();
    write_diagnostic(&mut out, diag, source);
    out
}

/// Render a whole list in insertion order.
pub fn render_list(list: &DiagnosticList, source: Option<&Source>) -> String {
    let mut out = String::new();
    for diag in list {
        write_diagnostic(&mut out, diag, source);
    }
    out
}

fn write_diagnostic(out: &mut String, diag: &Diagnostic, source: Option<&Source>) {
    // Writing to a String never fails.
    if let Some(source) = source {
        let loc = source.location(diag.span.start);
        let _ = write!(out, "{}:{loc} ", source.name());
    }
    let _ = writeln!(out, "{diag}");
    for note in &diag.notes {
        let _ = writeln!(out, "  = note: {note}");
    }
}

#[cfg(test)]
mod tests;
