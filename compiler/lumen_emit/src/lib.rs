//! Backend printers for the Lumen shader compiler.
//!
//! Each target dialect is one [`Printer`] implementation over a resolved
//! [`Program`]. [`generate`] is the entry point: it refuses invalid
//! programs, renames identifiers the target reserves, then prints.
//!
//! ```text
//! Program ──> Renamer (HLSL/GLSL) ──> Printer ──> TextGenerator ──> String
//! ```
//!
//! Emission problems never touch the program. They are collected on the
//! printer's [`TextGenerator`] and returned with the text.

mod c_like;
mod glsl;
mod hlsl;
mod printer;
mod text;
mod wgsl;

#[cfg(test)]
mod test_helpers;

use std::fmt;

use lumen_diagnostic::{ice, DiagnosticList};
use lumen_program::transform::{Manager, Renamer, TransformError};
use lumen_program::Program;
use rayon::prelude::*;
use thiserror::Error;

pub use glsl::GlslPrinter;
pub use hlsl::HlslPrinter;
pub use printer::{EmitResult, Printer, PrinterContext};
pub use text::{TextGenerator, INDENT_WIDTH};
pub use wgsl::WgslPrinter;

/// Output dialect.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Target {
    #[default]
    Wgsl,
    Hlsl,
    Glsl,
}

impl Target {
    pub const fn as_str(self) -> &'static str {
        match self {
            Target::Wgsl => "WGSL",
            Target::Hlsl => "HLSL",
            Target::Glsl => "GLSL",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct GeneratorOptions {
    pub target: Target,
    /// Emit only this entry point. Other entry point functions are left out.
    pub entry_point: Option<String>,
}

impl GeneratorOptions {
    pub fn new(target: Target) -> Self {
        GeneratorOptions {
            target,
            entry_point: None,
        }
    }

    #[must_use]
    pub fn with_entry_point(mut self, name: impl Into<String>) -> Self {
        self.entry_point = Some(name.into());
        self
    }
}

/// Generated text and any non-error diagnostics raised while printing.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct GeneratorOutput {
    pub text: String,
    pub diagnostics: DiagnosticList,
}

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("cannot generate {target} from a program with {errors} error(s)")]
    InvalidProgram { target: Target, errors: usize },
    #[error("entry point `{name}` not found")]
    EntryPointNotFound { name: String },
    #[error(transparent)]
    Transform(#[from] TransformError),
    /// Printing reported errors. The text emitted around them is kept.
    #[error("{target} generation failed with {errors} error(s)")]
    Emission {
        target: Target,
        errors: usize,
        partial: String,
        diagnostics: DiagnosticList,
    },
}

/// Print `program` in the dialect selected by `options`.
#[tracing::instrument(level = "debug", skip_all, fields(target = %options.target))]
pub fn generate(program: &Program, options: &GeneratorOptions) -> Result<GeneratorOutput, EmitError> {
    let target = options.target;
    if !program.is_valid() {
        return Err(EmitError::InvalidProgram {
            target,
            errors: program.diagnostics().error_count(),
        });
    }

    // Renaming keeps entry point order, so the index survives it.
    let entry_index = match &options.entry_point {
        Some(name) => Some(
            program
                .entry_points()
                .iter()
                .position(|entry| program.name(entry.name) == name)
                .ok_or_else(|| EmitError::EntryPointNotFound { name: name.clone() })?,
        ),
        None => None,
    };

    let renamed;
    let program = match target {
        Target::Wgsl => program,
        Target::Hlsl => {
            renamed = Manager::new().with(Renamer::hlsl()).run(program)?;
            &renamed
        }
        Target::Glsl => {
            renamed = Manager::new().with(Renamer::glsl()).run(program)?;
            &renamed
        }
    };

    let mut cx = PrinterContext::new(program, target);
    if let Some(index) = entry_index {
        let Some(entry) = program.entry_points().get(index) else {
            ice!(program.session().ice(), "entry point {index} lost while renaming");
        };
        cx = cx.with_entry_point(entry.decl);
    }

    let (result, cx) = match target {
        Target::Wgsl => run_printer(WgslPrinter::new(cx), WgslPrinter::into_context),
        Target::Hlsl => run_printer(HlslPrinter::new(cx), HlslPrinter::into_context),
        Target::Glsl => run_printer(GlslPrinter::new(cx), GlslPrinter::into_context),
    };
    let (text, diagnostics) = cx.finish();
    tracing::debug!(bytes = text.len(), errors = diagnostics.error_count(), "generated");

    match result {
        Ok(()) => Ok(GeneratorOutput { text, diagnostics }),
        Err(_) => Err(EmitError::Emission {
            target,
            errors: diagnostics.error_count(),
            partial: text,
            diagnostics,
        }),
    }
}

/// [`generate`] for independent programs, in parallel. Results keep the
/// order of `programs`.
pub fn generate_many(programs: &[Program], options: &GeneratorOptions) -> Vec<Result<GeneratorOutput, EmitError>> {
    programs.par_iter().map(|program| generate(program, options)).collect()
}

fn run_printer<'p, P: Printer<'p>>(
    mut printer: P,
    into_context: fn(P) -> PrinterContext<'p>,
) -> (EmitResult, PrinterContext<'p>) {
    let result = printer.emit_program();
    (result, into_context(printer))
}
