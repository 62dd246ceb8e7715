//! Program-to-program transforms.
//!
//! A transform never mutates its input. It clones the program into a fresh
//! [`ProgramBuilder`](crate::ProgramBuilder) through a
//! [`CloneContext`](crate::CloneContext), rewriting on the way, and the
//! result is resolved again.

mod renamer;

use thiserror::Error;

use crate::Program;

pub use renamer::Renamer;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum TransformError {
    /// The input program carries error diagnostics.
    #[error("transform `{name}` refused an invalid program")]
    InvalidProgram { name: &'static str },
    /// The transform produced a program that no longer resolves.
    #[error("transform `{name}` produced an invalid program: {diagnostics}")]
    Failed { name: &'static str, diagnostics: String },
}

pub trait Transform: Send + Sync {
    /// Short name for logs and errors.
    fn name(&self) -> &'static str;

    fn run(&self, program: &Program) -> Result<Program, TransformError>;
}

/// Runs a sequence of transforms, feeding each one's output to the next.
#[derive(Default)]
pub struct Manager {
    transforms: Vec<Box<dyn Transform>>,
}

impl Manager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, transform: impl Transform + 'static) {
        self.transforms.push(Box::new(transform));
    }

    #[must_use]
    pub fn with(mut self, transform: impl Transform + 'static) -> Self {
        self.append(transform);
        self
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Run every transform in order.
    ///
    /// With no transforms the result is a duplicate of the input.
    #[tracing::instrument(level = "debug", skip_all, fields(transforms = self.transforms.len()))]
    pub fn run(&self, program: &Program) -> Result<Program, TransformError> {
        if !program.is_valid() {
            return Err(TransformError::InvalidProgram { name: "manager" });
        }
        let mut current = program.duplicate();
        for transform in &self.transforms {
            tracing::debug!(name = transform.name(), "running transform");
            current = transform.run(&current)?;
        }
        Ok(current)
    }
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.transforms.iter().map(|t| t.name()))
            .finish()
    }
}

/// Check a transform's output and wrap failures.
pub(crate) fn finish(name: &'static str, output: Program) -> Result<Program, TransformError> {
    if output.is_valid() {
        Ok(output)
    } else {
        Err(TransformError::Failed {
            name,
            diagnostics: output.render_diagnostics(),
        })
    }
}
