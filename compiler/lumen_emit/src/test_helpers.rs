//! Shared test utilities for the printer tests.

use lumen_ast::{AttrKind, PipelineStage, StmtId};
use lumen_diagnostic::DiagnosticList;
use lumen_ir::{DeclId, Span};
use lumen_program::{FunctionSig, Program, ProgramBuilder, Session};

use crate::{generate, EmitError, GeneratorOptions, Target};

pub(crate) fn sp(n: u32) -> Span {
    Span::new(n, n + 1)
}

pub(crate) fn builder() -> ProgramBuilder {
    ProgramBuilder::new(&Session::new())
}

/// Build and require a valid program.
pub(crate) fn build(b: ProgramBuilder) -> Program {
    let program = b.build();
    assert!(program.is_valid(), "{}", program.render_diagnostics());
    program
}

/// Plain `fn f() { body }`.
pub(crate) fn plain_fn(b: &mut ProgramBuilder, body: &[StmtId]) -> DeclId {
    b.function("f", &FunctionSig::new(), body, sp(0))
}

/// `@compute @workgroup_size(x, y, z) fn name() { body }`.
pub(crate) fn compute_fn(b: &mut ProgramBuilder, name: &str, size: [u32; 3], body: &[StmtId]) -> DeclId {
    let stage = b.attr(AttrKind::Stage(PipelineStage::Compute), sp(0));
    let [x, y, z] = size;
    let wg = b.attr(AttrKind::WorkgroupSize(x, y, z), sp(0));
    b.function(name, &FunctionSig::new().with_attr(stage).with_attr(wg), body, sp(0))
}

/// Generated text; panics with the diagnostics if generation fails.
pub(crate) fn emit(program: &Program, target: Target) -> String {
    match generate(program, &GeneratorOptions::new(target)) {
        Ok(output) => output.text,
        Err(EmitError::Emission { diagnostics, .. }) => {
            panic!("{target} generation failed: {diagnostics:#?}")
        }
        Err(err) => panic!("{target} generation failed: {err}"),
    }
}

/// Partial text and diagnostics of a generation that must fail while
/// printing.
pub(crate) fn emit_failure(program: &Program, target: Target) -> (String, DiagnosticList) {
    match generate(program, &GeneratorOptions::new(target)) {
        Err(EmitError::Emission {
            partial, diagnostics, ..
        }) => (partial, diagnostics),
        other => panic!("expected an emission failure, got {other:?}"),
    }
}

/// Messages of every diagnostic, in report order.
pub(crate) fn messages(diagnostics: &DiagnosticList) -> Vec<String> {
    diagnostics.iter().map(|d| d.message.clone()).collect()
}
