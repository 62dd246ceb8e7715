//! Shared test utilities for resolver, clone and transform tests.
//!
//! Only compiled in test builds.

use lumen_ast::{AttrKind, PipelineStage, StmtId};
use lumen_diagnostic::{Diagnostic, ErrorCode};
use lumen_ir::{DeclId, Span};

use crate::{FunctionSig, Program, ProgramBuilder, Session};

/// Span covering one byte at `n`. Distinct spans keep assertions readable.
pub(crate) fn sp(n: u32) -> Span {
    Span::new(n, n + 1)
}

pub(crate) fn builder() -> ProgramBuilder {
    ProgramBuilder::new(&Session::new())
}

/// Codes of every diagnostic, in report order.
pub(crate) fn codes(program: &Program) -> Vec<ErrorCode> {
    program.diagnostics().iter().map(|d| d.code).collect()
}

/// The only diagnostic of `program`.
///
/// # Panics
/// Panics unless exactly one diagnostic was reported.
pub(crate) fn single(program: &Program) -> &Diagnostic {
    let all = program.diagnostics().as_slice();
    assert_eq!(all.len(), 1, "expected one diagnostic, got {all:#?}");
    &all[0]
}

/// Plain `fn f() { body }`.
pub(crate) fn plain_fn(b: &mut ProgramBuilder, body: &[StmtId]) -> DeclId {
    b.function("f", &FunctionSig::new(), body, sp(0))
}

/// `@fragment fn frag() { body }`.
pub(crate) fn fragment_fn(b: &mut ProgramBuilder, body: &[StmtId]) -> DeclId {
    let stage = b.attr(AttrKind::Stage(PipelineStage::Fragment), sp(0));
    b.function("frag", &FunctionSig::new().with_attr(stage), body, sp(0))
}
